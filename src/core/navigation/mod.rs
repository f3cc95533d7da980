use std::time::Duration;

use url::Url;

use crate::core::page::Page;

/// Time the fade-out runs before the browser follows the link.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(190);

pub const FADE_OUT_CLASS: &str = "fade-out";
pub const LOADING_BAR_CLASS: &str = "loading-bar-active";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    pub href: String,
    pub opens_new_tab: bool,
    pub modifier_pressed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Native,
    Transition { href: String, delay: Duration },
}

/// Decides whether a link click gets the animated page transition.
///
/// Only same-origin links opened in the current tab without modifier keys are
/// animated, and never when the visitor prefers reduced motion.
pub fn classify_click(click: &LinkClick, page_url: &Url, reduced_motion: bool) -> Navigation {
    if reduced_motion || click.modifier_pressed || click.opens_new_tab {
        return Navigation::Native;
    }
    if click.href.starts_with('#') {
        return Navigation::Native;
    }
    let Ok(target) = page_url.join(&click.href) else {
        return Navigation::Native;
    };
    if target.origin() != page_url.origin() {
        return Navigation::Native;
    }
    Navigation::Transition {
        href: click.href.clone(),
        delay: TRANSITION_DELAY,
    }
}

pub fn begin_transition(page: &mut Page) {
    page.add_body_class(FADE_OUT_CLASS);
    page.add_body_class(LOADING_BAR_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::Location;

    fn page_url() -> Url {
        Url::parse("https://me.example/index.html").expect("url")
    }

    fn click(href: &str) -> LinkClick {
        LinkClick {
            href: href.to_string(),
            ..LinkClick::default()
        }
    }

    #[test]
    fn same_origin_links_transition() {
        assert_eq!(
            classify_click(&click("/projects.html"), &page_url(), false),
            Navigation::Transition {
                href: "/projects.html".to_string(),
                delay: TRANSITION_DELAY,
            }
        );
        assert!(matches!(
            classify_click(&click("https://me.example/about"), &page_url(), false),
            Navigation::Transition { .. }
        ));
    }

    #[test]
    fn other_links_navigate_natively() {
        let url = page_url();
        assert_eq!(classify_click(&click("https://other.example/"), &url, false), Navigation::Native);
        assert_eq!(classify_click(&click("#top"), &url, false), Navigation::Native);
        assert_eq!(classify_click(&click("/projects.html"), &url, true), Navigation::Native);

        let new_tab = LinkClick {
            opens_new_tab: true,
            ..click("/projects.html")
        };
        assert_eq!(classify_click(&new_tab, &url, false), Navigation::Native);

        let modified = LinkClick {
            modifier_pressed: true,
            ..click("/projects.html")
        };
        assert_eq!(classify_click(&modified, &url, false), Navigation::Native);
    }

    #[test]
    fn transition_marks_the_body() {
        let mut page = Page::new(Location::default());
        begin_transition(&mut page);
        assert!(page.has_body_class(FADE_OUT_CLASS));
        assert!(page.has_body_class(LOADING_BAR_CLASS));
    }
}
