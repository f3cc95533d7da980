use crate::core::cache::Storage;
use crate::core::page::Page;

pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const THEME_TOGGLE_REGION: &str = "theme-toggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Stored preference first, then the system color scheme.
pub fn initial_theme(storage: &dyn Storage, prefers_dark: bool) -> Theme {
    let stored = match storage.get_item(THEME_STORAGE_KEY) {
        Ok(value) => value.as_deref().and_then(Theme::parse),
        Err(error) => {
            tracing::debug!("theme preference unreadable: {error}");
            None
        }
    };
    stored.unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light })
}

pub fn apply_theme(page: &mut Page, theme: Theme) {
    page.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
}

/// Applies the initial theme when the page carries a theme toggle.
pub fn init_theme(page: &mut Page, storage: &dyn Storage, prefers_dark: bool) -> Option<Theme> {
    if !page.has_region(THEME_TOGGLE_REGION) {
        return None;
    }
    let theme = initial_theme(storage, prefers_dark);
    apply_theme(page, theme);
    Some(theme)
}

/// Flips the page theme and remembers the choice.
pub fn toggle_theme(page: &mut Page, storage: &dyn Storage) -> Theme {
    let current = page
        .root_attribute(THEME_ATTRIBUTE)
        .and_then(Theme::parse)
        .unwrap_or(Theme::Light);
    let next = current.toggled();
    apply_theme(page, next);
    if let Err(error) = storage.set_item(THEME_STORAGE_KEY, next.as_str()) {
        tracing::debug!("theme preference not saved: {error}");
    }
    next
}
