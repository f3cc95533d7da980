use std::collections::{BTreeMap, BTreeSet};

use crate::core::text::escape;

/// Current URL of the page, split the way `window.location` exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub search: String,
}

impl Location {
    /// Parses a path-and-query reference such as `/projects.html?lang=Rust#grid`.
    pub fn parse(reference: &str) -> Self {
        let without_fragment = reference.split('#').next().unwrap_or_default();
        let (pathname, query) = match without_fragment.split_once('?') {
            Some((pathname, query)) => (pathname, query),
            None => (without_fragment, ""),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };
        Self {
            pathname: pathname.to_string(),
            search: if query.is_empty() {
                String::new()
            } else {
                format!("?{query}")
            },
        }
    }

    pub fn href(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::parse("/")
    }
}

/// A named render target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    html: String,
    hidden: bool,
    renders: usize,
    history: Vec<String>,
}

impl Region {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Every fragment rendered into this region, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

/// The document the widgets render into.
///
/// Regions that were never declared are silently skipped by every setter;
/// widgets check [`Page::has_region`] to disable features whose targets are
/// missing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    regions: BTreeMap<String, Region>,
    root_attributes: BTreeMap<String, String>,
    body_classes: BTreeSet<String>,
    location: Location,
    history_len: usize,
}

impl Page {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            history_len: 1,
            ..Self::default()
        }
    }

    pub fn with_regions<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.add_region(id);
        }
        self
    }

    pub fn add_region(&mut self, id: impl Into<String>) {
        self.regions.entry(id.into()).or_default();
    }

    pub fn has_region(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(Region::html)
    }

    /// Replaces the markup of a region. Returns `false` if the region is missing.
    pub fn set_html(&mut self, id: &str, html: impl Into<String>) -> bool {
        let Some(region) = self.regions.get_mut(id) else {
            return false;
        };
        let html = html.into();
        region.history.push(html.clone());
        region.html = html;
        region.renders += 1;
        true
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
        let Some(region) = self.regions.get_mut(id) else {
            return false;
        };
        region.hidden = hidden;
        true
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_string());
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Rewrites the current URL without adding a history entry.
    pub fn replace_state(&mut self, reference: &str) {
        self.location = Location::parse(reference);
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Serializes the page as a standalone HTML document.
    pub fn render_document(&self) -> String {
        let mut document = String::from("<!doctype html>\n<html");
        for (name, value) in &self.root_attributes {
            document.push_str(&format!(" {}=\"{}\"", escape(name), escape(value)));
        }
        document.push_str(">\n<body");
        if !self.body_classes.is_empty() {
            let classes = self
                .body_classes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            document.push_str(&format!(" class=\"{}\"", escape(&classes)));
        }
        document.push_str(&format!(
            " data-location=\"{}\">\n",
            escape(&self.location.href())
        ));
        for (id, region) in &self.regions {
            let style = if region.hidden {
                " style=\"display: none\""
            } else {
                ""
            };
            document.push_str(&format!(
                "<section id=\"{}\"{style}>{}</section>\n",
                escape(id),
                region.html
            ));
        }
        document.push_str("</body>\n</html>\n");
        document
    }
}
