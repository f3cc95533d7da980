use serde::{Deserialize, Serialize};

/// The most recent post of the blog feed, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub date: String,
    pub excerpt: String,
}

/// What the latest-post region ended up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Cached(FeedEntry),
    Loaded(FeedEntry),
    Fallback,
}

impl FeedView {
    pub fn entry(&self) -> Option<&FeedEntry> {
        match self {
            FeedView::Cached(entry) | FeedView::Loaded(entry) => Some(entry),
            FeedView::Fallback => None,
        }
    }
}
