pub mod fetcher;
pub mod parser;
pub mod render;
pub mod types;

use std::time::Duration;

use fetcher::{fetch_feed, FetchError};
use parser::{parse_latest_entry, FeedParseError};
use types::{FeedEntry, FeedView};

use crate::core::cache::{now_millis, SessionCache};
use crate::core::page::Page;

pub const LATEST_POST_CACHE_KEY: &str = "latestBlogPost";
pub const LATEST_POST_REGION: &str = "latest-blog";
pub const FEED_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub feed_url: String,
    pub blog_home_url: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] FeedParseError),
    #[error("feed contains no item or entry")]
    NoEntry,
    #[error("latest entry has no link")]
    MissingLink,
}

/// Fetches, caches and renders the most recent blog post.
#[derive(Clone)]
pub struct FeedDigest {
    client: reqwest::Client,
    config: FeedConfig,
    cache: SessionCache,
}

impl FeedDigest {
    pub fn new(client: reqwest::Client, config: FeedConfig, cache: SessionCache) -> Self {
        Self {
            client,
            config,
            cache,
        }
    }

    /// Renders the latest post into the `latest-blog` region.
    ///
    /// Returns `None` when the page has no such region. Every failure ends in
    /// [`FeedView::Fallback`]; nothing is cached unless an entry with a link
    /// was loaded.
    pub async fn load_latest(&self, page: &mut Page) -> Option<FeedView> {
        if !page.has_region(LATEST_POST_REGION) {
            return None;
        }

        if let Some(entry) = self.cache.get::<FeedEntry>(LATEST_POST_CACHE_KEY) {
            tracing::debug!(link = %entry.link, "rendering cached latest post");
            page.set_html(
                LATEST_POST_REGION,
                render::latest(&entry, &self.config.blog_home_url),
            );
            return Some(FeedView::Cached(entry));
        }

        page.set_html(LATEST_POST_REGION, render::skeleton());
        let view = match self.fetch_latest().await {
            Ok(entry) => {
                self.cache.set(LATEST_POST_CACHE_KEY, &entry);
                tracing::info!(link = %entry.link, "loaded latest post");
                FeedView::Loaded(entry)
            }
            Err(error) => {
                tracing::warn!(feed_url = %self.config.feed_url, "latest post unavailable: {error}");
                FeedView::Fallback
            }
        };
        page.set_html(
            LATEST_POST_REGION,
            render::view(&view, &self.config.blog_home_url),
        );
        Some(view)
    }

    /// Fetches and parses the feed without touching the cache or the page.
    pub async fn fetch_latest(&self) -> Result<FeedEntry, DigestError> {
        let fetched = fetch_feed(
            &self.client,
            &self.config.feed_url,
            now_millis(),
            self.config.timeout,
        )
        .await?;
        if !fetched.declares_xml() {
            tracing::debug!(
                content_type = ?fetched.content_type,
                url = %self.config.feed_url,
                "feed served with a non-xml content type"
            );
        }
        let entry = parse_latest_entry(&fetched.body)?.ok_or(DigestError::NoEntry)?;
        if entry.link.is_empty() {
            return Err(DigestError::MissingLink);
        }
        Ok(entry)
    }
}
