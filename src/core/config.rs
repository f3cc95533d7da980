use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::feed::{FeedConfig, FEED_TIMEOUT};
use super::projects::loader::{LoadError, ProjectSources};

const DEFAULT_SITE_URL: &str = "http://localhost:8000/";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid url: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("project sources cannot be resolved: {0}")]
    Sources(#[from] LoadError),
}

/// Everything one simulated page load needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub site_url: Url,
    pub feed: FeedConfig,
    pub project_sources: ProjectSources,
    pub session_dir: PathBuf,
    pub page: String,
    pub prefers_dark: bool,
}

impl SiteConfig {
    /// Reads `FOLIO_*` variables, after loading `.env.local` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let site_url = parse_url(
            "FOLIO_SITE_URL",
            &read("FOLIO_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
        )?;
        let feed_url = match read("FOLIO_FEED_URL") {
            Some(value) => parse_url("FOLIO_FEED_URL", &value)?,
            None => join_url("FOLIO_FEED_URL", &site_url, "blog/feed.xml")?,
        };
        let blog_home_url = match read("FOLIO_BLOG_HOME_URL") {
            Some(value) => parse_url("FOLIO_BLOG_HOME_URL", &value)?,
            None => join_url("FOLIO_BLOG_HOME_URL", &site_url, "blog/")?,
        };
        let timeout = match read("FOLIO_FEED_TIMEOUT_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "FOLIO_FEED_TIMEOUT_MS",
                    value,
                })?,
            None => FEED_TIMEOUT,
        };
        let session_dir = read("FOLIO_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("folio-session"));
        let page = read("FOLIO_PAGE").unwrap_or_else(|| "/".to_string());
        let prefers_dark = read("FOLIO_PREFERS_DARK").is_some_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });

        Ok(Self {
            project_sources: ProjectSources::for_site(&site_url)?,
            feed: FeedConfig {
                feed_url: feed_url.to_string(),
                blog_home_url: blog_home_url.to_string(),
                timeout,
            },
            site_url,
            session_dir,
            page,
            prefers_dark,
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

fn join_url(name: &'static str, base: &Url, path: &str) -> Result<Url, ConfigError> {
    base.join(path)
        .map_err(|source| ConfigError::InvalidUrl { name, source })
}
