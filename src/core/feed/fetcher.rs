use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchedFeed {
    /// Whether the declared media type is an XML flavor. A missing header counts as XML.
    pub fn declares_xml(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |value| value.to_ascii_lowercase().contains("xml"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid feed url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Appends a `v=<epoch-ms>` parameter so intermediaries never serve a stale feed.
pub fn cache_busted_url(url: &str, now_ms: i64) -> Result<Url, FetchError> {
    let mut parsed = Url::parse(url)?;
    parsed
        .query_pairs_mut()
        .append_pair("v", &now_ms.to_string());
    Ok(parsed)
}

/// Fetches the feed body, giving up once `timeout` elapses.
///
/// The request future is dropped on timeout, which aborts the in-flight
/// connection.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    now_ms: i64,
    timeout: Duration,
) -> Result<FetchedFeed, FetchError> {
    let target = cache_busted_url(url, now_ms)?;
    match tokio::time::timeout(timeout, request_feed(client, target)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

async fn request_feed(client: &reqwest::Client, target: Url) -> Result<FetchedFeed, FetchError> {
    let response = client
        .get(target)
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let body = response.text().await?;

    Ok(FetchedFeed { body, content_type })
}
