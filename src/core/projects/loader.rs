use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use url::Url;

use super::types::{normalize_value, ProjectRecord};

pub const AUTO_SOURCE_PATH: &str = "data/projects.auto.json";
pub const FALLBACK_SOURCE_PATH: &str = "data/projects.json";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("source is not a JSON array")]
    NotAnArray,
    #[error("source has no usable project records")]
    Empty,
}

/// Generated source first, hand-curated source second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSources {
    pub primary: Url,
    pub fallback: Url,
}

impl ProjectSources {
    /// Resolves the two source paths against the site root.
    pub fn for_site(site_url: &Url) -> Result<Self, LoadError> {
        Ok(Self {
            primary: site_url.join(AUTO_SOURCE_PATH)?,
            fallback: site_url.join(FALLBACK_SOURCE_PATH)?,
        })
    }
}

pub async fn fetch_json(client: &reqwest::Client, url: &Url) -> Result<Value, LoadError> {
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus(status.as_u16()));
    }
    Ok(response.json::<Value>().await?)
}

/// Maps every object of a source array through the normalizer.
pub fn normalize_records(value: Value) -> Result<Vec<ProjectRecord>, LoadError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().filter_map(normalize_value).collect()),
        _ => Err(LoadError::NotAnArray),
    }
}

/// Loads projects from the primary source, falling back to the curated one.
///
/// The primary source is used only when it answers with an array holding at
/// least one usable record. A fallback that is not an array yields no projects; a fallback that cannot
/// be fetched is an error.
pub async fn load_projects(
    client: &reqwest::Client,
    sources: &ProjectSources,
) -> Result<Vec<ProjectRecord>, LoadError> {
    match load_primary(client, &sources.primary).await {
        Ok(projects) => return Ok(projects),
        Err(error) => {
            tracing::info!(source = %sources.primary, "using fallback project source: {error}");
        }
    }

    let fallback = fetch_json(client, &sources.fallback).await?;
    match normalize_records(fallback) {
        Ok(projects) => Ok(projects),
        Err(LoadError::NotAnArray) => Ok(Vec::new()),
        Err(error) => Err(error),
    }
}

async fn load_primary(client: &reqwest::Client, url: &Url) -> Result<Vec<ProjectRecord>, LoadError> {
    let projects = normalize_records(fetch_json(client, url).await?)?;
    if projects.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;

    const AUTO: &str = include_str!("../../../fixtures/projects/projects.auto.json");
    const CURATED: &str = include_str!("../../../fixtures/projects/projects.json");

    fn json_response(body: &'static str) -> Response {
        ([(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }

    async fn spawn_site(primary: Option<&'static str>, fallback: Option<&'static str>) -> (Url, tokio::task::JoinHandle<()>) {
        let primary_route = get(move || async move {
            match primary {
                Some(body) => json_response(body),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        });
        let fallback_route = get(move || async move {
            match fallback {
                Some(body) => json_response(body),
                None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        });
        let app = Router::new()
            .route("/data/projects.auto.json", primary_route)
            .route("/data/projects.json", fallback_route);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        let site = Url::parse(&format!("http://{address}/")).expect("site url should parse");
        (site, join_handle)
    }

    async fn load_from(primary: Option<&'static str>, fallback: Option<&'static str>) -> Result<Vec<ProjectRecord>, LoadError> {
        let (site, server_task) = spawn_site(primary, fallback).await;
        let sources = ProjectSources::for_site(&site).expect("sources should resolve");
        let result = load_projects(&reqwest::Client::new(), &sources).await;
        server_task.abort();
        result
    }

    #[test]
    fn resolves_sources_relative_to_site() {
        let site = Url::parse("https://me.example/portfolio/").expect("url");
        let sources = ProjectSources::for_site(&site).expect("sources should resolve");
        assert_eq!(sources.primary.as_str(), "https://me.example/portfolio/data/projects.auto.json");
        assert_eq!(sources.fallback.as_str(), "https://me.example/portfolio/data/projects.json");
    }

    #[test]
    fn non_arrays_are_rejected() {
        assert!(matches!(
            normalize_records(serde_json::json!({"items": []})),
            Err(LoadError::NotAnArray)
        ));
    }

    #[tokio::test]
    async fn prefers_generated_source() {
        let projects = load_from(Some(AUTO), Some(CURATED)).await.expect("load should succeed");
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].title, "ringbuf-rs");
        assert_eq!(projects[0].repo, "https://github.com/example/ringbuf-rs");
    }

    #[tokio::test]
    async fn falls_back_when_generated_source_is_missing_or_empty() {
        for primary in [
            None,
            Some("[]"),
            Some("[1, \"x\", null]"),
            Some("{\"not\": \"an array\"}"),
            Some("not json"),
        ] {
            let projects = load_from(primary, Some(CURATED)).await.expect("load should succeed");
            assert_eq!(projects.len(), 3, "{primary:?}");
            assert_eq!(projects[0].title, "folio");
        }
    }

    #[tokio::test]
    async fn mistyped_fields_do_not_drop_records() {
        let primary = r#"[1, {"title": 5, "name": "x", "topics": ["cli", 7]}]"#;
        let projects = load_from(Some(primary), Some(CURATED)).await.expect("load should succeed");

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "x");
        assert_eq!(projects[0].topics, vec!["cli".to_string()]);
    }

    #[tokio::test]
    async fn non_array_fallback_yields_nothing() {
        let projects = load_from(None, Some("{}")).await.expect("load should succeed");
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn failing_fallback_is_an_error() {
        let error = load_from(None, None).await.expect_err("load should fail");
        assert!(matches!(error, LoadError::HttpStatus(500)));
    }
}
