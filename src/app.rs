use std::sync::Arc;

use chrono::Datelike;

use crate::core::cache::{FileStorage, MemoryStorage, SessionCache, Storage};
use crate::core::config::{ConfigError, SiteConfig};
use crate::core::feed::types::FeedView;
use crate::core::feed::{FeedDigest, LATEST_POST_REGION};
use crate::core::page::{Location, Page};
use crate::core::projects::{
    CatalogView, ProjectCatalog, CLEAR_FILTERS_REGION, EMPTY_STATE_REGION, FEATURED_REGION,
    GRID_REGION, LANGUAGE_CHIPS_REGION, STATUS_CHIPS_REGION, TAG_CHIPS_REGION,
};
use crate::core::theme::{init_theme, THEME_TOGGLE_REGION};

pub const YEAR_REGION: &str = "year";

/// Regions present on the full site layout.
pub const SITE_REGIONS: [&str; 10] = [
    THEME_TOGGLE_REGION,
    LATEST_POST_REGION,
    FEATURED_REGION,
    GRID_REGION,
    LANGUAGE_CHIPS_REGION,
    TAG_CHIPS_REGION,
    STATUS_CHIPS_REGION,
    EMPTY_STATE_REGION,
    CLEAR_FILTERS_REGION,
    YEAR_REGION,
];

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of one simulated page load.
#[derive(Debug)]
pub struct PageLoad {
    pub page: Page,
    pub feed: Option<FeedView>,
    pub catalog: Option<CatalogView>,
}

pub fn set_year(page: &mut Page, year: i32) {
    page.set_html(YEAR_REGION, year.to_string());
}

/// Loads the site once: theme, footer year, latest post, project catalog.
///
/// Widget failures degrade their own region only, and an unusable session
/// directory falls back to in-memory storage. An error here means the HTTP
/// client could not be set up.
pub async fn run(config: &SiteConfig) -> Result<PageLoad, AppError> {
    let storage = open_session(config);
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut page = Page::new(Location::parse(&config.page)).with_regions(SITE_REGIONS);
    init_theme(&mut page, storage.as_ref(), config.prefers_dark);
    set_year(&mut page, chrono::Local::now().year());

    let digest = FeedDigest::new(
        client.clone(),
        config.feed.clone(),
        SessionCache::new(storage.clone()),
    );
    let feed = digest.load_latest(&mut page).await;

    let catalog = ProjectCatalog::new(client, config.project_sources.clone())
        .init_projects(&mut page)
        .await;

    tracing::info!(
        feed = ?feed.as_ref().map(feed_state),
        projects = ?catalog.as_ref().map(|view| view.projects().len()),
        location = %page.location().href(),
        "page loaded"
    );
    Ok(PageLoad {
        page,
        feed,
        catalog,
    })
}

fn open_session(config: &SiteConfig) -> Arc<dyn Storage> {
    match FileStorage::open(&config.session_dir) {
        Ok(storage) => Arc::new(storage),
        Err(error) => {
            tracing::warn!(
                dir = %config.session_dir.display(),
                "session directory unusable, keeping this session in memory: {error}"
            );
            Arc::new(MemoryStorage::default())
        }
    }
}

fn feed_state(view: &FeedView) -> &'static str {
    match view {
        FeedView::Cached(_) => "cached",
        FeedView::Loaded(_) => "loaded",
        FeedView::Fallback => "fallback",
    }
}
