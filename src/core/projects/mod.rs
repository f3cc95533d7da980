pub mod filter;
pub mod loader;
pub mod render;
pub mod types;

use filter::{apply_filters, url_with_filters, Facet, Facets, FilterState};
use loader::{load_projects, ProjectSources};
use types::ProjectRecord;

use crate::core::page::Page;

pub const FEATURED_LIMIT: usize = 6;

pub const FEATURED_REGION: &str = "featured-projects";
pub const GRID_REGION: &str = "projects";
pub const LANGUAGE_CHIPS_REGION: &str = "project-languages";
pub const TAG_CHIPS_REGION: &str = "project-tags";
pub const STATUS_CHIPS_REGION: &str = "project-status";
pub const EMPTY_STATE_REGION: &str = "projects-empty";
/// Trigger that resets every active filter.
pub const CLEAR_FILTERS_REGION: &str = "clear-filters";

fn chips_region(facet: Facet) -> &'static str {
    match facet {
        Facet::Language => LANGUAGE_CHIPS_REGION,
        Facet::Tag => TAG_CHIPS_REGION,
        Facet::Status => STATUS_CHIPS_REGION,
    }
}

/// Orders by `updated`, newest first, comparing the raw strings.
pub fn sort_by_updated(projects: &mut [ProjectRecord]) {
    projects.sort_by(|a, b| b.updated.cmp(&a.updated));
}

/// Featured projects when any are flagged, otherwise every project.
pub fn featured_candidates(projects: &[ProjectRecord]) -> Vec<&ProjectRecord> {
    let featured = projects
        .iter()
        .filter(|project| project.featured)
        .collect::<Vec<_>>();
    if featured.is_empty() {
        projects.iter().collect()
    } else {
        featured
    }
}

/// Loads the project list and mounts the catalog onto a page.
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    client: reqwest::Client,
    sources: ProjectSources,
}

impl ProjectCatalog {
    pub fn new(client: reqwest::Client, sources: ProjectSources) -> Self {
        Self { client, sources }
    }

    /// Renders featured projects and, when the filter regions exist, the
    /// filterable grid.
    ///
    /// Returns `None` if loading failed, no projects exist, or the page lacks
    /// the regions filtering needs.
    pub async fn init_projects(&self, page: &mut Page) -> Option<CatalogView> {
        let projects = match load_projects(&self.client, &self.sources).await {
            Ok(projects) => projects,
            Err(error) => {
                tracing::warn!("project catalog unavailable: {error}");
                return None;
            }
        };
        if projects.is_empty() {
            tracing::info!("project catalog is empty");
            return None;
        }
        tracing::info!(count = projects.len(), "loaded projects");
        CatalogView::mount(projects, page)
    }
}

/// A mounted, filterable project grid.
///
/// The view owns the active [`FilterState`]; every change re-renders chips,
/// cards and the empty state from it and rewrites the URL in place.
#[derive(Debug, Clone)]
pub struct CatalogView {
    projects: Vec<ProjectRecord>,
    facets: Facets,
    filters: FilterState,
    status_enabled: bool,
}

impl CatalogView {
    pub fn mount(mut projects: Vec<ProjectRecord>, page: &mut Page) -> Option<Self> {
        sort_by_updated(&mut projects);
        page.set_html(
            FEATURED_REGION,
            render::project_list(featured_candidates(&projects), Some(FEATURED_LIMIT)),
        );

        let required = [LANGUAGE_CHIPS_REGION, TAG_CHIPS_REGION, GRID_REGION];
        if let Some(missing) = required.iter().find(|id| !page.has_region(id)) {
            tracing::debug!(region = missing, "project filters disabled");
            return None;
        }

        let status_enabled = page.has_region(STATUS_CHIPS_REGION);
        let mut facets = Facets::derive(&projects);
        if !status_enabled {
            facets.statuses.clear();
        }
        let filters = FilterState::from_query(&page.location().search).restricted_to(&facets);

        let view = Self {
            projects,
            facets,
            filters,
            status_enabled,
        };
        view.apply(page);
        Some(view)
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn visible(&self) -> Vec<&ProjectRecord> {
        apply_filters(&self.projects, &self.filters)
    }

    /// Flips one chip. Values with no chip on the page are ignored.
    pub fn toggle(&mut self, page: &mut Page, facet: Facet, value: &str) -> usize {
        if facet == Facet::Status && !self.status_enabled {
            return self.visible().len();
        }
        if !self.facets.values(facet).contains(value) {
            return self.visible().len();
        }
        self.filters = self.filters.toggled(facet, value);
        self.apply(page)
    }

    /// Resets all filters. Pages without a clear trigger have nothing to click.
    pub fn clear(&mut self, page: &mut Page) -> usize {
        if !page.has_region(CLEAR_FILTERS_REGION) {
            return self.visible().len();
        }
        self.filters = FilterState::default();
        self.apply(page)
    }

    fn apply(&self, page: &mut Page) -> usize {
        for facet in Facet::ALL {
            if facet == Facet::Status && !self.status_enabled {
                continue;
            }
            page.set_html(
                chips_region(facet),
                render::filter_chips(facet, self.facets.values(facet), &self.filters),
            );
        }

        let visible = self.visible();
        page.set_html(GRID_REGION, render::project_list(visible.iter().copied(), None));
        page.set_hidden(EMPTY_STATE_REGION, !visible.is_empty());

        let url = url_with_filters(&page.location().pathname, &self.filters);
        page.replace_state(&url);
        visible.len()
    }
}
