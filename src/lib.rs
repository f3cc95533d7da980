pub mod app;
pub mod core;

pub use crate::app::{run, AppError};
pub use crate::core::config::SiteConfig;
pub use crate::core::feed::{types::FeedView, FeedDigest};
pub use crate::core::page::{Location, Page};
pub use crate::core::projects::{CatalogView, ProjectCatalog};
