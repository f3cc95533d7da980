pub mod cache;
pub mod config;
pub mod feed;
pub mod navigation;
pub mod page;
pub mod projects;
pub mod text;
pub mod theme;
