//! Minimal prelude for SDK consumers.

pub use crate::config::{catalog_sources, fountain_capacity, initial_tab};
pub use crate::data::{
    CatalogEvent, CatalogFetcher, CatalogSource, CatalogSources, CatalogTier,
    HttpCatalogFetcher, IndexedStar, StarRecord,
};
pub use crate::render::{PointCloudRenderer, StarRenderer};
pub use crate::sdk::ShowcaseBuilder;
pub use crate::ui::DemoTab;
