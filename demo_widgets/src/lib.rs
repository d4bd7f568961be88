//! Interactive demo widgets: a catalog star field with a one-shot
//! coarse-to-detailed upgrade, and a physics emoji fountain.
//!
//! Library root: data, demos, SDK builder, and config modules.

pub mod config;
pub mod data;
pub mod fountain;
pub mod lifecycle;
pub mod render;
pub mod stars;
mod ui;

pub mod prelude;
pub mod sdk;

pub use data::{CatalogEvent, CatalogFetcher, CatalogSource, CatalogSources, CatalogTier};
pub use sdk::ShowcaseBuilder;
pub use ui::{format_count, DemoTab};
