//! Env parsing and defaults.

use crate::data::{CatalogSource, CatalogSources};
use crate::fountain::pool::DEFAULT_CAPACITY;
use crate::ui::DemoTab;

pub const COARSE_CATALOG_VAR: &str = "COARSE_CATALOG";
pub const DETAILED_CATALOG_VAR: &str = "DETAILED_CATALOG";
pub const FOUNTAIN_CAPACITY_VAR: &str = "FOUNTAIN_CAPACITY";
pub const INITIAL_TAB_VAR: &str = "VITRINE_TAB";

/// Catalog locations from `COARSE_CATALOG` / `DETAILED_CATALOG`, each either
/// an http(s) URL or a file path. Unset or blank falls back to the default.
pub fn catalog_sources() -> CatalogSources {
    let mut sources = CatalogSources::default();
    if let Some(raw) = non_blank_var(COARSE_CATALOG_VAR) {
        sources.coarse = CatalogSource::parse(&raw);
    }
    if let Some(raw) = non_blank_var(DETAILED_CATALOG_VAR) {
        sources.detailed = CatalogSource::parse(&raw);
    }
    sources
}

/// Maximum number of live emoji bodies.
pub fn fountain_capacity() -> usize {
    let Some(raw) = non_blank_var(FOUNTAIN_CAPACITY_VAR) else {
        return DEFAULT_CAPACITY;
    };
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => capacity,
        _ => {
            eprintln!("vitrine: invalid {FOUNTAIN_CAPACITY_VAR} {raw:?}, using {DEFAULT_CAPACITY}");
            DEFAULT_CAPACITY
        }
    }
}

/// Tab shown at startup.
pub fn initial_tab() -> DemoTab {
    let Some(raw) = non_blank_var(INITIAL_TAB_VAR) else {
        return DemoTab::default();
    };
    raw.parse().unwrap_or_else(|err| {
        eprintln!("vitrine: {INITIAL_TAB_VAR}: {err}");
        DemoTab::default()
    })
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|raw| !raw.trim().is_empty())
}
