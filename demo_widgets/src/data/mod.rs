mod channel;
mod error;
pub mod http;
pub mod loader;
mod model;

use std::fmt;
use std::path::PathBuf;

use crossbeam_channel::Sender;
use url::Url;

pub use channel::CatalogChannel;
pub use error::CatalogError;
pub use http::HttpCatalogFetcher;
pub use loader::{CatalogLoader, LoadState, LoadTrigger, OneShotLoad};
pub use model::{
    compact_to_records, filter_by_magnitude, CompactCatalog, CompactStar, FeatureCollection,
    IndexedStar, StarFeature, StarId, StarRecord, DEFAULT_MAX_MAGNITUDE, DEFAULT_MIN_MAGNITUDE,
};

/// The two dataset tiers. Coarse is small and always fetched first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogTier {
    Coarse,
    Detailed,
}

impl fmt::Display for CatalogTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogTier::Coarse => f.write_str("coarse"),
            CatalogTier::Detailed => f.write_str("detailed"),
        }
    }
}

/// Where a tier is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Http(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// `http(s)://` URLs fetch over the network, everything else is a path.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Url>() {
            Ok(url) if matches!(url.scheme(), "http" | "https") => CatalogSource::Http(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(CatalogSource::File)
                .unwrap_or_else(|_| CatalogSource::File(PathBuf::from(raw))),
            _ => CatalogSource::File(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Http(url) => write!(f, "{url}"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub const DEFAULT_COARSE_SOURCE: &str = "data.json";
pub const DEFAULT_DETAILED_SOURCE: &str = "./public/stars-ultra-compact.json";

/// Source per tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSources {
    pub coarse: CatalogSource,
    pub detailed: CatalogSource,
}

impl Default for CatalogSources {
    fn default() -> Self {
        Self {
            coarse: CatalogSource::parse(DEFAULT_COARSE_SOURCE),
            detailed: CatalogSource::parse(DEFAULT_DETAILED_SOURCE),
        }
    }
}

impl CatalogSources {
    pub fn for_tier(&self, tier: CatalogTier) -> &CatalogSource {
        match tier {
            CatalogTier::Coarse => &self.coarse,
            CatalogTier::Detailed => &self.detailed,
        }
    }
}

/// Outcome of one tier fetch, delivered through the catalog channel.
#[derive(Debug)]
pub struct CatalogEvent {
    pub tier: CatalogTier,
    pub result: Result<Vec<StarRecord>, CatalogError>,
}

/// Interface for catalog fetchers. `fetch` must not block the caller and must
/// eventually send exactly one event for the requested tier.
pub trait CatalogFetcher: Send + Sync + 'static {
    fn fetch(&self, tier: CatalogTier, tx: Sender<CatalogEvent>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_parse_as_network_sources() {
        let source = CatalogSource::parse("https://example.org/stars.json");
        assert!(matches!(source, CatalogSource::Http(ref url) if url.host_str() == Some("example.org")));
    }

    #[test]
    fn relative_and_non_http_strings_are_paths() {
        assert_eq!(
            CatalogSource::parse("./public/stars-ultra-compact.json"),
            CatalogSource::File(PathBuf::from("./public/stars-ultra-compact.json"))
        );
        assert_eq!(
            CatalogSource::parse("data.json"),
            CatalogSource::File(PathBuf::from("data.json"))
        );
        assert_eq!(
            CatalogSource::parse("file:///tmp/data.json"),
            CatalogSource::File(PathBuf::from("/tmp/data.json"))
        );
    }
}
