//! Catalog fetcher: dedicated thread + tokio + reqwest → CatalogEvent.

use std::thread;

use bevy::log::{error, info};
use crossbeam_channel::Sender;

use crate::data::error::CatalogError;
use crate::data::model::{compact_to_records, CompactCatalog, FeatureCollection, StarRecord};
use crate::data::{CatalogEvent, CatalogFetcher, CatalogSource, CatalogSources, CatalogTier};

/// Fetches catalog tiers over HTTP or from disk, one thread per request.
#[derive(Clone, Debug, Default)]
pub struct HttpCatalogFetcher {
    pub sources: CatalogSources,
}

impl HttpCatalogFetcher {
    pub fn new(sources: CatalogSources) -> Self {
        Self { sources }
    }
}

impl CatalogFetcher for HttpCatalogFetcher {
    fn fetch(&self, tier: CatalogTier, tx: Sender<CatalogEvent>) {
        let source = self.sources.for_tier(tier).clone();
        thread::spawn(move || {
            let result = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(fetch_tier(tier, &source)),
                Err(err) => Err(CatalogError::Runtime(err)),
            };
            match &result {
                Ok(records) => info!("{tier} catalog: {} stars from {source}", records.len()),
                Err(err) => error!("error loading {tier} star data from {source}: {err}"),
            }
            // Receiver gone means the app is shutting down.
            let _ = tx.send(CatalogEvent { tier, result });
        });
    }
}

/// Fetch and decode one tier.
pub async fn fetch_tier(
    tier: CatalogTier,
    source: &CatalogSource,
) -> Result<Vec<StarRecord>, CatalogError> {
    let bytes = read_source(source).await?;
    decode_tier(tier, &bytes)
}

/// Decode raw JSON bytes according to the tier's wire format.
pub fn decode_tier(tier: CatalogTier, bytes: &[u8]) -> Result<Vec<StarRecord>, CatalogError> {
    match tier {
        CatalogTier::Coarse => {
            let collection: FeatureCollection = serde_json::from_slice(bytes)?;
            Ok(collection.into_records())
        }
        CatalogTier::Detailed => {
            let compact: CompactCatalog = serde_json::from_slice(bytes)?;
            Ok(compact_to_records(compact))
        }
    }
}

async fn read_source(source: &CatalogSource) -> Result<Vec<u8>, CatalogError> {
    match source {
        CatalogSource::Http(url) => {
            let response = reqwest::get(url.clone()).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response.bytes().await?.to_vec())
        }
        CatalogSource::File(path) => tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}
