// Catalog payloads as they arrive over the wire, and the record shape the
// rest of the crate works with. Both tiers decode into `StarRecord`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_MAGNITUDE: f64 = -2.0;
pub const DEFAULT_MAX_MAGNITUDE: f64 = 6.0;

/// Catalog identifier. Most catalogs use integers, a few use names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StarId {
    Number(u64),
    Name(String),
}

impl From<u64> for StarId {
    fn from(n: u64) -> Self {
        StarId::Number(n)
    }
}

/// A single star, immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct StarRecord {
    pub id: StarId,
    /// `[longitude, latitude]` in degrees.
    pub coordinates: [f64; 2],
    pub magnitude: f64,
    pub color_index: f64,
}

impl StarRecord {
    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn within_magnitude(&self, min: f64, max: f64) -> bool {
        self.magnitude >= min && self.magnitude <= max
    }
}

/// Coarse tier: a point-feature collection, consumed as-is.
#[derive(Clone, Debug, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<StarFeature>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StarFeature {
    pub id: StarId,
    pub properties: StarProperties,
    pub geometry: PointGeometry,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StarProperties {
    pub mag: f64,
    #[serde(default)]
    pub bv: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

impl From<StarFeature> for StarRecord {
    fn from(feature: StarFeature) -> Self {
        StarRecord {
            id: feature.id,
            coordinates: feature.geometry.coordinates,
            magnitude: feature.properties.mag,
            color_index: feature.properties.bv.unwrap_or(0.0),
        }
    }
}

impl FeatureCollection {
    pub fn into_records(self) -> Vec<StarRecord> {
        self.features.into_iter().map(StarRecord::from).collect()
    }
}

/// Detailed tier: `{ "data": [[id, lon, lat, mag, bv], ...] }`.
#[derive(Clone, Debug, Deserialize)]
pub struct CompactCatalog {
    pub data: Vec<CompactStar>,
}

/// Fixed-position tuple `[id, lon, lat, mag, bv]`.
#[derive(Clone, Debug, Deserialize)]
pub struct CompactStar(pub StarId, pub f64, pub f64, pub f64, pub Option<f64>);

impl From<CompactStar> for StarRecord {
    fn from(CompactStar(id, lon, lat, mag, bv): CompactStar) -> Self {
        StarRecord {
            id,
            coordinates: [lon, lat],
            magnitude: mag,
            color_index: bv.unwrap_or(0.0),
        }
    }
}

/// Expands the compact tuple encoding into full records, preserving order.
pub fn compact_to_records(catalog: CompactCatalog) -> Vec<StarRecord> {
    catalog.data.into_iter().map(StarRecord::from).collect()
}

/// A record paired with its position in the catalog it came from.
pub type IndexedStar<'a> = (usize, &'a StarRecord);

/// Records whose magnitude lies in `[min, max]`, inclusive on both ends,
/// each keeping its catalog index.
pub fn filter_by_magnitude(records: &[StarRecord], min: f64, max: f64) -> Vec<IndexedStar<'_>> {
    records
        .iter()
        .enumerate()
        .filter(|(_, star)| star.within_magnitude(min, max))
        .collect()
}
