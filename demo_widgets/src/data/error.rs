//! Catalog fetch and decode errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to start fetch runtime: {0}")]
    Runtime(std::io::Error),
}
