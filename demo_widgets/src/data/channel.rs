use crossbeam_channel::{Receiver, Sender};

use crate::data::CatalogEvent;

/// Bevy resource holding both ends of the catalog channel. Fetchers get a
/// clone of the sender; `ingest_catalog` drains the receiver each frame.
#[derive(bevy::prelude::Resource)]
pub struct CatalogChannel {
    tx: Sender<CatalogEvent>,
    rx: Receiver<CatalogEvent>,
}

impl Default for CatalogChannel {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl CatalogChannel {
    pub fn sender(&self) -> Sender<CatalogEvent> {
        self.tx.clone()
    }

    /// Next completed fetch, if any. Never blocks.
    pub fn try_next(&self) -> Option<CatalogEvent> {
        self.rx.try_recv().ok()
    }
}
