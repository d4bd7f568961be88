//! Two-tier catalog loader with a one-shot coarse → detailed upgrade.
//!
//! Each tier is tracked by a [`OneShotLoad`] state machine. The active record
//! set is only ever replaced wholesale inside [`CatalogLoader::apply`], which
//! runs in a single system between frames.

use bevy::log::{info, warn};
use crossbeam_channel::Sender;

use crate::data::model::StarRecord;
use crate::data::{CatalogEvent, CatalogFetcher, CatalogTier};

/// Zoom-triggered retries after a failed background upgrade stop here.
pub const MAX_DETAILED_ATTEMPTS: u32 = 2;

/// Zoom level (0–6 scale) below which the detailed tier is wanted.
pub const DETAIL_ZOOM_THRESHOLD: f32 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotStarted,
    InFlight,
    Completed,
    Failed,
}

/// Per-tier load state plus how many fetches were started.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneShotLoad {
    state: LoadState,
    attempts: u32,
}

impl OneShotLoad {
    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn start(&mut self) {
        self.state = LoadState::InFlight;
        self.attempts += 1;
    }

    fn finish(&mut self, ok: bool) {
        self.state = if ok {
            LoadState::Completed
        } else {
            LoadState::Failed
        };
    }
}

/// What asked for the detailed tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadTrigger {
    /// Fired once the coarse tier settles.
    Background,
    /// User zoomed in past [`DETAIL_ZOOM_THRESHOLD`].
    Zoom,
}

/// Result of feeding one fetch event into the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The active record set was replaced.
    Swapped { tier: CatalogTier, count: usize },
    /// Coarse data arrived after the upgrade and was dropped.
    Stale,
    /// The fetch failed; the previous record set stays active.
    Failed,
    /// No fetch for this tier was in flight.
    Ignored,
}

#[derive(Debug, Default)]
pub struct CatalogLoader {
    coarse: OneShotLoad,
    detailed: OneShotLoad,
    records: Vec<StarRecord>,
    active_tier: Option<CatalogTier>,
    generation: u64,
}

impl CatalogLoader {
    pub fn records(&self) -> &[StarRecord] {
        &self.records
    }

    pub fn active_tier(&self) -> Option<CatalogTier> {
        self.active_tier
    }

    /// Bumped on every swap; renderers compare it to know when to rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn coarse(&self) -> OneShotLoad {
        self.coarse
    }

    pub fn detailed(&self) -> OneShotLoad {
        self.detailed
    }

    pub fn has_detailed(&self) -> bool {
        self.detailed.state == LoadState::Completed
    }

    /// Gate for the coarse fetch. True exactly once per session.
    pub fn begin_initial(&mut self) -> bool {
        if self.coarse.state != LoadState::NotStarted {
            return false;
        }
        self.coarse.start();
        true
    }

    /// Gate for the detailed fetch. True when the caller should start one.
    pub fn ensure_detailed(&mut self, trigger: LoadTrigger) -> bool {
        let allowed = match (self.detailed.state, trigger) {
            (LoadState::NotStarted, _) => true,
            (LoadState::Failed, LoadTrigger::Zoom) => self.detailed.attempts < MAX_DETAILED_ATTEMPTS,
            _ => false,
        };
        if allowed {
            self.detailed.start();
        }
        allowed
    }

    /// Start the coarse fetch if it has not been started yet.
    pub fn load_initial(&mut self, fetcher: &dyn CatalogFetcher, tx: &Sender<CatalogEvent>) -> bool {
        if !self.begin_initial() {
            return false;
        }
        fetcher.fetch(CatalogTier::Coarse, tx.clone());
        true
    }

    /// Start the detailed fetch if the trigger is allowed to.
    pub fn load_detailed(
        &mut self,
        trigger: LoadTrigger,
        fetcher: &dyn CatalogFetcher,
        tx: &Sender<CatalogEvent>,
    ) -> bool {
        if !self.ensure_detailed(trigger) {
            return false;
        }
        info!("loading detailed star catalog ({trigger:?})");
        fetcher.fetch(CatalogTier::Detailed, tx.clone());
        true
    }

    /// Apply a finished fetch. A settled coarse fetch, successful or not,
    /// kicks off the background detailed fetch.
    pub fn apply(
        &mut self,
        event: CatalogEvent,
        fetcher: &dyn CatalogFetcher,
        tx: &Sender<CatalogEvent>,
    ) -> Applied {
        let tier = event.tier;
        let applied = self.apply_result(event);
        if tier == CatalogTier::Coarse && applied != Applied::Ignored {
            self.load_detailed(LoadTrigger::Background, fetcher, tx);
        }
        applied
    }

    fn apply_result(&mut self, event: CatalogEvent) -> Applied {
        let slot = match event.tier {
            CatalogTier::Coarse => &mut self.coarse,
            CatalogTier::Detailed => &mut self.detailed,
        };
        if slot.state != LoadState::InFlight {
            warn!("ignoring {} catalog result with no fetch in flight", event.tier);
            return Applied::Ignored;
        }

        match event.result {
            Ok(records) => {
                slot.finish(true);
                if event.tier == CatalogTier::Coarse && self.has_detailed() {
                    return Applied::Stale;
                }
                let count = records.len();
                self.records = records;
                self.active_tier = Some(event.tier);
                self.generation += 1;
                Applied::Swapped {
                    tier: event.tier,
                    count,
                }
            }
            Err(err) => {
                slot.finish(false);
                warn!(
                    "{} catalog unavailable ({err}), keeping {} active stars",
                    event.tier,
                    self.records.len()
                );
                Applied::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::data::{CatalogError, StarId};

    #[derive(Default)]
    struct RecordingFetcher {
        requests: Mutex<Vec<CatalogTier>>,
    }

    impl RecordingFetcher {
        fn count(&self, tier: CatalogTier) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|t| **t == tier)
                .count()
        }
    }

    impl CatalogFetcher for RecordingFetcher {
        fn fetch(&self, tier: CatalogTier, _tx: Sender<CatalogEvent>) {
            self.requests.lock().unwrap().push(tier);
        }
    }

    fn stars(n: u64) -> Vec<StarRecord> {
        (0..n)
            .map(|i| StarRecord {
                id: StarId::Number(i),
                coordinates: [0.0, 0.0],
                magnitude: 1.0,
                color_index: 0.0,
            })
            .collect()
    }

    fn ok(tier: CatalogTier, n: u64) -> CatalogEvent {
        CatalogEvent {
            tier,
            result: Ok(stars(n)),
        }
    }

    fn failed(tier: CatalogTier) -> CatalogEvent {
        CatalogEvent {
            tier,
            result: Err(CatalogError::Status {
                url: "http://localhost/stars.json".into(),
                status: 503,
            }),
        }
    }

    #[test]
    fn repeated_detailed_triggers_fetch_once_and_swap_once() {
        let fetcher = RecordingFetcher::default();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut loader = CatalogLoader::default();

        let started = (0..5)
            .filter(|_| loader.load_detailed(LoadTrigger::Zoom, &fetcher, &tx))
            .count();
        assert_eq!(started, 1);
        assert_eq!(fetcher.count(CatalogTier::Detailed), 1);

        let first = loader.apply(ok(CatalogTier::Detailed, 40), &fetcher, &tx);
        let second = loader.apply(ok(CatalogTier::Detailed, 40), &fetcher, &tx);
        assert_eq!(
            first,
            Applied::Swapped {
                tier: CatalogTier::Detailed,
                count: 40
            }
        );
        assert_eq!(second, Applied::Ignored);
        assert_eq!(loader.generation(), 1);

        assert!(!loader.load_detailed(LoadTrigger::Zoom, &fetcher, &tx));
        assert!(!loader.load_detailed(LoadTrigger::Background, &fetcher, &tx));
        assert_eq!(fetcher.count(CatalogTier::Detailed), 1);
    }

    #[test]
    fn coarse_completion_triggers_background_upgrade() {
        let fetcher = RecordingFetcher::default();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut loader = CatalogLoader::default();

        assert!(loader.load_initial(&fetcher, &tx));
        assert!(!loader.load_initial(&fetcher, &tx));
        loader.apply(ok(CatalogTier::Coarse, 10), &fetcher, &tx);

        assert_eq!(loader.records().len(), 10);
        assert_eq!(loader.active_tier(), Some(CatalogTier::Coarse));
        assert_eq!(loader.detailed().state(), LoadState::InFlight);
        assert_eq!(fetcher.count(CatalogTier::Coarse), 1);
        assert_eq!(fetcher.count(CatalogTier::Detailed), 1);
    }

    #[test]
    fn coarse_failure_still_triggers_upgrade_and_leaves_empty_set() {
        let fetcher = RecordingFetcher::default();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut loader = CatalogLoader::default();

        loader.load_initial(&fetcher, &tx);
        let applied = loader.apply(failed(CatalogTier::Coarse), &fetcher, &tx);

        assert_eq!(applied, Applied::Failed);
        assert!(loader.records().is_empty());
        assert_eq!(fetcher.count(CatalogTier::Detailed), 1);
    }

    #[test]
    fn failed_upgrade_keeps_coarse_and_allows_one_zoom_retry() {
        let fetcher = RecordingFetcher::default();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut loader = CatalogLoader::default();

        loader.load_initial(&fetcher, &tx);
        loader.apply(ok(CatalogTier::Coarse, 10), &fetcher, &tx);
        loader.apply(failed(CatalogTier::Detailed), &fetcher, &tx);

        assert_eq!(loader.records().len(), 10);
        assert_eq!(loader.detailed().state(), LoadState::Failed);
        assert!(!loader.load_detailed(LoadTrigger::Background, &fetcher, &tx));

        assert!(loader.load_detailed(LoadTrigger::Zoom, &fetcher, &tx));
        loader.apply(failed(CatalogTier::Detailed), &fetcher, &tx);

        assert!(!loader.load_detailed(LoadTrigger::Zoom, &fetcher, &tx));
        assert_eq!(fetcher.count(CatalogTier::Detailed), 2);
        assert_eq!(loader.active_tier(), Some(CatalogTier::Coarse));
    }

    #[test]
    fn late_coarse_result_never_replaces_detailed() {
        let fetcher = RecordingFetcher::default();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut loader = CatalogLoader::default();

        loader.load_initial(&fetcher, &tx);
        loader.load_detailed(LoadTrigger::Zoom, &fetcher, &tx);
        loader.apply(ok(CatalogTier::Detailed, 100), &fetcher, &tx);
        let applied = loader.apply(ok(CatalogTier::Coarse, 5), &fetcher, &tx);

        assert_eq!(applied, Applied::Stale);
        assert_eq!(loader.records().len(), 100);
        assert_eq!(loader.active_tier(), Some(CatalogTier::Detailed));
        assert_eq!(fetcher.count(CatalogTier::Detailed), 1);
    }
}
