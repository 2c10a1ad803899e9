use std::collections::{BTreeSet, HashMap};

use crate::models::Reading;

pub const DEFAULT_HISTORY_LIMIT: usize = 150;

/// Bounded per-region reading buffers plus the registry of regions seen so far.
///
/// Each buffer keeps the most recent `history_limit` readings in arrival
/// order; older readings are evicted from the front.
#[derive(Debug, Clone)]
pub struct RegionHistoryStore {
    history_limit: usize,
    buffers: HashMap<String, Vec<Reading>>,
    registry: BTreeSet<String>,
}

impl Default for RegionHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl RegionHistoryStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history_limit,
            buffers: HashMap::new(),
            registry: BTreeSet::new(),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns true when `reading` introduced a region not seen before.
    pub fn append(&mut self, reading: Reading) -> bool {
        let new_region = self.registry.insert(reading.region.clone());
        let buffer = self.buffers.entry(reading.region.clone()).or_default();
        buffer.push(reading);

        let excess = buffer.len().saturating_sub(self.history_limit);
        if excess > 0 {
            buffer.drain(..excess);
        }

        new_region
    }

    /// Readings for `region`, oldest first. Unknown regions have no history.
    pub fn history_for(&self, region: &str) -> Vec<Reading> {
        self.buffer(region)
            .map(<[Reading]>::to_vec)
            .unwrap_or_default()
    }

    /// Borrowing view used by the insight engine and query responder.
    pub fn buffer(&self, region: &str) -> Option<&[Reading]> {
        self.buffers.get(region).map(Vec::as_slice)
    }

    pub fn regions(&self) -> Vec<String> {
        self.registry.iter().cloned().collect()
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.registry.contains(region)
    }
}
