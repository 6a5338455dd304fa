use indexmap::IndexMap;
use log::trace;

use crate::render::{RenderMode, StyledRun};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    raw_text: String,
    mode: RenderMode,
    style_identity: u64,
}

/// Bounded least-recently-used cache of rendered blocks.
///
/// A block's runs depend only on its raw text, its mode and the style
/// configuration, so equal keys can share output regardless of where the
/// block sits in the document. Entries are kept in recency order: the front
/// of the map is evicted first.
#[derive(Debug)]
pub struct RenderCache {
    entries: IndexMap<CacheKey, Vec<StyledRun>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.min(4096)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Cached runs for a block, marking the entry most recently used.
    pub fn get(
        &mut self,
        raw_text: &str,
        mode: RenderMode,
        style_identity: u64,
    ) -> Option<&[StyledRun]> {
        let key = CacheKey {
            raw_text: raw_text.to_string(),
            mode,
            style_identity,
        };
        let Some(index) = self.entries.get_index_of(&key) else {
            self.misses += 1;
            return None;
        };

        self.hits += 1;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, runs)| runs.as_slice())
    }

    pub fn insert(
        &mut self,
        raw_text: &str,
        mode: RenderMode,
        style_identity: u64,
        runs: Vec<StyledRun>,
    ) {
        if self.capacity == 0 {
            return;
        }
        let key = CacheKey {
            raw_text: raw_text.to_string(),
            mode,
            style_identity,
        };
        if self.entries.shift_remove(&key).is_none() && self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                trace!("evicting cached block of {} bytes", evicted.raw_text.len());
            }
        }
        self.entries.insert(key, runs);
    }

    /// Look up a block, rendering and caching it on a miss. Returns the runs
    /// and whether they came from the cache.
    pub fn get_or_render(
        &mut self,
        raw_text: &str,
        mode: RenderMode,
        style_identity: u64,
        render: impl FnOnce() -> Vec<StyledRun>,
    ) -> (Vec<StyledRun>, bool) {
        if let Some(runs) = self.get(raw_text, mode, style_identity) {
            return (runs.to_vec(), true);
        }
        let runs = render();
        self.insert(raw_text, mode, style_identity, runs.clone());
        (runs, false)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
