//! Expression cache: memoizes scan+parse by exact source text, bounded by
//! an LRU policy.
//!
//! The compile-once guarantee is structural, not best-effort.  Each source
//! text maps to one `OnceCell`; racing callers all obtain the same cell and
//! `get_or_try_init` lets exactly one of them run the compile while the
//! rest block on that cell.  The map lock is never held across a compile,
//! so distinct source texts never serialize against each other.
//!
//! Failed compiles are not cached: the error propagates to every caller of
//! that race and the entry is removed, so a later call may retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, info};
use once_cell::sync::{Lazy, OnceCell};

use crate::error::Result;
use crate::expression::{self, CompiledExpression};

/// Default capacity of the process-wide cache.
pub const DEFAULT_CAPACITY: usize = 1024;

type Slot = Arc<OnceCell<Arc<CompiledExpression>>>;

struct Entry {
    slot: Slot,
    stamp: u64, // recency; larger = more recently used
}

struct Inner {
    entries: HashMap<String, Entry>,
    clock: u64,
}

/// A bounded compile-once / evaluate-many cache of compiled expressions,
/// keyed by exact source text (no normalization).
pub struct ExpressionCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl ExpressionCache {
    /// An empty cache evicting least-recently-used entries beyond
    /// `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");

        info!("Expression cache created (capacity {})", capacity);

        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                clock: 0,
            }),
        }
    }

    /// Return the cached compilation of `source`, compiling it at most once
    /// across all concurrent callers.
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<CompiledExpression>> {
        let slot: Slot = self.slot_for(source);

        let compiled = slot
            .get_or_try_init(|| {
                debug!("Cache miss, compiling: {}", source);

                expression::compile(source).map(Arc::new)
            })
            .cloned();

        match compiled {
            Ok(expr) => Ok(expr),

            Err(e) => {
                // Drop the never-filled entry so the source is not pinned
                // to a stale failure.
                let mut inner = self.inner.lock().expect("expression cache lock poisoned");

                if let Some(entry) = inner.entries.get(source) {
                    if entry.slot.get().is_none() {
                        inner.entries.remove(source);
                    }
                }

                Err(e)
            }
        }
    }

    /// Number of cached entries (filled or in-flight).
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("expression cache lock poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch or create the cell for `source`, updating recency and evicting
    /// the least-recently-used entry when full.  The lock is released before
    /// any compile runs.
    fn slot_for(&self, source: &str) -> Slot {
        let mut inner = self.inner.lock().expect("expression cache lock poisoned");

        inner.clock += 1;
        let stamp: u64 = inner.clock;

        if let Some(entry) = inner.entries.get_mut(source) {
            entry.stamp = stamp;

            return entry.slot.clone();
        }

        if inner.entries.len() >= self.capacity {
            // Linear scan for the oldest stamp; capacities are small enough
            // that an ordered index is not worth the bookkeeping.
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stamp)
                .map(|(key, _)| key.clone())
            {
                debug!("Evicting cached expression: {}", oldest);

                inner.entries.remove(&oldest);
            }
        }

        let slot: Slot = Arc::new(OnceCell::new());

        inner.entries.insert(
            source.to_owned(),
            Entry {
                slot: slot.clone(),
                stamp,
            },
        );

        slot
    }
}

static GLOBAL: Lazy<ExpressionCache> =
    Lazy::new(|| ExpressionCache::with_capacity(DEFAULT_CAPACITY));

/// The process-wide cache backing [`crate::compile`] and [`crate::execute`].
pub fn global() -> &'static ExpressionCache {
    &GLOBAL
}
