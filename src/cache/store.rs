//! In-memory artifact storage with at-most-one load per identity.
//!
//! Each identity owns a slot. The first caller to miss creates the slot and
//! runs the loader; concurrent callers for the same identity join the slot
//! and wait for that load instead of starting their own. The map lock is
//! held only to find or create a slot, never while a loader runs, so
//! unrelated identities load in parallel.

use crate::cache::entry::CachedValue;
use crate::cache::identity::Identity;
use crate::error::{Result, TemplateError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A panicking loader must not wedge the slot; poisoned locks are recovered.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

enum SlotState {
    Loading,
    Ready(CachedValue),
    /// Terminal for callers already waiting; the slot has left the map.
    Failed(String),
}

struct Slot {
    state: Mutex<SlotState>,
    changed: Condvar,
}

impl Slot {
    fn loading() -> Self {
        Self {
            state: Mutex::new(SlotState::Loading),
            changed: Condvar::new(),
        }
    }

    fn finish(&self, state: SlotState) {
        *lock(&self.state) = state;
        self.changed.notify_all();
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    negative_hits: AtomicU64,
    loads: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Identities holding a ready artifact or absence.
    pub entries: usize,
    /// Lookups served without running a loader.
    pub hits: u64,
    /// Hits that returned a recorded absence.
    pub negative_hits: u64,
    /// Loader invocations.
    pub loads: u64,
    /// Loader invocations that failed.
    pub failures: u64,
    /// Waits abandoned after the wait timeout.
    pub timeouts: u64,
}

/// Maps identities to compiled artifacts or recorded absences.
pub struct ArtifactCache {
    slots: Mutex<HashMap<Identity, Arc<Slot>>>,
    wait_timeout: Option<Duration>,
    counters: Counters,
}

/// Abandons the slot if the loader unwinds before reporting a result.
struct LoadGuard<'a> {
    cache: &'a ArtifactCache,
    identity: &'a Identity,
    slot: &'a Arc<Slot>,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Loader for {} panicked", self.identity);
            self.cache
                .abandon(self.identity, self.slot, "loader panicked".to_string());
        }
    }
}

impl ArtifactCache {
    /// Create a cache whose waiters block until the in-flight load finishes.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            wait_timeout: None,
            counters: Counters::default(),
        }
    }

    /// Create a cache whose waiters give up after `timeout`.
    ///
    /// A timed-out waiter fails alone; the in-flight load continues and
    /// other waiters still receive its result.
    pub fn with_wait_timeout(timeout: Duration) -> Self {
        Self {
            wait_timeout: Some(timeout),
            ..Self::new()
        }
    }

    /// The bounded wait for in-flight loads, if any.
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }

    /// Return the cached value for `identity`, running `loader` on a miss.
    ///
    /// The loader runs at most once per identity while its result stays
    /// cached. Successful results (artifacts and absences) are stored until
    /// invalidated. A failed load is not stored: its caller gets the error,
    /// callers already waiting get `LoadFailed`, and the next lookup loads
    /// from scratch.
    pub fn get_or_load<F>(&self, identity: &Identity, loader: F) -> Result<CachedValue>
    where
        F: FnOnce() -> Result<CachedValue>,
    {
        let (slot, owner) = {
            let mut slots = lock(&self.slots);
            match slots.get(identity) {
                Some(slot) => (Arc::clone(slot), false),
                None => {
                    let slot = Arc::new(Slot::loading());
                    slots.insert(identity.clone(), Arc::clone(&slot));
                    (slot, true)
                }
            }
        };

        if owner {
            self.load(identity, &slot, loader)
        } else {
            self.join(identity, &slot)
        }
    }

    fn load<F>(&self, identity: &Identity, slot: &Arc<Slot>, loader: F) -> Result<CachedValue>
    where
        F: FnOnce() -> Result<CachedValue>,
    {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Loading {}", identity);

        let mut guard = LoadGuard {
            cache: self,
            identity,
            slot,
            armed: true,
        };
        let result = loader();
        guard.armed = false;

        match result {
            Ok(value) => {
                slot.finish(SlotState::Ready(value.clone()));
                Ok(value)
            }
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Load of {} failed: {}", identity, err);
                self.abandon(identity, slot, err.to_string());
                Err(err)
            }
        }
    }

    /// Remove a failed slot from the map, then release its waiters.
    fn abandon(&self, identity: &Identity, slot: &Arc<Slot>, message: String) {
        {
            let mut slots = lock(&self.slots);
            if slots.get(identity).is_some_and(|s| Arc::ptr_eq(s, slot)) {
                slots.remove(identity);
            }
        }
        slot.finish(SlotState::Failed(message));
    }

    fn join(&self, identity: &Identity, slot: &Slot) -> Result<CachedValue> {
        let started = Instant::now();
        let state = lock(&slot.state);
        let loading = |s: &mut SlotState| matches!(s, SlotState::Loading);

        let state = match self.wait_timeout {
            None => slot
                .changed
                .wait_while(state, loading)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                slot.changed
                    .wait_timeout_while(state, timeout, loading)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };

        match &*state {
            SlotState::Ready(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                if value.is_missing() {
                    self.counters.negative_hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(value.clone())
            }
            SlotState::Failed(message) => Err(TemplateError::LoadFailed {
                identity: identity.to_string(),
                message: message.clone(),
            }),
            SlotState::Loading => {
                self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
                let waited = started.elapsed();
                tracing::warn!("Gave up on {} after {:?}", identity, waited);
                Err(TemplateError::Timeout {
                    identity: identity.to_string(),
                    waited,
                })
            }
        }
    }

    /// The ready value for `identity`, without waiting or loading.
    pub fn peek(&self, identity: &Identity) -> Option<CachedValue> {
        let slot = lock(&self.slots).get(identity).cloned()?;
        let state = lock(&slot.state);
        match &*state {
            SlotState::Ready(value) => Some(value.clone()),
            SlotState::Loading | SlotState::Failed(_) => None,
        }
    }

    /// Drop the entry for `identity`. Returns whether one existed.
    ///
    /// Callers already waiting on an in-flight load still receive it.
    pub fn invalidate(&self, identity: &Identity) -> bool {
        let removed = lock(&self.slots).remove(identity).is_some();
        if removed {
            tracing::debug!("Invalidated {}", identity);
        }
        removed
    }

    /// Drop every entry. Returns how many were removed.
    pub fn flush(&self) -> usize {
        let mut slots = lock(&self.slots);
        let count = slots.len();
        slots.clear();
        tracing::debug!("Flushed {} cache entries", count);
        count
    }

    /// Number of ready entries.
    pub fn len(&self) -> usize {
        lock(&self.slots)
            .values()
            .filter(|slot| matches!(*lock(&slot.state), SlotState::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            negative_hits: self.counters.negative_hits.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            timeouts: self.counters.timeouts.load(Ordering::Relaxed),
        }
    }
}

impl Default for ArtifactCache {
    fn default() -> Self {
        Self::new()
    }
}
