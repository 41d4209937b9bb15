//! Persistence port shared by all stores.
//!
//! Each store converts its state into a persistable subset and hands it to a
//! [`SnapshotRepository`] after every mutation. On startup the store asks the
//! repository for the last subset and rebuilds its state from it.

use std::sync::Mutex;

use crate::error::Result;

/// Durable storage for one store's persisted subset.
///
/// Every store owns a disjoint repository; writes are last-writer-wins.
pub trait SnapshotRepository<T>: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<T>>;

    fn save(&self, snapshot: &T) -> Result<()>;
}

/// Keeps the latest snapshot in memory. Used by tests and ephemeral sessions.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    slot: Mutex<Option<T>>,
    saves: Mutex<usize>,
}

impl<T: Clone> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            saves: Mutex::new(0),
        }
    }

    /// Starts with an already persisted snapshot.
    pub fn with_snapshot(snapshot: T) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    pub fn latest(&self) -> Option<T> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Clone + Send> SnapshotRepository<T> for InMemoryRepository<T> {
    fn load(&self) -> Result<Option<T>> {
        Ok(self.latest())
    }

    fn save(&self, snapshot: &T) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

/// Loads a snapshot, degrading to `None` on any storage fault.
pub(crate) fn load_or_default<T>(repository: &dyn SnapshotRepository<T>, store: &str) -> Option<T> {
    match repository.load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("[{}] Failed to rehydrate, starting empty: {}", store, e);
            None
        }
    }
}

/// Saves a snapshot. Failures are logged and never undo the in-memory mutation.
pub(crate) fn save_logged<T>(repository: &dyn SnapshotRepository<T>, snapshot: &T, store: &str) {
    if let Err(e) = repository.save(snapshot) {
        tracing::warn!("[{}] Failed to persist state: {}", store, e);
    }
}
