use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::Snapshot;

/// Holds the latest snapshot and hands it out while it is fresh enough.
///
/// Snapshots are shared as `Arc`; a refresh replaces the whole value, so a
/// reader holding an older `Arc` keeps a consistent view.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: Option<Arc<Snapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot if it is at most `max_age` old.
    ///
    /// A zero `max_age` never hits.
    pub fn peek(&self, max_age: Duration) -> Option<Arc<Snapshot>> {
        if max_age.is_zero() {
            return None;
        }
        self.current
            .as_ref()
            .filter(|snapshot| snapshot.taken_at.elapsed() <= max_age)
            .cloned()
    }

    /// Return the cached snapshot, or build and store a new one with `refresh`.
    pub fn get<F>(&mut self, max_age: Duration, refresh: F) -> Arc<Snapshot>
    where
        F: FnOnce() -> Snapshot,
    {
        match self.peek(max_age) {
            Some(snapshot) => snapshot,
            None => self.store(refresh()),
        }
    }

    pub fn store(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn invalidate(&mut self) {
        if self.current.take().is_some() {
            debug!("Snapshot cache invalidated");
        }
    }

    /// Age of the cached snapshot, if any.
    pub fn age(&self) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|snapshot| snapshot.taken_at.elapsed())
    }
}
