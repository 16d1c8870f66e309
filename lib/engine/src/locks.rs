//! Per-session turn serialization.

use chatflow_core::SessionId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per session id.
///
/// Holding a session's guard across a whole turn makes its read, decide and
/// write steps atomic with respect to other turns of the same session.
/// Different sessions never contend.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the session.
    pub async fn acquire(&self, session_id: &SessionId) -> OwnedMutexGuard<()> {
        // The map entry guard must be released before awaiting.
        let lock = Arc::clone(
            self.locks
                .entry(session_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        lock.lock_owned().await
    }

    /// Returns the number of sessions with a registered lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no session has a registered lock.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drops the session's lock once no turn holds or waits on it.
    ///
    /// Call after releasing the guard so idle sessions leave no entry.
    pub fn release(&self, session_id: &SessionId) {
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
