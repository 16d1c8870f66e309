//! Session cursors.
//!
//! A session's cursor is the id of the block it is suspended at. Cursors are
//! created on a conversation's first suspension, overwritten on every later
//! one and otherwise live as long as the store does.

use chatflow_core::{BlockId, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Storage for session cursors.
///
/// Individual operations are atomic. There is no compound read-modify-write;
/// callers that need one serialize per session themselves.
pub trait SessionStore: Send + Sync {
    /// Returns the block the session is suspended at.
    fn get(&self, session_id: &SessionId) -> Option<BlockId>;

    /// Moves the session's cursor. Does nothing for an empty session id.
    fn set(&self, session_id: &SessionId, block_id: BlockId);

    /// Forgets the session, returning its last cursor.
    fn remove(&self, session_id: &SessionId) -> Option<BlockId>;
}

/// Process-local session store.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    cursors: Arc<RwLock<HashMap<SessionId, BlockId>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sessions with a cursor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no session has a cursor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &SessionId) -> Option<BlockId> {
        self.cursors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }

    fn set(&self, session_id: &SessionId, block_id: BlockId) {
        if session_id.is_empty() {
            return;
        }
        self.cursors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.clone(), block_id);
    }

    fn remove(&self, session_id: &SessionId) -> Option<BlockId> {
        self.cursors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_has_no_cursor() {
        let store = InMemorySessionStore::new();
        assert!(store.get(&SessionId::from("s1")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites_cursor() {
        let store = InMemorySessionStore::new();
        let session = SessionId::from("s1");

        store.set(&session, BlockId::from("wait"));
        store.set(&session, BlockId::from("detect"));

        assert_eq!(store.get(&session), Some(BlockId::from("detect")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_session_id_is_ignored() {
        let store = InMemorySessionStore::new();
        store.set(&SessionId::from(""), BlockId::from("wait"));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_forgets_session() {
        let store = InMemorySessionStore::new();
        let session = SessionId::from("s1");
        store.set(&session, BlockId::from("wait"));

        assert_eq!(store.remove(&session), Some(BlockId::from("wait")));
        assert!(store.get(&session).is_none());
    }

    #[test]
    fn clones_share_state() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        store.set(&SessionId::from("s1"), BlockId::from("wait"));

        assert_eq!(other.get(&SessionId::from("s1")), Some(BlockId::from("wait")));
    }

    #[test]
    fn concurrent_sessions_do_not_interfere() {
        let store = InMemorySessionStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let session = SessionId::new(format!("s{i}"));
                    store.set(&session, BlockId::new(format!("b{i}")));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        assert_eq!(store.len(), 8);
        assert_eq!(store.get(&SessionId::from("s3")), Some(BlockId::from("b3")));
    }
}
