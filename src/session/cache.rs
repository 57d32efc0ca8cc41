//! Single-slot session cache.
//!
//! Holds at most one live [`Session`], writes through to a [`SessionStore`] so
//! it survives restarts, and notifies observers whenever the slot flips between
//! empty and occupied.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::store::SessionStore;

use super::Session;

/// Whether a session is currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn,
}

impl AuthState {
    fn of(session: Option<&Session>) -> Self {
        if session.is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        }
    }
}

/// Process-wide session slot.
///
/// Reads are cheap and concurrent. Writes come from the dispatcher's
/// completion handlers. Persistence failures are logged and do not affect the
/// in-memory slot.
#[derive(Clone)]
pub struct SessionCache {
    slot: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
    state_tx: watch::Sender<AuthState>,
}

impl SessionCache {
    /// Create a cache seeded from whatever `store` has persisted.
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let initial = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted session, starting signed out");
                None
            }
        };
        let (state_tx, _) = watch::channel(AuthState::of(initial.as_ref()));
        Self {
            slot: Arc::new(RwLock::new(initial)),
            store,
            state_tx,
        }
    }

    /// The live session, if any.
    pub fn get(&self) -> Option<Session> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bearer token of the live session, if any.
    pub fn token(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn state(&self) -> AuthState {
        *self.state_tx.borrow()
    }

    /// Overwrite the slot with `session`.
    ///
    /// Persists synchronously; see [`SessionStore`] for the cost contract.
    pub fn set(&self, session: Session) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "Failed to persist session");
        }
        debug!(user_uuid = %session.user_uuid, "Session established");
        *slot = Some(session);
        self.publish(AuthState::SignedIn);
    }

    /// Empty the slot.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        if slot.take().is_some() {
            debug!("Session cleared");
        }
        self.publish(AuthState::SignedOut);
    }

    /// Observe absent/present transitions.
    ///
    /// The receiver only wakes when the state actually flips; overwriting one
    /// session with another does not notify.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    fn publish(&self, next: AuthState) {
        self.state_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::{MemorySessionStore, StorageError, StorageResult};

    fn session(user: &str, token: &str) -> Session {
        Session {
            user_uuid: user.to_string(),
            token: token.to_string(),
            created_at: Utc::now(),
        }
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn load(&self) -> StorageResult<Option<Session>> {
            Err(StorageError::serialization("boom"))
        }
        fn save(&self, _session: &Session) -> StorageResult<()> {
            Err(StorageError::serialization("boom"))
        }
        fn clear(&self) -> StorageResult<()> {
            Err(StorageError::serialization("boom"))
        }
    }

    #[test]
    fn starts_from_persisted_session() {
        let stored = session("u1", "tok1");
        let cache = SessionCache::load(Arc::new(MemorySessionStore::with_session(stored.clone())));
        assert_eq!(cache.get(), Some(stored));
        assert_eq!(cache.state(), AuthState::SignedIn);
        assert_eq!(cache.token().as_deref(), Some("tok1"));
    }

    #[test]
    fn set_overwrites_and_persists() {
        let store = Arc::new(MemorySessionStore::new());
        let cache = SessionCache::load(store.clone());
        cache.set(session("u1", "tok1"));
        cache.set(session("u2", "tok2"));
        assert_eq!(cache.get().unwrap().user_uuid, "u2");
        assert_eq!(store.load().unwrap().unwrap().token, "tok2");
    }

    #[test]
    fn clear_empties_slot_and_store() {
        let store = Arc::new(MemorySessionStore::with_session(session("u1", "tok1")));
        let cache = SessionCache::load(store.clone());
        cache.clear();
        assert!(cache.get().is_none());
        assert!(store.load().unwrap().is_none());
        assert_eq!(cache.state(), AuthState::SignedOut);
    }

    #[test]
    fn store_failures_do_not_affect_slot() {
        let cache = SessionCache::load(Arc::new(FailingStore));
        assert!(cache.get().is_none());
        cache.set(session("u1", "tok1"));
        assert_eq!(cache.get().unwrap().user_uuid, "u1");
        cache.clear();
        assert!(cache.get().is_none());
    }

    #[tokio::test]
    async fn observers_see_only_transitions() {
        let cache = SessionCache::load(Arc::new(MemorySessionStore::new()));
        let mut rx = cache.subscribe();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);

        cache.set(session("u1", "tok1"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedIn);

        cache.set(session("u2", "tok2"));
        assert!(!rx.has_changed().unwrap());

        cache.clear();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);

        cache.clear();
        assert!(!rx.has_changed().unwrap());
    }
}
