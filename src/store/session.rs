//! Session persistence trait.

use crate::session::Session;

use super::error::StorageResult;

/// Durable backing for the single session slot, so a session survives restarts.
///
/// Calls are synchronous and run on the async worker that completed the
/// request, while the staleness guard's lock is held. Completions for every
/// endpoint wait on them, so implementations must stay fast: a small local
/// file write is fine, network-backed storage is not.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session. Returns `Ok(None)` if nothing is stored.
    fn load(&self) -> StorageResult<Option<Session>>;

    /// Overwrite the persisted session.
    fn save(&self, session: &Session) -> StorageResult<()>;

    /// Remove the persisted session. Clearing an empty slot is not an error.
    fn clear(&self) -> StorageResult<()>;
}
