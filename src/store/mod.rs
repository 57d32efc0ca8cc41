//! Storage backends for the session slot.

pub mod error;
pub mod file;
pub mod memory;
pub mod session;

pub use error::{StorageError, StorageResult};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use session::SessionStore;
