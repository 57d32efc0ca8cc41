//! QueryQuest - client for the QueryQuest trivia API.
//!
//! Wraps the backend's HTTP endpoints behind `QuestClient`. Every call is
//! guarded so that only the most recently dispatched request per endpoint
//! can affect shared state, and every outcome is normalized into an
//! `ApiResult`.

pub mod api;
pub mod build_info;
pub mod client;
pub mod config;
pub mod session;
pub mod store;
pub mod utils;

pub use client::{ApiResult, ApiStatus, Endpoint, QuestClient};
pub use session::{AuthState, Session, SessionCache};
