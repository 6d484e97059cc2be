//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `CredentialStore`: the persisted access token, refresh token and profile
//! - `KeyValueStorage` backends: memory, JSON file, OS keychain
//! - `SessionController`: login/logout plus loading and error state
//!
//! Presence of an access token is the only authentication check. Tokens carry
//! no expiry here; the server's 401 is what ends a session.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::{CredentialStore, Session};
pub use session::{SessionController, SessionError, SessionState};
pub use storage::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage, StorageBackend};
