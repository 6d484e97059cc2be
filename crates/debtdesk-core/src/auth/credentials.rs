use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::storage::KeyValueStorage;
use crate::models::UserProfile;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Tokens and profile held between runs. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

/// Owns the persisted session: access token, refresh token and cached profile.
pub struct CredentialStore {
    storage: Box<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Write the present fields of `session`. Absent fields are left untouched.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(ref token) = session.access_token {
            self.storage
                .set(ACCESS_TOKEN_KEY, token)
                .context("Failed to store access token")?;
        }
        if let Some(ref token) = session.refresh_token {
            self.storage
                .set(REFRESH_TOKEN_KEY, token)
                .context("Failed to store refresh token")?;
        }
        if let Some(ref user) = session.user {
            let json = serde_json::to_string(user)?;
            self.storage
                .set(USER_KEY, &json)
                .context("Failed to store user profile")?;
        }
        debug!(
            has_access_token = session.access_token.is_some(),
            has_refresh_token = session.refresh_token.is_some(),
            has_user = session.user.is_some(),
            "Session saved"
        );
        Ok(())
    }

    /// Remove all three keys. Backend errors are logged, never returned.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove session key");
            }
        }
        debug!("Session cleared");
    }

    /// Stored profile, or None when missing or unreadable
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "Stored user profile is malformed, ignoring");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Bearer token for outgoing requests. Empty strings count as absent.
    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored but unused: no refresh flow exists.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn load(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user: self.current_user(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session key");
                None
            }
        }
    }
}
