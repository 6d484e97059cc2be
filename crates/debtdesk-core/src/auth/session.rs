use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::credentials::{CredentialStore, Session};
use crate::api::{ApiClient, Route};
use crate::models::{AuthResponse, Credentials, UserProfile};

/// Shown when the server gives no reason for a failed login
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    LoginFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Resets the loading flag when dropped, including when the future is cancelled.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Login/logout on top of the API client and credential store.
///
/// `is_loading` and `last_error` are shared by every call on the same
/// controller. Overlapping logins race on them and the last to finish wins.
pub struct SessionController {
    api: ApiClient,
    is_loading: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl SessionController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            is_loading: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Client for data requests. They share this controller's session.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.api.store()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }

    /// Log in and persist the returned tokens and profile.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, SessionError> {
        let _loading = LoadingGuard::start(&self.is_loading);
        self.set_error(None);

        if let Err(message) = credentials.validate() {
            debug!(reason = %message, "Login form rejected");
            self.set_error(Some(message.clone()));
            return Err(SessionError::InvalidCredentials(message));
        }

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
                self.set_error(Some(message.clone()));
                return Err(SessionError::LoginFailed(message));
            }
        };

        let session = Session {
            access_token: Some(response.access_token.clone()),
            refresh_token: response.refresh_token.clone(),
            user: response.user.clone(),
        };
        // A new login replaces the previous session wholesale
        self.store().clear();
        if let Err(e) = self.store().save(&session) {
            error!(error = %e, "Failed to persist session after login");
            self.set_error(Some(LOGIN_FAILED_MESSAGE.to_string()));
            return Err(SessionError::LoginFailed(LOGIN_FAILED_MESSAGE.to_string()));
        }

        info!(
            user_id = ?response.user.as_ref().map(|u| u.id),
            has_refresh_token = response.refresh_token.is_some(),
            "Login successful"
        );
        Ok(response)
    }

    /// Tell the server (best effort), then drop the local session and go to login.
    pub async fn logout(&self) {
        let _loading = LoadingGuard::start(&self.is_loading);

        if let Err(e) = self.api.logout().await {
            debug!(error = %e, "Logout notification failed, clearing session anyway");
        }

        self.store().clear();
        self.api.navigator().navigate(Route::Login);
        info!("Logged out");
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.store().current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Where the root entry point sends the user
    pub fn landing_route(&self) -> Route {
        match self.state() {
            SessionState::Authenticated => Route::Dashboard,
            SessionState::Anonymous => Route::Login,
        }
    }
}
