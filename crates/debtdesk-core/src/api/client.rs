//! API client for communicating with the debtdesk REST API.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! stored bearer token and tears the session down on a 401. None of the
//! public methods can skip either step.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::navigation::{Navigator, Route};
use super::ApiError;
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::models::{AuthResponse, Credentials, DashboardSummary};

// ============================================================================
// Constants
// ============================================================================

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const DASHBOARD_SUMMARY_PATH: &str = "/dashboard/summary";

/// API client for the debtdesk backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client. `timeout` of None lets requests wait indefinitely.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            navigator,
        })
    }

    pub fn from_config(
        config: &Config,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::new(config.api_base_url()?, config.request_timeout(), store, navigator)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the bearer token when one is stored
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.store.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and run the response interceptor.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(path = response.url().path(), status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response);
        }

        // Teardown must not wait on the error body
        if status == StatusCode::UNAUTHORIZED {
            warn!(path = response.url().path(), "Unauthorized response, clearing session");
            self.store.clear();
            self.navigator.navigate(Route::Login);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn parse_json<T: DeserializeOwned>(
        response: Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse JSON response from {}: {}",
                path, e
            ))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::parse_json(response, path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        Self::parse_json(response, path).await
    }

    /// POST with no body, discarding whatever comes back
    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "POST");
        self.execute(self.request(Method::POST, path)).await?;
        Ok(())
    }

    // ===== Endpoints =====

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post(LOGIN_PATH, credentials).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty(LOGOUT_PATH).await
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get(DASHBOARD_SUMMARY_PATH).await
    }
}
