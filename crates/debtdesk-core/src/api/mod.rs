//! REST API client module for the debtdesk backend.
//!
//! This module provides the `ApiClient`, the single path every request
//! takes to the backend. It injects the stored bearer token and reacts to
//! 401 responses by clearing the session and asking the front end to show
//! the login screen.

pub mod client;
pub mod error;
pub mod navigation;

pub use client::ApiClient;
pub use error::ApiError;
pub use navigation::{ChannelNavigator, Navigator, NoopNavigator, Route};
