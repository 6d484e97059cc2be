//! Core library for debtdesk.
//!
//! This crate provides:
//! - `api`: the authenticated HTTP client and navigation signals
//! - `auth`: session persistence and the login/logout controller
//! - `config`: configuration file and environment overrides
//! - `models`: wire types for auth and the dashboard summary

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, Navigator, Route};
pub use auth::{CredentialStore, SessionController, SessionError, SessionState};
pub use config::Config;
