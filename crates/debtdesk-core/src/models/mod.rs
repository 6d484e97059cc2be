//! Data models for the debtdesk API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `UserProfile`, `Credentials`, `AuthResponse`: login flow payloads
//! - `DashboardSummary` and its parts: the dashboard summary endpoint

pub mod dashboard;
pub mod user;

pub use dashboard::{DashboardSummary, MonthlyData, PaymentStatus, RecentPayment, StatusBreakdown};
pub use user::{AuthResponse, Credentials, UserProfile};
