//! # Aruba Central SDK
//!
//! Authenticated access to the Aruba Central REST API.
//!
//! The SDK logs in through the API gateway's three-step exchange, keeps the
//! resulting token in a per-profile file, refreshes it when it expires and
//! falls back to a fresh login when the refresh token is no longer accepted.
//! On top of that it exposes the monitoring and configuration endpoints used
//! by the `aruba-central` tool.

pub mod auth;
pub mod client;
pub mod error;
pub mod query;
pub mod types;

// Re-export main types
pub use client::{ArubaCentralClient, ClientBuilder};
pub use error::{ApiError, Result};
pub use query::Query;
pub use types::*;

pub use auth::{AccessToken, AuthError, TokenManager, TokenState, TokenStore};
