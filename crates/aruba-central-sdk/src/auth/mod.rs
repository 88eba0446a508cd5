//! Authentication module for the Aruba Central SDK
//!
//! This module provides:
//! - The three-step API gateway login (credentials, authorization code, token)
//! - Refresh-token exchange
//! - File-based token persistence per profile
//! - A token manager that refreshes or re-logs in on demand

pub mod central;
pub mod manager;
pub mod provider;
pub mod token_store;
pub mod types;

// Re-export commonly used types and functions
pub use central::CentralOAuthProvider;
pub use manager::TokenManager;
pub use provider::AuthProvider;
pub use token_store::TokenStore;
pub use types::{AccessToken, AuthError, AuthResult, LoginCookies, TokenState, EXPIRY_BUFFER_SECS};
