//! Authentication provider trait
//!
//! The [`TokenManager`](super::TokenManager) decides *when* to log in or
//! refresh; a provider knows *how* to talk to the token endpoints.

use super::types::{AccessToken, AuthResult};
use async_trait::async_trait;

/// Core trait for authentication providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Run the full login exchange and return a freshly issued token
    async fn login(&self) -> AuthResult<AccessToken>;

    /// Exchange the refresh token of `token` for a new token
    async fn refresh(&self, token: &AccessToken) -> AuthResult<AccessToken>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
