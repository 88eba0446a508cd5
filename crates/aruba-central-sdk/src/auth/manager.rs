//! Token management with lazy loading, refresh and re-login
//!
//! The TokenManager owns the session's single token slot. Every API call
//! asks it for a token; it answers from memory while the token is valid and
//! otherwise walks the recovery path:
//!
//! 1. nothing in memory: load from the token store
//! 2. nothing stored: full login
//! 3. expired: refresh, and on refresh failure fall back to a full login
//!
//! The slot is behind an async mutex, so concurrent callers wait for an
//! in-flight refresh instead of starting their own.

use super::provider::AuthProvider;
use super::token_store::TokenStore;
use super::types::{now_epoch, AccessToken, AuthError, AuthResult, TokenState};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct TokenSlot {
    token: Option<AccessToken>,
    state: TokenState,
    store_checked: bool,
}

impl TokenSlot {
    fn new() -> Self {
        Self {
            token: None,
            state: TokenState::Absent,
            store_checked: false,
        }
    }

    fn set(&mut self, token: AccessToken) {
        self.token = Some(token);
        self.state = TokenState::Valid;
    }

    fn clear(&mut self) {
        self.token = None;
        self.state = TokenState::Absent;
    }
}

/// Manages one profile's token with automatic refresh and persistence
pub struct TokenManager {
    provider: Box<dyn AuthProvider>,
    storage: TokenStore,
    slot: Mutex<TokenSlot>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("provider", &self.provider.name())
            .field("storage", &self.storage)
            .finish()
    }
}

impl TokenManager {
    /// Create a token manager with the given provider and store
    pub fn new(provider: Box<dyn AuthProvider>, storage: TokenStore) -> Self {
        Self {
            provider,
            storage,
            slot: Mutex::new(TokenSlot::new()),
        }
    }

    /// Return a valid token, loading, refreshing or logging in as needed
    ///
    /// Errors below the "exhausted" threshold are recovered here. What
    /// reaches the caller is either a first-login failure (bad credentials,
    /// network) or [`AuthError::Exhausted`].
    pub async fn authenticate(&self) -> AuthResult<AccessToken> {
        let mut slot = self.slot.lock().await;

        if slot.token.is_none() && !slot.store_checked {
            debug!(
                "Access token not cached, reading {}",
                self.storage.path().display()
            );
            slot.store_checked = true;
            if let Some(token) = self.storage.load().await? {
                slot.token = Some(token);
                slot.state = TokenState::Cached;
            }
        }

        let token = match slot.token.clone() {
            Some(token) if !token.is_expired_at(now_epoch()) => {
                slot.state = TokenState::Valid;
                return Ok(token);
            }
            Some(expired) => {
                slot.state = TokenState::Expired;
                debug!("Access token expired at {}, refreshing", expired.expires_at);
                match self.refresh(&expired).await {
                    Ok(token) => token,
                    Err(e) => {
                        warn!("Token refresh failed, logging in again: {}", e);
                        self.full_login().await.map_err(exhausted)?
                    }
                }
            }
            None => {
                debug!("No stored token, logging in with {}", self.provider.name());
                self.full_login().await?
            }
        };

        self.store(&mut slot, token.clone()).await?;
        Ok(token)
    }

    /// Get a valid access token string for a bearer header
    pub async fn access_token(&self) -> AuthResult<String> {
        Ok(self.authenticate().await?.access_token)
    }

    /// Force a full login, replacing any cached or stored token
    pub async fn login(&self) -> AuthResult<AccessToken> {
        let mut slot = self.slot.lock().await;
        info!("Forcing login with {}", self.provider.name());
        let token = self.full_login().await?;
        self.store(&mut slot, token.clone()).await?;
        Ok(token)
    }

    /// Forget the token in memory and on disk
    pub async fn logout(&self) -> AuthResult<()> {
        let mut slot = self.slot.lock().await;
        self.storage.delete().await?;
        slot.clear();
        slot.store_checked = true;
        info!("Removed stored token {}", self.storage.path().display());
        Ok(())
    }

    /// Current slot state; `Valid` degrades to `Expired` with time
    pub async fn state(&self) -> TokenState {
        let slot = self.slot.lock().await;
        match (&slot.token, slot.state) {
            (None, _) => TokenState::Absent,
            (Some(token), TokenState::Valid) if token.is_expired() => TokenState::Expired,
            (Some(_), state) => state,
        }
    }

    /// The token currently held in memory, if any
    pub async fn cached_token(&self) -> Option<AccessToken> {
        self.slot.lock().await.token.clone()
    }

    /// Token store backing this manager
    pub fn storage(&self) -> &TokenStore {
        &self.storage
    }

    async fn refresh(&self, expired: &AccessToken) -> AuthResult<AccessToken> {
        let token = self.provider.refresh(expired).await?;
        Self::check_fresh(token)
    }

    async fn full_login(&self) -> AuthResult<AccessToken> {
        let token = self.provider.login().await?;
        Self::check_fresh(token).map_err(exhausted)
    }

    /// A token whose lifetime is shorter than the expiry buffer is useless.
    fn check_fresh(token: AccessToken) -> AuthResult<AccessToken> {
        if token.is_expired_at(now_epoch()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(token)
    }

    async fn store(&self, slot: &mut TokenSlot, token: AccessToken) -> AuthResult<()> {
        slot.set(token);
        if let Some(token) = slot.token.as_ref() {
            self.storage.save(token).await?;
        }
        Ok(())
    }
}

fn exhausted(err: AuthError) -> AuthError {
    match err {
        AuthError::Exhausted(_) => err,
        other => AuthError::Exhausted(Box::new(other)),
    }
}
