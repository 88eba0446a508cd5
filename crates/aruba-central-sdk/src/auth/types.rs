//! Authentication-related types and data structures
//!
//! This module defines the token data persisted between runs, the
//! transient login cookies and the error type shared by the auth module.

use serde::{Deserialize, Deserializer, Serialize};

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Seconds subtracted from `expires_in` so a token never expires while a
/// dependent request is in flight.
pub const EXPIRY_BUFFER_SECS: i64 = 120;

/// Current time as Unix epoch seconds
pub fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Access token as issued by the token endpoint plus its computed expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token for API requests
    pub access_token: String,
    /// Refresh token for obtaining a new access token
    pub refresh_token: String,
    /// Lifetime granted by the token endpoint, in seconds
    pub expires_in: i64,
    /// Unix timestamp after which the token is treated as expired
    #[serde(deserialize_with = "epoch_seconds")]
    pub expires_at: i64,
    /// Token type reported by the server (usually "bearer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Wire shape of a token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl AccessToken {
    /// Build a token from a token endpoint response received at `issued_at`
    ///
    /// `previous_refresh` is kept when the response carries no new refresh
    /// token, which happens on some refresh grants.
    pub fn issue(
        response: TokenResponse,
        previous_refresh: Option<&str>,
        issued_at: i64,
    ) -> AuthResult<Self> {
        let refresh_token = response
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .ok_or_else(|| {
                AuthError::InvalidResponse("Missing refresh_token in token response".to_string())
            })?;

        if response.expires_in < 0 {
            return Err(AuthError::InvalidResponse(format!(
                "Negative expires_in in token response: {}",
                response.expires_in
            )));
        }

        Ok(Self {
            access_token: response.access_token,
            refresh_token,
            expires_in: response.expires_in,
            expires_at: issued_at
                .saturating_add(response.expires_in)
                .saturating_sub(EXPIRY_BUFFER_SECS),
            token_type: response.token_type,
        })
    }

    /// Check whether the token is expired at `now` (Unix seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }

    /// Check whether the token is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_epoch())
    }

    /// Expiry as a UTC timestamp, for display
    pub fn expires_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Token files written by older tooling store `expires_at` as a float.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Epoch {
        Whole(i64),
        Fractional(f64),
    }

    Ok(match Epoch::deserialize(deserializer)? {
        Epoch::Whole(secs) => secs,
        Epoch::Fractional(secs) => secs.floor() as i64,
    })
}

/// Cookies returned by the login endpoint; they live for one login only
#[derive(Debug, Clone)]
pub struct LoginCookies {
    /// Value of the `csrftoken` cookie
    pub csrf_token: String,
    /// Value of the `session` cookie
    pub session: String,
}

/// Lifecycle of the session's token slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing in memory and nothing loaded from disk
    Absent,
    /// Loaded from the token store but not yet checked for expiry
    Cached,
    /// Checked and usable
    Valid,
    /// Past `expires_at`; the next request refreshes it
    Expired,
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenState::Absent => "absent",
            TokenState::Cached => "cached",
            TokenState::Valid => "valid",
            TokenState::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login endpoint rejected the configured username/password/client
    #[error("Login rejected with status {status}: {body}. Check the credentials in the config and accounts files")]
    Credential { status: u16, body: String },

    /// The authorize endpoint did not hand out an authorization code
    #[error("Authorization code request failed with status {status}: {body}")]
    AuthorizationCode { status: u16, body: String },

    /// The token endpoint refused the authorization code
    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    /// The token endpoint refused the refresh token
    #[error("Token refresh failed with status {status}: {body}")]
    RefreshFailed { status: u16, body: String },

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// No valid token could be obtained by refresh or login
    #[error("No valid access token could be obtained: {0}")]
    Exhausted(Box<AuthError>),

    /// Invalid response from an auth endpoint
    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),

    /// Network error while talking to an auth endpoint
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Token storage error
    #[error("Token storage error: {0}")]
    StorageError(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether retrying later with the same configuration could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Network(_) => true,
            AuthError::Exhausted(inner) => inner.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "abc".to_string(),
            refresh_token: Some("def".to_string()),
            expires_in,
            token_type: Some("bearer".to_string()),
        }
    }

    #[test]
    fn test_expires_at_applies_buffer() {
        let token = AccessToken::issue(response(7200), None, 1_700_000_000).unwrap();
        assert_eq!(token.expires_at, 1_700_000_000 + 7200 - 120);
        assert_eq!(token.expires_in, 7200);
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let token = AccessToken::issue(response(i64::MAX), None, 1_700_000_000).unwrap();
        assert_eq!(token.expires_at, i64::MAX - 120);
        assert!(!token.is_expired_at(1_700_000_000));
    }

    #[test]
    fn test_negative_expires_in_is_rejected() {
        let err = AccessToken::issue(response(-5), None, 1_700_000_000).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_expiry_is_strict() {
        let token = AccessToken::issue(response(7200), None, 1_000).unwrap();
        let expires_at = token.expires_at;

        assert!(!token.is_expired_at(expires_at - 1));
        assert!(!token.is_expired_at(expires_at));
        assert!(token.is_expired_at(expires_at + 1));
    }

    #[test]
    fn test_short_lived_token_is_expired_on_arrival() {
        let token = AccessToken::issue(response(60), None, 1_000).unwrap();
        assert!(token.is_expired_at(1_000));
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let mut resp = response(7200);
        resp.refresh_token = None;

        let token = AccessToken::issue(resp, Some("old-refresh"), 0).unwrap();
        assert_eq!(token.refresh_token, "old-refresh");
    }

    #[test]
    fn test_missing_refresh_token_is_rejected() {
        let mut resp = response(7200);
        resp.refresh_token = None;

        let err = AccessToken::issue(resp, None, 0).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_reads_fractional_expires_at() {
        let json = r#"{
            "access_token": "abc",
            "refresh_token": "def",
            "expires_in": 7200,
            "expires_at": 1700007080.123456,
            "token_type": "bearer"
        }"#;

        let token: AccessToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.expires_at, 1_700_007_080);
    }

    #[test]
    fn test_exhausted_transience_follows_cause() {
        let cause = AuthError::Credential {
            status: 401,
            body: "bad password".to_string(),
        };
        assert!(!AuthError::Exhausted(Box::new(cause)).is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
    }
}
