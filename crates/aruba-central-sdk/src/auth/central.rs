//! Aruba Central API gateway login
//!
//! Obtaining a token takes three requests:
//!
//! 1. `POST /oauth2/authorize/central/api/login` with the user's credentials;
//!    the response sets the `csrftoken` and `session` cookies.
//! 2. `POST /oauth2/authorize/central/api` with those cookies and the
//!    customer ID; the response carries a short-lived `auth_code`.
//! 3. `POST /oauth2/token` exchanging the code (plus client secret) for an
//!    access/refresh token pair.
//!
//! Refreshing is a single `POST /oauth2/token` with `grant_type=refresh_token`.
//! None of these calls is retried here; the token manager owns that policy.

use super::provider::AuthProvider;
use super::types::{
    now_epoch, AccessToken, AuthError, AuthResult, LoginCookies, TokenResponse,
};
use aruba_central_common::ProfileConfig;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const LOGIN_PATH: &str = "/oauth2/authorize/central/api/login";
const AUTHORIZE_PATH: &str = "/oauth2/authorize/central/api";
const TOKEN_PATH: &str = "/oauth2/token";

const CSRF_COOKIE: &str = "csrftoken";
const SESSION_COOKIE: &str = "session";
const CSRF_HEADER: &str = "X-CSRF-TOKEN";

#[derive(Debug, Deserialize)]
struct AuthCodeResponse {
    auth_code: String,
}

/// Username/password login against the Central API gateway
pub struct CentralOAuthProvider {
    http_client: reqwest::Client,
    config: ProfileConfig,
}

impl CentralOAuthProvider {
    /// Create a provider for the given profile
    ///
    /// Every auth request uses the profile's `timeout_secs`.
    pub fn new(config: ProfileConfig) -> AuthResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Step 1: log in and collect the session cookies
    pub async fn get_login(&self) -> AuthResult<LoginCookies> {
        debug!("Logging in to {} as {}", self.config.base_url(), self.config.username);

        let response = self
            .http_client
            .post(self.endpoint(LOGIN_PATH))
            .query(&[("client_id", self.config.client_id.as_str())])
            .json(&json!({
                "username": self.config.username,
                "password": self.config.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Credential {
                status: status.as_u16(),
                body,
            });
        }

        let mut csrf_token = None;
        let mut session = None;
        for cookie in response.cookies() {
            match cookie.name() {
                CSRF_COOKIE => csrf_token = Some(cookie.value().to_string()),
                SESSION_COOKIE => session = Some(cookie.value().to_string()),
                _ => {}
            }
        }

        match (csrf_token, session) {
            (Some(csrf_token), Some(session)) => Ok(LoginCookies {
                csrf_token,
                session,
            }),
            _ => Err(AuthError::InvalidResponse(
                "Login response did not set the csrftoken and session cookies".to_string(),
            )),
        }
    }

    /// Step 2: trade the login cookies for an authorization code
    pub async fn get_authcode(&self, cookies: &LoginCookies) -> AuthResult<String> {
        debug!("Requesting authorization code");

        let response = self
            .http_client
            .post(self.endpoint(AUTHORIZE_PATH))
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("scope", "all"),
            ])
            .header(CSRF_HEADER, &cookies.csrf_token)
            .header(COOKIE, format!("{SESSION_COOKIE}={}", cookies.session))
            .json(&json!({ "customer_id": self.config.customer_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::AuthorizationCode {
                status: status.as_u16(),
                body,
            });
        }

        let body: AuthCodeResponse = parse_json(response).await?;
        Ok(body.auth_code)
    }

    /// Step 3: exchange the authorization code for tokens
    pub async fn get_access_token(&self, auth_code: &str) -> AuthResult<AccessToken> {
        debug!("Exchanging authorization code for tokens");

        let response = self
            .token_request(&[("grant_type", "authorization_code"), ("code", auth_code)])
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let issued_at = now_epoch();
        let token_response: TokenResponse = parse_json(response).await?;
        let token = AccessToken::issue(token_response, None, issued_at)?;

        info!("Access token issued for profile {}", self.config.profile);
        Ok(token)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AuthResult<AccessToken> {
        debug!("Refreshing access token");

        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshFailed {
                status: status.as_u16(),
                body,
            });
        }

        let issued_at = now_epoch();
        let token_response: TokenResponse = parse_json(response).await?;
        let token = AccessToken::issue(token_response, Some(refresh_token), issued_at)?;

        info!("Access token refreshed for profile {}", self.config.profile);
        Ok(token)
    }

    async fn token_request(&self, grant: &[(&str, &str)]) -> AuthResult<Response> {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        params.extend_from_slice(grant);

        let response = self
            .http_client
            .post(self.endpoint(TOKEN_PATH))
            .query(&params)
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl AuthProvider for CentralOAuthProvider {
    async fn login(&self) -> AuthResult<AccessToken> {
        let cookies = self.get_login().await?;
        let auth_code = self.get_authcode(&cookies).await?;
        self.get_access_token(&auth_code).await
    }

    async fn refresh(&self, token: &AccessToken) -> AuthResult<AccessToken> {
        self.refresh_access_token(&token.refresh_token).await
    }

    fn name(&self) -> &str {
        "aruba-central"
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> AuthResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse auth response: {}", e)))
}
