//! OAuth2 authorization-code flow against the Schwab token endpoint.
//!
//! The manual flow is:
//! 1. open [`authorization_url`] in a browser and log in;
//! 2. copy the URL the browser lands on and pass it to [`parse_callback`];
//! 3. trade the returned code with [`OAuthClient::exchange_code`].

use crate::token::{AuthError, TokenRecord};
use chrono::Utc;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// Host serving the OAuth endpoints.
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://api.schwabapi.com";

/// OAuth application credentials and endpoints.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Application key (client id).
    pub api_key: String,
    /// Application secret.
    pub app_secret: String,
    /// Redirect URI registered with the application.
    pub callback_url: String,
    /// Authorization endpoint.
    pub authorize_url: String,
    /// Token endpoint.
    pub token_url: String,
}

impl OAuthConfig {
    /// Credentials with the production endpoints.
    pub fn new(
        api_key: impl Into<String>,
        app_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self::with_base_url(api_key, app_secret, callback_url, DEFAULT_OAUTH_BASE_URL)
    }

    /// Credentials with endpoints under `base_url`.
    pub fn with_base_url(
        api_key: impl Into<String>,
        app_secret: impl Into<String>,
        callback_url: impl Into<String>,
        base_url: &str,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            api_key: api_key.into(),
            app_secret: app_secret.into(),
            callback_url: callback_url.into(),
            authorize_url: format!("{base}/v1/oauth/authorize"),
            token_url: format!("{base}/v1/oauth/token"),
        }
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("api_key", &self.api_key)
            .field("app_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Random value for the `state` parameter.
#[must_use]
pub fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// URL the user opens to grant access.
///
/// # Errors
/// Returns [`AuthError::InvalidUrl`] if the authorization endpoint is not a URL.
pub fn authorization_url(config: &OAuthConfig, state: &str) -> Result<String, AuthError> {
    let url = Url::parse_with_params(
        &config.authorize_url,
        &[
            ("response_type", "code"),
            ("client_id", config.api_key.as_str()),
            ("redirect_uri", config.callback_url.as_str()),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

/// Extracts the authorization code from the URL the browser was redirected to.
///
/// # Errors
/// - [`AuthError::InvalidUrl`] if `received_url` is not a URL.
/// - [`AuthError::StateMismatch`] if its `state` is missing or differs.
/// - [`AuthError::MissingCode`] if it has no `code`.
pub fn parse_callback(received_url: &str, expected_state: &str) -> Result<String, AuthError> {
    let url = Url::parse(received_url.trim())?;
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        warn!("callback state mismatch");
        return Err(AuthError::StateMismatch);
    }
    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

/// Client for the token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    /// Builds a client whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: OAuthConfig, timeout: Duration) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    /// Credentials and endpoints in use.
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Trades an authorization code for a token.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenEndpoint`] on a non-success response, or a
    /// transport or JSON error.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .await?;
        info!("exchanged authorization code for token");
        Ok(token)
    }

    /// Trades a refresh token for a new token.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenEndpoint`] on a non-success response, or a
    /// transport or JSON error.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, AuthError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenRecord, AuthError> {
        let resp = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.api_key, Some(&self.config.app_secret))
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "token endpoint returned an error");
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenRecord = serde_json::from_str(&body)?;
        Ok(token.stamped(Utc::now()))
    }
}
