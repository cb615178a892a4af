//! Token file persistence and the refreshing token holder.
//!
//! The token file wraps the token endpoint's response together with the time
//! the token was first obtained:
//!
//! ```json
//! {
//!   "creation_timestamp": 1710000000,
//!   "token": {
//!     "access_token": "...",
//!     "refresh_token": "...",
//!     "token_type": "Bearer",
//!     "expires_in": 1800,
//!     "scope": "api",
//!     "expires_at": 1710001800
//!   }
//! }
//! ```
//!
//! Refresh tokens stop working seven days after the first exchange, so the
//! creation timestamp is kept across refreshes.

use crate::auth::OAuthClient;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use schwab_client::AccessTokenProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};


/// Default maximum token age: six and a half days.
pub const DEFAULT_MAX_TOKEN_AGE_SECS: i64 = 561_600;

/// Access tokens are refreshed this many seconds before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth and token file errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token file predates creation timestamps.
    #[error("token file {0} has no creation_timestamp; delete it and log in again")]
    StaleTokenFormat(PathBuf),

    /// Token is past the refresh token's lifetime.
    #[error("token is {age_secs}s old, older than the {max_age_secs}s limit; log in again")]
    TokenTooOld {
        /// Age of the token.
        age_secs: i64,
        /// Configured limit.
        max_age_secs: i64,
    },

    /// Token file could not be read or written.
    #[error("token file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token JSON could not be parsed or written.
    #[error("token JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Callback `state` differs from the one sent.
    #[error("callback state does not match the authorization request")]
    StateMismatch,

    /// Callback URL carries no `code`.
    #[error("callback URL has no authorization code")]
    MissingCode,

    /// Token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Token endpoint could not be reached.
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AuthError {
    /// Status code of a token endpoint rejection.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenEndpoint { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ============================================================================
// Token Records
// ============================================================================

/// Token endpoint response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Token used to obtain new access tokens.
    pub refresh_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Granted scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Access token expiry as epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// OpenID token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl TokenRecord {
    /// Fills in `expires_at` from `expires_in` when the endpoint left it out.
    #[must_use]
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now.timestamp() + self.expires_in);
        }
        self
    }

    /// True when the access token has expired at `now`, or when its expiry
    /// is unknown.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_none_or(|expires_at| expires_at <= now.timestamp())
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .field("id_token", &self.id_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Token plus the time it was first obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Epoch seconds of the first code exchange.
    pub creation_timestamp: i64,
    /// Current token.
    pub token: TokenRecord,
}

impl TokenMetadata {
    /// Wraps a freshly exchanged token.
    #[must_use]
    pub fn new(token: TokenRecord, now: DateTime<Utc>) -> Self {
        Self {
            creation_timestamp: now.timestamp(),
            token,
        }
    }

    /// Whole seconds since the first exchange.
    #[must_use]
    pub fn token_age(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp() - self.creation_timestamp
    }

    /// Swaps in a refreshed token, keeping the creation timestamp.
    #[must_use]
    pub fn with_token(&self, token: TokenRecord) -> Self {
        Self {
            creation_timestamp: self.creation_timestamp,
            token,
        }
    }

    /// Fails once the token is older than `max_age_secs`.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenTooOld`].
    pub fn ensure_age_within(&self, max_age_secs: i64, now: DateTime<Utc>) -> Result<(), AuthError> {
        let age_secs = self.token_age(now);
        if age_secs > max_age_secs {
            return Err(AuthError::TokenTooOld {
                age_secs,
                max_age_secs,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Token File
// ============================================================================

/// JSON token file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Points at `path`; nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the token file.
    ///
    /// # Errors
    /// Returns [`AuthError::StaleTokenFormat`] for files without a creation
    /// timestamp, or an I/O or JSON error.
    pub fn load(&self) -> Result<TokenMetadata, AuthError> {
        let content = fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        if value
            .get("creation_timestamp")
            .and_then(serde_json::Value::as_i64)
            .is_none()
        {
            warn!(path = %self.path.display(), "token file has no creation timestamp");
            return Err(AuthError::StaleTokenFormat(self.path.clone()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Writes the token file, replacing any previous content.
    ///
    /// # Errors
    /// Returns an I/O or JSON error.
    pub fn save(&self, metadata: &TokenMetadata) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(metadata)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "token file written");
        Ok(())
    }
}

// ============================================================================
// Token Manager
// ============================================================================

/// Holds the current token, refreshes it when it expires and writes every
/// new token back to the token file.
///
/// Concurrent refreshes are collapsed: callers that queue up behind an
/// in-flight refresh reuse its result.
pub struct TokenManager {
    oauth: OAuthClient,
    file: TokenFile,
    current: RwLock<TokenMetadata>,
    refresh_lock: Mutex<()>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("file", &self.file)
            .field("current", &*self.current.read())
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Wraps an already loaded token.
    #[must_use]
    pub fn new(oauth: OAuthClient, file: TokenFile, metadata: TokenMetadata) -> Self {
        Self {
            oauth,
            file,
            current: RwLock::new(metadata),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Loads the token from `file`.
    ///
    /// # Errors
    /// Same as [`TokenFile::load`].
    pub fn from_file(oauth: OAuthClient, file: TokenFile) -> Result<Self, AuthError> {
        let metadata = file.load()?;
        Ok(Self::new(oauth, file, metadata))
    }

    /// Exchanges an authorization code and writes a new token file.
    ///
    /// # Errors
    /// Returns the token endpoint or file error.
    pub async fn from_authorization_code(
        oauth: OAuthClient,
        file: TokenFile,
        code: &str,
    ) -> Result<Self, AuthError> {
        let token = oauth.exchange_code(code).await?;
        let metadata = TokenMetadata::new(token, Utc::now());
        file.save(&metadata)?;
        info!(path = %file.path().display(), "created token file");
        Ok(Self::new(oauth, file, metadata))
    }

    /// Snapshot of the current token.
    #[must_use]
    pub fn metadata(&self) -> TokenMetadata {
        self.current.read().clone()
    }

    /// Whole seconds since the first exchange.
    #[must_use]
    pub fn token_age(&self) -> i64 {
        self.current.read().token_age(Utc::now())
    }

    /// Token file backing this manager.
    #[must_use]
    pub fn file(&self) -> &TokenFile {
        &self.file
    }

    /// Fetches a new access token and rewrites the token file.
    ///
    /// If another refresh finished while this call waited for its turn, that
    /// result is returned instead of hitting the endpoint again.
    ///
    /// # Errors
    /// Returns the token endpoint or file error.
    pub async fn refresh(&self) -> Result<TokenMetadata, AuthError> {
        let seen = self.current.read().token.access_token.clone();
        let _guard = self.refresh_lock.lock().await;

        let current = self.metadata();
        if current.token.access_token != seen {
            debug!("token refreshed by a concurrent caller");
            return Ok(current);
        }

        let token = self.oauth.refresh(&current.token.refresh_token).await?;
        let refreshed = current.with_token(token);
        self.file.save(&refreshed)?;
        *self.current.write() = refreshed.clone();
        info!(
            age_secs = refreshed.token_age(Utc::now()),
            "refreshed access token"
        );
        Ok(refreshed)
    }

    async fn valid_access_token(&self) -> Result<String, AuthError> {
        let (expired, token) = {
            let current = self.current.read();
            let soon = Utc::now() + chrono::Duration::seconds(EXPIRY_MARGIN_SECS);
            (
                current.token.is_expired(soon),
                current.token.access_token.clone(),
            )
        };
        if !expired {
            return Ok(token);
        }
        Ok(self.refresh().await?.token.access_token)
    }
}

impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> Result<String, schwab_client::Error> {
        self.valid_access_token()
            .await
            .map_err(|err| schwab_client::Error::Auth {
                status: err.status(),
                source: Box::new(err),
            })
    }
}
