//! Ready-to-use clients backed by a token file.

use crate::auth::{OAuthClient, OAuthConfig, parse_callback};
use crate::config::Config;
use crate::error::Error;
use crate::token::{TokenFile, TokenManager};
use chrono::Utc;
use schwab_client::{ClientConfig, ReqwestTransport, SchwabClient};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Client that refreshes its token through a [`TokenManager`].
pub type Client = SchwabClient<Arc<TokenManager>, ReqwestTransport>;

/// Opens a client from an existing token file.
///
/// # Errors
/// - [`crate::token::AuthError::StaleTokenFormat`] for files without a
///   creation timestamp.
/// - [`crate::token::AuthError::TokenTooOld`] once the token is older than
///   `max_age_secs`.
/// - I/O, JSON or HTTP client construction errors.
pub fn client_from_token_file(
    token_path: impl AsRef<Path>,
    oauth: OAuthConfig,
    client_config: &ClientConfig,
    max_age_secs: i64,
) -> Result<Client, Error> {
    let file = TokenFile::new(token_path.as_ref());
    let metadata = file.load()?;
    metadata.ensure_age_within(max_age_secs, Utc::now())?;
    info!(
        path = %file.path().display(),
        age_secs = metadata.token_age(Utc::now()),
        "loaded token file"
    );

    let oauth = OAuthClient::new(oauth, client_config.timeout)?;
    let manager = TokenManager::new(oauth, file, metadata);
    build(client_config, manager)
}

/// Opens a client from the token file named in `config`.
///
/// # Errors
/// Same as [`client_from_token_file`].
pub fn client_from_config(config: &Config) -> Result<Client, Error> {
    client_from_token_file(
        &config.token.path,
        config.oauth_config(),
        &config.client.to_client_config(),
        config.token.max_age_secs,
    )
}

/// Finishes the manual login flow.
///
/// `received_url` is the address the browser landed on after the user
/// approved access to the URL built with [`crate::auth::authorization_url`]
/// and `state`. The code it carries is exchanged and a new token file is
/// written to the configured path.
///
/// # Errors
/// Returns the callback, token endpoint or file error.
pub async fn client_from_received_url(
    config: &Config,
    state: &str,
    received_url: &str,
) -> Result<Client, Error> {
    let code = parse_callback(received_url, state)?;
    let client_config = config.client.to_client_config();
    let oauth = OAuthClient::new(config.oauth_config(), client_config.timeout)?;
    let manager =
        TokenManager::from_authorization_code(oauth, TokenFile::new(&config.token.path), &code)
            .await?;
    build(&client_config, manager)
}

fn build(client_config: &ClientConfig, manager: TokenManager) -> Result<Client, Error> {
    let transport = ReqwestTransport::new(client_config.timeout)?;
    Ok(SchwabClient::with_transport(
        &client_config.base_url,
        Arc::new(manager),
        transport,
    ))
}
