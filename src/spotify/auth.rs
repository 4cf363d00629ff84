use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::Config,
    errors::SyncError,
    types::{Token, TokenResponse},
    utils,
};

/// Builds the Spotify authorization URL the `/login` route redirects to.
///
/// All query values are URL-encoded. The `state` value is echoed back by
/// Spotify on the callback and must match the cookie set alongside the
/// redirect.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config, "Zf3kP0aQ1xY7bN2m");
/// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
/// ```
pub fn authorize_url(config: &Config, state: &str) -> String {
    format!(
        "{auth_url}?response_type=code&client_id={client_id}&scope={scope}&redirect_uri={redirect_uri}&state={state}",
        auth_url = config.auth_url,
        client_id = urlencoding::encode(&config.client_id),
        scope = urlencoding::encode(&config.scope),
        redirect_uri = urlencoding::encode(&config.redirect_uri),
        state = urlencoding::encode(state),
    )
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// Completes the authorization-code flow with a server-to-server POST to the
/// token endpoint, authenticated with a Basic credential derived from the
/// client id and secret.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `config` - Credentials, redirect uri and token endpoint
/// * `code` - Authorization code received on the callback
///
/// # Returns
///
/// - `Ok(Token)` - Token with non-empty access and refresh tokens
/// - `Err(SyncError::TokenExchangeFailed)` - Non-success status, or a body
///   that lacks one of the tokens
/// - `Err(SyncError::Network)` - Transport failure or undecodable body
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly. The exchange
/// should happen immediately after receiving the callback.
pub async fn exchange_code(http: &Client, config: &Config, code: &str) -> Result<Token, SyncError> {
    let response = token_request(
        http,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await?;

    let refresh_token = response
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SyncError::TokenExchangeFailed {
            status: 200,
            body: "response did not contain a refresh token".to_string(),
        })?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token,
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Trades a refresh token for a new access token.
///
/// Spotify may rotate the refresh token. When the response omits it, the
/// token passed in stays valid and is carried over.
///
/// # Errors
///
/// Same as [`exchange_code`].
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<Token, SyncError> {
    let response = token_request(
        http,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| refresh_token.to_string()),
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

async fn token_request(
    http: &Client,
    config: &Config,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SyncError> {
    let response = http
        .post(&config.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_value(&config.client_id, &config.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::TokenExchangeFailed {
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse = response.json().await?;
    if token.access_token.is_empty() {
        return Err(SyncError::TokenExchangeFailed {
            status: status.as_u16(),
            body: "response did not contain an access token".to_string(),
        });
    }

    Ok(token)
}
