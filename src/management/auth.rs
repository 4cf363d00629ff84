use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::RwLock;

use crate::{config::Config, errors::SyncError, info, spotify, success, types::Token};

/// Owned holder of the current access and refresh token.
///
/// Clones share the same state. Only [`TokenManager::authorize`] and
/// [`TokenManager::refresh`] write to it; everything else reads. The token
/// lives in memory only, a restart requires a new visit to `/login`.
#[derive(Clone)]
pub struct TokenManager {
    http: Client,
    config: Arc<Config>,
    token: Arc<RwLock<Option<Token>>>,
}

impl TokenManager {
    pub fn new(http: Client, config: Arc<Config>) -> Self {
        TokenManager {
            http,
            config,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn current_token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    pub async fn is_authorized(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `Bearer <access token>` for the token currently held.
    ///
    /// A token close to its expiry is refreshed first.
    pub async fn authorization_header(&self) -> Result<String, SyncError> {
        let expired = match self.token.read().await.as_ref() {
            Some(token) => token.is_expired(),
            None => return Err(SyncError::MissingToken),
        };
        if expired {
            self.refresh().await?;
        }

        self.token
            .read()
            .await
            .as_ref()
            .map(Token::authorization_header)
            .ok_or(SyncError::MissingToken)
    }

    /// Exchanges an authorization code and stores the resulting token pair.
    ///
    /// On failure the previously held state is left untouched.
    pub async fn authorize(&self, code: &str) -> Result<(), SyncError> {
        let token = spotify::auth::exchange_code(&self.http, &self.config, code).await?;
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// Replaces the access token using the stored refresh token.
    ///
    /// # Errors
    ///
    /// - `SyncError::MissingToken` if the handshake has not completed yet
    /// - `SyncError::TokenExchangeFailed` if Spotify rejects the refresh token
    /// - `SyncError::Network` on transport failure
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let refresh_token = match self.token.read().await.as_ref() {
            Some(token) => token.refresh_token.clone(),
            None => return Err(SyncError::MissingToken),
        };

        info!("Refreshing token...");
        let token = spotify::auth::refresh_token(&self.http, &self.config, &refresh_token).await?;
        *self.token.write().await = Some(token);
        success!("Token refreshed.");
        Ok(())
    }

    /// Blocks until the authorization callback stored a token.
    ///
    /// Polls at `poll` intervals with an async sleep, so the server task keeps
    /// running on the same runtime while waiting.
    pub async fn wait_until_authorized(&self, poll: Duration) -> Token {
        loop {
            if let Some(token) = self.current_token().await {
                return token;
            }
            tokio::time::sleep(poll).await;
        }
    }
}
