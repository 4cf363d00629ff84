use std::{sync::Arc, time::Duration};

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, RETRY_AFTER},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{config::Config, errors::SyncError, management::TokenManager};

/// Thin wrapper around `reqwest` for the protected Web API endpoints.
///
/// Every request carries the bearer header of the token held by the
/// [`TokenManager`] at send time, and every non-success status is mapped to a
/// [`SyncError`] so callers can tell rate limiting and expired tokens apart
/// from other failures.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
    tokens: TokenManager,
}

impl SpotifyClient {
    pub fn new(http: Client, config: Arc<Config>, tokens: TokenManager) -> Self {
        Self {
            http,
            config,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute URL for a path below the configured API base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SyncError> {
        let response = self.send("GET", url, self.http.get(url)).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), SyncError> {
        self.send("PUT", url, self.http.put(url).json(body)).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Response, SyncError> {
        let authorization = self.tokens.authorization_header().await?;
        let response = request.header(AUTHORIZATION, authorization).send().await?;
        check_status(method, url, response)
    }
}

fn check_status(method: &str, url: &str, response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(SyncError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(SyncError::RateLimited {
            retry_after: retry_after(response.headers()),
        }),
        _ => Err(SyncError::Http {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
        }),
    }
}

/// Spotify sends the wait time of a 429 as whole seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
