use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

/// Where the user agent lands after a rejected `state` value.
pub const STATE_MISMATCH_REDIRECT: &str = "/#error=state_mismatch";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("state mismatch")]
    AuthMismatch,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("token request failed with status {status}: {body}")]
    TokenExchangeFailed { status: u16, body: String },

    #[error("not authorized yet, visit /login first")]
    MissingToken,

    #[error("{0}")]
    ResolutionFailed(String),

    #[error("daylist {id} still has no track listing after {attempts} attempts")]
    NotMaterialized { id: String, attempts: u32 },

    #[error("rate limited by Spotify")]
    RateLimited { retry_after: Option<Duration> },

    #[error("access token rejected by Spotify")]
    Unauthorized,

    #[error("{method} {url} failed with status {status}")]
    Http {
        method: String,
        url: String,
        status: u16,
    },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl SyncError {
    /// Errors that restart the whole sync procedure instead of ending the cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::RateLimited { .. } | SyncError::Unauthorized)
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SyncError::AuthMismatch => {
                return Redirect::to(STATE_MISMATCH_REDIRECT).into_response();
            }
            SyncError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SyncError::TokenExchangeFailed { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            SyncError::MissingToken | SyncError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            SyncError::ResolutionFailed(_) | SyncError::NotMaterialized { .. } => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            SyncError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            SyncError::Http { .. } | SyncError::Network(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
