use axum::{
    extract::{Query, State},
    response::Html,
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    api::login::STATE_COOKIE, errors::SyncError, server::AppState, success, types::CallbackQuery,
    utils, warning,
};

/// Completes the authorization handshake.
///
/// The echoed `state` has to match the cookie set by `/login`; otherwise no
/// exchange is attempted and the user agent is sent to
/// `/#error=state_mismatch`. On a match the cookie is cleared and the code is
/// exchanged for a token pair, which the [`crate::management::TokenManager`]
/// keeps for the scheduler.
///
/// # Responses
///
/// - **200** - token stored
/// - **303** - state mismatch
/// - **400** - access denied by the user, missing code, or Spotify rejected
///   the exchange
/// - **502** - Spotify could not be reached
pub async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<CallbackQuery>,
) -> Result<Html<&'static str>, SyncError> {
    let stored = cookies.get(STATE_COOKIE).map(|c| c.value().to_string());
    if !utils::state_matches(params.state.as_deref(), stored.as_deref()) {
        warning!("Rejected authorization callback: state mismatch.");
        return Err(SyncError::AuthMismatch);
    }

    let mut expired = Cookie::from(STATE_COOKIE);
    expired.set_path("/");
    cookies.remove(expired);

    if let Some(reason) = params.error {
        warning!("Authorization denied: {}", reason);
        return Err(SyncError::BadRequest(format!("authorization denied: {}", reason)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| SyncError::BadRequest("Missing code".to_string()))?;

    match state.tokens.authorize(&code).await {
        Ok(()) => {
            success!("Authorization code exchanged.");
            Ok(Html(
                "<h2>Authorization successful.</h2><p>You can close this window.</p>",
            ))
        }
        Err(e) => {
            warning!("Invalid token. {}", e);
            Err(e)
        }
    }
}
