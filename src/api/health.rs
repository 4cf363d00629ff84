use axum::{
    extract::State,
    response::{Html, Json},
};
use serde_json::{Value, json};

use crate::server::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": state.tokens.is_authorized().await
    }))
}

pub async fn index() -> Html<&'static str> {
    Html("<h2>daylist-sync</h2><p><a href=\"/login\">Log in with Spotify</a> to start syncing your daylist.</p>")
}
