use axum::{Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tower_cookies::CookieManagerLayer;

use crate::{Res, api, config::Config, info, management::TokenManager};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenManager,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/spotifycallback", get(api::callback))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.config.server_addr)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}...", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
