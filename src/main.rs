use std::sync::Arc;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use daylist_sync::{
    config::{self, Config},
    error, info,
    management::TokenManager,
    server::{self, AppState},
    spotify::SpotifyClient,
    sync::Scheduler,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

/// All settings come from the environment, see `.env.example`.
#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {}

#[tokio::main]
async fn main() {
    let _cli = Cli::parse();

    if let Err(e) = config::load_env() {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let http = reqwest::Client::new();
    let tokens = TokenManager::new(http.clone(), Arc::clone(&config));
    let client = SpotifyClient::new(http, Arc::clone(&config), tokens.clone());

    Scheduler::new(client).start();

    let login_url = config.login_url();
    info!("Authorize the server by going to {}", login_url);
    if config.open_browser && webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        );
    }

    let state = AppState {
        config: Arc::clone(&config),
        tokens,
    };
    if let Err(e) = server::start_api_server(state).await {
        error!("Server error: {}", e);
    }
}
