//! Configuration management for daylist-sync.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files and collects them into a [`Config`] value that
//! is built once at startup and shared by every component.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::warning;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:6969";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:6969/spotifycallback";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private playlist-modify-public playlist-modify-private";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Bounds applied to `SYNC_INTERVAL_MINUTES`.
pub const MIN_SYNC_INTERVAL_MINUTES: u64 = 1;
pub const MAX_SYNC_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory is read first. Afterwards the file in
/// the platform-specific local data directory under `daylist-sync/.env` is
/// read. Neither file is required; variables that are already set are never
/// overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/daylist-sync/.env`
/// - macOS: `~/Library/Application Support/daylist-sync/.env`
/// - Windows: `%LOCALAPPDATA%/daylist-sync/.env`
///
/// # Errors
///
/// Returns an error string if a `.env` file exists but cannot be parsed.
pub fn load_env() -> Result<(), String> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("daylist-sync/.env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Runtime configuration, read once at process start and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the local HTTP server binds to.
    pub server_addr: String,
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered with Spotify; must point at `/spotifycallback`.
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    /// Base URL of the Web API, without trailing slash.
    pub api_url: String,
    /// Playlist that receives the daylist contents.
    pub destination_playlist_id: String,
    pub sync_interval: Duration,
    pub auth_poll_interval: Duration,
    pub daylist_poll_attempts: u32,
    pub daylist_poll_delay: Duration,
    /// Upper bound on full procedure attempts within one cycle.
    pub max_sync_attempts: u32,
    pub rate_limit_backoff: Duration,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            destination_playlist_id: String::new(),
            sync_interval: Duration::from_secs(30 * 60),
            auth_poll_interval: Duration::from_secs(5),
            daylist_poll_attempts: 10,
            daylist_poll_delay: Duration::from_secs(2),
            max_sync_attempts: 5,
            rate_limit_backoff: Duration::from_secs(1),
            open_browser: false,
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Missing client credentials only produce a warning: the server still
    /// starts, but the token exchange will be rejected by Spotify. Unparsable
    /// numeric values fall back to their defaults with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `DAYLIST_PLAYLIST_ID` is not set, since there is
    /// nothing to sync into without it.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let destination_playlist_id = env::var("DAYLIST_PLAYLIST_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "DAYLIST_PLAYLIST_ID must be set".to_string())?;

        let client_id = env::var("SPOTIFY_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            warning!("SPOTIFY_CLIENT_ID or SPOTIFY_CLIENT_SECRET not set. Authorization will fail.");
        }

        Ok(Self {
            server_addr: env_or("SERVER_ADDRESS", defaults.server_addr),
            client_id,
            client_secret,
            redirect_uri: env_or("SPOTIFY_API_REDIRECT_URI", defaults.redirect_uri),
            scope: env_or("SPOTIFY_API_AUTH_SCOPE", defaults.scope),
            auth_url: env_or("SPOTIFY_API_AUTH_URL", defaults.auth_url),
            token_url: env_or("SPOTIFY_API_TOKEN_URL", defaults.token_url),
            api_url: env_or("SPOTIFY_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            destination_playlist_id,
            sync_interval: sync_interval_from_minutes(parsed_or("SYNC_INTERVAL_MINUTES", 30u64)),
            auth_poll_interval: Duration::from_secs(parsed_or("AUTH_POLL_SECONDS", 5u64)),
            daylist_poll_attempts: parsed_or("DAYLIST_POLL_ATTEMPTS", defaults.daylist_poll_attempts)
                .max(1),
            daylist_poll_delay: Duration::from_secs(parsed_or("DAYLIST_POLL_DELAY_SECONDS", 2u64)),
            max_sync_attempts: parsed_or("MAX_SYNC_ATTEMPTS", defaults.max_sync_attempts).max(1),
            rate_limit_backoff: Duration::from_secs(parsed_or("RATE_LIMIT_BACKOFF_SECONDS", 1u64)),
            open_browser: parsed_or("OPEN_BROWSER", false),
        })
    }

    /// The `/login` URL a user has to visit, derived from the redirect uri so
    /// the printed hint matches what is registered with Spotify.
    pub fn login_url(&self) -> String {
        match self.redirect_uri.rfind('/') {
            Some(idx) if idx > "https://".len() => {
                format!("{}/login", &self.redirect_uri[..idx])
            }
            _ => format!("http://{}/login", self.server_addr),
        }
    }
}

/// Converts the configured minutes into the scheduler period.
///
/// Zero would stop the timer and huge values would overflow it, so the
/// result is clamped to one minute up to one week.
pub fn sync_interval_from_minutes(minutes: u64) -> Duration {
    let minutes = minutes.clamp(MIN_SYNC_INTERVAL_MINUTES, MAX_SYNC_INTERVAL_MINUTES);
    Duration::from_secs(minutes.saturating_mul(60))
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warning!("Ignoring invalid value for {}: {}", key, raw);
                default
            }
        },
        _ => default,
    }
}
