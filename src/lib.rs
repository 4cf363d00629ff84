//! Daylist sync library
//!
//! This library keeps a user-owned Spotify playlist in step with the
//! provider-curated "daylist". It authorizes once through the OAuth2
//! authorization-code flow, then on a fixed interval refreshes the access
//! token, resolves the current daylist and copies its tracks and name into
//! the destination playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local authorization server
//! - `config` - Configuration management and environment variables
//! - `errors` - Error taxonomy shared by every component
//! - `management` - Owned token state and its lifecycle
//! - `server` - Local HTTP server wiring
//! - `spotify` - Spotify Web API client implementation
//! - `sync` - Daylist resolution, the sync procedure and the scheduler
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod config;
pub mod errors;
pub mod management;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the places where a
/// structured [`errors::SyncError`] is not needed, using a boxed dynamic error
/// trait object that keeps Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Every line is prefixed with the local time so a long-running server log
/// can be read back. Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Fetching daylist...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::utils::timestamp(), "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::utils::timestamp(), "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable startup failures such as an unusable bind
/// address. Failures inside a sync cycle are reported with [`warning!`] and
/// never terminate the process.
///
/// # Example
///
/// ```
/// error!("Failed to bind {}", addr);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] [{}] {}", $crate::utils::timestamp(), "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: an abandoned sync cycle, a rejected
/// callback, a retry after rate limiting.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::utils::timestamp(), "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
