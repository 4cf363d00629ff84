//! # API Module
//!
//! HTTP endpoints of the local server that drives the one-time Spotify
//! authorization.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /`, a short page linking to `/login`
//! - [`health`] - `GET /health`, status, version and whether a token is held
//! - [`login`] - `GET /login`, sets the anti-forgery cookie and redirects to
//!   Spotify's authorize page
//! - [`callback`] - `GET /spotifycallback`, validates `state` and exchanges the
//!   authorization code
//!
//! ## Security Considerations
//!
//! - The `state` value is 16 random alphanumeric characters kept in an
//!   HttpOnly cookie for ten minutes
//! - A mismatching or missing `state` never reaches the token endpoint
//! - The client secret only leaves the process toward the token endpoint

mod callback;
mod health;
mod login;

pub use callback::callback;
pub use health::{health, index};
pub use login::{STATE_COOKIE, login};
