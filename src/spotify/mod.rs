//! # Spotify Integration Module
//!
//! This module is the integration layer between daylist-sync and the Spotify
//! Web API. It handles the HTTP communication, the OAuth token endpoint and
//! the mapping of response statuses onto [`crate::errors::SyncError`].
//!
//! ## Architecture
//!
//! ```text
//! Sync layer (daylist resolver, sync procedure, scheduler)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + refresh grant)
//!     ├── Client (bearer header, status mapping)
//!     └── Playlist Operations (list, fetch, replace, rename)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the confidential-client authorization-code flow. The
//! token endpoint is called with a Basic credential built from the client id
//! and secret for both the initial exchange and every refresh.
//!
//! ## Status Mapping
//!
//! [`client::SpotifyClient`] turns every non-success answer into an error the
//! sync layer can act on:
//! - **401** - `Unauthorized`, the caller refreshes and restarts the procedure
//! - **429** - `RateLimited` with the `Retry-After` delay when present
//! - **anything else** - `Http` with method, URL and status for the log
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Code exchange and refresh
//! - `GET /me/playlists` - One page of the user's playlists
//! - `GET /playlists/{id}` - Single playlist, used to poll a lazy daylist
//! - `GET {tracks.href}` - Track listing of a playlist
//! - `PUT /playlists/{id}/tracks` - Bulk replace of a playlist's tracks
//! - `PUT /playlists/{id}` - Playlist details (name)
//!
//! All endpoint bases come from [`crate::config::Config`] so the whole module
//! can be pointed at a local stand-in.

pub mod auth;
pub mod client;
pub mod playlist;

pub use client::SpotifyClient;
