use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Seconds before the reported expiry at which a token already counts as
/// expired, so a request never races the deadline.
pub const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Header value carried by every call to a protected endpoint.
    pub fn authorization_header(&self) -> String {
        utils::bearer_value(&self.access_token)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        let deadline = self
            .obtained_at
            .saturating_add(self.expires_in)
            .saturating_sub(EXPIRY_MARGIN_SECS);
        now >= deadline
    }
}

/// Body of the token endpoint for both grant types.
///
/// `refresh_token` is optional because Spotify only rotates it sometimes.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub href: String,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub tracks: Option<TracksRef>,
}

impl Playlist {
    /// Whether Spotify already exposes the track listing of this playlist.
    pub fn has_track_listing(&self) -> bool {
        self.tracks.as_ref().is_some_and(|t| !t.href.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    /// `null` for tracks that were removed from the catalogue.
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistDetailsRequest {
    pub name: String,
}
