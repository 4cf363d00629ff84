use std::time::Duration;

use crate::{
    errors::SyncError,
    info,
    spotify::{SpotifyClient, playlist},
    types::Playlist,
};

/// Account that owns every provider-curated playlist.
pub const SYSTEM_OWNER_ID: &str = "spotify";
/// Prefix of a daylist that carries its current mood, e.g. `daylist • energetic`.
pub const TITLED_PREFIX: &str = "daylist •";
/// Name of a daylist Spotify has not materialized yet.
pub const PLACEHOLDER_NAME: &str = "daylist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaylistKind {
    Titled,
    /// Listed under the plain placeholder name; its track listing may still
    /// be missing and has to be polled for.
    Placeholder,
}

pub fn classify(playlist: &Playlist) -> Option<DaylistKind> {
    if playlist.owner.id != SYSTEM_OWNER_ID {
        return None;
    }

    let name = playlist.name.trim();
    if name.starts_with(TITLED_PREFIX) {
        Some(DaylistKind::Titled)
    } else if name == PLACEHOLDER_NAME {
        Some(DaylistKind::Placeholder)
    } else {
        None
    }
}

/// First playlist in `playlists` that classifies as a daylist.
pub fn find_daylist(playlists: Vec<Playlist>) -> Option<(Playlist, DaylistKind)> {
    playlists
        .into_iter()
        .find_map(|p| classify(&p).map(|kind| (p, kind)))
}

/// Locates the current daylist of the authorized user.
///
/// Reads one page of the user's playlists and picks the first entry owned by
/// the Spotify system account that has one of the accepted names. A
/// placeholder without a track listing is polled until Spotify exposes the
/// listing.
///
/// # Errors
///
/// - `SyncError::ResolutionFailed` if no daylist is in the user's playlists
/// - `SyncError::NotMaterialized` if the placeholder never gets a listing
/// - any error of the underlying requests
pub async fn resolve(client: &SpotifyClient) -> Result<Playlist, SyncError> {
    info!("Fetching daylist...");
    let playlists = playlist::current_user_playlists(client).await?;

    let (daylist, kind) = find_daylist(playlists).ok_or_else(|| {
        SyncError::ResolutionFailed("Failed to fetch spotify daylist".to_string())
    })?;

    match kind {
        DaylistKind::Placeholder if !daylist.has_track_listing() => {
            let config = client.config();
            await_materialized(
                client,
                &daylist.id,
                config.daylist_poll_attempts,
                config.daylist_poll_delay,
            )
            .await
        }
        _ => Ok(daylist),
    }
}

/// Re-fetches a playlist until it carries a track listing.
///
/// Makes at most `attempts` fetches with `delay` between them, and always
/// at least one.
pub async fn await_materialized(
    client: &SpotifyClient,
    playlist_id: &str,
    attempts: u32,
    delay: Duration,
) -> Result<Playlist, SyncError> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        info!(
            "Daylist not ready yet, fetching it again (attempt {}/{})...",
            attempt, attempts
        );
        let fetched = playlist::get(client, playlist_id).await?;
        if fetched.has_track_listing() {
            return Ok(fetched);
        }
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }

    Err(SyncError::NotMaterialized {
        id: playlist_id.to_string(),
        attempts,
    })
}
