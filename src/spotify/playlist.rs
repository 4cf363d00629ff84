use crate::{
    errors::SyncError,
    info,
    spotify::SpotifyClient,
    types::{
        GetUserPlaylistsResponse, Playlist, PlaylistTracksResponse, ReplaceTracksRequest,
        UpdatePlaylistDetailsRequest,
    },
};

/// Page size for `GET /me/playlists`; the API maximum.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Retrieves one page of the current user's playlists.
///
/// The daylist is pinned near the top of the user's library, so a single page
/// of [`PLAYLIST_PAGE_SIZE`] entries is requested and no further pages are
/// followed.
pub async fn current_user_playlists(client: &SpotifyClient) -> Result<Vec<Playlist>, SyncError> {
    let url = client.endpoint(&format!("me/playlists?limit={}", PLAYLIST_PAGE_SIZE));
    let response: GetUserPlaylistsResponse = client.get_json(&url).await?;
    Ok(response.items)
}

pub async fn get(client: &SpotifyClient, playlist_id: &str) -> Result<Playlist, SyncError> {
    let url = client.endpoint(&format!("playlists/{}", playlist_id));
    client.get_json(&url).await
}

/// Reads the track listing behind a `tracks.href` locator.
///
/// Returns the track URIs in playlist order. Entries whose track is `null`
/// (removed from the catalogue) are skipped. If Spotify paginates the
/// listing, the `next` links are followed until exhausted.
///
/// # Errors
///
/// Any failing page aborts the whole read; a partial listing is never
/// returned.
pub async fn track_uris(client: &SpotifyClient, href: &str) -> Result<Vec<String>, SyncError> {
    let mut uris = Vec::new();
    let mut next = Some(href.to_string());

    while let Some(url) = next {
        let page: PlaylistTracksResponse = client.get_json(&url).await?;
        uris.extend(
            page.items
                .into_iter()
                .filter_map(|item| item.track)
                .map(|track| track.uri),
        );
        next = page.next;
    }

    Ok(uris)
}

/// Replaces the whole track list of a playlist in a single call.
pub async fn replace_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
) -> Result<(), SyncError> {
    info!("Updating daylist songs...");
    let url = client.endpoint(&format!("playlists/{}/tracks", playlist_id));
    let body = ReplaceTracksRequest {
        uris: uris.to_vec(),
    };
    client.put_json(&url, &body).await
}

pub async fn rename(client: &SpotifyClient, playlist_id: &str, name: &str) -> Result<(), SyncError> {
    info!("Updating daylist name...");
    let url = client.endpoint(&format!("playlists/{}", playlist_id));
    let body = UpdatePlaylistDetailsRequest {
        name: name.to_string(),
    };
    client.put_json(&url, &body).await
}
