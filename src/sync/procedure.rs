use std::time::Duration;

use crate::{
    errors::SyncError,
    info,
    spotify::{SpotifyClient, playlist},
    sync::daylist,
    warning,
};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Outcome of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub name: String,
    pub track_count: usize,
    /// Number of full procedure attempts it took, starting at 1.
    pub attempts: u32,
}

/// Copies the current daylist into the destination playlist once.
///
/// Steps, in order:
/// 1. resolve the daylist
/// 2. read its track URIs
/// 3. replace the destination's tracks with them in one call
/// 4. rename the destination to the daylist's name
///
/// A failure in step 1 or 2 aborts before anything is written. A 401 or 429
/// in any step is returned immediately so the caller can restart from step 1.
/// Any other failure of step 3 is logged and step 4 still runs; the first
/// failure is then returned. Nothing is rolled back.
pub async fn sync_once(client: &SpotifyClient) -> Result<SyncReport, SyncError> {
    info!("Authorized. Beginning procedure...");

    let source = daylist::resolve(client).await?;
    let href = source
        .tracks
        .as_ref()
        .map(|t| t.href.clone())
        .filter(|href| !href.is_empty())
        .ok_or_else(|| SyncError::ResolutionFailed("Failed to fetch daylist songs".to_string()))?;

    info!("Fetching Spotify daylist songs...");
    let uris = playlist::track_uris(client, &href).await?;

    let destination = client.config().destination_playlist_id.clone();

    let replaced = playlist::replace_tracks(client, &destination, &uris).await;
    let replace_error = match replaced {
        Ok(()) => None,
        Err(e) if e.is_retryable() => return Err(e),
        Err(e) => {
            warning!("Failed to update daylist songs: {}", e);
            Some(e)
        }
    };

    playlist::rename(client, &destination, &source.name).await?;

    match replace_error {
        Some(e) => Err(e),
        None => Ok(SyncReport {
            name: source.name,
            track_count: uris.len(),
            attempts: 1,
        }),
    }
}

/// Runs [`sync_once`] and restarts it on rate limiting or an expired token.
///
/// - **429**: waits the `Retry-After` delay sent by Spotify, or an
///   exponential backoff starting at `rate_limit_backoff`, then restarts.
/// - **401**: refreshes the token, then restarts. A failed refresh ends the
///   cycle with the refresh error.
///
/// At most `max_sync_attempts` full attempts are made; the last retryable
/// error is returned once they are used up. Every other error is returned
/// right away.
pub async fn sync_with_retry(client: &SpotifyClient) -> Result<SyncReport, SyncError> {
    let max_attempts = client.config().max_sync_attempts.max(1);
    let base_backoff = client.config().rate_limit_backoff;
    let mut attempt = 1;

    loop {
        let err = match sync_once(client).await {
            Ok(report) => {
                return Ok(SyncReport {
                    attempts: attempt,
                    ..report
                });
            }
            Err(e) => e,
        };

        match err {
            SyncError::RateLimited { retry_after } if attempt < max_attempts => {
                let wait = retry_after.unwrap_or_else(|| backoff(base_backoff, attempt));
                warning!(
                    "Rate limited, retrying in {}s (attempt {}/{})",
                    wait.as_secs(),
                    attempt + 1,
                    max_attempts
                );
                tokio::time::sleep(wait).await;
            }
            SyncError::Unauthorized if attempt < max_attempts => {
                warning!(
                    "Access token rejected, refreshing before retry (attempt {}/{})",
                    attempt + 1,
                    max_attempts
                );
                client.tokens().refresh().await?;
            }
            other => return Err(other),
        }

        attempt += 1;
    }
}

/// `base * 2^(attempt - 1)`, capped at one minute.
pub fn backoff(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff(base, 1), Duration::from_secs(1));
        assert_eq!(backoff(base, 2), Duration::from_secs(2));
        assert_eq!(backoff(base, 3), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff(Duration::from_secs(1), 10), MAX_BACKOFF);
        assert_eq!(backoff(Duration::from_secs(30), u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn zero_base_never_waits() {
        assert_eq!(backoff(Duration::ZERO, 4), Duration::ZERO);
    }
}
