use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::{
    config::MAX_SYNC_INTERVAL_MINUTES,
    errors::SyncError,
    info,
    spotify::SpotifyClient,
    success,
    sync::procedure::{self, SyncReport},
    warning,
};

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(MAX_SYNC_INTERVAL_MINUTES * 60);

/// Drives the sync cycles once the user has authorized.
///
/// Cycles never overlap: each one is awaited inside the timer loop, and a
/// tick that comes due while a cycle is still running is skipped instead of
/// queued.
#[derive(Clone)]
pub struct Scheduler {
    client: SpotifyClient,
}

impl Scheduler {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    /// Spawns [`Scheduler::run`] on the current runtime.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Waits for authorization, syncs once, then syncs on every tick.
    pub async fn run(self) {
        let config = self.client.config();
        self.client
            .tokens()
            .wait_until_authorized(config.auth_poll_interval)
            .await;
        success!("Authorized!");

        self.cycle(false).await;

        let period = config.sync_interval.clamp(MIN_PERIOD, MAX_PERIOD);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.cycle(true).await;
        }
    }

    /// One cycle with its outcome logged. Never fails; the next tick retries.
    pub async fn cycle(&self, refresh: bool) -> Option<SyncReport> {
        match self.run_cycle(refresh).await {
            Ok(report) => {
                success!(
                    "Successfully updated daylist: \"{}\" ({} tracks).",
                    report.name,
                    report.track_count
                );
                Some(report)
            }
            Err(e) => {
                warning!("Sync cycle abandoned: {}", e);
                None
            }
        }
    }

    /// Refreshes the token when asked to, then runs the sync procedure.
    pub async fn run_cycle(&self, refresh: bool) -> Result<SyncReport, SyncError> {
        if refresh {
            self.client.tokens().refresh().await?;
        }
        info!("Starting sync cycle...");
        procedure::sync_with_retry(&self.client).await
    }
}
