use dnstoys_application::use_cases::RefreshRatesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Periodically replaces the exchange-rate snapshot.
///
/// The first tick fires immediately so the table is populated at startup.
/// A failed refresh keeps the previous snapshot and waits for the next tick.
pub struct FxRefreshJob {
    refresh: Arc<RefreshRatesUseCase>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl FxRefreshJob {
    pub fn new(refresh: Arc<RefreshRatesUseCase>) -> Self {
        Self {
            refresh,
            interval: DEFAULT_REFRESH_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Runs until the shutdown token is cancelled.
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting fx refresh job"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("FxRefreshJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.refresh.execute().await {
                        warn!(error = %e, "FxRefreshJob: keeping previous rates");
                    }
                }
            }
        }
    }
}
