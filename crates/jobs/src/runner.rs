use crate::FxRefreshJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

impl SpawnableJob for FxRefreshJob {
    fn with_cancellation(self, token: CancellationToken) -> Self {
        self.with_cancellation(token)
    }

    fn start_job(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.start().await })
    }
}

fn spawn_job<J: SpawnableJob>(
    job: Option<J>,
    shutdown: &Option<CancellationToken>,
) -> Option<JoinHandle<()>> {
    let job = job?;
    let job = match shutdown {
        Some(token) => job.with_cancellation(token.clone()),
        None => job,
    };
    Some(Arc::new(job).start_job())
}

/// Starts the background jobs that are configured, all sharing one shutdown
/// token.
#[derive(Default)]
pub struct JobRunner {
    fx_refresh: Option<FxRefreshJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fx_refresh(mut self, job: FxRefreshJob) -> Self {
        self.fx_refresh = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Returns the handles of the spawned jobs.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let handles: Vec<JoinHandle<()>> = [spawn_job(self.fx_refresh, &self.shutdown)]
            .into_iter()
            .flatten()
            .collect();

        info!(jobs = handles.len(), "Background jobs started");
        handles
    }
}
