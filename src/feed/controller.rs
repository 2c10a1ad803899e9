use std::{future::Future, io::Read};

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    metrics::MetricsCollector, models::Reading, settings::ReplaySettings, source::ReadingSource,
};

use super::{
    loop_worker::{replay_loop, Pacing},
    FeedStatus,
};

/// Owns the background replay task for one dashboard.
pub struct FeedController {
    handle: Option<JoinHandle<FeedStatus>>,
    cancel_token: Option<CancellationToken>,
    metrics: MetricsCollector,
}

impl FeedController {
    pub fn new(metrics: MetricsCollector) -> Self {
        Self {
            handle: None,
            cancel_token: None,
            metrics,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawn a replay of `source`. `on_record` receives each delivered reading;
    /// `on_finish` runs once with the terminal status. Returns the run id.
    pub async fn start<R, F, Fut, G, GFut>(
        &mut self,
        source: ReadingSource<R>,
        settings: &ReplaySettings,
        on_record: F,
        on_finish: G,
    ) -> Result<String>
    where
        R: Read + Send + 'static,
        F: FnMut(Reading) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
        G: FnOnce(FeedStatus) -> GFut + Send + 'static,
        GFut: Future<Output = ()> + Send + 'static,
    {
        if self.is_active() {
            bail!("feed already active");
        }
        settings.validate().context("invalid replay settings")?;

        let run_id = Uuid::new_v4().to_string();
        self.metrics.reset(&run_id).await;

        let pacing = Pacing {
            stride: settings.sample_stride,
            interval: settings.interval(),
            verbose: settings.verbose_deliveries,
        };
        info!(
            "starting replay run {run_id}: stride {}, interval {:?}",
            pacing.stride, pacing.interval
        );

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let metrics = self.metrics.clone();

        let handle = tokio::spawn(async move {
            let readings = source.stream();
            let status = replay_loop(readings, pacing, metrics, token_clone, on_record).await;
            on_finish(status).await;
            status
        });

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(run_id)
    }

    /// Cancel the replay and wait for its task to exit.
    pub async fn stop(&mut self) -> Result<FeedStatus> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => handle.await.context("replay task failed to join"),
            None => Ok(FeedStatus::Idle),
        }
    }
}
