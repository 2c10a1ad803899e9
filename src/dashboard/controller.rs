use std::{io::Read, sync::Arc};

use anyhow::{Context, Result};
use log::info;
use tokio::sync::{watch, Mutex};

use crate::{
    feed::{FeedController, FeedStatus},
    metrics::{MetricsCollector, MetricsSnapshot},
    models::{InsightSummary, Reading},
    settings::ReplaySettings,
    source::ReadingSource,
};

use super::state::{DashboardSnapshot, DashboardState};

/// Control surface over the replay feed and the state it drives.
///
/// Feed deliveries, region selection, and questions all go through the same
/// state lock. Every change is published as a [`DashboardSnapshot`] while the
/// lock is still held, so subscribers see updates in the order they happened.
#[derive(Clone)]
pub struct DashboardController {
    state: Arc<Mutex<DashboardState>>,
    feed: Arc<Mutex<FeedController>>,
    metrics: MetricsCollector,
    settings: ReplaySettings,
    snapshot_tx: Arc<watch::Sender<DashboardSnapshot>>,
}

impl DashboardController {
    pub fn new(settings: ReplaySettings) -> Result<Self> {
        settings.validate().context("invalid replay settings")?;

        let state = DashboardState::new(settings.history_limit, settings.insights.clone());
        let (snapshot_tx, _) = watch::channel(state.snapshot());
        let metrics = MetricsCollector::new();

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            feed: Arc::new(Mutex::new(FeedController::new(metrics.clone()))),
            metrics,
            settings,
            snapshot_tx: Arc::new(snapshot_tx),
        })
    }

    pub fn settings(&self) -> &ReplaySettings {
        &self.settings
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Replay the dataset named in the settings.
    pub async fn start_feed(&self) -> Result<String> {
        let source = ReadingSource::open(&self.settings.dataset_path);
        self.start_feed_from(source).await
    }

    pub async fn start_feed_from<R>(&self, source: ReadingSource<R>) -> Result<String>
    where
        R: Read + Send + 'static,
    {
        let mut feed = self.feed.lock().await;
        // Held until the run is registered so the first delivery sees it.
        let mut state = self.state.lock().await;

        let on_record = {
            let state = self.state.clone();
            let snapshot_tx = self.snapshot_tx.clone();
            move |reading: Reading| {
                let state = state.clone();
                let snapshot_tx = snapshot_tx.clone();
                async move {
                    let mut guard = state.lock().await;
                    guard.apply(reading);
                    snapshot_tx.send_replace(guard.snapshot());
                }
            }
        };

        let (run_id_tx, run_id_rx) = tokio::sync::oneshot::channel::<String>();
        let on_finish = {
            let state = self.state.clone();
            let snapshot_tx = self.snapshot_tx.clone();
            move |status: FeedStatus| async move {
                let Ok(run_id) = run_id_rx.await else {
                    return;
                };
                let mut guard = state.lock().await;
                if guard.finish_run(&run_id, status) {
                    info!("replay run {run_id} ended: {status:?}");
                    snapshot_tx.send_replace(guard.snapshot());
                }
            }
        };

        let run_id = feed
            .start(source, &self.settings, on_record, on_finish)
            .await?;
        let _ = run_id_tx.send(run_id.clone());

        state.begin_run(&run_id);
        self.snapshot_tx.send_replace(state.snapshot());
        Ok(run_id)
    }

    /// Cancel the running replay, if any, and wait for it to exit.
    pub async fn stop_feed(&self) -> Result<FeedStatus> {
        self.feed.lock().await.stop().await
    }

    /// Wait until the current run finishes or is cancelled.
    pub async fn wait_for_feed(&self) -> FeedStatus {
        let mut rx = self.subscribe();
        rx.wait_for(|snapshot| {
            snapshot.feed_status.is_terminal() || snapshot.feed_status == FeedStatus::Idle
        })
            .await
            .map(|snapshot| snapshot.feed_status)
            .unwrap_or(FeedStatus::Idle)
    }

    pub async fn select_region(&self, region: impl Into<String>) {
        let region = region.into();
        let mut guard = self.state.lock().await;
        info!("selecting region {region:?}");
        guard.select_region(region);
        self.snapshot_tx.send_replace(guard.snapshot());
    }

    pub async fn ask(&self, question: &str) -> String {
        self.state.lock().await.answer(question)
    }

    pub async fn regions(&self) -> Vec<String> {
        self.state.lock().await.regions()
    }

    pub async fn history_for_selected(&self) -> Vec<Reading> {
        self.state.lock().await.selected_series().to_vec()
    }

    pub async fn insight(&self) -> InsightSummary {
        self.state.lock().await.insight().clone()
    }

    pub async fn metrics(&self) -> MetricsSnapshot {
        self.metrics.get_snapshot().await
    }
}
