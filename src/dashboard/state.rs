use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::{
    feed::FeedStatus,
    history::RegionHistoryStore,
    insights::{self, InsightConfig},
    models::{InsightSummary, Reading},
    query,
};

/// Read-only view of the dashboard handed to consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub regions: Vec<String>,
    pub selected_region: Option<String>,
    /// History of the selected region, oldest first.
    pub history: Vec<Reading>,
    pub insight: InsightSummary,
    pub feed_status: FeedStatus,
    pub run_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the feed writes and queries read, kept together so one lock
/// covers an entire update.
#[derive(Debug)]
pub struct DashboardState {
    store: RegionHistoryStore,
    selected_region: Option<String>,
    insight: InsightSummary,
    insight_config: InsightConfig,
    feed_status: FeedStatus,
    run_id: Option<String>,
    updated_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(history_limit: usize, insight_config: InsightConfig) -> Self {
        Self {
            store: RegionHistoryStore::new(history_limit),
            selected_region: None,
            insight: InsightSummary::default(),
            insight_config,
            feed_status: FeedStatus::Idle,
            run_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Append a delivered reading, register its region, auto-select the first
    /// non-empty region, and refresh the insight summary.
    pub fn apply(&mut self, reading: Reading) {
        let region = reading.region.clone();
        if self.store.append(reading) {
            info!("new region {region:?}");
        }

        if self.selected_region.is_none() && !region.is_empty() {
            self.selected_region = Some(region);
        }

        self.recompute();
    }

    pub fn select_region(&mut self, region: String) {
        if !self.store.contains_region(&region) {
            info!("selected region {region:?} has no readings yet");
        }
        self.selected_region = Some(region);
        self.recompute();
    }

    /// With no region selected the previous summary is left as is.
    fn recompute(&mut self) {
        if self.selected_region.is_some() {
            self.insight = insights::recompute(
                self.selected_region.as_deref(),
                &self.store,
                &self.insight_config,
            );
        }
        self.updated_at = Utc::now();
    }

    pub fn begin_run(&mut self, run_id: &str) {
        self.run_id = Some(run_id.to_string());
        self.feed_status = FeedStatus::Running;
        self.updated_at = Utc::now();
    }

    /// Record the terminal status of `run_id`. Ignored if a newer run started.
    pub fn finish_run(&mut self, run_id: &str, status: FeedStatus) -> bool {
        if self.run_id.as_deref() != Some(run_id) {
            return false;
        }
        self.feed_status = status;
        self.updated_at = Utc::now();
        true
    }

    pub fn selected_series(&self) -> &[Reading] {
        self.selected_region
            .as_deref()
            .and_then(|region| self.store.buffer(region))
            .unwrap_or_default()
    }

    pub fn answer(&self, question: &str) -> String {
        query::answer(
            question,
            self.selected_region.as_deref(),
            self.selected_series(),
            &self.insight_config,
        )
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }

    pub fn regions(&self) -> Vec<String> {
        self.store.regions()
    }

    pub fn insight(&self) -> &InsightSummary {
        &self.insight
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.feed_status
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            regions: self.store.regions(),
            selected_region: self.selected_region.clone(),
            history: self.selected_series().to_vec(),
            insight: self.insight.clone(),
            feed_status: self.feed_status,
            run_id: self.run_id.clone(),
            updated_at: self.updated_at,
        }
    }
}
