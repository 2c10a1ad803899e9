mod types;

pub use types::{DeliveryMetrics, MetricsSnapshot};

use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_RECENT_DELIVERIES: usize = 20;

/// Counters for the replay feed, shared between the feed task and readers.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsSnapshot>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_consumed(&self) {
        self.inner.lock().await.readings_consumed += 1;
    }

    pub async fn record_delivery(&self, metrics: DeliveryMetrics) {
        let mut state = self.inner.lock().await;

        state.readings_delivered += 1;
        state.recent_deliveries.push(metrics);

        if state.recent_deliveries.len() > MAX_RECENT_DELIVERIES {
            state.recent_deliveries.remove(0);
        }
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().await.clone()
    }

    /// Clear all counters and tag subsequent records with `run_id`.
    pub async fn reset(&self, run_id: &str) {
        let mut state = self.inner.lock().await;
        *state = MetricsSnapshot {
            run_id: Some(run_id.to_string()),
            ..MetricsSnapshot::default()
        };
    }
}
