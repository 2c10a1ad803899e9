use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMetrics {
    pub timestamp: DateTime<Utc>,
    pub sequence_index: u64,
    pub region: String,
    /// Time spent appending and recomputing insights for this reading.
    pub apply_us: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub run_id: Option<String>,
    pub readings_consumed: u64,
    pub readings_delivered: u64,
    pub recent_deliveries: Vec<DeliveryMetrics>,
}
