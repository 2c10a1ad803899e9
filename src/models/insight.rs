use serde::{Deserialize, Serialize};

/// Windowed statistics for the selected region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub current_value: Option<f32>,
    pub rolling_average: Option<f32>,
    pub peak_value: Option<f32>,
    pub anomaly_detected: bool,
    pub anomalies_count: usize,
}

impl InsightSummary {
    pub fn is_empty(&self) -> bool {
        self.current_value.is_none()
    }
}
