use serde::{Deserialize, Serialize};

/// Window sizes and thresholds for the insight engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightConfig {
    /// Readings averaged for the rolling average.
    pub rolling_window: usize,

    /// Below this many retained readings, anomaly detection reports nothing.
    pub anomaly_min_readings: usize,

    /// Tail window scored for anomalies.
    pub anomaly_window: usize,

    /// Distance from the tail mean, in population standard deviations, past
    /// which a reading counts as anomalous.
    pub anomaly_sigma: f32,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            rolling_window: 30,
            anomaly_min_readings: 10,
            anomaly_window: 50,
            anomaly_sigma: 2.5,
        }
    }
}
