use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{history::DEFAULT_HISTORY_LIMIT, insights::InsightConfig};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const DEFAULT_DATASET: &str = "annual_conc_by_monitor_2021.csv";

/// Replay and analytics knobs, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaySettings {
    pub dataset_path: PathBuf,
    /// Pause after each delivered reading.
    pub interval_ms: u64,
    /// Deliver one of every `sample_stride` readings.
    pub sample_stride: usize,
    pub history_limit: usize,
    pub insights: InsightConfig,
    /// Log every delivery at info level instead of debug.
    pub verbose_deliveries: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            interval_ms: 600,
            sample_stride: 5,
            history_limit: DEFAULT_HISTORY_LIMIT,
            insights: InsightConfig::default(),
            verbose_deliveries: false,
        }
    }
}

impl ReplaySettings {
    /// Load settings from `path`. A missing file gives the defaults; a file
    /// that does not parse falls back to the defaults with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("ignoring malformed settings in {}: {err}", path.display());
                Self::default()
            })
        } else {
            Self::default()
        };

        settings.apply_env();
        Ok(settings)
    }

    /// `REGIONWATCH_DEBUG=1` (or `true`) turns on per-delivery logging.
    pub fn apply_env(&mut self) {
        let debug_mode = std::env::var("REGIONWATCH_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.verbose_deliveries = true;
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            bail!("sample_stride must be greater than zero");
        }
        if self.history_limit == 0 {
            bail!("history_limit must be greater than zero");
        }
        if !(self.insights.anomaly_sigma.is_finite() && self.insights.anomaly_sigma > 0.0) {
            bail!("anomaly_sigma must be a positive number");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let settings = ReplaySettings::load(Path::new("/no/such/regionwatch.json")).unwrap();
        assert_eq!(settings.interval_ms, 600);
        assert_eq!(settings.sample_stride, 5);
        assert_eq!(settings.history_limit, 150);
        assert_eq!(settings.insights, InsightConfig::default());
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let json = r#"{"intervalMs": 10, "insights": {"anomalySigma": 3.0}}"#;
        let settings: ReplaySettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.interval(), Duration::from_millis(10));
        assert_eq!(settings.sample_stride, 5);
        assert_eq!(settings.insights.anomaly_sigma, 3.0);
        assert_eq!(settings.insights.rolling_window, 30);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("regionwatch-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "{ not json").unwrap();
        let settings = ReplaySettings::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(settings.sample_stride, 5);
    }

    #[test]
    fn rejects_zero_stride_and_limit() {
        let mut settings = ReplaySettings::default();
        assert!(settings.validate().is_ok());

        settings.sample_stride = 0;
        assert!(settings.validate().is_err());

        settings.sample_stride = 1;
        settings.history_limit = 0;
        assert!(settings.validate().is_err());
    }
}
