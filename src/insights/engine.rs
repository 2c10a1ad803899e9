use crate::{
    history::RegionHistoryStore,
    models::{InsightSummary, Reading},
};

use super::config::InsightConfig;

/// Recompute the summary for `selected_region` from scratch.
///
/// With no selection the summary is empty. A selected region with no
/// readings also yields an empty summary.
pub fn recompute(
    selected_region: Option<&str>,
    store: &RegionHistoryStore,
    config: &InsightConfig,
) -> InsightSummary {
    let series = selected_region
        .and_then(|region| store.buffer(region))
        .unwrap_or_default();
    summarize(series, config)
}

/// Summary of one region's buffer.
pub fn summarize(series: &[Reading], config: &InsightConfig) -> InsightSummary {
    let anomalies = detect_anomalies(series, config);

    InsightSummary {
        current_value: series.last().map(|reading| reading.value),
        rolling_average: rolling_average(series, config.rolling_window),
        peak_value: peak(series).map(|reading| reading.value),
        anomaly_detected: !anomalies.is_empty(),
        anomalies_count: anomalies.len(),
    }
}

/// The last `window` readings, or all of them if there are fewer.
pub fn tail(series: &[Reading], window: usize) -> &[Reading] {
    &series[series.len().saturating_sub(window)..]
}

/// Mean over the last `window` readings, accumulated in f64.
pub fn window_mean(series: &[Reading], window: usize) -> Option<f64> {
    let recent = tail(series, window);
    if recent.is_empty() {
        return None;
    }
    let sum: f64 = recent.iter().map(|reading| reading.value as f64).sum();
    Some(sum / recent.len() as f64)
}

pub fn rolling_average(series: &[Reading], window: usize) -> Option<f32> {
    let recent = tail(series, window);
    if recent.is_empty() {
        return None;
    }
    let sum: f64 = recent.iter().map(|reading| reading.value as f64).sum();
    Some(sum as f32 / recent.len() as f32)
}

/// Reading with the largest value. NaN sorts above every number.
pub fn peak(series: &[Reading]) -> Option<&Reading> {
    series.iter().max_by(|a, b| a.value.total_cmp(&b.value))
}

/// Readings in the tail window lying more than `anomaly_sigma` population
/// standard deviations from the window mean.
pub fn detect_anomalies<'a>(series: &'a [Reading], config: &InsightConfig) -> Vec<&'a Reading> {
    if series.len() < config.anomaly_min_readings {
        return Vec::new();
    }

    let window = tail(series, config.anomaly_window);
    if window.is_empty() {
        return Vec::new();
    }
    let count = window.len() as f64;

    let mean = (window.iter().map(|r| r.value as f64).sum::<f64>() / count) as f32;
    let variance = (window
        .iter()
        .map(|r| {
            let deviation = r.value - mean;
            (deviation * deviation) as f64
        })
        .sum::<f64>()
        / count) as f32;
    let std = variance.sqrt();

    // Constant signals are never anomalous.
    if std == 0.0 {
        return Vec::new();
    }

    let upper = mean + config.anomaly_sigma * std;
    let lower = mean - config.anomaly_sigma * std;
    window
        .iter()
        .filter(|r| r.value > upper || r.value < lower)
        .collect()
}
