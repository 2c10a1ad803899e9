pub mod config;
pub mod engine;

pub use config::InsightConfig;
pub use engine::{detect_anomalies, peak, recompute, rolling_average, summarize, window_mean};
