use std::{fmt::Display, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    insights::{self, InsightConfig},
    models::Reading,
};

use super::intent::QueryIntent;

pub const HELP_TEXT: &str = "I can answer: 'What was the peak reading?', \
    'Were there any anomalies?', 'What is the current average?'";
pub const NO_DATA_TEXT: &str = "No data yet.";
pub const NO_ANOMALIES_TEXT: &str = "No anomalies detected.";

/// Answer `question` against the selected region's buffer.
///
/// `series` must be empty when no region is selected.
pub fn answer(
    question: &str,
    selected_region: Option<&str>,
    series: &[Reading],
    config: &InsightConfig,
) -> String {
    match QueryIntent::classify(question) {
        QueryIntent::Peak => match insights::peak(series) {
            Some(max) => format!(
                "Peak reading: {} in {}",
                two_places(max.value),
                selected_region.unwrap_or_default()
            ),
            None => NO_DATA_TEXT.to_string(),
        },
        QueryIntent::Anomalies => {
            let anomalies = insights::detect_anomalies(series, config);
            if anomalies.is_empty() {
                NO_ANOMALIES_TEXT.to_string()
            } else {
                format!("Anomalies detected: {}", anomalies.len())
            }
        }
        QueryIntent::Average => match insights::window_mean(series, config.rolling_window) {
            Some(avg) => format!("Current rolling average: {}", two_places(avg)),
            None => NO_DATA_TEXT.to_string(),
        },
        QueryIntent::Unknown => HELP_TEXT.to_string(),
    }
}

/// Two decimal places, rounding the shortest decimal form of `value` half
/// away from zero. `1.005_f32` renders as "1.01", not "1.00".
fn two_places<T: Display>(value: T) -> String {
    let shortest = value.to_string();
    match Decimal::from_str(&shortest) {
        Ok(decimal) => {
            let rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        }
        // NaN, infinities and magnitudes beyond Decimal's range.
        Err(_) => match shortest.parse::<f64>() {
            Ok(parsed) => format!("{parsed:.2}"),
            Err(_) => shortest,
        },
    }
}
