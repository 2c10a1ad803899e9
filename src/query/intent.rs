use serde::Serialize;

/// What a free-text question is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryIntent {
    Peak,
    Anomalies,
    Average,
    Unknown,
}

// Checked in order; the first intent with a matching keyword wins.
const KEYWORDS: [(QueryIntent, &[&str]); 3] = [
    (QueryIntent::Peak, &["peak", "max"]),
    (QueryIntent::Anomalies, &["anomal", "alert"]),
    (QueryIntent::Average, &["average", "avg", "mean"]),
];

impl QueryIntent {
    pub fn classify(question: &str) -> Self {
        let question = question.trim().to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|word| question.contains(word)))
            .map(|(intent, _)| *intent)
            .unwrap_or(QueryIntent::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_intent() {
        assert_eq!(QueryIntent::classify("What was the PEAK reading?"), QueryIntent::Peak);
        assert_eq!(QueryIntent::classify("max?"), QueryIntent::Peak);
        assert_eq!(QueryIntent::classify("Were there any anomalies?"), QueryIntent::Anomalies);
        assert_eq!(QueryIntent::classify("any alerts"), QueryIntent::Anomalies);
        assert_eq!(QueryIntent::classify("  Mean value  "), QueryIntent::Average);
        assert_eq!(QueryIntent::classify("hello"), QueryIntent::Unknown);
    }

    #[test]
    fn earlier_intents_take_priority() {
        assert_eq!(QueryIntent::classify("average of the max"), QueryIntent::Peak);
        assert_eq!(QueryIntent::classify("mean anomaly"), QueryIntent::Anomalies);
    }
}
