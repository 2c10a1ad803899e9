use serde::{Deserialize, Serialize};

/// One numeric observation for a region, produced from a single dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Position of the source row among the dataset's data rows.
    pub sequence_index: u64,
    /// Grouping key. Empty when the row had no region cell.
    pub region: String,
    pub value: f32,
    pub raw_timestamp: Option<String>,
}

impl Reading {
    pub fn new(sequence_index: u64, region: impl Into<String>, value: f32) -> Self {
        Self {
            sequence_index,
            region: region.into(),
            value,
            raw_timestamp: None,
        }
    }
}
