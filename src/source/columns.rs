use serde::Serialize;

/// Column roles picked from the header and the first data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedColumns {
    pub region_index: usize,
    pub value_index: usize,
    /// `None` when no header cell looks like a time column.
    pub time_index: Option<usize>,
}

const TIME_HEADER_MARKERS: [&str; 3] = ["time", "date", "timestamp"];

/// Guess which columns hold the region, the value, and the time.
///
/// The time column is found by header name. Region and value come from the
/// sample row: the first numeric cell is the value, the first non-empty
/// non-numeric cell is the region. Missing roles fall back to region 0 and
/// value 1 (clamped to the sample row's last cell).
pub fn detect_columns<H, S>(header: &[H], sample_row: &[S]) -> DetectedColumns
where
    H: AsRef<str>,
    S: AsRef<str>,
{
    let time_index = header.iter().position(|cell| {
        let name = cell.as_ref().trim().to_lowercase();
        TIME_HEADER_MARKERS
            .iter()
            .any(|marker| name.contains(marker))
    });

    let mut region_index = None;
    let mut value_index = None;
    for (index, cell) in sample_row.iter().enumerate() {
        let cell = cell.as_ref().trim();
        let numeric = parse_value(cell).is_some();

        if numeric && value_index.is_none() {
            value_index = Some(index);
        }
        if !numeric && region_index.is_none() && !cell.is_empty() {
            region_index = Some(index);
        }
        if region_index.is_some() && value_index.is_some() {
            break;
        }
    }

    DetectedColumns {
        region_index: region_index.unwrap_or(0),
        value_index: value_index.unwrap_or_else(|| 1.min(sample_row.len().saturating_sub(1))),
        time_index,
    }
}

/// Numeric cell parsing shared by detection and row decoding.
pub(crate) fn parse_value(cell: &str) -> Option<f32> {
    cell.parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_region_value_and_time() {
        let columns = detect_columns(&["name", "time", "value"], &["Region", "timestamp", "12.5"]);
        assert_eq!(
            columns,
            DetectedColumns {
                region_index: 0,
                value_index: 2,
                time_index: Some(1),
            }
        );
    }

    #[test]
    fn time_header_match_is_case_insensitive() {
        let columns = detect_columns(
            &["Site", " Date Local ", "Mean"],
            &["Ames", "2021-01-01", "3.1"],
        );
        assert_eq!(columns.time_index, Some(1));
    }

    #[test]
    fn first_numeric_cell_wins_value() {
        let columns = detect_columns(&["a", "b", "c", "d"], &["1", "north", "2", "south"]);
        assert_eq!(columns.value_index, 0);
        assert_eq!(columns.region_index, 1);
        assert_eq!(columns.time_index, None);
    }

    #[test]
    fn empty_cells_are_not_regions() {
        let columns = detect_columns(&["a", "b", "c"], &["", " ", "east"]);
        assert_eq!(columns.region_index, 2);
    }

    #[test]
    fn falls_back_when_roles_are_missing() {
        let all_text = detect_columns(&["a", "b", "c"], &["x", "y", "z"]);
        assert_eq!(all_text.region_index, 0);
        assert_eq!(all_text.value_index, 1);

        let all_numbers = detect_columns(&["a", "b"], &["1", "2"]);
        assert_eq!(all_numbers.region_index, 0);
        assert_eq!(all_numbers.value_index, 0);

        let single_cell = detect_columns(&["a"], &["x"]);
        assert_eq!(single_cell.value_index, 0);
    }
}
