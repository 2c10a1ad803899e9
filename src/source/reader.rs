use std::{fs::File, io::Read, path::Path};

use csv::{ByteRecordsIntoIter, ReaderBuilder};

use crate::models::Reading;

use super::columns::{detect_columns, parse_value, DetectedColumns};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// A tabular dataset that can be turned into a stream of [`Reading`]s once.
///
/// Rows are split on commas with no quote handling and decoded as lossy
/// UTF-8. Blank lines are not rows. Any failure to open or read the dataset
/// degrades to an empty stream.
pub struct ReadingSource<R> {
    reader: Option<csv::Reader<R>>,
    label: String,
}

impl ReadingSource<File> {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                let mut source = Self::from_reader(file);
                source.label = path.display().to_string();
                source
            }
            Err(err) => {
                log_warn!("dataset {} unavailable, replaying nothing: {err}", path.display());
                Self::empty()
            }
        }
    }
}

impl<R: Read> ReadingSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        Self {
            reader: Some(reader),
            label: "<reader>".into(),
        }
    }

    pub fn empty() -> Self {
        Self {
            reader: None,
            label: "<empty>".into(),
        }
    }

    /// Read the header and first data row, detect column roles, and hand back
    /// the lazy reading stream. The first data row doubles as the detection
    /// sample and the first reading candidate.
    pub fn stream(self) -> Readings<R> {
        let Some(reader) = self.reader else {
            return Readings::exhausted();
        };

        let mut readings = Readings {
            records: Some(reader.into_byte_records()),
            columns: None,
            pending: None,
            next_index: 0,
        };

        let Some(header) = readings.next_row() else {
            log_warn!("dataset {} has no header row", self.label);
            return Readings::exhausted();
        };
        let Some(sample) = readings.next_row() else {
            log_warn!("dataset {} has no data rows", self.label);
            return Readings::exhausted();
        };

        let columns = detect_columns(&header, &sample);
        log_info!(
            "dataset {}: region column {}, value column {}, time column {:?}",
            self.label,
            columns.region_index,
            columns.value_index,
            columns.time_index
        );

        readings.columns = Some(columns);
        readings.pending = Some(sample);
        readings
    }
}

/// Lazy, finite sequence of readings from one [`ReadingSource`].
pub struct Readings<R> {
    records: Option<ByteRecordsIntoIter<R>>,
    columns: Option<DetectedColumns>,
    pending: Option<Vec<String>>,
    next_index: u64,
}

impl<R: Read> Readings<R> {
    fn exhausted() -> Self {
        Self {
            records: None,
            columns: None,
            pending: None,
            next_index: 0,
        }
    }

    pub fn columns(&self) -> Option<DetectedColumns> {
        self.columns
    }

    fn next_row(&mut self) -> Option<Vec<String>> {
        let records = self.records.as_mut()?;
        loop {
            match records.next()? {
                Ok(record) => {
                    return Some(
                        record
                            .iter()
                            .map(|field| String::from_utf8_lossy(field).into_owned())
                            .collect(),
                    )
                }
                Err(err) if err.is_io_error() => {
                    log_warn!("dataset read failed, ending stream: {err}");
                    self.records = None;
                    return None;
                }
                Err(err) => log_debug!("skipping undecodable record: {err}"),
            }
        }
    }
}

impl<R: Read> Iterator for Readings<R> {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        let columns = self.columns?;
        loop {
            let row = match self.pending.take() {
                Some(row) => row,
                None => self.next_row()?,
            };

            let sequence_index = self.next_index;
            self.next_index += 1;

            match parse_row(&row, &columns, sequence_index) {
                Some(reading) => return Some(reading),
                None => log_debug!("dropping row {sequence_index}: no numeric value"),
            }
        }
    }
}

fn parse_row(row: &[String], columns: &DetectedColumns, sequence_index: u64) -> Option<Reading> {
    if row.is_empty() {
        return None;
    }

    let value = parse_value(row.get(columns.value_index)?.trim())?;
    let region = row
        .get(columns.region_index)
        .map(|cell| cell.trim())
        .unwrap_or_default();
    let raw_timestamp = columns
        .time_index
        .and_then(|index| row.get(index))
        .map(|cell| cell.trim().to_owned());

    Some(Reading {
        sequence_index,
        region: region.to_owned(),
        value,
        raw_timestamp,
    })
}
