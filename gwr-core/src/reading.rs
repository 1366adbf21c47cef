use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use gwr_utils::dates::{format_date, parse_timestamp};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Expected columns of a readings CSV, in order.
pub const CSV_HEADER: [&str; 5] = ["station_id", "timestamp", "depth_m", "quality_flag", "source"];

/// Errors that can occur when parsing readings.
#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("Failed to parse readings CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: missing column '{column}'")]
    MissingColumn { line: u64, column: &'static str },

    #[error("Line {line}: {source}")]
    Timestamp {
        line: u64,
        source: gwr_utils::error::DateError,
    },

    #[error("Line {line}: invalid depth '{value}'")]
    Depth { line: u64, value: String },
}

/// A single groundwater depth measurement from a monitoring station.
///
/// `depth_m` is meters below ground surface, so a larger value means a drier
/// well. A reading may arrive without a depth (sensor gap); such readings are
/// kept in the series but never take part in arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub station_id: String,
    pub timestamp: NaiveDateTime,
    pub depth_m: Option<f64>,
    pub quality_flag: Option<String>,
    pub source: Option<String>,
}

impl Reading {
    pub fn new(station_id: impl Into<String>, timestamp: NaiveDateTime, depth_m: f64) -> Self {
        Reading {
            station_id: station_id.into(),
            timestamp,
            depth_m: Some(depth_m),
            quality_flag: None,
            source: None,
        }
    }

    /// The depth if it is present and finite.
    pub fn usable_depth(&self) -> Option<f64> {
        self.depth_m.filter(|d| d.is_finite())
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth_m {
            Some(depth) => write!(
                f,
                "Reading({}, {}, {}m)",
                self.station_id,
                format_date(&self.timestamp),
                depth
            ),
            None => write!(
                f,
                "Reading({}, {}, -)",
                self.station_id,
                format_date(&self.timestamp)
            ),
        }
    }
}

fn optional_cell(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn required_cell<'r>(
    record: &'r StringRecord,
    idx: usize,
    line: u64,
) -> Result<&'r str, ReadingError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ReadingError::MissingColumn {
            line,
            column: CSV_HEADER[idx],
        })
}

impl Reading {
    fn from_record(record: &StringRecord, line: u64) -> Result<Reading, ReadingError> {
        let station_id = required_cell(record, 0, line)?.to_string();
        let timestamp = parse_timestamp(required_cell(record, 1, line)?)
            .map_err(|source| ReadingError::Timestamp { line, source })?;
        let depth_m = match optional_cell(record, 2) {
            None => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(depth) => Some(depth),
                Err(_) => return Err(ReadingError::Depth { line, value: raw }),
            },
        };
        Ok(Reading {
            station_id,
            timestamp,
            depth_m,
            quality_flag: optional_cell(record, 3),
            source: optional_cell(record, 4),
        })
    }
}

/// Parse a readings CSV body into Readings.
///
/// The first row is a header (`station_id,timestamp,depth_m,quality_flag,source`);
/// the last two columns may be omitted. An empty depth cell is a missing depth.
pub fn parse_readings_csv(csv_body: &str) -> Result<Vec<Reading>, ReadingError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_body.as_bytes());
    let mut readings = Vec::new();
    for row in rdr.records() {
        let record = row?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        readings.push(Reading::from_record(&record, line)?);
    }
    debug!("Parsed {} readings", readings.len());
    Ok(readings)
}

/// Group a flat list of readings by station_id, keeping each station's
/// readings in input order.
pub fn group_by_station(readings: Vec<Reading>) -> BTreeMap<String, Vec<Reading>> {
    let mut result: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
    for reading in readings {
        result
            .entry(reading.station_id.clone())
            .or_default()
            .push(reading);
    }
    result
}

/// Borrow a series in ascending timestamp order. The sort is stable, so
/// readings sharing a timestamp keep their input order.
pub fn sorted_by_timestamp(series: &[Reading]) -> Vec<&Reading> {
    let mut sorted: Vec<&Reading> = series.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);
    sorted
}
