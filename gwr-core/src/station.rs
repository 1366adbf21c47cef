use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Failed to parse station CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: missing {column}")]
    MissingColumn { line: u64, column: &'static str },

    #[error("Line {line}: invalid {column} '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// A groundwater monitoring well (digital water level recorder site).
///
/// Only `station_id` and `name` are mandatory; registries exported from
/// different agencies are often missing location or elevation metadata.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Agency station identifier (e.g., "DWLR-014")
    pub station_id: String,
    /// Human-readable name of the well
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    pub district: Option<String>,
    pub state: Option<String>,
    /// Ground elevation of the well head in meters
    pub elevation_m: Option<f64>,
    pub description: Option<String>,
}

fn text(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn number(
    record: &StringRecord,
    idx: usize,
    line: u64,
    column: &'static str,
) -> Result<Option<f64>, StationError> {
    match text(record, idx) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| StationError::InvalidNumber { line, column, value }),
    }
}

impl Station {
    /// Parse a CSV string of station metadata into a vector of Stations.
    ///
    /// Expected CSV columns: station_id, name, latitude, longitude, district,
    /// state, elevation_m, description. Trailing columns may be omitted.
    pub fn parse_station_csv(csv_object: &str) -> Result<Vec<Station>, StationError> {
        let mut station_list: Vec<Station> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let station_id = text(&record, 0).ok_or(StationError::MissingColumn {
                line,
                column: "station_id",
            })?;
            let name = text(&record, 1).ok_or(StationError::MissingColumn {
                line,
                column: "name",
            })?;
            let station = Station {
                station_id,
                name,
                latitude: number(&record, 2, line, "latitude")?,
                longitude: number(&record, 3, line, "longitude")?,
                district: text(&record, 4),
                state: text(&record, 5),
                elevation_m: number(&record, 6, line, "elevation_m")?,
                description: text(&record, 7),
            };
            station_list.push(station);
        }
        Ok(station_list)
    }
}

/// Looks up a station by id. Returns `None` if not found.
pub fn find_station<'a>(stations: &'a [Station], station_id: &str) -> Option<&'a Station> {
    stations.iter().find(|s| s.station_id == station_id)
}
