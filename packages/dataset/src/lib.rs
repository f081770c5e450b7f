#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loader for the disaster dashboard.
//!
//! Reads the cleaned event table (CSV) once at startup, coerces every cell
//! into typed values, and returns an immutable [`Dataset`]. The loader also
//! applies the taxonomy rules from the cleaning step so raw-labelled files
//! load to the same records: non-natural event types and rows without a
//! month are dropped, subtype labels are folded into their parent type,
//! and negative magnitude sentinels become missing values.

pub mod interactive;
pub mod parsing;
pub mod progress;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use disaster_dash_dataset_models::{Dataset, EventRecord};
use disaster_dash_disaster_models::{DisasterType, year_month_key};
use serde::Deserialize;
use thiserror::Error;

use crate::parsing::{Magnitude, parse_integral, parse_magnitude, parse_timestamp};
use crate::progress::ProgressCallback;

pub use disaster_dash_dataset_models as models;

/// Default location of the cleaned dataset, relative to the working
/// directory.
pub const DEFAULT_DATASET_PATH: &str = "data/cleaned_emdat.csv";

/// Environment variable overriding [`DEFAULT_DATASET_PATH`].
pub const DATASET_PATH_ENV: &str = "DISASTER_DASH_DATASET";

/// Column names the input file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "type",
    "iso",
    "country",
    "subregion",
    "region",
    "year",
    "month",
    "total_deaths",
    "total_affected",
    "total_damage",
    "last_update",
];

/// How often (in rows) the loader reports progress.
const PROGRESS_INTERVAL: usize = 1_000;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The input file couldn't be opened.
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a required column.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A row couldn't be coerced into an [`EventRecord`].
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// Every attempt to load the dataset failed.
    #[error("Gave up loading the dataset after {attempts} attempts (last path: {})", .path.display())]
    AttemptsExhausted {
        /// Number of load attempts made.
        attempts: u32,
        /// The last path tried.
        path: PathBuf,
    },
}

/// A row as it appears in the file, before coercion.
#[derive(Debug, Deserialize)]
struct RawRow {
    id: Option<String>,
    #[serde(rename = "type")]
    disaster_type: Option<String>,
    iso: Option<String>,
    country: Option<String>,
    subregion: Option<String>,
    region: Option<String>,
    year: Option<String>,
    month: Option<String>,
    total_deaths: Option<String>,
    total_affected: Option<String>,
    total_damage: Option<String>,
    last_update: Option<String>,
}

/// Counters describing what the loader discarded or coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows read from the file.
    pub rows_read: usize,
    /// Rows dropped because their type is not a natural disaster.
    pub excluded_type: usize,
    /// Rows dropped because the month was empty.
    pub missing_month: usize,
    /// Magnitude cells discarded as negative sentinels.
    pub sentinel_values: usize,
    /// Magnitude cells that weren't numeric.
    pub invalid_values: usize,
    /// Rows whose type label fell back to [`DisasterType::Other`].
    pub unmapped_type: usize,
}

/// Loads the dataset from a file on disk.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file can't be opened or any row fails
/// to parse.
pub fn load_from_path(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    log::info!("Loading dataset from {}", path.display());

    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if let Ok(meta) = file.metadata() {
        progress.set_total(meta.len());
    }

    load_from_reader(file, progress)
}

/// Loads the dataset from any CSV byte stream.
///
/// # Errors
///
/// Returns [`DatasetError`] if the header is missing a required column,
/// the CSV is malformed, or a row has an unparseable year or month.
pub fn load_from_reader<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for &column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn { column });
        }
    }

    progress.set_message("Reading events".to_string());

    let mut stats = LoadStats::default();
    let mut records = Vec::new();
    let mut line = csv::StringRecord::new();

    while reader.read_record(&mut line)? {
        stats.rows_read += 1;
        let row = stats.rows_read;
        let raw: RawRow = line.deserialize(Some(&headers))?;

        if let Some(record) = coerce_row(raw, row, &mut stats)? {
            records.push(record);
        }

        if row % PROGRESS_INTERVAL == 0 {
            progress.set_position(reader.position().byte());
        }
    }

    log_stats(&stats, records.len());
    progress.finish(format!("Loaded {} events", records.len()));

    Ok(Dataset::new(records))
}

/// Converts a raw row into a record, or `None` if the row is dropped.
fn coerce_row(
    raw: RawRow,
    row: usize,
    stats: &mut LoadStats,
) -> Result<Option<EventRecord>, DatasetError> {
    let type_label = raw.disaster_type.unwrap_or_default();
    if DisasterType::is_excluded_label(&type_label) {
        stats.excluded_type += 1;
        return Ok(None);
    }

    let Some(month_str) = raw.month.filter(|m| !m.trim().is_empty()) else {
        stats.missing_month += 1;
        return Ok(None);
    };

    let month = parse_integral(&month_str)
        .and_then(|m| u32::try_from(m).ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| DatasetError::InvalidRecord {
            row,
            message: format!("invalid month '{month_str}'"),
        })?;

    let year_str = raw.year.unwrap_or_default();
    let year = parse_integral(&year_str)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| DatasetError::InvalidRecord {
            row,
            message: format!("invalid year '{year_str}'"),
        })?;

    let disaster_type = DisasterType::from_label(&type_label);
    if disaster_type == DisasterType::Other {
        stats.unmapped_type += 1;
        log::warn!("Row {row}: unmapped disaster type '{type_label}', using Other");
    }

    let mut magnitude = |cell: Option<&str>, column: &str| {
        let parsed = parse_magnitude(cell);
        match parsed {
            Magnitude::Sentinel => stats.sentinel_values += 1,
            Magnitude::Invalid => {
                stats.invalid_values += 1;
                log::debug!("Row {row}: non-numeric {column} '{}'", cell.unwrap_or(""));
            }
            Magnitude::Value(_) | Magnitude::Missing => {}
        }
        parsed.into_option()
    };

    let total_deaths = magnitude(raw.total_deaths.as_deref(), "total_deaths");
    let total_affected = magnitude(raw.total_affected.as_deref(), "total_affected");
    let total_damage = magnitude(raw.total_damage.as_deref(), "total_damage");

    Ok(Some(EventRecord {
        id: raw.id.unwrap_or_default(),
        disaster_type,
        iso: raw.iso.unwrap_or_default(),
        country: raw.country.unwrap_or_default(),
        subregion: raw.subregion.unwrap_or_default(),
        region: raw.region.unwrap_or_default(),
        year,
        month,
        year_month: year_month_key(year, month),
        total_deaths,
        total_affected,
        total_damage,
        last_update: raw.last_update.as_deref().and_then(parse_timestamp),
    }))
}

fn log_stats(stats: &LoadStats, kept: usize) {
    log::info!(
        "Loaded {kept} events from {} rows ({} non-natural, {} without month dropped)",
        stats.rows_read,
        stats.excluded_type,
        stats.missing_month,
    );
    if stats.sentinel_values > 0 || stats.invalid_values > 0 {
        log::info!(
            "Treated {} sentinel and {} non-numeric magnitude cells as missing",
            stats.sentinel_values,
            stats.invalid_values,
        );
    }
    if stats.unmapped_type > 0 {
        log::warn!("{} rows had an unmapped disaster type", stats.unmapped_type);
    }
}

/// Resolves the dataset path from an explicit value, the
/// [`DATASET_PATH_ENV`] variable, or [`DEFAULT_DATASET_PATH`], in that
/// order.
#[must_use]
pub fn resolve_dataset_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            std::env::var(DATASET_PATH_ENV)
                .map_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    const HEADER: &str = "id,type,iso,country,subregion,region,year,month,total_deaths,total_affected,total_damage,last_update\n";

    fn load(body: &str) -> Result<Dataset, DatasetError> {
        let csv = format!("{HEADER}{body}");
        load_from_reader(csv.as_bytes(), &null_progress())
    }

    #[test]
    fn loads_typed_records() {
        let dataset = load(
            "2010-0001-KEN,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2010,4,100,2500,1200.5,2023-09-12 10:00:00\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.disaster_type, DisasterType::Flood);
        assert_eq!(record.year, 2010);
        assert_eq!(record.month, 4);
        assert_eq!(record.year_month, "2010/04");
        assert_eq!(record.total_deaths, Some(100.0));
        assert_eq!(record.total_affected, Some(2500.0));
        assert_eq!(record.total_damage, Some(1200.5));
        assert_eq!(
            record.last_update.unwrap().to_string(),
            "2023-09-12 10:00:00"
        );
    }

    #[test]
    fn accepts_float_formatted_integers() {
        let dataset =
            load("a,Storm,USA,United States,Northern America,Americas,2012.0,10.0,,,,\n").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.year, 2012);
        assert_eq!(record.month, 10);
    }

    #[test]
    fn missing_and_sentinel_magnitudes_become_none() {
        let dataset = load(
            "a,Drought,KEN,Kenya,Sub-Saharan Africa,Africa,2012,1,-1,,-1.0,\n",
        )
        .unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.total_deaths, None);
        assert_eq!(record.total_affected, None);
        assert_eq!(record.total_damage, None);
        assert_eq!(record.last_update, None);
    }

    #[test]
    fn drops_excluded_types_and_missing_months() {
        let dataset = load(
            "a,Epidemic,KEN,Kenya,Sub-Saharan Africa,Africa,2012,1,5,,,\n\
             b,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2012,,5,,,\n\
             c,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2012,3,5,,,\n",
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].id, "c");
    }

    #[test]
    fn normalizes_and_degrades_type_labels() {
        let dataset = load(
            "a,Glacial lake outburst flood,NPL,Nepal,Southern Asia,Asia,2012,5,,,,\n\
             b,Solar flare,NPL,Nepal,Southern Asia,Asia,2012,5,,,,\n",
        )
        .unwrap();
        assert_eq!(dataset.records()[0].disaster_type, DisasterType::Flood);
        assert_eq!(dataset.records()[1].disaster_type, DisasterType::Other);
    }

    #[test]
    fn rejects_invalid_month() {
        let err = load("a,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2012,13,,,,\n").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn rejects_invalid_year() {
        let err = load(
            "a,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,2012,3,,,,\n\
             b,Flood,KEN,Kenya,Sub-Saharan Africa,Africa,soon,3,,,,\n",
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRecord { row: 2, .. }));
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "id,type,iso\na,Flood,KEN\n";
        let err = load_from_reader(csv.as_bytes(), &null_progress()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { column: "country" }
        ));
    }

    #[test]
    fn empty_file_with_header_loads_empty_dataset() {
        let dataset = load("").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("disaster_dash_does_not_exist.csv");
        let err = load_from_path(&path, &null_progress()).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_dataset_path(Some(Path::new("custom.csv")));
        assert_eq!(path, PathBuf::from("custom.csv"));
    }
}
