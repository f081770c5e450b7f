//! Type coercion for raw spreadsheet cells.
//!
//! Spreadsheet exports are loose about numeric formatting: integer columns
//! often arrive as `"2010.0"`, and missing magnitudes are either empty or
//! the `-1` sentinel written by older cleaning runs. Everything here maps
//! those shapes onto typed values.

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp layouts accepted for the `last_update` column.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses an integral cell, accepting a trailing `.0` (e.g. `"2010.0"`).
///
/// Returns `None` for empty, non-numeric, or fractional input.
#[must_use]
pub fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        #[allow(clippy::cast_possible_truncation)]
        Some(f as i64)
    } else {
        None
    }
}

/// Outcome of coercing a magnitude cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    /// A usable non-negative value.
    Value(f64),
    /// The cell was empty.
    Missing,
    /// The cell held a negative number (the `-1` sentinel) and was
    /// discarded.
    Sentinel,
    /// The cell wasn't a number at all.
    Invalid,
}

impl Magnitude {
    /// Collapses the outcome into the stored value.
    #[must_use]
    pub const fn into_option(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Sentinel | Self::Invalid => None,
        }
    }
}

/// Coerces a magnitude cell (deaths, affected, damage).
///
/// Missing values become `None` so that sums skip them. Negative numbers
/// are treated as missing too.
#[must_use]
pub fn parse_magnitude(s: Option<&str>) -> Magnitude {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Magnitude::Missing;
    };
    match s.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_nan() => Magnitude::Missing,
        Ok(v) if v < 0.0 => Magnitude::Sentinel,
        Ok(v) => Magnitude::Value(v),
        Err(_) => Magnitude::Invalid,
    }
}

/// Parses a `last_update` timestamp. Date-only values map to midnight.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
