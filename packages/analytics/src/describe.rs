//! Human-readable titles and compact numbers.

use std::fmt::Write as _;

use disaster_dash_analytics_models::NOT_AVAILABLE;
use disaster_dash_disaster_models::{DisasterType, month_name};

/// Drops repeated entries, keeping first-seen order.
fn distinct<T: Copy + PartialEq>(values: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for &v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

fn month_label(code: u32) -> String {
    month_name(code).map_or_else(|| format!("month {code}"), ToString::to_string)
}

/// Builds a chart or map title for the current selection.
///
/// `base` is prefixed verbatim, followed by the type phrase, then the year
/// phrase, then the month phrase. Repeated types or months count once:
///
/// ```
/// use disaster_dash_analytics::describe_selection;
/// use disaster_dash_disaster_models::DisasterType;
///
/// let title = describe_selection(
///     "Trends of ",
///     &[DisasterType::Flood, DisasterType::Storm],
///     Some([2010, 2010]),
///     &[],
/// );
/// assert_eq!(title, "Trends of Flood and Storm in 2010");
/// ```
#[must_use]
pub fn describe_selection(
    base: &str,
    types: &[DisasterType],
    year_range: Option<[i32; 2]>,
    months: &[u32],
) -> String {
    let mut out = String::from(base);

    match distinct(types).as_slice() {
        [only] => {
            let _ = write!(out, "{only}");
        }
        [a, b] => {
            let _ = write!(out, "{a} and {b}");
        }
        _ => out.push_str("disasters"),
    }

    match year_range {
        Some([from, to]) if from == to => {
            let _ = write!(out, " in {from}");
        }
        Some([from, to]) => {
            let _ = write!(out, " from {from} to {to}");
        }
        None => {}
    }

    match distinct(months).as_slice() {
        [] => {}
        [only] => {
            let _ = write!(out, " in {}", month_label(*only));
        }
        [a, b] => {
            let _ = write!(out, " in {} and {}", month_label(*a), month_label(*b));
        }
        _ => out.push_str(" in selected months"),
    }

    out
}

/// Formats a magnitude compactly (`999`, `1.2K`, `3.4M`, `5.6B`).
///
/// Suffix thresholds apply to the raw value, so `999_999` renders as
/// `1000.0K`. Missing or NaN values render as `N/A`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_magnitude(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return NOT_AVAILABLE.to_string();
    };

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if abs < 1_000.0 {
        format!("{sign}{}", abs.trunc() as i64)
    } else if abs < 1_000_000.0 {
        format!("{sign}{:.1}K", abs / 1e3)
    } else if abs < 1_000_000_000.0 {
        format!("{sign}{:.1}M", abs / 1e6)
    } else {
        format!("{sign}{:.1}B", abs / 1e9)
    }
}
