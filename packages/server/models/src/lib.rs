#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the disaster dashboard server.
//!
//! Dashboard responses reuse the analytics models directly; this crate
//! only holds the shapes that are specific to the HTTP surface, such as
//! the flat query-string form of [`FilterParams`].

use disaster_dash_analytics_models::{FilterParams, Selection};
use disaster_dash_disaster_models::DisasterType;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of records in the loaded dataset.
    pub records: usize,
}

/// A disaster type with its numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDisasterType {
    /// Display name.
    pub name: String,
    /// Numeric code (`0` for `Other`).
    pub code: u8,
}

impl From<DisasterType> for ApiDisasterType {
    fn from(value: DisasterType) -> Self {
        Self {
            name: value.to_string(),
            code: value.code(),
        }
    }
}

/// Error body returned by failing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// Query parameters for `GET /api/dashboard`.
///
/// List-valued filters are comma-separated. A single entry filters by
/// equality, several by membership.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Continent name(s).
    pub continent: Option<String>,
    /// Subregion name(s).
    pub subregion: Option<String>,
    /// Country name(s).
    pub country: Option<String>,
    /// First year of the range (inclusive).
    pub year_from: Option<i32>,
    /// Last year of the range (inclusive).
    pub year_to: Option<i32>,
    /// Month code(s), 1-12.
    pub month: Option<String>,
    /// Disaster type name(s).
    pub types: Option<String>,
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn selection<T>(mut values: Vec<T>) -> Option<Selection<T>> {
    match values.len() {
        0 => None,
        1 => values.pop().map(Selection::One),
        _ => Some(Selection::Many(values)),
    }
}

impl DashboardQueryParams {
    /// Converts the flat query-string form into [`FilterParams`].
    ///
    /// Empty list entries and unparseable month codes are dropped, and labels
    /// that normalize to the same disaster type are kept once. When only
    /// one end of the year range is given, the range covers that single
    /// year.
    #[must_use]
    pub fn into_filter_params(self) -> FilterParams {
        let strings = |raw: Option<&str>| {
            selection(
                split_list(raw)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect(),
            )
        };

        let year_range = match (self.year_from, self.year_to) {
            (Some(from), Some(to)) => Some([from, to]),
            (Some(year), None) | (None, Some(year)) => Some([year, year]),
            (None, None) => None,
        };

        FilterParams {
            continent: strings(self.continent.as_deref()),
            subregion: strings(self.subregion.as_deref()),
            country: strings(self.country.as_deref()),
            year_range,
            month: selection(
                split_list(self.month.as_deref())
                    .into_iter()
                    .filter_map(|m| m.parse().ok())
                    .collect(),
            ),
            disaster_types: split_list(self.types.as_deref()).into_iter().fold(
                Vec::new(),
                |mut types, label| {
                    let kind = DisasterType::from_label(label);
                    if !types.contains(&kind) {
                        types.push(kind);
                    }
                    types
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_values_become_equality_filters() {
        let params = DashboardQueryParams {
            continent: Some("Africa".to_string()),
            year_from: Some(2010),
            year_to: Some(2012),
            month: Some("4".to_string()),
            ..DashboardQueryParams::default()
        }
        .into_filter_params();

        assert_eq!(params.continent, Some(Selection::One("Africa".to_string())));
        assert_eq!(params.year_range, Some([2010, 2012]));
        assert_eq!(params.month, Some(Selection::One(4)));
        assert_eq!(params.country, None);
        assert!(params.disaster_types.is_empty());
    }

    #[test]
    fn comma_lists_become_membership_filters() {
        let params = DashboardQueryParams {
            country: Some("Kenya, Chad,".to_string()),
            month: Some("3,x,4".to_string()),
            types: Some("Flood,storm,Glacial lake outburst flood".to_string()),
            ..DashboardQueryParams::default()
        }
        .into_filter_params();

        assert_eq!(
            params.country,
            Some(Selection::Many(vec!["Kenya".to_string(), "Chad".to_string()]))
        );
        assert_eq!(params.month, Some(Selection::Many(vec![3, 4])));
        assert_eq!(
            params.disaster_types,
            vec![DisasterType::Flood, DisasterType::Storm]
        );
    }

    #[test]
    fn blank_parameters_impose_nothing() {
        let params = DashboardQueryParams {
            continent: Some(String::new()),
            subregion: Some(" , ".to_string()),
            types: Some(String::new()),
            ..DashboardQueryParams::default()
        }
        .into_filter_params();

        assert_eq!(params, FilterParams::default());
    }

    #[test]
    fn half_open_year_range_is_one_year() {
        let params = DashboardQueryParams {
            year_to: Some(2015),
            ..DashboardQueryParams::default()
        }
        .into_filter_params();
        assert_eq!(params.year_range, Some([2015, 2015]));
    }

    #[test]
    fn disaster_type_serializes_with_code() {
        let json =
            serde_json::to_string(&ApiDisasterType::from(DisasterType::MassMovement)).unwrap();
        assert_eq!(json, r#"{"name":"Mass movement","code":8}"#);
    }
}
