#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the disaster dashboard analytics.
//!
//! [`FilterParams`] is the shape the UI sends on every interaction;
//! [`DashboardResponse`] and its parts are what the analytics engine hands
//! back. Map layer definitions ([`LayerDefinition`]) describe how a grouped
//! aggregate is binned into severity categories.

use std::borrow::Borrow;

use disaster_dash_dataset_models::{GroupColumn, ValueColumn};
use disaster_dash_disaster_models::DisasterType;
use serde::{Deserialize, Serialize};

/// Placeholder shown wherever an aggregate has no data.
pub const NOT_AVAILABLE: &str = "N/A";

/// Labels used by layers that don't configure their own.
pub const DEFAULT_BIN_LABELS: &[&str] = &["Very low", "Low", "Moderate", "High", "Very high"];

/// Values that can be "blank", i.e. present but meaning "no filter".
pub trait Blank {
    /// Returns `true` if this value imposes no constraint.
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for u32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

/// A single value or a list of values to match against.
///
/// A single value filters by equality, a list by membership. Blank
/// entries are ignored, so an empty string or an empty list means "no
/// filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection<T> {
    /// Exactly one value.
    One(T),
    /// Any of several values.
    Many(Vec<T>),
}

impl<T: Blank> Selection<T> {
    /// Returns `true` if this selection constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::One(v) => !v.is_blank(),
            Self::Many(vs) => vs.iter().any(|v| !v.is_blank()),
        }
    }

    /// The non-blank values in this selection.
    #[must_use]
    pub fn values(&self) -> Vec<&T> {
        match self {
            Self::One(v) => std::iter::once(v).filter(|v| !v.is_blank()).collect(),
            Self::Many(vs) => vs.iter().filter(|v| !v.is_blank()).collect(),
        }
    }

    /// Returns `true` if `value` is selected.
    ///
    /// An inactive selection matches everything.
    #[must_use]
    pub fn matches<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        if !self.is_active() {
            return true;
        }
        match self {
            Self::One(v) => <T as Borrow<Q>>::borrow(v) == value,
            Self::Many(vs) => vs
                .iter()
                .filter(|v| !v.is_blank())
                .any(|v| <T as Borrow<Q>>::borrow(v) == value),
        }
    }
}

impl From<&str> for Selection<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for Selection<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<&str>> for Selection<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(ToString::to_string).collect())
    }
}

impl From<u32> for Selection<u32> {
    fn from(value: u32) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for Selection<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// User-selected filters for one dashboard interaction.
///
/// Every field is optional; absent or blank fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    /// Region / continent name(s).
    pub continent: Option<Selection<String>>,
    /// Subregion name(s).
    pub subregion: Option<Selection<String>>,
    /// Country name(s).
    pub country: Option<Selection<String>>,
    /// Inclusive `[from, to]` year range.
    pub year_range: Option<[i32; 2]>,
    /// Month code(s), 1-12.
    pub month: Option<Selection<u32>>,
    /// Disaster types to include; empty means all.
    pub disaster_types: Vec<DisasterType>,
}

impl FilterParams {
    /// Restricts to one or more continents.
    #[must_use]
    pub fn with_continent(mut self, continent: impl Into<Selection<String>>) -> Self {
        self.continent = Some(continent.into());
        self
    }

    /// Restricts to one or more subregions.
    #[must_use]
    pub fn with_subregion(mut self, subregion: impl Into<Selection<String>>) -> Self {
        self.subregion = Some(subregion.into());
        self
    }

    /// Restricts to one or more countries.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<Selection<String>>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Restricts to an inclusive year range.
    #[must_use]
    pub const fn with_year_range(mut self, from: i32, to: i32) -> Self {
        self.year_range = Some([from, to]);
        self
    }

    /// Restricts to one or more months.
    #[must_use]
    pub fn with_month(mut self, month: impl Into<Selection<u32>>) -> Self {
        self.month = Some(month.into());
        self
    }

    /// Restricts to a set of disaster types.
    #[must_use]
    pub fn with_types(mut self, types: Vec<DisasterType>) -> Self {
        self.disaster_types = types;
        self
    }

    /// The selected month codes, in selection order.
    #[must_use]
    pub fn selected_months(&self) -> Vec<u32> {
        self.month
            .as_ref()
            .map(|m| m.values().into_iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Total of a magnitude column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    /// Group key, one element per grouping column.
    pub key: Vec<String>,
    /// Sum of the non-missing values in the group.
    pub total: f64,
    /// Number of records in the group.
    pub count: u64,
}

/// Number of records within one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    /// Group key, one element per grouping column.
    pub key: Vec<String>,
    /// Number of records.
    pub count: u64,
}

/// What a map layer measures per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerMetric {
    /// Number of events.
    Count,
    /// Sum of a magnitude column.
    Sum(ValueColumn),
}

/// How severity bin boundaries are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Fixed ascending upper bounds.
    Fixed {
        /// Upper bound of every bin except the last.
        bounds: Vec<f64>,
    },
    /// Bounds scaled from the mean or median of the current values.
    Adaptive {
        /// Factors applied to the anchor value, ascending.
        multipliers: Vec<f64>,
        /// When `mean > skew_ratio * median` the median is used as the
        /// anchor instead of the mean.
        #[serde(default = "default_skew_ratio")]
        skew_ratio: f64,
    },
}

impl ThresholdPolicy {
    /// Number of bounds this policy produces.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        match self {
            Self::Fixed { bounds } => bounds.len(),
            Self::Adaptive { multipliers, .. } => multipliers.len(),
        }
    }
}

const fn default_skew_ratio() -> f64 {
    2.0
}

fn default_labels() -> Vec<String> {
    DEFAULT_BIN_LABELS.iter().map(ToString::to_string).collect()
}

/// A categorized map layer as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LayerDefinition {
    /// Stable identifier (e.g. `"total_damage"`).
    pub id: String,
    /// Title prefix passed to the header formatter.
    pub title: String,
    /// What is measured per group.
    pub metric: LayerMetric,
    /// Grouping columns (e.g. `["iso", "country"]`).
    pub group_by: Vec<GroupColumn>,
    /// Ordered category labels, lowest severity first.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    /// Threshold selection policy.
    pub policy: ThresholdPolicy,
}

/// One group after binning, or a zero-weight placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedEntry {
    /// Group key (empty for placeholders).
    pub key: Vec<String>,
    /// Aggregate value (zero for placeholders).
    pub value: f64,
    /// Index into the layer's label list.
    pub category: usize,
    /// Category label.
    pub label: String,
    /// `false` for placeholders inserted to keep the legend complete.
    pub is_real: bool,
}

/// A categorized map dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    /// Layer identifier.
    pub id: String,
    /// Human-readable title for the current selection.
    pub title: String,
    /// Ordered category labels.
    pub labels: Vec<String>,
    /// Bin upper bounds used for this render (empty when no data).
    pub thresholds: Vec<f64>,
    /// Entries in category order.
    pub entries: Vec<CategorizedEntry>,
}

/// A point in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// X-axis label (e.g. a year).
    pub x: String,
    /// Series name for multi-series charts (e.g. a disaster type).
    pub series: Option<String>,
    /// Y value.
    pub value: f64,
}

/// A grouped chart dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Chart identifier.
    pub id: String,
    /// Human-readable title for the current selection.
    pub title: String,
    /// Data points ordered by x then series.
    pub points: Vec<SeriesPoint>,
}

/// Scalar statistics shown on the summary cards, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCards {
    /// Total deaths.
    pub total_deaths: String,
    /// Total people affected.
    pub total_affected: String,
    /// Total damage in US dollars.
    pub total_damage: String,
    /// Number of disasters in the view.
    pub disaster_count: String,
    /// Country with the most deaths.
    pub country_most_deaths: String,
    /// Country with the most people affected.
    pub most_affected_country: String,
    /// Country with the highest damage.
    pub most_damaged_country: String,
    /// Latest `last_update` in the view.
    pub last_updated: String,
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Number of records in the filtered view.
    pub record_count: usize,
    /// Summary cards.
    pub cards: StatCards,
    /// Categorized map layers.
    pub maps: Vec<MapLayer>,
    /// Grouped chart series.
    pub charts: Vec<ChartSeries>,
}

/// A country entry in the area picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubregionOption {
    /// Subregion name.
    pub name: String,
    /// Countries in this subregion, sorted.
    pub countries: Vec<String>,
}

/// A region entry in the area picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionOption {
    /// Region name.
    pub name: String,
    /// Subregions in this region, sorted.
    pub subregions: Vec<SubregionOption>,
}

/// A month entry in the time picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOption {
    /// Month code (1-12).
    pub code: u32,
    /// Month name.
    pub name: String,
}

/// Values available to the selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Region → subregion → country hierarchy.
    pub regions: Vec<RegionOption>,
    /// Disaster types present in the dataset.
    pub disaster_types: Vec<DisasterType>,
    /// Earliest year in the dataset.
    pub year_min: Option<i32>,
    /// Latest year in the dataset.
    pub year_max: Option<i32>,
    /// All months.
    pub months: Vec<MonthOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_list_selections_deserialize() {
        let params: FilterParams = serde_json::from_str(
            r#"{"continent":"Africa","country":["Kenya","Chad"],"yearRange":[2010,2012],"month":3,"disasterTypes":["Flood","Storm"]}"#,
        )
        .unwrap();

        assert_eq!(params.continent, Some(Selection::One("Africa".to_string())));
        assert_eq!(
            params.country,
            Some(Selection::Many(vec!["Kenya".to_string(), "Chad".to_string()]))
        );
        assert_eq!(params.year_range, Some([2010, 2012]));
        assert_eq!(params.month, Some(Selection::One(3)));
        assert_eq!(
            params.disaster_types,
            vec![DisasterType::Flood, DisasterType::Storm]
        );
        assert_eq!(params.subregion, None);
    }

    #[test]
    fn empty_request_is_default() {
        let params: FilterParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, FilterParams::default());
    }

    #[test]
    fn blank_selections_are_inactive() {
        assert!(!Selection::One(String::new()).is_active());
        assert!(!Selection::<String>::Many(vec![]).is_active());
        assert!(!Selection::One(0u32).is_active());
        assert!(Selection::One("Asia".to_string()).is_active());
    }

    #[test]
    fn selection_matching() {
        let one = Selection::One("Africa".to_string());
        assert!(one.matches("Africa"));
        assert!(!one.matches("Asia"));

        let many = Selection::Many(vec!["Kenya".to_string(), String::new()]);
        assert!(many.matches("Kenya"));
        assert!(!many.matches(""));

        let blank = Selection::One(String::new());
        assert!(blank.matches("anything"));
    }

    #[test]
    fn selected_months_skip_blanks() {
        let params = FilterParams::default().with_month(vec![0u32, 3, 7]);
        assert_eq!(params.selected_months(), vec![3, 7]);
    }

    #[test]
    fn layer_definition_defaults_labels() {
        let def: LayerDefinition = serde_json::from_str(
            r#"{"id":"x","title":"X","metric":"count","group_by":["country"],"policy":{"kind":"fixed","bounds":[1,2,3,4]}}"#,
        )
        .unwrap();
        assert_eq!(def.labels.len(), DEFAULT_BIN_LABELS.len());
        assert_eq!(def.policy.bound_count(), 4);
    }
}
