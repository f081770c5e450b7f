#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory disaster event table types.
//!
//! A [`Dataset`] is built once at startup and never mutated afterwards.
//! Every filter produces a [`FilteredView`] that borrows rows from the
//! dataset, so views are cheap and can't outlive the table they came
//! from.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use disaster_dash_disaster_models::{DisasterType, year_month_key};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One disaster occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Source identifier (e.g. `"2010-0123-KEN"`).
    pub id: String,
    /// Normalized disaster type.
    pub disaster_type: DisasterType,
    /// ISO 3166-1 alpha-3 country code.
    pub iso: String,
    /// Country name.
    pub country: String,
    /// Subregion name (e.g. "Eastern Africa").
    pub subregion: String,
    /// Region / continent name (e.g. "Africa").
    pub region: String,
    /// Start year.
    pub year: i32,
    /// Start month (1-12).
    pub month: u32,
    /// Derived `"YYYY/MM"` key.
    pub year_month: String,
    /// Number of deaths, `None` when not reported.
    pub total_deaths: Option<f64>,
    /// Number of people affected, `None` when not reported.
    pub total_affected: Option<f64>,
    /// Adjusted damage in thousands of US dollars, `None` when not reported.
    pub total_damage: Option<f64>,
    /// When the source row was last updated.
    pub last_update: Option<NaiveDateTime>,
}

impl EventRecord {
    /// Creates a record with no magnitudes or timestamp, deriving the
    /// `year_month` key.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        disaster_type: DisasterType,
        iso: impl Into<String>,
        country: impl Into<String>,
        subregion: impl Into<String>,
        region: impl Into<String>,
        year: i32,
        month: u32,
    ) -> Self {
        Self {
            id: id.into(),
            disaster_type,
            iso: iso.into(),
            country: country.into(),
            subregion: subregion.into(),
            region: region.into(),
            year,
            month,
            year_month: year_month_key(year, month),
            total_deaths: None,
            total_affected: None,
            total_damage: None,
            last_update: None,
        }
    }

    /// Sets the number of deaths.
    #[must_use]
    pub const fn with_deaths(mut self, deaths: f64) -> Self {
        self.total_deaths = Some(deaths);
        self
    }

    /// Sets the number of people affected.
    #[must_use]
    pub const fn with_affected(mut self, affected: f64) -> Self {
        self.total_affected = Some(affected);
        self
    }

    /// Sets the adjusted damage (thousands of US dollars).
    #[must_use]
    pub const fn with_damage(mut self, damage: f64) -> Self {
        self.total_damage = Some(damage);
        self
    }

    /// Sets the last-update timestamp.
    #[must_use]
    pub const fn with_last_update(mut self, at: NaiveDateTime) -> Self {
        self.last_update = Some(at);
        self
    }

    /// Returns the magnitude stored in `column`.
    #[must_use]
    pub const fn value(&self, column: ValueColumn) -> Option<f64> {
        match column {
            ValueColumn::TotalDeaths => self.total_deaths,
            ValueColumn::TotalAffected => self.total_affected,
            ValueColumn::TotalDamage => self.total_damage,
        }
    }

    /// Returns the grouping key stored in `column`.
    #[must_use]
    pub fn group_value(&self, column: GroupColumn) -> Cow<'_, str> {
        match column {
            GroupColumn::Region => Cow::Borrowed(&self.region),
            GroupColumn::Subregion => Cow::Borrowed(&self.subregion),
            GroupColumn::Country => Cow::Borrowed(&self.country),
            GroupColumn::Iso => Cow::Borrowed(&self.iso),
            GroupColumn::Year => Cow::Owned(self.year.to_string()),
            GroupColumn::Month => Cow::Owned(self.month.to_string()),
            GroupColumn::YearMonth => Cow::Borrowed(&self.year_month),
            GroupColumn::Type => Cow::Borrowed(self.disaster_type.as_ref()),
        }
    }
}

/// Categorical columns usable as grouping keys.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupColumn {
    /// Region / continent.
    Region,
    /// Subregion.
    Subregion,
    /// Country name.
    Country,
    /// ISO country code.
    Iso,
    /// Start year.
    Year,
    /// Start month.
    Month,
    /// `"YYYY/MM"` key.
    YearMonth,
    /// Disaster type.
    Type,
}

/// Numeric magnitude columns usable in reductions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueColumn {
    /// Number of deaths.
    TotalDeaths,
    /// Number of people affected.
    TotalAffected,
    /// Adjusted damage in thousands of US dollars.
    TotalDamage,
}

/// The immutable in-memory event table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<EventRecord>,
}

impl Dataset {
    /// Wraps a set of records. The dataset can't be mutated afterwards.
    #[must_use]
    pub const fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    /// All records in load order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the dataset holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every record (no filters applied).
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(self.records.iter().collect())
    }
}

/// A subset of dataset rows matching a set of filters.
///
/// Empty views are a normal result, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a EventRecord>,
}

impl<'a> FilteredView<'a> {
    /// Creates a view from borrowed rows.
    #[must_use]
    pub const fn new(rows: Vec<&'a EventRecord>) -> Self {
        Self { rows }
    }

    /// Iterates the rows in this view, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a EventRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if every row of this view is also in `other`.
    ///
    /// Rows are compared by identity (address), not value.
    #[must_use]
    pub fn is_subset_of(&self, other: &FilteredView<'_>) -> bool {
        self.rows
            .iter()
            .all(|row| other.rows.iter().any(|o| std::ptr::eq(*row, *o)))
    }
}
