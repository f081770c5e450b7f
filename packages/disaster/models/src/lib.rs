#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Disaster type taxonomy and calendar helpers.
//!
//! This crate defines the canonical disaster type set used across the
//! whole dashboard. Raw labels from the source spreadsheet (which include
//! finer-grained subtypes such as glacial lake outburst floods) are
//! normalized into this taxonomy by [`DisasterType::from_label`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Raw type labels that are not natural disasters and are excluded from
/// the dataset entirely.
pub const EXCLUDED_LABELS: &[&str] = &["Animal incident", "Epidemic", "Impact", "Infestation"];

/// Top-level natural disaster categories.
///
/// Serialized using the human-readable display name (e.g.
/// `"Extreme temperature"`). Deserializing an unknown label yields
/// [`DisasterType::Other`] instead of failing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(from = "String", into = "String")]
pub enum DisasterType {
    /// Prolonged shortage of water supply
    Drought,
    /// Riverine, coastal, flash, and glacial lake outburst floods
    Flood,
    /// Heat waves, cold waves, and severe winter conditions
    #[strum(to_string = "Extreme temperature")]
    ExtremeTemperature,
    /// Eruptions, ash fall, lahars
    #[strum(to_string = "Volcanic activity")]
    VolcanicActivity,
    /// Tropical cyclones, convective and extra-tropical storms
    Storm,
    /// Forest and land fires
    Wildfire,
    /// Ground shaking and tsunamis
    Earthquake,
    /// Landslides, avalanches, rockfalls (wet or dry)
    #[strum(to_string = "Mass movement")]
    MassMovement,
    /// Labels that don't map to any known category
    Other,
}

impl DisasterType {
    /// Normalizes a raw type label into the canonical taxonomy.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns [`DisasterType::Other`] when no mapping exists.
    #[must_use]
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "drought" => Self::Drought,
            "flood" | "glacial lake outburst flood" => Self::Flood,
            "extreme temperature" => Self::ExtremeTemperature,
            "volcanic activity" => Self::VolcanicActivity,
            "storm" => Self::Storm,
            "wildfire" => Self::Wildfire,
            "earthquake" => Self::Earthquake,
            "mass movement" | "mass movement (wet)" | "mass movement (dry)" => Self::MassMovement,
            _ => Self::Other,
        }
    }

    /// Returns `true` if the raw label names a non-natural event type that
    /// is dropped at load time.
    #[must_use]
    pub fn is_excluded_label(raw: &str) -> bool {
        let trimmed = raw.trim();
        EXCLUDED_LABELS
            .iter()
            .any(|label| label.eq_ignore_ascii_case(trimmed))
    }

    /// Returns the stable integer code for this type.
    ///
    /// `Other` is `0`; the known types are numbered 1-8.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Other => 0,
            Self::Drought => 1,
            Self::Flood => 2,
            Self::ExtremeTemperature => 3,
            Self::VolcanicActivity => 4,
            Self::Storm => 5,
            Self::Wildfire => 6,
            Self::Earthquake => 7,
            Self::MassMovement => 8,
        }
    }

    /// Returns the known (mapped) variants in code order.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &[
            Self::Drought,
            Self::Flood,
            Self::ExtremeTemperature,
            Self::VolcanicActivity,
            Self::Storm,
            Self::Wildfire,
            Self::Earthquake,
            Self::MassMovement,
        ]
    }

    /// Returns all variants of this enum, including `Other`.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Drought,
            Self::Flood,
            Self::ExtremeTemperature,
            Self::VolcanicActivity,
            Self::Storm,
            Self::Wildfire,
            Self::Earthquake,
            Self::MassMovement,
            Self::Other,
        ]
    }
}

impl From<String> for DisasterType {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<DisasterType> for String {
    fn from(value: DisasterType) -> Self {
        value.to_string()
    }
}

/// Returns the English month name for a 1-based month code.
#[must_use]
pub fn month_name(code: u32) -> Option<&'static str> {
    let month = u8::try_from(code).ok()?;
    chrono::Month::try_from(month).ok().map(|m| m.name())
}

/// Builds the `"YYYY/MM"` key used to bucket events by calendar month.
#[must_use]
pub fn year_month_key(year: i32, month: u32) -> String {
    format!("{year}/{month:02}")
}
