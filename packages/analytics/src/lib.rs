#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and aggregation engine for the disaster dashboard.
//!
//! A request flows through the modules in order: [`filter`] narrows the
//! dataset to a view, [`aggregate`] reduces the view to totals and groups,
//! [`categorize`] bins grouped totals into severity levels, and
//! [`describe`] produces titles and compact numbers. [`dashboard`] ties
//! them together into a single response.

pub mod aggregate;
pub mod categorize;
pub mod dashboard;
pub mod describe;
pub mod filter;
pub mod registry;

#[cfg(test)]
mod test_fixtures;

pub use aggregate::{argmax_group, count_by, group_sum, max_timestamp, sum_by};
pub use categorize::{Thresholds, categorize, compute_thresholds};
pub use dashboard::build_dashboard;
pub use describe::{describe_selection, format_magnitude};
pub use filter::apply_filters;

use thiserror::Error;

/// Errors that can occur while loading analytics configuration.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A layer definition is inconsistent.
    #[error("Invalid layer '{layer}': {message}")]
    Config {
        /// Layer identifier.
        layer: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A layer file failed to parse.
    #[error("Failed to parse {name}.toml: {source}")]
    Toml {
        /// Embedded file name, without extension.
        name: String,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
}
