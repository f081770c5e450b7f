//! The filter engine.
//!
//! [`apply_filters`] narrows a dataset to the rows matching every active
//! filter in a [`FilterParams`]. Inactive filters (absent, blank, or empty)
//! are skipped, so the default params select the whole dataset.

use disaster_dash_analytics_models::FilterParams;
use disaster_dash_dataset_models::{Dataset, EventRecord, FilteredView};

/// Returns the rows of `dataset` matching all active filters in `params`.
///
/// The dataset is never modified; the view borrows its rows. An empty
/// view is a normal result.
#[must_use]
pub fn apply_filters<'a>(dataset: &'a Dataset, params: &FilterParams) -> FilteredView<'a> {
    let rows: Vec<&EventRecord> = dataset
        .records()
        .iter()
        .filter(|record| matches(record, params))
        .collect();

    log::debug!(
        "Filter {params:?} matched {} of {} records",
        rows.len(),
        dataset.len()
    );

    FilteredView::new(rows)
}

/// Returns `true` if `record` satisfies every active filter.
#[must_use]
pub fn matches(record: &EventRecord, params: &FilterParams) -> bool {
    if let Some(continent) = &params.continent
        && !continent.matches(record.region.as_str())
    {
        return false;
    }

    if let Some(subregion) = &params.subregion
        && !subregion.matches(record.subregion.as_str())
    {
        return false;
    }

    if let Some(country) = &params.country
        && !country.matches(record.country.as_str())
    {
        return false;
    }

    if let Some([from, to]) = params.year_range
        && !(from..=to).contains(&record.year)
    {
        return false;
    }

    if let Some(month) = &params.month
        && !month.matches(&record.month)
    {
        return false;
    }

    params.disaster_types.is_empty() || params.disaster_types.contains(&record.disaster_type)
}
