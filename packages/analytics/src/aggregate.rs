//! Reductions over a filtered view.
//!
//! Every function here is total: an empty view yields `0`, an empty list,
//! or `None` (rendered as [`NOT_AVAILABLE`]) rather than an error. Missing
//! magnitudes are skipped by sums.
//!
//! [`NOT_AVAILABLE`]: disaster_dash_analytics_models::NOT_AVAILABLE

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;
use disaster_dash_analytics_models::{
    FilterOptions, GroupCount, GroupTotal, MonthOption, RegionOption, SubregionOption,
};
use disaster_dash_dataset_models::{EventRecord, FilteredView, GroupColumn, ValueColumn};
use disaster_dash_disaster_models::month_name;

/// Sums `column` across the view, skipping missing values.
///
/// Returns `0.0` for an empty view.
#[must_use]
pub fn sum_by(view: &FilteredView<'_>, column: ValueColumn) -> f64 {
    view.iter().filter_map(|r| r.value(column)).sum()
}

fn group_key(record: &EventRecord, columns: &[GroupColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|c| record.group_value(*c).into_owned())
        .collect()
}

/// Sums `column` per group.
///
/// Groups appear in the order their first record appears in the view.
/// Groups whose values are all missing are still returned, with a total
/// of zero.
#[must_use]
pub fn group_sum(
    view: &FilteredView<'_>,
    group_by: &[GroupColumn],
    column: ValueColumn,
) -> Vec<GroupTotal> {
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for record in view.iter() {
        let key = group_key(record, group_by);
        let idx = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupTotal {
                key,
                total: 0.0,
                count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[idx];
        group.count += 1;
        if let Some(v) = record.value(column) {
            group.total += v;
        }
    }

    groups
}

/// Counts records per group, in first-encountered order.
#[must_use]
pub fn count_by(view: &FilteredView<'_>, group_by: &[GroupColumn]) -> Vec<GroupCount> {
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();

    for record in view.iter() {
        let key = group_key(record, group_by);
        let idx = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupCount { key, count: 0 });
            groups.len() - 1
        });
        groups[idx].count += 1;
    }

    groups
}

/// Returns the group with the largest total of `column`.
///
/// Ties go to the group encountered first. Groups where every value is
/// missing are not candidates, so `None` is returned for an empty view and
/// for a view where no row reports `column`.
#[must_use]
pub fn argmax_group(
    view: &FilteredView<'_>,
    group: GroupColumn,
    column: ValueColumn,
) -> Option<String> {
    let reported: HashSet<Cow<'_, str>> = view
        .iter()
        .filter(|r| r.value(column).is_some())
        .map(|r| r.group_value(group))
        .collect();

    let mut best: Option<GroupTotal> = None;

    for candidate in group_sum(view, &[group], column) {
        if !candidate
            .key
            .first()
            .is_some_and(|k| reported.contains(k.as_str()))
        {
            continue;
        }
        if best.as_ref().is_none_or(|b| candidate.total > b.total) {
            best = Some(candidate);
        }
    }

    best.and_then(|g| g.key.into_iter().next())
}

/// Returns the most recent `last_update` in the view.
///
/// Returns `None` if the view is empty or no row has a timestamp.
#[must_use]
pub fn max_timestamp(view: &FilteredView<'_>) -> Option<NaiveDateTime> {
    view.iter().filter_map(|r| r.last_update).max()
}

/// Returns the earliest and latest year in the view.
#[must_use]
pub fn year_bounds(view: &FilteredView<'_>) -> Option<(i32, i32)> {
    let min = view.iter().map(|r| r.year).min()?;
    let max = view.iter().map(|r| r.year).max()?;
    Some((min, max))
}

/// Lists the values the selection widgets can offer for this view.
#[must_use]
pub fn filter_options(view: &FilteredView<'_>) -> FilterOptions {
    let mut hierarchy: BTreeMap<&str, BTreeMap<&str, BTreeSet<&str>>> = BTreeMap::new();
    let mut types = BTreeSet::new();

    for record in view.iter() {
        hierarchy
            .entry(record.region.as_str())
            .or_default()
            .entry(record.subregion.as_str())
            .or_default()
            .insert(record.country.as_str());
        types.insert(record.disaster_type);
    }

    let regions = hierarchy
        .into_iter()
        .map(|(region, subregions)| RegionOption {
            name: region.to_string(),
            subregions: subregions
                .into_iter()
                .map(|(subregion, countries)| SubregionOption {
                    name: subregion.to_string(),
                    countries: countries.into_iter().map(ToString::to_string).collect(),
                })
                .collect(),
        })
        .collect();

    let bounds = year_bounds(view);

    FilterOptions {
        regions,
        disaster_types: types.into_iter().collect(),
        year_min: bounds.map(|(min, _)| min),
        year_max: bounds.map(|(_, max)| max),
        months: (1..=12)
            .filter_map(|code| {
                month_name(code).map(|name| MonthOption {
                    code,
                    name: name.to_string(),
                })
            })
            .collect(),
    }
}
