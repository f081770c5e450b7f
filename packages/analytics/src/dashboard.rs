//! Dashboard assembly.
//!
//! [`build_dashboard`] runs one interaction end to end: filter, aggregate,
//! categorize, and format. The dataset is only read.

use disaster_dash_analytics_models::{
    ChartSeries, DashboardResponse, FilterParams, LayerDefinition, LayerMetric, MapLayer,
    NOT_AVAILABLE, SeriesPoint, StatCards,
};
use disaster_dash_dataset_models::{Dataset, FilteredView, GroupColumn, ValueColumn};

use crate::{
    aggregate::{argmax_group, count_by, group_sum, max_timestamp, sum_by},
    categorize::{categorize, compute_thresholds},
    describe::{describe_selection, format_magnitude},
    filter::apply_filters,
};

/// Damage is recorded in thousands of US dollars.
const DAMAGE_UNIT: f64 = 1_000.0;

/// Builds every card, map, and chart for one filter selection.
#[must_use]
pub fn build_dashboard(
    dataset: &Dataset,
    params: &FilterParams,
    layers: &[LayerDefinition],
) -> DashboardResponse {
    let view = apply_filters(dataset, params);

    DashboardResponse {
        record_count: view.len(),
        cards: stat_cards(&view),
        maps: layers
            .iter()
            .map(|layer| map_layer(&view, params, layer))
            .collect(),
        charts: vec![count_by_time(&view, params), casualty_trend(&view, params)],
    }
}

fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn stat_cards(view: &FilteredView<'_>) -> StatCards {
    let damage = sum_by(view, ValueColumn::TotalDamage) * DAMAGE_UNIT;

    StatCards {
        total_deaths: format_magnitude(Some(sum_by(view, ValueColumn::TotalDeaths))),
        total_affected: format_magnitude(Some(sum_by(view, ValueColumn::TotalAffected))),
        total_damage: format!("${}", format_magnitude(Some(damage))),
        disaster_count: view.len().to_string(),
        country_most_deaths: or_not_available(argmax_group(
            view,
            GroupColumn::Country,
            ValueColumn::TotalDeaths,
        )),
        most_affected_country: or_not_available(argmax_group(
            view,
            GroupColumn::Country,
            ValueColumn::TotalAffected,
        )),
        most_damaged_country: or_not_available(argmax_group(
            view,
            GroupColumn::Country,
            ValueColumn::TotalDamage,
        )),
        last_updated: or_not_available(
            max_timestamp(view).map(|ts| ts.format("%Y-%m-%d").to_string()),
        ),
    }
}

fn title(base: &str, params: &FilterParams) -> String {
    describe_selection(
        base,
        &params.disaster_types,
        params.year_range,
        &params.selected_months(),
    )
}

#[allow(clippy::cast_precision_loss)]
fn layer_values(view: &FilteredView<'_>, layer: &LayerDefinition) -> Vec<(Vec<String>, f64)> {
    match layer.metric {
        LayerMetric::Count => count_by(view, &layer.group_by)
            .into_iter()
            .map(|g| (g.key, g.count as f64))
            .collect(),
        LayerMetric::Sum(column) => group_sum(view, &layer.group_by, column)
            .into_iter()
            .map(|g| (g.key, g.total))
            .collect(),
    }
}

/// Categorizes one map layer over the view.
#[must_use]
pub fn map_layer(
    view: &FilteredView<'_>,
    params: &FilterParams,
    layer: &LayerDefinition,
) -> MapLayer {
    let entries = layer_values(view, layer);
    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
    let thresholds = compute_thresholds(&values, &layer.policy);

    log::debug!(
        "Layer {}: {} groups, thresholds {:?}",
        layer.id,
        entries.len(),
        thresholds.as_ref().map(crate::Thresholds::bounds)
    );

    MapLayer {
        id: layer.id.clone(),
        title: title(&layer.title, params),
        labels: layer.labels.clone(),
        thresholds: thresholds
            .as_ref()
            .map(|t| t.bounds().to_vec())
            .unwrap_or_default(),
        entries: categorize(entries, &layer.labels, thresholds.as_ref()),
    }
}

/// Orders chart keys whose first column is a year numerically.
fn by_year(key: &[String]) -> (i32, &[String]) {
    let year = key.first().and_then(|y| y.parse().ok()).unwrap_or(i32::MIN);
    (year, key.get(1..).unwrap_or_default())
}

#[allow(clippy::cast_precision_loss)]
fn count_by_time(view: &FilteredView<'_>, params: &FilterParams) -> ChartSeries {
    let mut counts = count_by(view, &[GroupColumn::Year, GroupColumn::Type]);
    counts.sort_by(|a, b| by_year(&a.key).cmp(&by_year(&b.key)));

    ChartSeries {
        id: "count_by_time".to_string(),
        title: title("Count of ", params),
        points: counts
            .into_iter()
            .map(|g| {
                let mut key = g.key.into_iter();
                SeriesPoint {
                    x: key.next().unwrap_or_default(),
                    series: key.next(),
                    value: g.count as f64,
                }
            })
            .collect(),
    }
}

fn casualty_trend(view: &FilteredView<'_>, params: &FilterParams) -> ChartSeries {
    let mut totals = group_sum(view, &[GroupColumn::Year], ValueColumn::TotalDeaths);
    totals.sort_by(|a, b| by_year(&a.key).cmp(&by_year(&b.key)));

    ChartSeries {
        id: "casualty_trend".to_string(),
        title: title("Casualties of ", params),
        points: totals
            .into_iter()
            .map(|g| SeriesPoint {
                x: g.key.into_iter().next().unwrap_or_default(),
                series: None,
                value: g.total,
            })
            .collect(),
    }
}
