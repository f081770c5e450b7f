//! Severity binning.
//!
//! Grouped aggregates (damage per country, events per country) are mapped
//! onto a small ordered set of labels. Boundaries come from
//! [`compute_thresholds`], which is the only place the threshold rules
//! live. [`categorize`] then guarantees that every label appears in the
//! output, inserting zero-weight placeholders for empty categories so
//! legends and colour assignments stay stable between renders.

use disaster_dash_analytics_models::{CategorizedEntry, LayerDefinition, ThresholdPolicy};

use crate::AnalyticsError;

/// Ascending upper bounds for each bin except the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    bounds: Vec<f64>,
}

impl Thresholds {
    /// Wraps a set of ascending bounds.
    #[must_use]
    pub const fn new(bounds: Vec<f64>) -> Self {
        Self { bounds }
    }

    /// The upper bounds.
    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Returns the bin index for `value`: the first bound it doesn't
    /// exceed, or the last bin.
    #[must_use]
    pub fn bin_of(&self, value: f64) -> usize {
        self.bounds
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(self.bounds.len())
    }
}

/// Median of `values`, or `None` if empty.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean of `values`, or `None` if empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;
    Some(values.iter().sum::<f64>() / len)
}

/// Picks bin boundaries for the current distribution of `values`.
///
/// * No values: `None`, so only placeholders are produced.
/// * [`ThresholdPolicy::Fixed`]: the configured bounds.
/// * [`ThresholdPolicy::Adaptive`]: each multiplier scaled by an anchor.
///   The anchor is the median when the distribution is skewed
///   (`mean > skew_ratio * median`) and the mean otherwise. A non-positive
///   anchor falls back to the largest value.
#[must_use]
pub fn compute_thresholds(values: &[f64], policy: &ThresholdPolicy) -> Option<Thresholds> {
    if values.is_empty() {
        return None;
    }

    match policy {
        ThresholdPolicy::Fixed { bounds } => Some(Thresholds::new(bounds.clone())),
        ThresholdPolicy::Adaptive {
            multipliers,
            skew_ratio,
        } => {
            let median = median(values)?;
            let mean = mean(values)?;
            let mut anchor = if mean > skew_ratio * median {
                median
            } else {
                mean
            };
            if anchor <= 0.0 {
                anchor = values.iter().copied().fold(0.0, f64::max);
            }

            log::trace!("Adaptive bins: median={median} mean={mean} anchor={anchor}");

            Some(Thresholds::new(
                multipliers.iter().map(|m| anchor * m).collect(),
            ))
        }
    }
}

/// Assigns each `(key, value)` pair to a labelled bin.
///
/// The output holds every label at least once and is ordered by category;
/// entries sharing a category keep their input order. Categories with no
/// real entry get a placeholder with an empty key, zero value, and
/// `is_real = false`. With `thresholds = None` every real entry lands in
/// the first category.
#[must_use]
pub fn categorize(
    entries: Vec<(Vec<String>, f64)>,
    labels: &[String],
    thresholds: Option<&Thresholds>,
) -> Vec<CategorizedEntry> {
    if labels.is_empty() {
        return Vec::new();
    }

    let last = labels.len() - 1;
    let mut buckets: Vec<Vec<CategorizedEntry>> = vec![Vec::new(); labels.len()];

    for (key, value) in entries {
        let category = thresholds.map_or(0, |t| t.bin_of(value)).min(last);
        buckets[category].push(CategorizedEntry {
            key,
            value,
            category,
            label: labels[category].clone(),
            is_real: true,
        });
    }

    for (category, bucket) in buckets.iter_mut().enumerate() {
        if bucket.is_empty() {
            bucket.push(CategorizedEntry {
                key: Vec::new(),
                value: 0.0,
                category,
                label: labels[category].clone(),
                is_real: false,
            });
        }
    }

    buckets.into_iter().flatten().collect()
}

/// Checks that a layer definition is internally consistent.
///
/// # Errors
///
/// Returns [`AnalyticsError::Config`] if the label count doesn't match the
/// bound count, bounds or multipliers aren't ascending and finite, or the
/// layer has no grouping columns.
pub fn validate_layer(def: &LayerDefinition) -> Result<(), AnalyticsError> {
    let invalid = |message: String| AnalyticsError::Config {
        layer: def.id.clone(),
        message,
    };

    if def.group_by.is_empty() {
        return Err(invalid("group_by must name at least one column".to_string()));
    }

    let expected = def.policy.bound_count() + 1;
    if def.labels.len() != expected {
        return Err(invalid(format!(
            "expected {expected} labels for {} bounds, found {}",
            expected - 1,
            def.labels.len()
        )));
    }

    let steps = match &def.policy {
        ThresholdPolicy::Fixed { bounds } => bounds,
        ThresholdPolicy::Adaptive {
            multipliers,
            skew_ratio,
        } => {
            if !skew_ratio.is_finite() || *skew_ratio <= 0.0 {
                return Err(invalid(format!("skew_ratio must be positive, got {skew_ratio}")));
            }
            if multipliers.iter().any(|m| *m <= 0.0) {
                return Err(invalid("multipliers must be positive".to_string()));
            }
            multipliers
        }
    };

    if steps.iter().any(|v| !v.is_finite()) {
        return Err(invalid("bounds must be finite".to_string()));
    }
    if steps.windows(2).any(|w| w[0] > w[1]) {
        return Err(invalid("bounds must be ascending".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use disaster_dash_analytics_models::{DEFAULT_BIN_LABELS, LayerMetric};
    use disaster_dash_dataset_models::GroupColumn;

    fn labels() -> Vec<String> {
        DEFAULT_BIN_LABELS.iter().map(ToString::to_string).collect()
    }

    fn adaptive() -> ThresholdPolicy {
        ThresholdPolicy::Adaptive {
            multipliers: vec![0.25, 0.75, 1.5, 3.0],
            skew_ratio: 2.0,
        }
    }

    fn entry(name: &str, value: f64) -> (Vec<String>, f64) {
        (vec![name.to_string()], value)
    }

    #[test]
    fn bin_of_uses_inclusive_upper_bounds() {
        let t = Thresholds::new(vec![10.0, 20.0]);
        assert_eq!(t.bin_of(0.0), 0);
        assert_eq!(t.bin_of(10.0), 0);
        assert_eq!(t.bin_of(10.5), 1);
        assert_eq!(t.bin_of(20.0), 1);
        assert_eq!(t.bin_of(1e12), 2);
    }

    #[test]
    fn median_and_mean() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn no_values_means_no_thresholds() {
        assert_eq!(compute_thresholds(&[], &adaptive()), None);
    }

    #[test]
    fn balanced_distribution_anchors_on_mean() {
        // mean 20, median 20
        let t = compute_thresholds(&[10.0, 20.0, 30.0], &adaptive()).unwrap();
        assert_eq!(t.bounds(), &[5.0, 15.0, 30.0, 60.0]);
    }

    #[test]
    fn skewed_distribution_anchors_on_median() {
        // mean 340, median 10
        let t = compute_thresholds(&[5.0, 10.0, 1_005.0], &adaptive()).unwrap();
        assert_eq!(t.bounds(), &[2.5, 7.5, 15.0, 30.0]);
    }

    #[test]
    fn zero_anchor_falls_back_to_max() {
        // mean 4, median 0
        let t = compute_thresholds(&[0.0, 0.0, 12.0], &adaptive()).unwrap();
        assert_eq!(t.bounds(), &[3.0, 9.0, 18.0, 36.0]);
    }

    #[test]
    fn small_values_still_spread_across_bins() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let t = compute_thresholds(&values, &adaptive()).unwrap();
        let bins: std::collections::BTreeSet<usize> =
            values.iter().map(|v| t.bin_of(*v)).collect();
        assert!(bins.len() >= 3, "values collapsed into {bins:?}");
    }

    #[test]
    fn fixed_policy_returns_configured_bounds() {
        let policy = ThresholdPolicy::Fixed {
            bounds: vec![1.0, 5.0, 10.0, 50.0],
        };
        let t = compute_thresholds(&[100.0], &policy).unwrap();
        assert_eq!(t.bounds(), &[1.0, 5.0, 10.0, 50.0]);
    }

    #[test]
    fn every_label_appears_in_category_order() {
        let t = Thresholds::new(vec![1.0, 5.0, 10.0, 50.0]);
        let out = categorize(
            vec![entry("A", 100.0), entry("B", 0.5), entry("C", 0.9)],
            &labels(),
            Some(&t),
        );

        let categories: Vec<usize> = out.iter().map(|e| e.category).collect();
        assert_eq!(categories, vec![0, 0, 1, 2, 3, 4]);

        assert_eq!(out[0].key, vec!["B"]);
        assert_eq!(out[1].key, vec!["C"]);
        assert!(out[0].is_real && out[1].is_real);

        for placeholder in &out[2..5] {
            assert!(!placeholder.is_real);
            assert!(placeholder.value.abs() < f64::EPSILON);
            assert!(placeholder.key.is_empty());
        }

        assert_eq!(out[5].key, vec!["A"]);
        assert_eq!(out[5].label, "Very high");
    }

    #[test]
    fn empty_input_yields_only_placeholders() {
        let out = categorize(Vec::new(), &labels(), None);
        assert_eq!(out.len(), DEFAULT_BIN_LABELS.len());
        for (i, e) in out.iter().enumerate() {
            assert_eq!(e.category, i);
            assert_eq!(e.label, DEFAULT_BIN_LABELS[i]);
            assert!(!e.is_real);
        }
    }

    #[test]
    fn each_label_identity_appears_exactly_once_among_placeholders_or_real() {
        let t = Thresholds::new(vec![1.0, 5.0, 10.0, 50.0]);
        let out = categorize(vec![entry("A", 3.0), entry("B", 4.0)], &labels(), Some(&t));
        let mut seen: Vec<&str> = out.iter().map(|e| e.label.as_str()).collect();
        seen.dedup();
        assert_eq!(seen, DEFAULT_BIN_LABELS);
    }

    fn layer(labels: Vec<String>, policy: ThresholdPolicy) -> LayerDefinition {
        LayerDefinition {
            id: "test".to_string(),
            title: "Test".to_string(),
            metric: LayerMetric::Count,
            group_by: vec![GroupColumn::Country],
            labels,
            policy,
        }
    }

    #[test]
    fn validates_layer_shape() {
        assert!(validate_layer(&layer(labels(), adaptive())).is_ok());

        let too_few = layer(labels()[..3].to_vec(), adaptive());
        assert!(validate_layer(&too_few).is_err());

        let descending = layer(
            labels(),
            ThresholdPolicy::Fixed {
                bounds: vec![10.0, 5.0, 20.0, 30.0],
            },
        );
        assert!(validate_layer(&descending).is_err());

        let mut ungrouped = layer(labels(), adaptive());
        ungrouped.group_by.clear();
        assert!(validate_layer(&ungrouped).is_err());
    }
}
