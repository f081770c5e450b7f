//! Map layer registry. Loads all layer definitions from embedded TOML.
//!
//! Each `.toml` file in `packages/analytics/layers/` is baked into the
//! binary at compile time via [`include_str!`] and validated on load.

use disaster_dash_analytics_models::LayerDefinition;

use crate::{AnalyticsError, categorize::validate_layer};

/// TOML configs embedded at compile time.
const LAYER_TOMLS: &[(&str, &str)] = &[
    ("disaster_count", include_str!("../layers/disaster_count.toml")),
    ("total_damage", include_str!("../layers/total_damage.toml")),
    ("total_deaths", include_str!("../layers/total_deaths.toml")),
];

/// Parses and validates a single layer definition.
///
/// # Errors
///
/// Returns [`AnalyticsError::Toml`] if the TOML is malformed, or
/// [`AnalyticsError::Config`] if the layer is inconsistent.
pub fn parse_layer_toml(name: &str, contents: &str) -> Result<LayerDefinition, AnalyticsError> {
    let def: LayerDefinition = toml::from_str(contents).map_err(|source| AnalyticsError::Toml {
        name: name.to_string(),
        source,
    })?;
    validate_layer(&def)?;
    Ok(def)
}

/// Returns every registered layer, in registration order.
///
/// # Errors
///
/// Returns the first parse or validation error encountered.
pub fn all_layers() -> Result<Vec<LayerDefinition>, AnalyticsError> {
    let layers = LAYER_TOMLS
        .iter()
        .map(|(name, toml)| parse_layer_toml(name, toml))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Loaded {} map layers", layers.len());

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use disaster_dash_analytics_models::{LayerMetric, ThresholdPolicy};
    use disaster_dash_dataset_models::{GroupColumn, ValueColumn};

    const EXPECTED_LAYER_COUNT: usize = 3;

    #[test]
    fn loads_all_layers() {
        let layers = all_layers().unwrap();
        assert_eq!(layers.len(), EXPECTED_LAYER_COUNT);
    }

    #[test]
    fn layer_ids_match_file_names() {
        for (name, toml) in LAYER_TOMLS {
            let def = parse_layer_toml(name, toml).unwrap();
            assert_eq!(&def.id, name);
        }
    }

    #[test]
    fn layers_group_by_iso_and_country() {
        for def in all_layers().unwrap() {
            assert_eq!(def.group_by, vec![GroupColumn::Iso, GroupColumn::Country]);
        }
    }

    #[test]
    fn damage_layer_is_adaptive() {
        let layers = all_layers().unwrap();
        let damage = layers.iter().find(|l| l.id == "total_damage").unwrap();
        assert_eq!(damage.metric, LayerMetric::Sum(ValueColumn::TotalDamage));
        assert!(matches!(damage.policy, ThresholdPolicy::Adaptive { .. }));
        assert_eq!(damage.labels.len(), 5);
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let toml = r#"
            id = "broken"
            title = "Broken"
            metric = "count"
            group_by = ["country"]
            labels = ["Low", "High"]

            [policy]
            kind = "fixed"
            bounds = [1.0, 2.0]
        "#;
        assert!(matches!(
            parse_layer_toml("broken", toml),
            Err(AnalyticsError::Config { .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_layer_toml("broken", "id = "),
            Err(AnalyticsError::Toml { .. })
        ));
    }
}
