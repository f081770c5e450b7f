//! The `summary` command: prints the dashboard for a filter selection.

use clap::Args;
use dialoguer::Input;
use disaster_dash_analytics::{build_dashboard, registry};
use disaster_dash_dataset::models::Dataset;
use disaster_dash_server_models::DashboardQueryParams;

/// Filter flags shared by the `summary` command and the interactive menu.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Continent name(s), comma-separated
    #[arg(long)]
    pub continent: Option<String>,
    /// Subregion name(s), comma-separated
    #[arg(long)]
    pub subregion: Option<String>,
    /// Country name(s), comma-separated
    #[arg(long)]
    pub country: Option<String>,
    /// First year of the range (inclusive)
    #[arg(long)]
    pub year_from: Option<i32>,
    /// Last year of the range (inclusive)
    #[arg(long)]
    pub year_to: Option<i32>,
    /// Month code(s) 1-12, comma-separated
    #[arg(long)]
    pub month: Option<String>,
    /// Disaster type name(s), comma-separated (e.g. "Flood,Storm")
    #[arg(long)]
    pub types: Option<String>,
}

impl From<FilterArgs> for DashboardQueryParams {
    fn from(args: FilterArgs) -> Self {
        Self {
            continent: args.continent,
            subregion: args.subregion,
            country: args.country,
            year_from: args.year_from,
            year_to: args.year_to,
            month: args.month,
            types: args.types,
        }
    }
}

fn optional(prompt: &str) -> Option<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Asks for each filter on the terminal. Empty answers leave it unset.
#[must_use]
pub fn prompt_filters() -> FilterArgs {
    FilterArgs {
        continent: optional("Continent(s)"),
        subregion: optional("Subregion(s)"),
        country: optional("Country(ies)"),
        year_from: optional("From year").and_then(|s| s.trim().parse().ok()),
        year_to: optional("To year").and_then(|s| s.trim().parse().ok()),
        month: optional("Month(s) 1-12"),
        types: optional("Disaster type(s)"),
    }
}

/// Builds the dashboard for `filters` and prints it as JSON.
///
/// # Errors
///
/// Returns an error if the layer registry is invalid or serialization
/// fails.
pub fn print_summary(
    dataset: &Dataset,
    filters: FilterArgs,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let layers = registry::all_layers()?;
    let params = DashboardQueryParams::from(filters).into_filter_params();
    let response = build_dashboard(dataset, &params, &layers);

    log::info!(
        "{} of {} records match the selection",
        response.record_count,
        dataset.len()
    );

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    Ok(())
}
