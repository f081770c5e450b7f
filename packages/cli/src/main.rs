#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the disaster dashboard.
//!
//! Loads the cleaned event table once (prompting for another path when it
//! can't be read), then serves the API, prints a dashboard summary, or
//! lists the disaster types. With no subcommand an interactive menu is
//! shown.
//!
//! Uses `indicatif-log-bridge` (via [`disaster_dash_cli_utils::init_logger`])
//! so log lines and the load progress bar share the terminal cleanly.

mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Select;
use disaster_dash_cli_utils::{IndicatifProgress, MultiProgress};
use disaster_dash_dataset::{
    interactive::{TerminalPrompt, load_with_retry},
    models::Dataset,
    resolve_dataset_path,
};
use disaster_dash_disaster_models::DisasterType;
use summary::{FilterArgs, print_summary, prompt_filters};

#[derive(Parser)]
#[command(name = "disaster_dash", about = "Disaster dashboard toolchain")]
struct Cli {
    /// Path to the cleaned dataset CSV
    #[arg(long, global = true, env = "DISASTER_DASH_DATASET")]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the dashboard for a filter selection as JSON
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List the disaster types and their codes
    Types,
}

/// Entries of the interactive menu.
enum Tool {
    Server,
    Summary,
    Types,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Summary, Self::Types];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Summary => "Print dashboard summary",
            Self::Types => "List disaster types",
        }
    }
}

fn load(
    explicit: Option<&Path>,
    multi: &MultiProgress,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    let path = resolve_dataset_path(explicit);
    let progress = IndicatifProgress::bytes_bar(multi, "Loading dataset");
    Ok(load_with_retry(&path, &mut TerminalPrompt, &progress)?)
}

fn print_types() {
    println!("{:<6} NAME", "CODE");
    println!("{}", "-".repeat(30));
    for kind in DisasterType::all() {
        println!("{:<6} {kind}", kind.code());
    }
}

async fn serve(
    dataset: Dataset,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Arc::new(dataset);
    let (env_bind, env_port) = disaster_dash_server::bind_from_env();
    let bind = bind.unwrap_or(env_bind);
    let port = port.unwrap_or(env_port);

    // The server uses actix-web's runtime, so it runs in a blocking task to
    // avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new()
            .block_on(disaster_dash_server::run_server_on(dataset, bind, port))
    })
    .await??;

    Ok(())
}

async fn menu(dataset: Dataset) -> Result<(), Box<dyn std::error::Error>> {
    println!("Disaster Dashboard ({} records)", dataset.len());
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            let dataset = Arc::new(dataset);
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(disaster_dash_server::interactive::run(dataset))
            })
            .await??;
        }
        Tool::Summary => print_summary(&dataset, prompt_filters(), true)?,
        Tool::Types => print_types(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = disaster_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Types)) {
        print_types();
        return Ok(());
    }

    let dataset = load(cli.dataset.as_deref(), &multi)?;

    match cli.command {
        None => menu(dataset).await?,
        Some(Commands::Serve { bind, port }) => serve(dataset, bind, port).await?,
        Some(Commands::Summary { filters, pretty }) => print_summary(&dataset, filters, pretty)?,
        Some(Commands::Types) => print_types(),
    }

    Ok(())
}
