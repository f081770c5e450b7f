#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the disaster dashboard API server.
//!
//! Loads the dataset from `DISASTER_DASH_DATASET` (or the default path),
//! prompting for another path when loading fails, then serves the API.

use std::sync::Arc;

use disaster_dash_dataset::{
    interactive::{TerminalPrompt, load_with_retry},
    progress::null_progress,
    resolve_dataset_path,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let path = resolve_dataset_path(None);
    let dataset = load_with_retry(&path, &mut TerminalPrompt, &null_progress())?;

    disaster_dash_server::run_server(Arc::new(dataset)).await?;

    Ok(())
}
