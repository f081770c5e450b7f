//! Interactive mode for the server.
//!
//! Prompts for the bind address and port before starting the server.

use std::sync::Arc;

use dialoguer::{Confirm, Input};
use disaster_dash_dataset::models::Dataset;

use crate::bind_from_env;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address and port, defaulting to `BIND_ADDR` and `PORT`,
/// and delegates to [`super::run_server_on`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(dataset: Arc<Dataset>) -> std::io::Result<()> {
    println!("Disaster Dashboard Server ({} records)", dataset.len());
    println!();

    let (default_addr, default_port) = bind_from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(default_port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server_on(dataset, bind_addr, port).await
}
