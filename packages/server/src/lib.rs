#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the disaster dashboard.
//!
//! The dataset is loaded once by the caller and shared read-only between
//! workers. Every dashboard request is an independent pass through the
//! analytics pipeline over that shared table.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, error, middleware, web};
use disaster_dash_analytics::{AnalyticsError, registry};
use disaster_dash_analytics_models::LayerDefinition;
use disaster_dash_dataset::models::Dataset;

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The loaded event table.
    pub dataset: Arc<Dataset>,
    /// Map layer definitions from the registry.
    pub layers: Arc<Vec<LayerDefinition>>,
}

impl AppState {
    /// Builds the state around a loaded dataset and the registered layers.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalyticsError`] if a layer definition is invalid.
    pub fn new(dataset: Arc<Dataset>) -> Result<Self, AnalyticsError> {
        Ok(Self {
            dataset,
            layers: Arc::new(registry::all_layers()?),
        })
    }
}

/// Registers the `/api` routes.
///
/// Malformed query strings and JSON bodies are answered with a `400` and an
/// [`ApiError`](disaster_dash_server_models::ApiError) body.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::JsonConfig::default()
                    .error_handler(handlers::bad_request::<error::JsonPayloadError>),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(handlers::bad_request::<error::QueryPayloadError>),
            )
            .route("/health", web::get().to(handlers::health))
            .route("/types", web::get().to(handlers::types))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard_query))
            .route("/dashboard", web::post().to(handlers::dashboard_body)),
    );
}

/// Reads `BIND_ADDR` and `PORT` from the environment.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Starts the dashboard API server on the address from `BIND_ADDR` and
/// `PORT`.
///
/// # Errors
///
/// See [`run_server_on`].
#[allow(clippy::future_not_send)]
pub async fn run_server(dataset: Arc<Dataset>) -> std::io::Result<()> {
    let (bind_addr, port) = bind_from_env();
    run_server_on(dataset, bind_addr, port).await
}

/// Starts the dashboard API server over an already-loaded dataset.
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if a layer definition is invalid, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server_on(
    dataset: Arc<Dataset>,
    bind_addr: String,
    port: u16,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(dataset).map_err(std::io::Error::other)?);

    log::info!(
        "Serving {} records with {} map layers",
        state.dataset.len(),
        state.layers.len()
    );

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
