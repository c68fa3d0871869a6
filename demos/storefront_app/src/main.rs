// demos/storefront_app/src/main.rs

// Declare modules for the application
mod browse;
mod config;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, RunMode};
use crate::state::AppState;

use actix_web::dev::Server;
use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

/// Binds the stand-in product API and returns the (not yet started) server
/// together with the address it actually bound.
pub(crate) fn start_backend(app_state: AppState, address: &str) -> io::Result<(Server, SocketAddr)> {
  let server = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .workers(2)
  .bind(address)?;

  let bound = server
    .addrs()
    .first()
    .copied()
    .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "server bound to no address"))?;
  Ok((server.run(), bound))
}

// Main function
#[actix_web::main]
async fn main() -> io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront application...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg), // Arc the config for sharing
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let app_state = AppState::new(Arc::clone(&app_config));

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);
  let (server, bound) = start_backend(app_state, &server_address)?;
  tracing::info!("Product API listening on http://{}/api/v1", bound);

  match app_config.mode {
    RunMode::Serve => server.await,
    RunMode::Demo => {
      let handle = server.handle();
      let server_task = actix_web::rt::spawn(server);

      match browse::run_browse_session(&app_config).await {
        Ok(report) => tracing::info!(
          "Browsed {} products over {} pages; {} match '{}'.",
          report.total_loaded,
          report.pages_loaded,
          report.search_matches_after_scroll,
          app_config.search_term
        ),
        Err(e) => tracing::error!(error = %e, "Browse session failed."),
      }

      handle.stop(true).await;
      server_task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?
    }
  }
}
