// demos/storefront_app/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use stockyard::CatalogConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
  /// Only serve the stand-in product API.
  Serve,
  /// Serve the API and run one scripted browse session against it.
  Demo,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Base URL the browse session uses for the product API.
  pub api_base_url: String,
  /// When set, the backend requires `Authorization: Bearer <token>` and the
  /// browse session signs in with it.
  pub api_token: Option<String>,
  pub backend_total_products: u64,
  pub search_term: String,
  pub mode: RunMode,
  pub catalog: CatalogConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable lookup (the process environment in production).
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
    let parse_err = |name: &str, e: &dyn std::fmt::Display| AppError::Config(format!("Invalid {}: {}", name, e));

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| parse_err("SERVER_PORT", &e))?;
    let api_base_url = lookup("API_BASE_URL").unwrap_or_else(|| format!("http://{}:{}/api/v1", server_host, server_port));
    let api_token = lookup("API_TOKEN").filter(|token| !token.is_empty());

    let backend_total_products = get_or("BACKEND_TOTAL_PRODUCTS", "48")
      .parse::<u64>()
      .map_err(|e| parse_err("BACKEND_TOTAL_PRODUCTS", &e))?;
    let search_term = get_or("SEARCH_TERM", "cement");

    let mode = match get_or("APP_MODE", "demo").to_lowercase().as_str() {
      "serve" => RunMode::Serve,
      "demo" => RunMode::Demo,
      other => return Err(AppError::Config(format!("Invalid APP_MODE '{}' (expected serve or demo)", other))),
    };

    let defaults = CatalogConfig::default();
    let batch_size = match lookup("CATALOG_BATCH_SIZE") {
      Some(raw) => raw.parse::<usize>().map_err(|e| parse_err("CATALOG_BATCH_SIZE", &e))?,
      None => defaults.batch_size,
    };
    let page_ceiling = match lookup("CATALOG_PAGE_CEILING") {
      Some(raw) => raw.parse::<u32>().map_err(|e| parse_err("CATALOG_PAGE_CEILING", &e))?,
      None => defaults.page_ceiling,
    };
    // 0 disables the timeout.
    let request_timeout = match lookup("CATALOG_TIMEOUT_MS") {
      Some(raw) => match raw.parse::<u64>().map_err(|e| parse_err("CATALOG_TIMEOUT_MS", &e))? {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
      },
      None => defaults.request_timeout,
    };
    let infinite_scroll = get_or("INFINITE_SCROLL", "true")
      .parse::<bool>()
      .map_err(|e| parse_err("INFINITE_SCROLL", &e))?;

    let catalog = defaults
      .with_batch_size(batch_size)
      .with_page_ceiling(page_ceiling)
      .with_request_timeout(request_timeout)
      .with_infinite_scroll(infinite_scroll);
    catalog.validate()?;

    tracing::info!("Application configuration loaded successfully.");
    // Avoid logging the API token.
    tracing::debug!(?catalog, api_base_url = %api_base_url, "Loaded catalog configuration");

    Ok(Self {
      server_host,
      server_port,
      api_base_url,
      api_token,
      backend_total_products,
      search_term,
      mode,
      catalog,
    })
  }
}
