// stockyard/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("HTTP request to product source failed. Source: {source}")]
  Http {
    #[from]
    source: reqwest::Error,
  },

  #[error("Product source responded with status {status} for {url}")]
  Status { status: u16, url: String },

  #[error("Product source rejected the session (401 Unauthorized)")]
  Unauthorized,

  #[error("Failed to decode product listing. Source: {source}")]
  Decode {
    #[from]
    source: serde_json::Error,
  },

  #[error("Invalid product record (id: {id:?}): {reason}")]
  InvalidRecord { id: Option<u64>, reason: String },

  #[error("Product source '{source_name}' did not respond within {timeout_ms} ms")]
  Timeout { source_name: String, timeout_ms: u128 },

  #[error("Catalog configuration error: {0}")]
  Config(String),

  #[error("Error in product source. Source: {source}")]
  Source {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for CatalogError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a CatalogError that was boxed into anyhow by a source implementation.
    match err.downcast::<CatalogError>() {
      Ok(catalog_err) => catalog_err,
      Err(err) => CatalogError::Source { source: err },
    }
  }
}

impl CatalogError {
  pub(crate) fn invalid(id: Option<u64>, reason: impl Into<String>) -> Self {
    CatalogError::InvalidRecord {
      id,
      reason: reason.into(),
    }
  }
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
