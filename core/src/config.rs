// stockyard/src/config.rs

//! Tuning knobs for the catalog engine.

use crate::error::{CatalogError, CatalogResult};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 8;
pub const DEFAULT_PAGE_CEILING: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
  /// Products requested per page.
  pub batch_size: usize,
  /// Incremental pages after which `has_more` is cleared, whatever the source says.
  pub page_ceiling: u32,
  /// Whether the scroll sentinel may trigger loads. The manual "load more" path works either way.
  pub infinite_scroll: bool,
  /// `None` waits on a source forever.
  pub request_timeout: Option<Duration>,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig {
      batch_size: DEFAULT_BATCH_SIZE,
      page_ceiling: DEFAULT_PAGE_CEILING,
      infinite_scroll: true,
      request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
    }
  }
}

impl CatalogConfig {
  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  pub fn with_page_ceiling(mut self, page_ceiling: u32) -> Self {
    self.page_ceiling = page_ceiling;
    self
  }

  pub fn with_infinite_scroll(mut self, enabled: bool) -> Self {
    self.infinite_scroll = enabled;
    self
  }

  pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.request_timeout = timeout;
    self
  }

  pub fn validate(&self) -> CatalogResult<()> {
    if self.batch_size == 0 {
      return Err(CatalogError::Config("batch_size must be at least 1".to_string()));
    }
    if self.page_ceiling == 0 {
      return Err(CatalogError::Config("page_ceiling must be at least 1".to_string()));
    }
    if self.request_timeout == Some(Duration::ZERO) {
      return Err(CatalogError::Config(
        "request_timeout must be positive (use None to disable)".to_string(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_storefront_policy() {
    let config = CatalogConfig::default();
    assert_eq!(config.batch_size, 8);
    assert_eq!(config.page_ceiling, 5);
    assert!(config.infinite_scroll);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn rejects_degenerate_values() {
    assert!(CatalogConfig::default().with_batch_size(0).validate().is_err());
    assert!(CatalogConfig::default().with_page_ceiling(0).validate().is_err());
    assert!(CatalogConfig::default()
      .with_request_timeout(Some(Duration::ZERO))
      .validate()
      .is_err());
    assert!(CatalogConfig::default().with_request_timeout(None).validate().is_ok());
  }
}
