// stockyard/src/source/mod.rs

//! Where product pages come from.
//!
//! The loader only knows the [`ProductSource`] trait. [`MockProductSource`]
//! generates synthetic pages in-process; [`HttpProductSource`] reads them
//! from the marketplace REST backend.

mod http;
mod mock;

pub use http::{decode_listing, HttpProductSource};
pub use mock::{seed_catalog, MockProductSource};

use crate::core::{Page, PageRequest};
use crate::error::CatalogResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ProductSource: Send + Sync {
  /// Short label used in logs and timeout errors.
  fn name(&self) -> &str;

  /// Fetches one page. `request.is_initial()` distinguishes the first load.
  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page>;
}

#[async_trait]
impl<S: ProductSource + ?Sized> ProductSource for Arc<S> {
  fn name(&self) -> &str {
    (**self).name()
  }

  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    (**self).fetch_page(request).await
  }
}
