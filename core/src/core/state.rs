// stockyard/src/core/state.rs

//! In-memory catalog state and the page request/response types exchanged with
//! product sources.

use super::product::{Product, ProductId};
use std::collections::HashSet;

/// Next-offset marker: highest product id loaded so far, plus one.
///
/// Only used to seed the ids of the next batch; it is not a server cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageCursor(pub u64);

impl PageCursor {
  pub const START: PageCursor = PageCursor(1);

  pub fn after(products: &[Product]) -> Self {
    products
      .iter()
      .map(|p| p.id.0)
      .max()
      .map_or(Self::START, |highest| PageCursor(highest.saturating_add(1)))
  }
}

/// What a product source is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  /// 0 for the initial load, then 1, 2, ... for each incremental page.
  pub page: u32,
  /// Number of products already loaded.
  pub offset: usize,
  pub cursor: PageCursor,
  pub limit: usize,
}

impl PageRequest {
  pub fn initial(limit: usize) -> Self {
    PageRequest {
      page: 0,
      offset: 0,
      cursor: PageCursor::START,
      limit,
    }
  }

  pub fn is_initial(&self) -> bool {
    self.page == 0
  }
}

/// One batch of products returned by a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub products: Vec<Product>,
  /// Set when the source knows there is nothing after this page.
  pub exhausted: bool,
}

impl Page {
  pub fn new(products: Vec<Product>) -> Self {
    Page {
      products,
      exhausted: false,
    }
  }

  pub fn last(products: Vec<Product>) -> Self {
    Page {
      products,
      exhausted: true,
    }
  }
}

/// Catalog state shared between the loader, the sentinel and the view.
#[derive(Debug, Clone)]
pub struct CatalogState {
  pub products: Vec<Product>,
  /// True only while a fetch is outstanding.
  pub loading: bool,
  pub has_more: bool,
  /// Incremental pages appended since the last initial load.
  pub pages_loaded: u32,
}

impl Default for CatalogState {
  fn default() -> Self {
    CatalogState {
      products: Vec::new(),
      loading: false,
      has_more: true,
      pages_loaded: 0,
    }
  }
}

impl CatalogState {
  pub fn cursor(&self) -> PageCursor {
    PageCursor::after(&self.products)
  }

  /// Ids in `incoming` that are already loaded, or repeated within `incoming`.
  pub fn colliding_ids(&self, incoming: &[Product]) -> Vec<ProductId> {
    colliding_ids(&self.products, incoming)
  }
}

pub fn colliding_ids(existing: &[Product], incoming: &[Product]) -> Vec<ProductId> {
  let mut seen: HashSet<ProductId> = existing.iter().map(|p| p.id).collect();
  incoming.iter().filter(|p| !seen.insert(p.id)).map(|p| p.id).collect()
}
