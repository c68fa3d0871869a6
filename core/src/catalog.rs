// stockyard/src/catalog.rs

//! `Catalog` ties the loader, the sentinel, the search box and the quick-view
//! modal together and hands the rendering layer one [`CatalogView`] plus the
//! callbacks it wires to buttons.

use crate::config::CatalogConfig;
use crate::core::{Product, ProductId, Shared};
use crate::error::CatalogResult;
use crate::filter::{filter_products, SearchQuery};
use crate::loader::{CatalogLoader, LoadOutcome};
use crate::sentinel::{IntersectionEntry, ScrollSentinel, SentinelOutcome};
use crate::source::ProductSource;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Everything the product grid needs to draw itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
  /// Loaded products matching the current search, in catalog order.
  pub products: Vec<Product>,
  pub total_loaded: usize,
  pub loading: bool,
  pub has_more: bool,
  pub search_term: String,
  pub quick_view: Option<Product>,
}

#[derive(Debug, Default)]
struct ViewState {
  search: SearchQuery,
  quick_view: Option<ProductId>,
}

pub struct Catalog<S: ProductSource> {
  loader: Arc<CatalogLoader<S>>,
  sentinel: ScrollSentinel<S>,
  view_state: Shared<ViewState>,
}

impl<S: ProductSource> Catalog<S> {
  pub fn new(source: S, config: CatalogConfig) -> CatalogResult<Self> {
    let loader = Arc::new(CatalogLoader::new(source, config)?);
    let sentinel = ScrollSentinel::new(Arc::clone(&loader));
    Ok(Catalog {
      loader,
      sentinel,
      view_state: Shared::default(),
    })
  }

  pub fn loader(&self) -> &Arc<CatalogLoader<S>> {
    &self.loader
  }

  pub fn sentinel(&self) -> &ScrollSentinel<S> {
    &self.sentinel
  }

  /// Loads the first page, then starts watching the sentinel.
  #[instrument(name = "Catalog::mount", skip_all)]
  pub async fn mount(&self) -> LoadOutcome {
    let outcome = self.loader.load_initial().await;
    self.sentinel.observe();
    outcome
  }

  /// Stops watching the sentinel. An outstanding fetch still lands.
  pub fn unmount(&self) {
    self.sentinel.unmount();
    event!(Level::DEBUG, "Catalog unmounted.");
  }

  pub fn set_search(&self, term: impl Into<String>) {
    self.view_state.write().search = SearchQuery::new(term);
  }

  pub fn clear_search(&self) {
    self.view_state.write().search = SearchQuery::default();
  }

  pub fn search_term(&self) -> String {
    self.view_state.read().search.term().to_string()
  }

  pub fn view(&self) -> CatalogView {
    let (search, quick_view_id) = {
      let view_state = self.view_state.read();
      (view_state.search.clone(), view_state.quick_view)
    };
    let state = self.loader.snapshot();

    let products = filter_products(&state.products, &search).into_iter().cloned().collect();
    let quick_view = quick_view_id.and_then(|id| state.products.iter().find(|p| p.id == id).cloned());

    CatalogView {
      products,
      total_loaded: state.products.len(),
      loading: state.loading,
      has_more: state.has_more,
      search_term: search.term().to_string(),
      quick_view,
    }
  }

  /// The manual "load more" button. Same gate as the sentinel: no-op while loading.
  pub async fn on_load_more(&self) -> LoadOutcome {
    let outcome = self.loader.load_more().await;
    // The sentinel skips attaching while a manual load is outstanding.
    self.sentinel.observe();
    outcome
  }

  pub async fn on_sentinel(&self, entry: IntersectionEntry) -> SentinelOutcome {
    self.sentinel.on_intersection(entry).await
  }

  /// Opens the quick view for a loaded product. Ids that are not loaded leave it closed.
  pub fn on_quick_view(&self, id: ProductId) -> Option<Product> {
    let product = self.loader.with_products(|products| products.iter().find(|p| p.id == id).cloned());
    let mut view_state = self.view_state.write();
    match &product {
      Some(_) => {
        view_state.quick_view = Some(id);
        event!(Level::DEBUG, product_id = %id, "Quick view opened.");
      }
      None => {
        view_state.quick_view = None;
        event!(Level::WARN, product_id = %id, "Quick view requested for a product that is not loaded.");
      }
    }
    product
  }

  pub fn close_quick_view(&self) {
    self.view_state.write().quick_view = None;
  }
}

impl<S: ProductSource> std::fmt::Debug for Catalog<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Catalog")
      .field("loader", &self.loader)
      .field("sentinel", &self.sentinel)
      .field("search_term", &self.search_term())
      .finish()
  }
}
