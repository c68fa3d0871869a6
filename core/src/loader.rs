// stockyard/src/loader.rs

//! The catalog loader: fetches the first page of products, then appends
//! further pages on demand.
//!
//! The `loading` flag in [`CatalogState`] is the only concurrency control.
//! A load that finds it set is a no-op, so at most one fetch is outstanding
//! and pages are appended strictly in request order. Fetch failures are
//! logged and swallowed: the catalog simply does not grow.

use crate::config::CatalogConfig;
use crate::core::state::colliding_ids;
use crate::core::{CatalogState, Page, PageRequest, Product, Shared};
use crate::error::{CatalogError, CatalogResult};
use crate::events::{CatalogEvent, Listeners, LoadKind, SkipReason};
use crate::source::ProductSource;
use tracing::{event, instrument, Level};

/// Result of a single `load_initial` / `load_more` call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
  /// The initial page replaced the catalog.
  Replaced { count: usize },
  /// An incremental page was appended; `page` is the page counter after the append.
  Appended { page: u32, count: usize },
  /// Nothing was fetched.
  Skipped(SkipReason),
  /// The fetch failed; the catalog is unchanged.
  Failed { reason: String },
}

impl LoadOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, LoadOutcome::Replaced { .. } | LoadOutcome::Appended { .. })
  }

  pub fn is_skipped(&self) -> bool {
    matches!(self, LoadOutcome::Skipped(_))
  }
}

// Clears `loading` when the load settles, including when the load future is
// dropped before the source answers.
struct InFlight(Shared<CatalogState>);

impl Drop for InFlight {
  fn drop(&mut self) {
    self.0.write().loading = false;
  }
}

pub struct CatalogLoader<S: ProductSource> {
  source: S,
  config: CatalogConfig,
  state: Shared<CatalogState>,
  listeners: Listeners,
}

impl<S: ProductSource> CatalogLoader<S> {
  pub fn new(source: S, config: CatalogConfig) -> CatalogResult<Self> {
    config.validate()?;
    Ok(CatalogLoader {
      source,
      config,
      state: Shared::new(CatalogState::default()),
      listeners: Listeners::new(),
    })
  }

  pub fn config(&self) -> &CatalogConfig {
    &self.config
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  pub fn listeners(&self) -> &Listeners {
    &self.listeners
  }

  /// Handle on the live state; clones share it.
  pub fn state(&self) -> Shared<CatalogState> {
    self.state.clone()
  }

  pub fn snapshot(&self) -> CatalogState {
    self.state.read().clone()
  }

  pub fn products(&self) -> Vec<Product> {
    self.state.map_read(|s| &s.products).clone()
  }

  /// Runs `f` against the loaded products without cloning them.
  pub fn with_products<R>(&self, f: impl FnOnce(&[Product]) -> R) -> R {
    f(&self.state.map_read(|s| &s.products))
  }

  pub fn len(&self) -> usize {
    self.state.read().products.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn is_loading(&self) -> bool {
    self.state.read().loading
  }

  pub fn has_more(&self) -> bool {
    self.state.read().has_more
  }

  pub fn pages_loaded(&self) -> u32 {
    self.state.read().pages_loaded
  }

  /// Fetches the first page and replaces the catalog with it.
  ///
  /// Resets the page counter and takes `has_more` from the source. On failure
  /// the catalog is left as it was (empty on first mount).
  #[instrument(name = "CatalogLoader::load_initial", skip_all, fields(source = self.source.name()))]
  pub async fn load_initial(&self) -> LoadOutcome {
    let request = match self.begin(LoadKind::Initial) {
      Ok(request) => request,
      Err(reason) => return self.skipped(LoadKind::Initial, reason),
    };
    let flight = InFlight(self.state.clone());
    self.listeners.emit(CatalogEvent::LoadStarted {
      kind: LoadKind::Initial,
      page: request.page,
    });

    let (outcome, notice) = match self.fetch(request).await {
      Ok(page) => self.replace(page),
      Err(err) => self.failed(LoadKind::Initial, err),
    };
    drop(flight);
    self.listeners.emit(notice);
    outcome
  }

  /// Fetches the next page and appends it.
  ///
  /// No-op while another load is in flight or once `has_more` is false.
  /// Clears `has_more` when the page counter reaches the configured ceiling
  /// or the source reports exhaustion.
  #[instrument(name = "CatalogLoader::load_more", skip_all, fields(source = self.source.name()))]
  pub async fn load_more(&self) -> LoadOutcome {
    let request = match self.begin(LoadKind::More) {
      Ok(request) => request,
      Err(reason) => return self.skipped(LoadKind::More, reason),
    };
    let flight = InFlight(self.state.clone());
    self.listeners.emit(CatalogEvent::LoadStarted {
      kind: LoadKind::More,
      page: request.page,
    });

    let (outcome, notice) = match self.fetch(request).await {
      Ok(page) => self.append(page),
      Err(err) => self.failed(LoadKind::More, err),
    };
    drop(flight);
    self.listeners.emit(notice);
    outcome
  }

  /// Empties the catalog and its counters. An outstanding fetch is not
  /// cancelled and will still land when it resolves.
  pub fn reset(&self) {
    self.state.update(|state| {
      let loading = state.loading;
      *state = CatalogState::default();
      state.loading = loading;
    });
    event!(Level::DEBUG, "Catalog reset.");
  }

  // Checks the gate and flips `loading` under one write lock.
  fn begin(&self, kind: LoadKind) -> Result<PageRequest, SkipReason> {
    let mut state = self.state.write();
    if state.loading {
      return Err(SkipReason::InFlight);
    }
    let request = match kind {
      LoadKind::Initial => PageRequest::initial(self.config.batch_size),
      LoadKind::More => {
        if !state.has_more {
          return Err(SkipReason::Exhausted);
        }
        PageRequest {
          page: state.pages_loaded + 1,
          offset: state.products.len(),
          cursor: state.cursor(),
          limit: self.config.batch_size,
        }
      }
    };
    state.loading = true;
    Ok(request)
  }

  async fn fetch(&self, request: PageRequest) -> CatalogResult<Page> {
    match self.config.request_timeout {
      Some(limit) => tokio::time::timeout(limit, self.source.fetch_page(request))
        .await
        .map_err(|_| CatalogError::Timeout {
          source_name: self.source.name().to_string(),
          timeout_ms: limit.as_millis(),
        })?,
      None => self.source.fetch_page(request).await,
    }
  }

  fn replace(&self, page: Page) -> (LoadOutcome, CatalogEvent) {
    let Page { products, exhausted } = page;
    let duplicates = colliding_ids(&[], &products);
    if !duplicates.is_empty() {
      event!(Level::WARN, ?duplicates, "Initial page repeats product ids.");
    }

    let count = products.len();
    let has_more = self.state.update(|state| {
      state.products = products;
      state.pages_loaded = 0;
      state.has_more = !exhausted;
      state.has_more
    });
    event!(Level::INFO, count, has_more, "Initial catalog page loaded.");
    (
      LoadOutcome::Replaced { count },
      CatalogEvent::CatalogReplaced { count, has_more },
    )
  }

  fn append(&self, page: Page) -> (LoadOutcome, CatalogEvent) {
    let Page { products, exhausted } = page;
    let count = products.len();
    let ceiling = self.config.page_ceiling;

    let (page_no, total, has_more) = self.state.update(|state| {
      let duplicates = state.colliding_ids(&products);
      if !duplicates.is_empty() {
        event!(Level::WARN, ?duplicates, "Appending products whose ids are already loaded.");
      }
      state.products.extend(products);
      state.pages_loaded += 1;
      if state.pages_loaded >= ceiling || exhausted {
        state.has_more = false;
      }
      (state.pages_loaded, state.products.len(), state.has_more)
    });

    event!(Level::INFO, page = page_no, count, total, has_more, "Catalog page appended.");
    (
      LoadOutcome::Appended { page: page_no, count },
      CatalogEvent::PageAppended {
        page: page_no,
        count,
        total,
        has_more,
      },
    )
  }

  fn failed(&self, kind: LoadKind, err: CatalogError) -> (LoadOutcome, CatalogEvent) {
    event!(Level::ERROR, ?kind, error = %err, "Catalog load failed; keeping current products.");
    let reason = err.to_string();
    (
      LoadOutcome::Failed { reason: reason.clone() },
      CatalogEvent::LoadFailed { kind, reason },
    )
  }

  fn skipped(&self, kind: LoadKind, reason: SkipReason) -> LoadOutcome {
    event!(Level::DEBUG, ?kind, ?reason, "Catalog load skipped.");
    self.listeners.emit(CatalogEvent::LoadSkipped { kind, reason });
    LoadOutcome::Skipped(reason)
  }
}

impl<S: ProductSource> std::fmt::Debug for CatalogLoader<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.read();
    f.debug_struct("CatalogLoader")
      .field("source", &self.source.name())
      .field("products", &state.products.len())
      .field("loading", &state.loading)
      .field("has_more", &state.has_more)
      .field("pages_loaded", &state.pages_loaded)
      .finish()
  }
}
