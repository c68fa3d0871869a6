// demos/storefront_app/src/browse.rs

//! A scripted shopper: mounts the catalog against the product API, searches,
//! scrolls until the catalog stops growing and opens a quick view.

use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use stockyard::{Catalog, CatalogEvent, HttpProductSource, IntersectionEntry, LoadOutcome, SentinelOutcome, Session};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseReport {
  pub initial_count: usize,
  pub search_matches_before_scroll: usize,
  pub search_matches_after_scroll: usize,
  pub pages_loaded: u32,
  pub total_loaded: usize,
  pub has_more: bool,
  pub quick_view: Option<String>,
  pub failed_loads: usize,
  pub session_invalidated: bool,
}

#[instrument(skip(config), fields(api = %config.api_base_url, search = %config.search_term))]
pub async fn run_browse_session(config: &AppConfig) -> AppResult<BrowseReport> {
  let session = match &config.api_token {
    Some(token) => Session::with_token(token.clone()),
    None => Session::anonymous(),
  };
  let source = HttpProductSource::new(config.api_base_url.clone(), session.clone());
  let catalog = Catalog::new(source, config.catalog.clone())?;

  catalog.loader().listeners().subscribe(|event| {
    if let CatalogEvent::PageAppended { page, total, .. } = event {
      info!("Page {} arrived; {} products loaded.", page, total);
    }
  });

  let mut failed_loads = 0;
  if let LoadOutcome::Failed { reason } = catalog.mount().await {
    warn!("Initial catalog load failed: {}", reason);
    failed_loads += 1;
  }
  if session.was_invalidated() {
    warn!("The product API rejected our token; browsing anonymously from here on.");
  }
  let initial_count = catalog.view().total_loaded;

  catalog.set_search(config.search_term.clone());
  let search_matches_before_scroll = catalog.view().products.len();
  info!("{} of {} loaded products match '{}'.", search_matches_before_scroll, initial_count, config.search_term);
  catalog.clear_search();

  // Each intersection either loads a page or reports why it did not. With
  // infinite scroll off, fall back to the "load more" button.
  let max_attempts = config.catalog.page_ceiling as usize + 2;
  for _ in 0..max_attempts {
    if !catalog.view().has_more {
      break;
    }
    let outcome = if catalog.sentinel().infinite_scroll() {
      match catalog.on_sentinel(IntersectionEntry::visible()).await {
        SentinelOutcome::Triggered(outcome) => outcome,
        SentinelOutcome::Ignored(reason) => {
          info!(?reason, "Sentinel ignored.");
          break;
        }
      }
    } else {
      catalog.on_load_more().await
    };
    if let LoadOutcome::Failed { reason } = outcome {
      warn!("Loading the next page failed: {}", reason);
      failed_loads += 1;
    }
  }

  catalog.set_search(config.search_term.clone());
  let search_matches_after_scroll = catalog.view().products.len();
  catalog.clear_search();

  let first_id = catalog.view().products.first().map(|p| p.id);
  let quick_view = first_id.and_then(|id| catalog.on_quick_view(id)).map(|p| p.name);
  catalog.close_quick_view();

  let view = catalog.view();
  catalog.unmount();

  let report = BrowseReport {
    initial_count,
    search_matches_before_scroll,
    search_matches_after_scroll,
    pages_loaded: catalog.loader().pages_loaded(),
    total_loaded: view.total_loaded,
    has_more: view.has_more,
    quick_view,
    failed_loads,
    session_invalidated: session.was_invalidated(),
  };
  info!(?report, "Browse session finished.");
  Ok(report)
}
