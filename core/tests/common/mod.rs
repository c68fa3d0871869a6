// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use stockyard::{CatalogError, CatalogEvent, CatalogResult, MockProductSource, Page, PageRequest, Product, ProductId, ProductSource};
use tokio::sync::{Notify, Semaphore};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn ids(products: &[Product]) -> Vec<u64> {
  products.iter().map(|p| p.id.0).collect()
}

pub fn product(id: u64, name: &str) -> Product {
  let mut product = stockyard::seed_catalog().remove(0);
  product.id = ProductId(id);
  product.name = name.to_string();
  product
}

/// Collects every event a loader publishes.
pub fn record_events(listeners: &stockyard::Listeners) -> Arc<Mutex<Vec<CatalogEvent>>> {
  let recorded = Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&recorded);
  listeners.subscribe(move |event| sink.lock().push(event.clone()));
  recorded
}

// --- Sources ---

/// Mock source whose fetches block until the test releases them.
pub struct GatedSource {
  inner: MockProductSource,
  started: Arc<Notify>,
  release: Arc<Semaphore>,
}

impl GatedSource {
  pub fn new() -> Self {
    GatedSource {
      inner: MockProductSource::new(),
      started: Arc::new(Notify::new()),
      release: Arc::new(Semaphore::new(0)),
    }
  }

  /// Resolves once a fetch has entered the source.
  pub async fn wait_started(&self) {
    self.started.notified().await;
  }

  /// Lets one blocked fetch through.
  pub fn release_one(&self) {
    self.release.add_permits(1);
  }

  pub fn fetch_count(&self) -> usize {
    self.inner.fetch_count()
  }
}

#[async_trait]
impl ProductSource for GatedSource {
  fn name(&self) -> &str {
    "gated"
  }

  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    self.started.notify_one();
    let permit = self
      .release
      .acquire()
      .await
      .map_err(|e| CatalogError::from(anyhow::anyhow!("gate closed: {}", e)))?;
    permit.forget();
    self.inner.fetch_page(request).await
  }
}

/// Mock source that fails on the listed call numbers (0-based).
pub struct FlakySource {
  inner: MockProductSource,
  calls: AtomicUsize,
  fail_on: Vec<usize>,
}

impl FlakySource {
  pub fn failing_on(fail_on: &[usize]) -> Self {
    FlakySource {
      inner: MockProductSource::new(),
      calls: AtomicUsize::new(0),
      fail_on: fail_on.to_vec(),
    }
  }
}

#[async_trait]
impl ProductSource for FlakySource {
  fn name(&self) -> &str {
    "flaky"
  }

  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    let call = self.calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_on.contains(&call) {
      return Err(CatalogError::Status {
        status: 503,
        url: "mock://products".to_string(),
      });
    }
    self.inner.fetch_page(request).await
  }
}

/// Source that never answers.
pub struct HangingSource;

#[async_trait]
impl ProductSource for HangingSource {
  fn name(&self) -> &str {
    "hanging"
  }

  async fn fetch_page(&self, _request: PageRequest) -> CatalogResult<Page> {
    std::future::pending::<CatalogResult<Page>>().await
  }
}

/// Source that replays pre-built pages in order, recording every request.
pub struct ScriptedSource {
  pages: Mutex<VecDeque<Page>>,
  pub requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
  pub fn new(pages: Vec<Page>) -> Self {
    ScriptedSource {
      pages: Mutex::new(pages.into()),
      requests: Mutex::new(Vec::new()),
    }
  }
}

#[async_trait]
impl ProductSource for ScriptedSource {
  fn name(&self) -> &str {
    "scripted"
  }

  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    self.requests.lock().push(request);
    let next = self.pages.lock().pop_front();
    Ok(next.unwrap_or_else(|| Page::last(Vec::new())))
  }
}
