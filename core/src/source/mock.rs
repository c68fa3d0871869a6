// stockyard/src/source/mock.rs
use super::ProductSource;
use crate::core::{Availability, Page, PageRequest, Product, ProductId};
use crate::error::CatalogResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, instrument};

// (name, category, description) cycled through by the synthetic generator.
const SYNTHETIC_TEMPLATES: &[(&str, &str, &str)] = &[
  ("Cement Bag 50kg", "Cement", "General-purpose portland cement"),
  ("Steel I-Beam", "Steel", "Structural beam for framing"),
  ("Washed Gravel", "Aggregates", "20mm aggregate for concrete"),
  ("Sharp Sand", "Aggregates", "Plastering and screed sand"),
  ("Corrugated Roof Sheet", "Roofing", "Galvanised sheet for sheds and canopies"),
  ("Timber Batten", "Timber", "Treated softwood batten"),
];

/// The eight products every storefront session starts with.
pub fn seed_catalog() -> Vec<Product> {
  let seed = |id: u64, name: &str, description: &str, cents: i64, category: &str, rating: f32, stock: i64| Product {
    id: ProductId(id),
    name: name.to_string(),
    description: description.to_string(),
    price: Decimal::new(cents, 2),
    category: category.to_string(),
    image_url: format!("/images/products/{}.jpg", id),
    rating,
    availability: Availability::from_stock(stock),
  };

  vec![
    seed(1, "Premium Cement Mix", "High-strength blend for structural pours", 1250, "Cement", 4.8, 120),
    seed(2, "Steel Rebar 12mm", "Hot-rolled deformed reinforcement bar, 6m length", 875, "Steel", 4.6, 340),
    seed(3, "Red Clay Bricks", "Kiln-fired bricks for load-bearing walls", 65, "Masonry", 4.4, 5000),
    seed(4, "Plywood Sheet 18mm", "Marine-grade plywood, 2440x1220mm", 4200, "Timber", 4.5, 8),
    seed(5, "Ceramic Floor Tiles", "Anti-slip glazed tiles, 60x60cm", 2490, "Tiles", 4.3, 0),
    seed(6, "Concrete Blocks", "Hollow blocks bonded with portland cement", 180, "Masonry", 4.2, 900),
    seed(7, "PVC Pipes 50mm", "Pressure-rated pipe for drainage lines", 640, "Plumbing", 4.1, 260),
    seed(8, "Waterproofing Membrane", "Bituminous roll for roofs and basements", 5800, "Roofing", 4.7, 45),
  ]
}

fn synthetic_product(id: u64) -> Product {
  let template_idx = (id % SYNTHETIC_TEMPLATES.len() as u64) as usize;
  let (name, category, description) = SYNTHETIC_TEMPLATES[template_idx];
  Product {
    id: ProductId(id),
    name: format!("{} #{}", name, id),
    description: description.to_string(),
    price: Decimal::new(((id * 137) % 9000 + 500) as i64, 2),
    category: category.to_string(),
    image_url: format!("/images/products/{}.jpg", id),
    rating: (30 + id % 21) as f32 / 10.0,
    availability: Availability::from_stock(((id * 37) % 200) as i64),
  }
}

/// In-process stand-in for a paginated product API.
///
/// The initial request returns the configured initial products (the seed
/// catalog by default); every later request returns `limit` synthetic
/// products numbered from the request cursor.
#[derive(Debug)]
pub struct MockProductSource {
  initial: Vec<Product>,
  latency: Option<Duration>,
  max_items: Option<u64>,
  fetches: AtomicUsize,
}

impl Default for MockProductSource {
  fn default() -> Self {
    Self::new()
  }
}

impl MockProductSource {
  pub fn new() -> Self {
    Self::with_initial(seed_catalog())
  }

  pub fn with_initial(initial: Vec<Product>) -> Self {
    MockProductSource {
      initial,
      latency: None,
      max_items: None,
      fetches: AtomicUsize::new(0),
    }
  }

  /// Simulated network latency applied to every fetch.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = Some(latency);
    self
  }

  /// Highest synthetic id the source will hand out; the page reaching it is marked exhausted.
  pub fn with_max_items(mut self, max_items: u64) -> Self {
    self.max_items = Some(max_items);
    self
  }

  /// `count` synthetic products with ids starting at `first_id`.
  pub fn synthetic_products(first_id: u64, count: usize) -> Vec<Product> {
    (first_id..first_id.saturating_add(count as u64)).map(synthetic_product).collect()
  }

  /// Number of `fetch_page` calls served so far.
  pub fn fetch_count(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }

  fn incremental_page(&self, request: PageRequest) -> Page {
    let first = request.cursor.0;
    let mut last_exclusive = first.saturating_add(request.limit as u64);
    if let Some(max) = self.max_items {
      last_exclusive = last_exclusive.min(max.saturating_add(1)).max(first);
    }
    let products: Vec<Product> = (first..last_exclusive).map(synthetic_product).collect();
    let exhausted = self.max_items.is_some_and(|max| last_exclusive > max);
    Page { products, exhausted }
  }
}

#[async_trait]
impl ProductSource for MockProductSource {
  fn name(&self) -> &str {
    "mock"
  }

  #[instrument(name = "MockProductSource::fetch_page", skip(self), fields(page = request.page, cursor = request.cursor.0))]
  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    if let Some(latency) = self.latency {
      tokio::time::sleep(latency).await; // Simulate network latency
    }

    let page = if request.is_initial() {
      let exhausted = self.max_items.is_some_and(|max| self.initial.len() as u64 >= max);
      Page {
        products: self.initial.clone(),
        exhausted,
      }
    } else {
      self.incremental_page(request)
    };

    debug!("Serving {} mock products (exhausted: {}).", page.products.len(), page.exhausted);
    Ok(page)
  }
}
