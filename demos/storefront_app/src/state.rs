// demos/storefront_app/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use stockyard::{seed_catalog, MockProductSource, Product};

#[derive(Clone)]
pub struct AppState {
  /// Everything the stand-in backend can list, in id order.
  pub inventory: Arc<Vec<Product>>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(config: Arc<AppConfig>) -> Self {
    let inventory = build_inventory(config.backend_total_products);
    tracing::info!("Backend inventory holds {} products.", inventory.len());
    AppState {
      inventory: Arc::new(inventory),
      config,
    }
  }
}

/// The seed catalog followed by synthetic products, truncated to `total`.
pub fn build_inventory(total: u64) -> Vec<Product> {
  let mut inventory = seed_catalog();
  let next_id = inventory.len() as u64 + 1;
  if total >= next_id {
    inventory.extend(MockProductSource::synthetic_products(next_id, (total - next_id + 1) as usize));
  }
  inventory.truncate(total as usize);
  inventory
}
