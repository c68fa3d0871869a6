pub mod product;
pub mod shared;
pub mod state;

// Re-export key types for easier access from other stockyard modules (and lib.rs)
pub use product::{Availability, Product, ProductId, ProductRecord};
pub use shared::Shared;
pub use state::{CatalogState, Page, PageCursor, PageRequest};
