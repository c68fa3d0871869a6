// src/lib.rs

//! Stockyard: the product catalog engine behind a construction-materials
//! marketplace storefront.
//!
//! Stockyard keeps an in-memory, incrementally grown catalog with:
//!  - A loader that fetches a first page, then appends further pages on demand,
//!    never running two fetches at once.
//!  - A scroll sentinel that asks for the next page when it becomes visible.
//!  - Case-insensitive search over the products already loaded.
//!  - A quick-view selection for a single product.
//!  - Pluggable product sources: an in-process mock and a REST backend client.

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod filter;
pub mod loader;
pub mod sentinel;
pub mod session;
pub mod source;

// --- Re-exports for the Public API ---

pub use crate::core::{Availability, CatalogState, Page, PageCursor, PageRequest, Product, ProductId, ProductRecord, Shared};

pub use crate::catalog::{Catalog, CatalogView};
pub use crate::config::CatalogConfig;
pub use crate::events::{CatalogEvent, Listeners, LoadKind, SkipReason};
pub use crate::filter::{filter_products, matches, SearchQuery};
pub use crate::loader::{CatalogLoader, LoadOutcome};
pub use crate::sentinel::{IgnoreReason, IntersectionEntry, ScrollSentinel, SentinelOutcome, SentinelPhase};
pub use crate::session::Session;
pub use crate::source::{decode_listing, seed_catalog, HttpProductSource, MockProductSource, ProductSource};

pub use crate::error::{CatalogError, CatalogResult};

/*
    Typical storefront flow:
    1. Build a `ProductSource` (`MockProductSource` or `HttpProductSource` with a `Session`).
    2. Create `Catalog::new(source, CatalogConfig::default())`.
    3. `catalog.mount().await` loads the first page and attaches the sentinel observer.
    4. Forward viewport reports to `catalog.on_sentinel(entry).await` and the
       "load more" button to `catalog.on_load_more().await`.
    5. Forward keystrokes to `catalog.set_search(term)` and render `catalog.view()`.
    6. `catalog.unmount()` when the page goes away.
*/
