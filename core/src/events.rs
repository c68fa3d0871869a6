// stockyard/src/events.rs

//! Notifications the loader publishes as the catalog changes, for rendering
//! layers that prefer to be told rather than to poll `Catalog::view`.

use parking_lot::RwLock;
use std::sync::Arc;

/// Which loader operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
  Initial,
  More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// Another load is outstanding.
  InFlight,
  /// `has_more` is false.
  Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
  LoadStarted { kind: LoadKind, page: u32 },
  CatalogReplaced { count: usize, has_more: bool },
  PageAppended { page: u32, count: usize, total: usize, has_more: bool },
  LoadFailed { kind: LoadKind, reason: String },
  LoadSkipped { kind: LoadKind, reason: SkipReason },
}

/// A subscriber callback. Listeners run synchronously on the loading task and
/// must not subscribe further listeners from inside the callback.
pub type Listener = Box<dyn Fn(&CatalogEvent) + Send + Sync>;

#[derive(Clone, Default)]
pub struct Listeners {
  inner: Arc<RwLock<Vec<Listener>>>,
}

impl Listeners {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, listener: impl Fn(&CatalogEvent) + Send + Sync + 'static) {
    self.inner.write().push(Box::new(listener));
  }

  pub fn len(&self) -> usize {
    self.inner.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub(crate) fn emit(&self, event: CatalogEvent) {
    tracing::trace!(?event, "Publishing catalog event.");
    for listener in self.inner.read().iter() {
      listener(&event);
    }
  }
}

impl std::fmt::Debug for Listeners {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Listeners").field("count", &self.len()).finish()
  }
}
