// stockyard/src/sentinel.rs

//! The scroll sentinel: a marker after the last rendered product whose
//! visibility asks the loader for the next page.
//!
//! Two phases, `Idle` and `Loading`. An intersection moves Idle -> Loading
//! only when the observer is attached, the loader is idle and more pages are
//! believed to exist. The observer is detached for the duration of the load
//! and re-attached when it settles, so observers never stack up.

use crate::core::Shared;
use crate::loader::{CatalogLoader, LoadOutcome};
use crate::source::ProductSource;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPhase {
  Idle,
  Loading,
}

/// Visibility report for the sentinel, as a viewport observer would deliver it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
  pub is_intersecting: bool,
  pub intersection_ratio: f32,
}

impl IntersectionEntry {
  pub fn visible() -> Self {
    IntersectionEntry {
      is_intersecting: true,
      intersection_ratio: 1.0,
    }
  }

  pub fn hidden() -> Self {
    IntersectionEntry {
      is_intersecting: false,
      intersection_ratio: 0.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
  NotIntersecting,
  /// No observer attached (disconnected, unmounted, or infinite scroll off).
  NotObserving,
  AlreadyLoading,
  NoMorePages,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentinelOutcome {
  Triggered(LoadOutcome),
  Ignored(IgnoreReason),
}

#[derive(Debug)]
struct SentinelInner {
  phase: SentinelPhase,
  observing: bool,
  infinite_scroll: bool,
  mounted: bool,
  attachments: u64,
}

impl SentinelInner {
  fn try_attach(&mut self, loader_busy: bool) -> bool {
    if !self.mounted || !self.infinite_scroll || self.phase == SentinelPhase::Loading || loader_busy || self.observing {
      return false;
    }
    self.observing = true;
    self.attachments += 1;
    true
  }
}

// Returns the sentinel to Idle when the triggered load settles or is dropped.
struct Settle<'a, S: ProductSource>(&'a ScrollSentinel<S>);

impl<S: ProductSource> Drop for Settle<'_, S> {
  fn drop(&mut self) {
    self.0.settle();
  }
}

pub struct ScrollSentinel<S: ProductSource> {
  loader: Arc<CatalogLoader<S>>,
  inner: Shared<SentinelInner>,
}

impl<S: ProductSource> ScrollSentinel<S> {
  pub fn new(loader: Arc<CatalogLoader<S>>) -> Self {
    let infinite_scroll = loader.config().infinite_scroll;
    ScrollSentinel {
      loader,
      inner: Shared::new(SentinelInner {
        phase: SentinelPhase::Idle,
        observing: false,
        infinite_scroll,
        mounted: true,
        attachments: 0,
      }),
    }
  }

  pub fn loader(&self) -> &Arc<CatalogLoader<S>> {
    &self.loader
  }

  pub fn phase(&self) -> SentinelPhase {
    self.inner.read().phase
  }

  pub fn is_observing(&self) -> bool {
    self.inner.read().observing
  }

  /// How many times an observer has been attached over the sentinel's life.
  pub fn observer_attachments(&self) -> u64 {
    self.inner.read().attachments
  }

  pub fn infinite_scroll(&self) -> bool {
    self.inner.read().infinite_scroll
  }

  /// Attaches the observer if mounted, idle, infinite scroll is on, the
  /// loader is not busy and no observer is attached yet. Returns whether an
  /// observer was attached by this call.
  pub fn observe(&self) -> bool {
    let loader_busy = self.loader.is_loading();
    let attached = self.inner.write().try_attach(loader_busy);
    if attached {
      event!(Level::DEBUG, "Sentinel observer attached.");
    }
    attached
  }

  pub fn disconnect(&self) {
    let mut inner = self.inner.write();
    if inner.observing {
      inner.observing = false;
      event!(Level::DEBUG, "Sentinel observer disconnected.");
    }
  }

  /// Detaches for good. A load already in flight is not cancelled.
  pub fn unmount(&self) {
    let mut inner = self.inner.write();
    inner.mounted = false;
    inner.observing = false;
  }

  pub fn set_infinite_scroll(&self, enabled: bool) {
    self.inner.write().infinite_scroll = enabled;
    if enabled {
      self.observe();
    } else {
      self.disconnect();
    }
  }

  /// Handles a visibility report. Triggers `load_more` when the sentinel is
  /// visible, observed, idle and more pages exist; otherwise does nothing.
  #[instrument(name = "ScrollSentinel::on_intersection", skip(self))]
  pub async fn on_intersection(&self, entry: IntersectionEntry) -> SentinelOutcome {
    if !entry.is_intersecting {
      return SentinelOutcome::Ignored(IgnoreReason::NotIntersecting);
    }

    let loader_busy = self.loader.is_loading();
    let has_more = self.loader.has_more();
    {
      let mut inner = self.inner.write();
      if !inner.observing {
        return SentinelOutcome::Ignored(IgnoreReason::NotObserving);
      }
      if inner.phase == SentinelPhase::Loading || loader_busy {
        return SentinelOutcome::Ignored(IgnoreReason::AlreadyLoading);
      }
      if !has_more {
        return SentinelOutcome::Ignored(IgnoreReason::NoMorePages);
      }
      inner.phase = SentinelPhase::Loading;
      inner.observing = false;
    }
    event!(Level::DEBUG, "Sentinel visible; requesting next page.");

    let _settle = Settle(self);
    let outcome = self.loader.load_more().await;
    SentinelOutcome::Triggered(outcome)
  }

  fn settle(&self) {
    let loader_busy = self.loader.is_loading();
    let mut inner = self.inner.write();
    inner.phase = SentinelPhase::Idle;
    inner.try_attach(loader_busy);
  }
}

impl<S: ProductSource> std::fmt::Debug for ScrollSentinel<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ScrollSentinel").field("state", &*self.inner.read()).finish()
  }
}
