// tests/loader_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use stockyard::{
  CatalogConfig, CatalogEvent, CatalogLoader, LoadKind, LoadOutcome, MockProductSource, Page, PageCursor, SkipReason,
};

fn loader<S: stockyard::ProductSource>(source: S) -> CatalogLoader<S> {
  CatalogLoader::new(source, CatalogConfig::default()).unwrap()
}

#[tokio::test]
#[serial]
async fn test_initial_load_replaces_catalog_with_seed_products() {
  setup_tracing();
  let loader = loader(MockProductSource::new());
  assert!(loader.is_empty());

  let outcome = loader.load_initial().await;

  assert_eq!(outcome, LoadOutcome::Replaced { count: 8 });
  assert_eq!(ids(&loader.products()), (1..=8).collect::<Vec<_>>());
  assert!(!loader.is_loading());
  assert!(loader.has_more());
  assert_eq!(loader.pages_loaded(), 0);
}

#[tokio::test]
#[serial]
async fn test_five_load_mores_from_empty_reach_the_page_ceiling() {
  setup_tracing();
  let source = Arc::new(MockProductSource::new());
  let loader = loader(Arc::clone(&source));

  for call in 1..=5u32 {
    assert!(loader.has_more(), "has_more cleared before call {}", call);
    let outcome = loader.load_more().await;
    assert_eq!(outcome, LoadOutcome::Appended { page: call, count: 8 });
  }

  assert_eq!(loader.len(), 40);
  assert!(!loader.has_more());
  assert_eq!(ids(&loader.products()), (1..=40).collect::<Vec<_>>());

  // Past the ceiling nothing reaches the source.
  assert_eq!(loader.load_more().await, LoadOutcome::Skipped(SkipReason::Exhausted));
  assert_eq!(source.fetch_count(), 5);
  assert_eq!(loader.len(), 40);
}

#[tokio::test]
#[serial]
async fn test_appends_grow_monotonically_and_keep_the_prefix() {
  setup_tracing();
  let loader = loader(MockProductSource::new());
  loader.load_initial().await;
  let initial = loader.products();

  let mut expected_len = initial.len();
  for _ in 0..3 {
    let before = loader.products();
    if let LoadOutcome::Appended { count, .. } = loader.load_more().await {
      expected_len += count;
    } else {
      panic!("Expected an appended page");
    }
    let after = loader.products();
    assert_eq!(after.len(), expected_len);
    assert_eq!(&after[..before.len()], &before[..]);
  }

  assert_eq!(&loader.products()[..8], &initial[..]);
  // Synthetic ids continue from the highest loaded id.
  assert_eq!(ids(&loader.products()), (1..=32).collect::<Vec<_>>());
  assert_eq!(loader.snapshot().cursor(), PageCursor(33));
}

#[tokio::test]
#[serial]
async fn test_load_more_is_a_noop_while_a_load_is_in_flight() {
  setup_tracing();
  let source = Arc::new(GatedSource::new());
  let loader = Arc::new(loader(Arc::clone(&source)));

  let first = {
    let loader = Arc::clone(&loader);
    tokio::spawn(async move { loader.load_more().await })
  };
  source.wait_started().await;
  assert!(loader.is_loading());

  // Both manual paths are gated by the same flag.
  assert_eq!(loader.load_more().await, LoadOutcome::Skipped(SkipReason::InFlight));
  assert_eq!(loader.load_initial().await, LoadOutcome::Skipped(SkipReason::InFlight));
  assert_eq!(loader.len(), 0);
  assert_eq!(loader.pages_loaded(), 0);

  source.release_one();
  let outcome = first.await.unwrap();
  assert_eq!(outcome, LoadOutcome::Appended { page: 1, count: 8 });
  assert_eq!(source.fetch_count(), 1);
  assert!(!loader.is_loading());
}

#[tokio::test]
#[serial]
async fn test_failed_load_more_is_swallowed_and_leaves_catalog_unchanged() {
  setup_tracing();
  let loader = loader(FlakySource::failing_on(&[1]));
  loader.load_initial().await;

  match loader.load_more().await {
    LoadOutcome::Failed { reason } => assert!(reason.contains("503")),
    other => panic!("Expected LoadOutcome::Failed, got {:?}", other),
  }
  assert_eq!(loader.len(), 8);
  assert_eq!(loader.pages_loaded(), 0);
  assert!(loader.has_more());
  assert!(!loader.is_loading());

  // No retry happened on its own; the next call simply works.
  assert_eq!(loader.load_more().await, LoadOutcome::Appended { page: 1, count: 8 });
  assert_eq!(ids(&loader.products()), (1..=16).collect::<Vec<_>>());
}

#[tokio::test]
#[serial]
async fn test_failed_initial_load_leaves_catalog_empty() {
  setup_tracing();
  let loader = loader(FlakySource::failing_on(&[0]));

  assert!(matches!(loader.load_initial().await, LoadOutcome::Failed { .. }));
  assert!(loader.is_empty());
  assert!(!loader.is_loading());
}

#[tokio::test]
#[serial]
async fn test_request_timeout_returns_loader_to_idle() {
  setup_tracing();
  let config = CatalogConfig::default().with_request_timeout(Some(Duration::from_millis(50)));
  let loader = CatalogLoader::new(HangingSource, config).unwrap();

  match loader.load_more().await {
    LoadOutcome::Failed { reason } => assert!(reason.contains("hanging"), "unexpected reason: {}", reason),
    other => panic!("Expected timeout failure, got {:?}", other),
  }
  assert!(!loader.is_loading());
  assert!(loader.has_more());
}

#[tokio::test]
#[serial]
async fn test_without_timeout_a_hung_request_keeps_loading_until_dropped() {
  setup_tracing();
  let config = CatalogConfig::default().with_request_timeout(None);
  let loader = Arc::new(CatalogLoader::new(HangingSource, config).unwrap());

  let stuck = {
    let loader = Arc::clone(&loader);
    tokio::spawn(async move { loader.load_more().await })
  };
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(loader.is_loading());
  assert_eq!(loader.load_more().await, LoadOutcome::Skipped(SkipReason::InFlight));

  stuck.abort();
  assert!(stuck.await.unwrap_err().is_cancelled());
  assert!(!loader.is_loading());
}

#[tokio::test]
#[serial]
async fn test_source_exhaustion_clears_has_more_before_the_ceiling() {
  setup_tracing();
  let loader = loader(MockProductSource::new().with_max_items(20));
  loader.load_initial().await;

  assert_eq!(loader.load_more().await, LoadOutcome::Appended { page: 1, count: 8 });
  assert!(loader.has_more());
  assert_eq!(loader.load_more().await, LoadOutcome::Appended { page: 2, count: 4 });
  assert!(!loader.has_more());
  assert_eq!(loader.len(), 20);
}

#[tokio::test]
#[serial]
async fn test_exhausted_initial_page_disables_load_more() {
  setup_tracing();
  let source = ScriptedSource::new(vec![Page::last(vec![product(1, "Only Item")])]);
  let loader = loader(source);

  loader.load_initial().await;
  assert!(!loader.has_more());
  assert_eq!(loader.load_more().await, LoadOutcome::Skipped(SkipReason::Exhausted));
  assert_eq!(loader.source().requests.lock().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_page_requests_are_seeded_from_list_length_and_cursor() {
  setup_tracing();
  let source = ScriptedSource::new(vec![
    Page::new(vec![product(3, "A"), product(7, "B")]),
    Page::new(vec![product(8, "C")]),
  ]);
  let loader = loader(source);

  loader.load_initial().await;
  loader.load_more().await;
  loader.load_more().await;

  let requests = loader.source().requests.lock().clone();
  assert_eq!(requests.len(), 3);
  assert!(requests[0].is_initial());
  assert_eq!((requests[1].page, requests[1].offset, requests[1].cursor), (1, 2, PageCursor(8)));
  assert_eq!((requests[2].page, requests[2].offset, requests[2].cursor), (2, 3, PageCursor(9)));
  assert!(requests.iter().all(|r| r.limit == 8));
}

#[tokio::test]
#[serial]
async fn test_duplicate_ids_are_appended_not_rejected() {
  setup_tracing();
  let source = ScriptedSource::new(vec![
    Page::new(vec![product(1, "A"), product(2, "B")]),
    Page::new(vec![product(2, "B again"), product(3, "C")]),
  ]);
  let loader = loader(source);

  loader.load_initial().await;
  loader.load_more().await;

  assert_eq!(ids(&loader.products()), vec![1, 2, 2, 3]);
}

#[tokio::test]
#[serial]
async fn test_reset_empties_catalog_and_counters() {
  setup_tracing();
  let loader = loader(MockProductSource::new());
  loader.load_initial().await;
  for _ in 0..5 {
    loader.load_more().await;
  }
  assert!(!loader.has_more());

  loader.reset();
  assert!(loader.is_empty());
  assert!(loader.has_more());
  assert_eq!(loader.pages_loaded(), 0);
}

#[tokio::test]
#[serial]
async fn test_listeners_receive_load_lifecycle_events() {
  setup_tracing();
  let loader = loader(FlakySource::failing_on(&[2]));
  let events = record_events(loader.listeners());

  loader.load_initial().await;
  loader.load_more().await;
  loader.load_more().await;

  let events = events.lock().clone();
  assert_eq!(
    events[..4],
    [
      CatalogEvent::LoadStarted { kind: LoadKind::Initial, page: 0 },
      CatalogEvent::CatalogReplaced { count: 8, has_more: true },
      CatalogEvent::LoadStarted { kind: LoadKind::More, page: 1 },
      CatalogEvent::PageAppended { page: 1, count: 8, total: 16, has_more: true },
    ]
  );
  assert_eq!(events[4], CatalogEvent::LoadStarted { kind: LoadKind::More, page: 2 });
  assert!(matches!(events[5], CatalogEvent::LoadFailed { kind: LoadKind::More, .. }));
  assert_eq!(events.len(), 6);
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
  let result = CatalogLoader::new(MockProductSource::new(), CatalogConfig::default().with_batch_size(0));
  assert!(matches!(result, Err(stockyard::CatalogError::Config(_))));
}
