//! Integration tests for the precomputed path index.
//!
//! Tests cover:
//! - minimum-latency selection over materialized Paths
//! - deterministic tie-breaks by insertion order
//! - unmeasured rows losing to measured ones
//! - EPE lookups per metric collection and their addressing rules

use std::sync::Arc;

use netpath_topology_sdk::schema::{EpeMetric, EpePath, PathRecord};
use netpath_topology_sdk::{MemoryStore, PathIndex, TopologyError};

fn path(source: &str, stack: &str, destination: &str, latency: Option<u64>) -> PathRecord {
    PathRecord {
        source: source.to_string(),
        destination: destination.to_string(),
        label_path: stack.to_string(),
        path: vec![],
        latency,
    }
}

fn epe(source: &str, destination: &str, stack: &str, metric: Option<u64>) -> EpePath {
    EpePath {
        key: String::new(),
        source: source.to_string(),
        destination: destination.to_string(),
        label_path: stack.to_string(),
        metric,
    }
}

#[tokio::test]
async fn best_path_selects_minimum_latency() {
    let store = MemoryStore::new();
    store.upsert_path(path("10.1.2.1", "24001_68", "10.11.0.0_24", Some(30)));
    store.upsert_path(path("10.1.2.1", "24002_68", "10.11.0.0_24", Some(12)));
    store.upsert_path(path("10.1.2.1", "24003_68", "10.11.0.0_24", Some(45)));
    // different destination never competes
    store.upsert_path(path("10.1.2.1", "24004_68", "10.12.0.0_24", Some(1)));

    let index = PathIndex::new(Arc::new(store));
    let best = index.best_path("10.1.2.1", "10.11.0.0_24").await.unwrap().unwrap();
    assert_eq!(best.label_stack, vec!["24002", "68"]);
    assert_eq!(best.latency, Some(12));
}

#[tokio::test]
async fn best_path_normalizes_cidr_destination() {
    let store = MemoryStore::new();
    store.upsert_path(path("10.1.2.1", "24001_68", "10.11.0.0_24", Some(30)));

    let index = PathIndex::new(Arc::new(store));
    let best = index.best_path("10.1.2.1", "10.11.0.0/24").await.unwrap();
    assert!(best.is_some());
}

#[tokio::test]
async fn ties_resolve_to_first_inserted_row_every_time() {
    let store = MemoryStore::new();
    store.upsert_path(path("s", "1_2", "d", Some(10)));
    store.upsert_path(path("s", "3_4", "d", Some(10)));
    store.upsert_path(path("s", "5_6", "d", Some(10)));

    let index = PathIndex::new(Arc::new(store));
    let first = index.best_path("s", "d").await.unwrap().unwrap();
    for _ in 0..10 {
        let again = index.best_path("s", "d").await.unwrap().unwrap();
        assert_eq!(again.key, first.key);
    }
    assert_eq!(first.label_stack, vec!["1", "2"]);
}

#[tokio::test]
async fn unmeasured_paths_lose_to_measured_ones() {
    let store = MemoryStore::new();
    store.upsert_path(path("s", "1_2", "d", None));
    store.upsert_path(path("s", "3_4", "d", Some(500)));

    let index = PathIndex::new(Arc::new(store));
    let best = index.best_path("s", "d").await.unwrap().unwrap();
    assert_eq!(best.latency, Some(500));
}

#[tokio::test]
async fn missing_rows_are_an_empty_result() {
    let index = PathIndex::new(Arc::new(MemoryStore::new()));
    assert!(index.best_path("s", "d").await.unwrap().is_none());
    assert!(index
        .best_epe_path(None, "10.11.0.0_24", EpeMetric::Bandwidth)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn epe_latency_is_source_and_destination_keyed() {
    let store = MemoryStore::new();
    store.insert_epe_path(EpeMetric::Latency, epe("10.1.2.1", "10.11.0.0_24", "24001_68", Some(20)));
    store.insert_epe_path(EpeMetric::Latency, epe("10.1.2.1", "10.11.0.0_24", "24002_68", Some(8)));
    store.insert_epe_path(EpeMetric::Latency, epe("10.9.9.9", "10.11.0.0_24", "24003_68", Some(1)));

    let index = PathIndex::new(Arc::new(store));
    let best = index
        .best_epe_path(Some("10.1.2.1"), "10.11.0.0_24", EpeMetric::Latency)
        .await
        .unwrap()
        .unwrap();
    // the other source's faster path never competes
    assert_eq!(best.label_stack, vec!["24002", "68"]);

    let err = index
        .best_epe_path(None, "10.11.0.0_24", EpeMetric::Latency)
        .await
        .unwrap_err();
    assert!(matches!(err, TopologyError::InvalidArgument(_)));
}

#[tokio::test]
async fn epe_bandwidth_collections_are_destination_keyed() {
    let store = MemoryStore::new();
    store.insert_epe_path(
        EpeMetric::Bandwidth,
        epe("10.1.2.1", "10.11.0.0_24", "24001_68", Some(9_000)),
    );
    store.insert_epe_path(
        EpeMetric::Bandwidth,
        epe("10.9.9.9", "10.11.0.0_24", "24002_68", Some(4_000)),
    );
    // the OpenConfig collection is independent
    store.insert_epe_path(
        EpeMetric::BandwidthOpenConfig,
        epe("10.1.2.1", "10.11.0.0_24", "24003_68", Some(1)),
    );

    let index = PathIndex::new(Arc::new(store));
    let best = index
        .best_epe_path(None, "10.11.0.0_24", EpeMetric::Bandwidth)
        .await
        .unwrap()
        .unwrap();
    // lowest stored bandwidth-cost wins regardless of source
    assert_eq!(best.label_stack, vec!["24002", "68"]);

    let oc = index
        .best_epe_path(None, "10.11.0.0_24", EpeMetric::BandwidthOpenConfig)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(oc.label_stack, vec!["24003", "68"]);
}
