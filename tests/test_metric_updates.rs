//! Integration tests for the metric updater.
//!
//! Tests cover:
//! - update/get round trips for link, prefix-edge, and path latency
//! - InvalidArgument rejection before mutation
//! - no-op-on-no-match semantics and the strict variant
//! - both prefix-edge addressing modes resolving the same record

use std::sync::Arc;

use netpath_topology_sdk::schema::{LinkEdge, PathRecord, PrefixEdge};
use netpath_topology_sdk::{MemoryStore, MetricUpdater, Settings, TopologyError};

fn link(from: &str, to: &str, from_ip: &str, to_ip: &str, label: &str) -> LinkEdge {
    LinkEdge {
        from: format!("Routers/{}", from),
        to: format!("Routers/{}", to),
        from_ip: from_ip.to_string(),
        to_ip: to_ip.to_string(),
        latency: None,
        bandwidth: None,
        label: Some(label.to_string()),
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.upsert_link_edge(link("r1", "r2", "10.1.1.0", "10.1.1.1", "24001"));
    store.upsert_link_edge(link("r2", "r3", "10.1.1.2", "10.1.1.3", "24002"));
    store.upsert_prefix_edge(PrefixEdge {
        from: "Routers/r3".into(),
        to: "Prefixes/10.11.0.0_24".into(),
        interface_ip: "10.1.1.3".into(),
        latency: Some(7),
        bandwidth: None,
        label: Some("68".into()),
    });
    store.upsert_path(PathRecord {
        source: "10.1.2.1".into(),
        destination: "10.11.0.0_24".into(),
        label_path: "24001_24002_68".into(),
        path: vec!["Routers/r1".into(), "Routers/r2".into(), "Routers/r3".into()],
        latency: Some(30),
    });
    Arc::new(store)
}

fn updater(store: Arc<MemoryStore>) -> MetricUpdater<MemoryStore> {
    MetricUpdater::new(store, Arc::new(Settings::default()))
}

#[tokio::test]
async fn link_latency_round_trip() {
    let store = seeded_store();
    let updater = updater(store);

    let affected = updater
        .update_link_latency("10.1.1.0", "10.1.1.1", "12")
        .await
        .unwrap();
    assert_eq!(affected, vec!["10.1.1.0_10.1.1.1"]);

    let values = updater.get_link_latency("10.1.1.0", "10.1.1.1").await.unwrap();
    assert_eq!(values, vec![Some(12)]);
}

#[tokio::test]
async fn non_numeric_latency_is_rejected_before_mutation() {
    let store = seeded_store();
    let updater = updater(store);

    updater
        .update_link_latency("10.1.1.0", "10.1.1.1", "55")
        .await
        .unwrap();

    for bad in ["abc", "-1", "3.5", ""] {
        let err = updater
            .update_link_latency("10.1.1.0", "10.1.1.1", bad)
            .await
            .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidArgument(_)), "{:?}", err);
    }

    // the edge kept its previous value
    let values = updater.get_link_latency("10.1.1.0", "10.1.1.1").await.unwrap();
    assert_eq!(values, vec![Some(55)]);
}

#[tokio::test]
async fn no_match_is_a_zero_key_noop() {
    let store = seeded_store();
    let updater = updater(store);

    let affected = updater
        .update_link_latency("192.0.2.1", "192.0.2.2", "5")
        .await
        .unwrap();
    assert!(affected.is_empty());
}

#[tokio::test]
async fn strict_no_match_fails_loudly() {
    let store = seeded_store();
    let mut settings = Settings::default();
    settings.pathfinding.strict_no_match = true;
    let updater = MetricUpdater::new(store, Arc::new(settings));

    let err = updater
        .update_link_latency("192.0.2.1", "192.0.2.2", "5")
        .await
        .unwrap_err();
    assert!(matches!(err, TopologyError::NotFound(_)));
}

#[tokio::test]
async fn prefix_latency_accepts_cidr_and_normalized_key() {
    let store = seeded_store();
    let updater = updater(store);

    let via_cidr = updater
        .update_prefix_latency("10.1.1.3", "10.11.0.0/24", "9")
        .await
        .unwrap();
    assert_eq!(via_cidr, vec!["Routers_r3_Prefixes_10.11.0.0_24"]);

    // the pre-normalized form addresses the same record
    let values = updater
        .get_prefix_latency("10.1.1.3", "10.11.0.0_24")
        .await
        .unwrap();
    assert_eq!(values, vec![Some(9)]);
}

#[tokio::test]
async fn derived_mode_addresses_the_same_prefix_edge() {
    let store = seeded_store();
    let updater = updater(store);

    // r2's interface 10.1.1.2 links to r3, which owns the prefix edge
    let affected = updater
        .update_prefix_latency_derived("10.1.1.2", "10.11.0.0/24", "11")
        .await
        .unwrap();
    assert_eq!(affected, vec!["Routers_r3_Prefixes_10.11.0.0_24"]);

    let values = updater
        .get_prefix_latency("10.1.1.3", "10.11.0.0_24")
        .await
        .unwrap();
    assert_eq!(values, vec![Some(11)]);

    let derived = updater
        .get_prefix_latency_derived("10.1.1.2", "10.11.0.0_24")
        .await
        .unwrap();
    assert_eq!(derived, vec![Some(11)]);
}

#[tokio::test]
async fn path_latency_is_keyed_by_source_stack_destination() {
    let store = seeded_store();
    let updater = updater(store);

    let affected = updater
        .update_path_latency("10.1.2.1", "24001_24002_68", "10.11.0.0_24", "21")
        .await
        .unwrap();
    assert_eq!(affected, vec!["10.1.2.1_24001_24002_68_10.11.0.0_24"]);

    // a permuted stack is a different key, so nothing matches
    let affected = updater
        .update_path_latency("10.1.2.1", "68_24002_24001", "10.11.0.0_24", "21")
        .await
        .unwrap();
    assert!(affected.is_empty());
}
