//! # Topology Store
//!
//! The persistence seam of the SDK. The production deployment keeps the
//! topology in an external graph database; everything above this module
//! only assumes document/edge collections with atomic per-key field
//! mutation. [`TopologyStore`] is that contract, and [`MemoryStore`] is the
//! in-process reference backend used by tests and the CLI.
//!
//! ## Consistency
//!
//! The store is the single source of truth and the sole synchronization
//! point: no caching or locking happens above it. Each metric mutation
//! targets exactly one document key and applies atomically with
//! last-write-wins semantics. A scan started before a concurrent write may
//! observe a mix of pre- and post-update values; that eventual-consistency
//! window is accepted by design.
//!
//! ## Thread safety
//!
//! `MemoryStore` uses `DashMap` for lock-free concurrent access, allowing
//! resolver scans to run alongside metric updates without blocking.
//! Scans return documents in insertion order (a per-store sequence number
//! is assigned at insert), which is what makes index tie-breaks and
//! snapshot output deterministic across calls.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::StoreError;
use crate::schema::{EpeMetric, EpePath, LinkEdge, PathRecord, Prefix, PrefixEdge, Router};

/// Contract the core components hold against the persistence layer.
///
/// Collection scans return full documents; the matching logic (exact
/// composite-key filters, normalization) lives in the components, not in
/// the store. Mutators target one document by key and report whether a
/// record was touched.
#[async_trait]
pub trait TopologyStore: Send + Sync {
    async fn routers(&self) -> Result<Vec<Router>, StoreError>;
    async fn prefixes(&self) -> Result<Vec<Prefix>, StoreError>;
    async fn link_edges(&self) -> Result<Vec<LinkEdge>, StoreError>;
    async fn prefix_edges(&self) -> Result<Vec<PrefixEdge>, StoreError>;
    async fn paths(&self) -> Result<Vec<PathRecord>, StoreError>;
    async fn epe_paths(&self, metric: EpeMetric) -> Result<Vec<EpePath>, StoreError>;

    /// Overwrite the Latency field of one LinkEdge. Returns false when the
    /// key does not exist (the caller decides whether that is an error).
    async fn set_link_edge_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError>;
    /// Overwrite the Latency field of one PrefixEdge.
    async fn set_prefix_edge_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError>;
    /// Overwrite the Latency field of one Path record.
    async fn set_path_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError>;
}

struct Versioned<T> {
    seq: u64,
    doc: T,
}

/// In-memory reference backend.
///
/// Documents are held per collection in `DashMap`s keyed by document key;
/// an insertion sequence number preserves scan order. Suitable for tests,
/// the CLI, and small lab topologies; the external graph database replaces
/// it in production behind the same trait.
#[derive(Default)]
pub struct MemoryStore {
    seq: AtomicU64,
    routers: DashMap<String, Versioned<Router>>,
    prefixes: DashMap<String, Versioned<Prefix>>,
    link_edges: DashMap<String, Versioned<LinkEdge>>,
    prefix_edges: DashMap<String, Versioned<PrefixEdge>>,
    paths: DashMap<String, Versioned<PathRecord>>,
    epe_latency: DashMap<String, Versioned<EpePath>>,
    epe_bandwidth: DashMap<String, Versioned<EpePath>>,
    epe_bandwidth_openconfig: DashMap<String, Versioned<EpePath>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a topology seed (discovery output captured as JSON).
    pub fn from_seed(seed: TopologySeed) -> Self {
        let store = Self::new();
        for r in seed.routers {
            store.upsert_router(r);
        }
        for p in seed.prefixes {
            store.upsert_prefix(p);
        }
        for e in seed.link_edges {
            store.upsert_link_edge(e);
        }
        for e in seed.prefix_edges {
            store.upsert_prefix_edge(e);
        }
        for p in seed.paths {
            store.upsert_path(p);
        }
        for p in seed.epe_paths_latency {
            store.insert_epe_path(EpeMetric::Latency, p);
        }
        for p in seed.epe_paths_bandwidth {
            store.insert_epe_path(EpeMetric::Bandwidth, p);
        }
        for p in seed.epe_paths_bandwidth_openconfig {
            store.insert_epe_path(EpeMetric::BandwidthOpenConfig, p);
        }
        debug!(
            routers = store.routers.len(),
            prefixes = store.prefixes.len(),
            link_edges = store.link_edges.len(),
            prefix_edges = store.prefix_edges.len(),
            "memory store seeded"
        );
        store
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn upsert_router(&self, router: Router) -> String {
        let key = router.key.clone();
        let seq = self.next_seq();
        self.routers.insert(key.clone(), Versioned { seq, doc: router });
        key
    }

    pub fn upsert_prefix(&self, prefix: Prefix) -> String {
        let key = prefix.key.clone();
        let seq = self.next_seq();
        self.prefixes.insert(key.clone(), Versioned { seq, doc: prefix });
        key
    }

    pub fn upsert_link_edge(&self, edge: LinkEdge) -> String {
        let key = edge.key();
        let seq = self.next_seq();
        self.link_edges.insert(key.clone(), Versioned { seq, doc: edge });
        key
    }

    pub fn upsert_prefix_edge(&self, edge: PrefixEdge) -> String {
        let key = edge.key();
        let seq = self.next_seq();
        self.prefix_edges.insert(key.clone(), Versioned { seq, doc: edge });
        key
    }

    pub fn upsert_path(&self, path: PathRecord) -> String {
        let key = path.key();
        let seq = self.next_seq();
        self.paths.insert(key.clone(), Versioned { seq, doc: path });
        key
    }

    /// Insert an EPE path, assigning a synthetic key when the record arrives
    /// without one (the normal case for precomputation output).
    pub fn insert_epe_path(&self, metric: EpeMetric, mut path: EpePath) -> String {
        let seq = self.next_seq();
        if path.key.is_empty() {
            path.key = format!("{}_{}", metric.collection(), seq);
        }
        let key = path.key.clone();
        self.epe_collection(metric).insert(key.clone(), Versioned { seq, doc: path });
        key
    }

    fn epe_collection(&self, metric: EpeMetric) -> &DashMap<String, Versioned<EpePath>> {
        match metric {
            EpeMetric::Latency => &self.epe_latency,
            EpeMetric::Bandwidth => &self.epe_bandwidth,
            EpeMetric::BandwidthOpenConfig => &self.epe_bandwidth_openconfig,
        }
    }

    fn scan<T: Clone>(map: &DashMap<String, Versioned<T>>) -> Vec<T> {
        let mut entries: Vec<(u64, T)> = map
            .iter()
            .map(|entry| (entry.value().seq, entry.value().doc.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, doc)| doc).collect()
    }
}

#[async_trait]
impl TopologyStore for MemoryStore {
    async fn routers(&self) -> Result<Vec<Router>, StoreError> {
        Ok(Self::scan(&self.routers))
    }

    async fn prefixes(&self) -> Result<Vec<Prefix>, StoreError> {
        Ok(Self::scan(&self.prefixes))
    }

    async fn link_edges(&self) -> Result<Vec<LinkEdge>, StoreError> {
        Ok(Self::scan(&self.link_edges))
    }

    async fn prefix_edges(&self) -> Result<Vec<PrefixEdge>, StoreError> {
        Ok(Self::scan(&self.prefix_edges))
    }

    async fn paths(&self) -> Result<Vec<PathRecord>, StoreError> {
        Ok(Self::scan(&self.paths))
    }

    async fn epe_paths(&self, metric: EpeMetric) -> Result<Vec<EpePath>, StoreError> {
        Ok(Self::scan(self.epe_collection(metric)))
    }

    async fn set_link_edge_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError> {
        match self.link_edges.get_mut(key) {
            Some(mut entry) => {
                entry.doc.latency = Some(latency);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_prefix_edge_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError> {
        match self.prefix_edges.get_mut(key) {
            Some(mut entry) => {
                entry.doc.latency = Some(latency);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_path_latency(&self, key: &str, latency: u64) -> Result<bool, StoreError> {
        match self.paths.get_mut(key) {
            Some(mut entry) => {
                entry.doc.latency = Some(latency);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// On-disk topology seed format consumed by [`MemoryStore::from_seed`].
/// Produced by capturing discovery/precomputation output as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologySeed {
    #[serde(default)]
    pub routers: Vec<Router>,
    #[serde(default)]
    pub prefixes: Vec<Prefix>,
    #[serde(default)]
    pub link_edges: Vec<LinkEdge>,
    #[serde(default)]
    pub prefix_edges: Vec<PrefixEdge>,
    #[serde(default)]
    pub paths: Vec<PathRecord>,
    #[serde(default)]
    pub epe_paths_latency: Vec<EpePath>,
    #[serde(default)]
    pub epe_paths_bandwidth: Vec<EpePath>,
    #[serde(default)]
    pub epe_paths_bandwidth_openconfig: Vec<EpePath>,
}
