//! # Precomputed Path Index
//!
//! Read-only lookups over materialized paths, for callers that do not need
//! a live traversal: the `Paths` collection for end-to-end routes, and the
//! `EPEPaths_*` collections for egress-peer-engineering candidates.
//!
//! Selection is always "minimum stored metric". For the bandwidth
//! collections this preserves the historical bandwidth-as-cost convention:
//! the raw stored value is minimized, which yields the highest-available-
//! bandwidth egress only when the field encodes available capacity as a
//! cost. Rows are scanned in insertion order, so ties (and the choice among
//! equal candidates) are deterministic across repeated calls; rows with no
//! measured metric lose to any measured row.

use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::normalization::prefix_key;
use crate::schema::{EpeMetric, EpePath, PathRecord};
use crate::store::TopologyStore;

/// Best materialized end-to-end path for a (source, destination) pair.
#[derive(Debug, Clone)]
pub struct BestPath {
    pub key: String,
    /// Full node sequence from source to destination.
    pub path: Vec<String>,
    /// Ordered label stack.
    pub label_stack: Vec<String>,
    pub latency: Option<u64>,
}

/// Best EPE candidate: the record key and its label stack.
#[derive(Debug, Clone)]
pub struct BestEpePath {
    pub key: String,
    pub label_stack: Vec<String>,
}

pub struct PathIndex<S: TopologyStore> {
    store: Arc<S>,
}

impl<S: TopologyStore> PathIndex<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The lowest-latency materialized Path matching (Source, Destination),
    /// or `None` when nothing matches. The destination accepts raw CIDR or
    /// pre-normalized form.
    pub async fn best_path(&self, source: &str, destination: &str) -> Result<Option<BestPath>> {
        let destination = prefix_key(destination);
        let mut best: Option<PathRecord> = None;
        for p in self.store.paths().await? {
            if p.source != source || p.destination != destination {
                continue;
            }
            // strict improvement only, so the first-inserted row wins ties
            if metric_rank(p.latency) < best.as_ref().map_or(u64::MAX, |b| metric_rank(b.latency)) {
                best = Some(p);
            } else if best.is_none() {
                best = Some(p);
            }
        }
        debug!(source, %destination, found = best.is_some(), "best path lookup");
        Ok(best.map(|p| BestPath {
            key: p.key(),
            path: p.path.clone(),
            label_stack: p.label_stack(),
            latency: p.latency,
        }))
    }

    /// The minimum-metric EPE path for a destination. The latency
    /// collection is additionally keyed by source (and requires one); the
    /// bandwidth collections match on destination alone.
    pub async fn best_epe_path(
        &self,
        source: Option<&str>,
        destination: &str,
        metric: EpeMetric,
    ) -> Result<Option<BestEpePath>> {
        let source = match (metric, source) {
            (EpeMetric::Latency, None) => {
                return Err(TopologyError::InvalidArgument(
                    "latency EPE lookup requires a source".to_string(),
                ))
            }
            (EpeMetric::Latency, Some(s)) => Some(s),
            // bandwidth collections are destination-keyed; a supplied source
            // still narrows the candidates
            (_, s) => s,
        };
        let destination = prefix_key(destination);

        let mut best: Option<EpePath> = None;
        for p in self.store.epe_paths(metric).await? {
            if p.destination != destination {
                continue;
            }
            if let Some(src) = source {
                if p.source != src {
                    continue;
                }
            }
            if metric_rank(p.metric) < best.as_ref().map_or(u64::MAX, |b| metric_rank(b.metric)) {
                best = Some(p);
            } else if best.is_none() {
                best = Some(p);
            }
        }
        debug!(
            collection = metric.collection(),
            %destination,
            found = best.is_some(),
            "best EPE path lookup"
        );
        Ok(best.map(|p| BestEpePath {
            key: p.key.clone(),
            label_stack: p.label_stack(),
        }))
    }
}

// Unmeasured rows rank below every measured one. u64::MAX as a real stored
// value would tie with "unmeasured"; insertion order then decides, which is
// still deterministic.
fn metric_rank(value: Option<u64>) -> u64 {
    value.unwrap_or(u64::MAX)
}
