//! # Topology Snapshot Exporter
//!
//! Produces the denormalized `{nodes, links}` view consumed by the
//! force-directed visualization layer, plus the router interface-IP
//! listing. Pure projection of store state: no hidden caches, so repeated
//! calls over unchanged data yield identical output (store scans are
//! insertion-ordered).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::normalization::router_doc_id;
use crate::schema::GraphEdge;
use crate::store::TopologyStore;

/// Which metric populates link values in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricView {
    Latency,
    Bandwidth,
}

/// One graph vertex: a router or a prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Document id (`Routers/<key>` or `Prefixes/<key>`).
    pub id: String,
    /// Display label (the document key).
    pub label: String,
    /// External display metric (aggregate traffic, centrality); absent when
    /// the analytics source has not populated it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// One graph edge: a LinkEdge or PrefixEdge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotLink {
    pub source: String,
    pub target: String,
    /// The selected metric of the edge; absent when unmeasured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

/// The full `{nodes, links}` view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub links: Vec<SnapshotLink>,
}

pub struct SnapshotExporter<S: TopologyStore> {
    store: Arc<S>,
}

impl<S: TopologyStore> SnapshotExporter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Project the topology into `{nodes, links}` with link values drawn
    /// from the requested metric.
    pub async fn snapshot(&self, view: MetricView) -> Result<TopologySnapshot> {
        let mut nodes = Vec::new();
        for r in self.store.routers().await? {
            nodes.push(SnapshotNode {
                id: r.doc_id(),
                label: r.key.clone(),
                value: r.value,
            });
        }
        for p in self.store.prefixes().await? {
            nodes.push(SnapshotNode {
                id: p.doc_id(),
                label: p.key.clone(),
                value: p.value,
            });
        }

        let mut links = Vec::new();
        for e in self.store.link_edges().await? {
            links.push(Self::link(&GraphEdge::from(&e), view));
        }
        for e in self.store.prefix_edges().await? {
            links.push(Self::link(&GraphEdge::from(&e), view));
        }

        debug!(nodes = nodes.len(), links = links.len(), ?view, "snapshot exported");
        Ok(TopologySnapshot { nodes, links })
    }

    /// Distinct interface IPs of LinkEdges originating at the router, in
    /// first-seen order.
    pub async fn interface_ips(&self, router: &str) -> Result<Vec<String>> {
        let from_id = router_doc_id(router);
        let mut seen = HashSet::new();
        let mut ips = Vec::new();
        for e in self.store.link_edges().await? {
            if e.from == from_id && seen.insert(e.from_ip.clone()) {
                ips.push(e.from_ip);
            }
        }
        Ok(ips)
    }

    fn link(edge: &GraphEdge, view: MetricView) -> SnapshotLink {
        SnapshotLink {
            source: edge.from.clone(),
            target: edge.to.clone(),
            value: match view {
                MetricView::Latency => edge.latency,
                MetricView::Bandwidth => edge.bandwidth,
            },
        }
    }
}
