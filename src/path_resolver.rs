//! # Path Resolver
//!
//! Live weighted shortest-path search over the topology graph. Given a
//! source router and a destination (prefix or router), finds the
//! minimum-cost path under the requested objective and projects the
//! traversed edges onto their `Label` attribute to produce the ordered
//! forwarding label stack.
//!
//! ## Weight strategies
//!
//! One Dijkstra traversal serves both objectives; the objective only
//! selects the weight-extraction strategy:
//!
//! - `Latency`: edge `Latency`, defaulting to a large sentinel (1000) so
//!   unmeasured edges are penalized rather than treated as free.
//! - `Bandwidth`: edge `Bandwidth`, defaulting to a very large sentinel
//!   (minimal available capacity when unmeasured). The stored value is
//!   minimized as a proxy cost, so "highest available bandwidth" holds
//!   only when the field encodes available (not consumed) capacity.
//!
//! ## Results
//!
//! `source == destination` resolves to a present path with an empty label
//! stack. An unreachable destination resolves to `None` — the two cases
//! are distinguishable by presence, never conflated.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::normalization::{canonical_source, host_prefix_key, prefix_key, router_doc_id};
use crate::schema::{GraphEdge, PREFIXES, ROUTERS};
use crate::settings::{PathfindingSettings, Settings};
use crate::store::TopologyStore;

/// The metric a path query optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Latency,
    Bandwidth,
}

impl Objective {
    /// Weight-extraction strategy for one edge: the stored metric, or the
    /// objective's sentinel default when unmeasured.
    fn edge_weight(&self, edge: &GraphEdge, settings: &PathfindingSettings) -> u64 {
        match self {
            Objective::Latency => edge.latency.unwrap_or(settings.default_latency_weight),
            Objective::Bandwidth => edge.bandwidth.unwrap_or(settings.default_bandwidth_weight),
        }
    }
}

/// Destination of a path query.
#[derive(Debug, Clone)]
pub enum QueryTarget {
    /// A router, addressed by its key.
    Router(String),
    /// A prefix, addressed by CIDR or pre-normalized key.
    Prefix(String),
}

impl QueryTarget {
    fn doc_id(&self) -> String {
        match self {
            QueryTarget::Router(key) => format!("{}/{}", ROUTERS, key),
            QueryTarget::Prefix(raw) => format!("{}/{}", PREFIXES, prefix_key(raw)),
        }
    }
}

/// A resolved minimum-cost path.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    /// Node document ids in traversal order, source first.
    pub nodes: Vec<String>,
    /// Non-empty labels of the traversed edges, in traversal order.
    pub labels: Vec<String>,
    /// Total cost under the requested objective.
    pub cost: u64,
}

pub struct PathResolver<S: TopologyStore> {
    store: Arc<S>,
    settings: Arc<Settings>,
}

impl<S: TopologyStore> PathResolver<S> {
    pub fn new(store: Arc<S>, settings: Arc<Settings>) -> Self {
        Self { store, settings }
    }

    /// Resolve the minimum-cost path from a source router to a target under
    /// the given objective. Returns `Ok(None)` when no path exists.
    pub async fn resolve_path(
        &self,
        source: &str,
        target: QueryTarget,
        objective: Objective,
    ) -> Result<Option<ResolvedPath>> {
        let source = canonical_source(source, &self.settings.aliases.source_rewrites);
        let from_id = router_doc_id(&source);
        let to_id = target.doc_id();

        if from_id == to_id {
            return Ok(Some(ResolvedPath {
                nodes: vec![from_id],
                labels: Vec::new(),
                cost: 0,
            }));
        }

        let mut edges: Vec<GraphEdge> = Vec::new();
        for e in self.store.link_edges().await? {
            edges.push(GraphEdge::from(&e));
        }
        for e in self.store.prefix_edges().await? {
            edges.push(GraphEdge::from(&e));
        }

        let settings = &self.settings.pathfinding;
        let found = shortest_path(&edges, &from_id, &to_id, |e| {
            objective.edge_weight(e, settings)
        });

        let (cost, hops) = match found {
            Some(result) => result,
            None => {
                debug!(%from_id, %to_id, ?objective, "no path");
                return Ok(None);
            }
        };

        let mut nodes = vec![from_id];
        let mut labels = Vec::new();
        for idx in hops {
            let edge = &edges[idx];
            nodes.push(edge.to.clone());
            if let Some(label) = &edge.label {
                if !label.is_empty() {
                    labels.push(label.clone());
                }
            }
        }
        debug!(hops = nodes.len() - 1, cost, ?objective, "path resolved");
        Ok(Some(ResolvedPath { nodes, labels, cost }))
    }

    /// Label stack steering traffic from a router to a host, the
    /// lowest-latency way. The host may be a raw IP covered by the
    /// host-to-prefix alias table, a bare prefix (gains the default mask
    /// length), or a full CIDR/prefix key. Returns an empty stack when no
    /// path exists, matching the historical behavior of this query.
    pub async fn label_stack_for_host(&self, router: &str, host: &str) -> Result<Vec<String>> {
        let key = host_prefix_key(
            host,
            &self.settings.aliases.host_to_prefix,
            self.settings.pathfinding.default_prefix_masklen,
        );
        let resolved = self
            .resolve_path(router, QueryTarget::Prefix(key), Objective::Latency)
            .await?;
        Ok(resolved.map(|p| p.labels).unwrap_or_default())
    }
}

/// Dijkstra over the directed edge list. Weights come from the supplied
/// strategy and must be non-negative (guaranteed by the u64 domain).
///
/// Returns the total cost and the traversed edge indices in order, or
/// `None` when the target is unreachable. Heap entries tie-break on node
/// id so equal-cost searches are deterministic across calls.
fn shortest_path<F>(edges: &[GraphEdge], from: &str, to: &str, weight: F) -> Option<(u64, Vec<usize>)>
where
    F: Fn(&GraphEdge) -> u64,
{
    let mut adjacency: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        adjacency.entry(edge.from.as_str()).or_default().push(idx);
    }

    let mut dist: HashMap<&str, u64> = HashMap::new();
    let mut prev: HashMap<&str, usize> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<(u64, &str)>> = BinaryHeap::new();

    dist.insert(from, 0);
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if cost > *dist.get(node).unwrap_or(&u64::MAX) {
            continue; // stale entry
        }
        if node == to {
            break;
        }
        let Some(out) = adjacency.get(node) else {
            continue;
        };
        for &idx in out {
            let edge = &edges[idx];
            let next = cost.saturating_add(weight(edge));
            if next < *dist.get(edge.to.as_str()).unwrap_or(&u64::MAX) {
                dist.insert(edge.to.as_str(), next);
                prev.insert(edge.to.as_str(), idx);
                heap.push(Reverse((next, edge.to.as_str())));
            }
        }
    }

    let total = *dist.get(to)?;
    let mut hops = Vec::new();
    let mut node = to;
    while node != from {
        let idx = *prev.get(node)?;
        hops.push(idx);
        node = edges[idx].from.as_str();
    }
    hops.reverse();
    Some((total, hops))
}
