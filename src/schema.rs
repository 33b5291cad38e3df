//! # Topology Schema
//!
//! Entity types for the topology graph: documents (routers, prefixes),
//! edges (router links, prefix edges), and materialized paths.
//!
//! ## Overview
//!
//! The schema mirrors the collection layout of the underlying graph store:
//!
//! - `Routers` / `Prefixes`: document collections, the graph vertices
//! - `LinkEdges` / `PrefixEdges`: edge collections, bound into the `topology` graph
//! - `Paths`: precomputed end-to-end routes with label stacks
//! - `EPEPaths_*`: precomputed egress-peer-engineering paths, one collection
//!   per metric variant
//!
//! Every edge carries a `from`/`to` pair referencing document ids of the form
//! `Routers/<key>` or `Prefixes/<key>`. Label stacks are encoded as
//! underscore-joined token sequences (e.g. `24004_24001_24011`); ordering
//! encodes traversal order from source to destination and is never permuted.

use serde::{Deserialize, Serialize};

/// Router document collection.
pub const ROUTERS: &str = "Routers";
/// Prefix document collection.
pub const PREFIXES: &str = "Prefixes";
/// Router-to-router (and router-to-boundary) edge collection.
pub const LINK_EDGES: &str = "LinkEdges";
/// Router-interface-to-external-prefix edge collection.
pub const PREFIX_EDGES: &str = "PrefixEdges";
/// Precomputed path collection.
pub const PATHS: &str = "Paths";
/// Named graph binding `Routers`/`Prefixes` via `LinkEdges`/`PrefixEdges`.
pub const TOPOLOGY_GRAPH: &str = "topology";

/// A network device. The key is the router identifier (management IP or name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Router {
    pub key: String,
    /// Interface IPs owned by this router.
    #[serde(default)]
    pub interface_ips: Vec<String>,
    /// Optional display metric supplied by external analytics (surfaced only
    /// through the snapshot exporter).
    #[serde(default)]
    pub value: Option<f64>,
}

impl Router {
    /// Full document id, e.g. `Routers/10.0.0.1`.
    pub fn doc_id(&self) -> String {
        format!("{}/{}", ROUTERS, self.key)
    }
}

/// A reachable destination address block, keyed by the normalized CIDR
/// (`10.0.0.0/24` -> `10.0.0.0_24`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefix {
    pub key: String,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Prefix {
    /// Full document id, e.g. `Prefixes/10.0.0.0_24`.
    pub fn doc_id(&self) -> String {
        format!("{}/{}", PREFIXES, self.key)
    }
}

/// Directed edge between two routers (or a router and a boundary prefix),
/// keyed by its (FromIP, ToIP) pair.
///
/// `latency` and `bandwidth` are mutable telemetry fields; `label` is the
/// forwarding label for this hop and is immutable once assigned. Absent
/// metrics are `None`; path search substitutes a sentinel default at query
/// time but the stored value is never synthesized from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEdge {
    /// Source document id (`Routers/<key>`).
    pub from: String,
    /// Target document id (`Routers/<key>` or `Prefixes/<key>`).
    pub to: String,
    pub from_ip: String,
    pub to_ip: String,
    #[serde(default)]
    pub latency: Option<u64>,
    #[serde(default)]
    pub bandwidth: Option<u64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl LinkEdge {
    /// Composite key: `<FromIP>_<ToIP>`. Unique within the collection.
    pub fn key(&self) -> String {
        format!("{}_{}", self.from_ip, self.to_ip)
    }
}

/// Directed edge from an internal router interface to an external prefix.
///
/// The key is the sanitized `<from>_<to>` pair (document ids with `/`
/// replaced by `_`), which is also the form derived by the graph-relative
/// addressing mode of the metric updater.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixEdge {
    /// Source document id (`Routers/<key>`).
    pub from: String,
    /// Target document id (`Prefixes/<key>`).
    pub to: String,
    /// IP of the internal interface facing the external peer.
    pub interface_ip: String,
    #[serde(default)]
    pub latency: Option<u64>,
    #[serde(default)]
    pub bandwidth: Option<u64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl PrefixEdge {
    /// Composite key: `Routers_<router>_Prefixes_<prefix>`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.from.replace('/', "_"), self.to.replace('/', "_"))
    }
}

/// A precomputed end-to-end route, keyed by (Source, Label_Path, Destination).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRecord {
    pub source: String,
    pub destination: String,
    /// Ordered label stack, underscore-joined (`24004_24001_24011`).
    pub label_path: String,
    /// Full node sequence from source to destination.
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub latency: Option<u64>,
}

impl PathRecord {
    /// Natural key: `<Source>_<Label_Path>_<Destination>`.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.source, self.label_path, self.destination)
    }

    /// Label stack as an ordered token sequence.
    pub fn label_stack(&self) -> Vec<String> {
        split_label_path(&self.label_path)
    }
}

/// Metric variant of a precomputed EPE path collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpeMetric {
    Latency,
    Bandwidth,
    /// Bandwidth derived from OpenConfig telemetry rather than static config.
    BandwidthOpenConfig,
}

impl EpeMetric {
    /// Backing collection name in the store.
    pub fn collection(&self) -> &'static str {
        match self {
            EpeMetric::Latency => "EPEPaths_Latency",
            EpeMetric::Bandwidth => "EPEPaths_Bandwidth",
            EpeMetric::BandwidthOpenConfig => "EPEPaths_Bandwidth_OpenConfig",
        }
    }
}

/// A precomputed egress-peer-engineering path. Keyed synthetically at insert;
/// `metric` holds the latency or bandwidth-cost value depending on the
/// collection the record lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpePath {
    /// Synthetic key, assigned by the store when empty at insert.
    #[serde(default)]
    pub key: String,
    pub source: String,
    pub destination: String,
    pub label_path: String,
    #[serde(default)]
    pub metric: Option<u64>,
}

impl EpePath {
    pub fn label_stack(&self) -> Vec<String> {
        split_label_path(&self.label_path)
    }
}

/// Uniform edge view used by path search and the snapshot exporter; a
/// projection of either a [`LinkEdge`] or a [`PrefixEdge`].
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub latency: Option<u64>,
    pub bandwidth: Option<u64>,
    pub label: Option<String>,
}

impl From<&LinkEdge> for GraphEdge {
    fn from(e: &LinkEdge) -> Self {
        GraphEdge {
            from: e.from.clone(),
            to: e.to.clone(),
            latency: e.latency,
            bandwidth: e.bandwidth,
            label: e.label.clone(),
        }
    }
}

impl From<&PrefixEdge> for GraphEdge {
    fn from(e: &PrefixEdge) -> Self {
        GraphEdge {
            from: e.from.clone(),
            to: e.to.clone(),
            latency: e.latency,
            bandwidth: e.bandwidth,
            label: e.label.clone(),
        }
    }
}

fn split_label_path(label_path: &str) -> Vec<String> {
    label_path
        .split('_')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_edge_key_is_from_to_pair() {
        let e = LinkEdge {
            from: "Routers/r1".into(),
            to: "Routers/r2".into(),
            from_ip: "10.1.1.0".into(),
            to_ip: "10.1.1.1".into(),
            latency: None,
            bandwidth: None,
            label: None,
        };
        assert_eq!(e.key(), "10.1.1.0_10.1.1.1");
    }

    #[test]
    fn prefix_edge_key_sanitizes_doc_ids() {
        let e = PrefixEdge {
            from: "Routers/r3".into(),
            to: "Prefixes/10.11.0.0_24".into(),
            interface_ip: "10.1.2.2".into(),
            latency: None,
            bandwidth: None,
            label: None,
        };
        assert_eq!(e.key(), "Routers_r3_Prefixes_10.11.0.0_24");
    }

    #[test]
    fn path_record_label_stack_splits_in_order() {
        let p = PathRecord {
            source: "10.1.2.1".into(),
            destination: "10.11.0.0_24".into(),
            label_path: "24004_24001_24011".into(),
            path: vec![],
            latency: Some(12),
        };
        assert_eq!(p.label_stack(), vec!["24004", "24001", "24011"]);
        assert_eq!(p.key(), "10.1.2.1_24004_24001_24011_10.11.0.0_24");
    }
}
