//! # Metric Updater
//!
//! Applies latency observations to LinkEdges, PrefixEdges, and precomputed
//! Paths as telemetry arrives. Records are addressed by composite natural
//! keys (FromIP/ToIP, InterfaceIP/prefix, Source/Label_Path/Destination);
//! every update resolves to exact per-key store mutations, never a range.
//!
//! ## Semantics
//!
//! - The latency argument must parse as a non-negative integer; anything
//!   else fails with `InvalidArgument` before any mutation is attempted.
//! - Zero matches is a successful no-op reporting an empty key list. The
//!   `strict_no_match` setting upgrades that to a `NotFound` error for
//!   deployments that prefer loud failures.
//! - Only the targeted metric field is overwritten; labels and all other
//!   attributes are untouched. Updates never cascade into derived
//!   Paths/EPEPaths; those are refreshed by the out-of-band
//!   precomputation job.
//!
//! ## Addressing modes
//!
//! PrefixEdges accept two historical addressing modes for the same record:
//! by (InterfaceIP, normalized prefix key), or graph-relative, deriving the
//! edge key from the LinkEdges leaving the addressed interface. Both funnel
//! through [`crate::normalization`].

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, TopologyError};
use crate::normalization::{derived_prefix_edge_key, prefix_doc_id};
use crate::settings::Settings;
use crate::store::TopologyStore;

pub struct MetricUpdater<S: TopologyStore> {
    store: Arc<S>,
    settings: Arc<Settings>,
}

impl<S: TopologyStore> MetricUpdater<S> {
    pub fn new(store: Arc<S>, settings: Arc<Settings>) -> Self {
        Self { store, settings }
    }

    /// Update the latency of the LinkEdge identified by (FromIP, ToIP).
    ///
    /// Returns the keys of the affected records (at most one given the
    /// uniqueness invariant on the collection).
    pub async fn update_link_latency(
        &self,
        from_ip: &str,
        to_ip: &str,
        latency: &str,
    ) -> Result<Vec<String>> {
        let latency = parse_latency(latency)?;
        let mut affected = Vec::new();
        for edge in self.store.link_edges().await? {
            if edge.from_ip == from_ip && edge.to_ip == to_ip {
                let key = edge.key();
                if self.store.set_link_edge_latency(&key, latency).await? {
                    affected.push(key);
                }
            }
        }
        self.finish("LinkEdges", &format!("{}->{}", from_ip, to_ip), affected)
    }

    /// Latency of the LinkEdge identified by (FromIP, ToIP). One value per
    /// matched record; unmeasured edges report `None`.
    pub async fn get_link_latency(&self, from_ip: &str, to_ip: &str) -> Result<Vec<Option<u64>>> {
        Ok(self
            .store
            .link_edges()
            .await?
            .into_iter()
            .filter(|e| e.from_ip == from_ip && e.to_ip == to_ip)
            .map(|e| e.latency)
            .collect())
    }

    /// Update the latency of the PrefixEdge identified by
    /// (InterfaceIP, destination prefix). The prefix accepts raw CIDR or
    /// pre-normalized form.
    pub async fn update_prefix_latency(
        &self,
        from_ip: &str,
        to_prefix: &str,
        latency: &str,
    ) -> Result<Vec<String>> {
        let latency = parse_latency(latency)?;
        let to_id = prefix_doc_id(to_prefix);
        let mut affected = Vec::new();
        for edge in self.store.prefix_edges().await? {
            if edge.interface_ip == from_ip && edge.to == to_id {
                let key = edge.key();
                if self.store.set_prefix_edge_latency(&key, latency).await? {
                    affected.push(key);
                }
            }
        }
        self.finish("PrefixEdges", &format!("{}->{}", from_ip, to_prefix), affected)
    }

    pub async fn get_prefix_latency(
        &self,
        from_ip: &str,
        to_prefix: &str,
    ) -> Result<Vec<Option<u64>>> {
        let to_id = prefix_doc_id(to_prefix);
        Ok(self
            .store
            .prefix_edges()
            .await?
            .into_iter()
            .filter(|e| e.interface_ip == from_ip && e.to == to_id)
            .map(|e| e.latency)
            .collect())
    }

    /// Graph-relative addressing mode: locate the PrefixEdge through the
    /// LinkEdges leaving `from_ip`, deriving the composite key
    /// `<sanitized link to>_Prefixes_<prefix key>` for each.
    pub async fn update_prefix_latency_derived(
        &self,
        from_ip: &str,
        to_prefix: &str,
        latency: &str,
    ) -> Result<Vec<String>> {
        let latency = parse_latency(latency)?;
        let mut affected = Vec::new();
        for link in self.store.link_edges().await? {
            if link.from_ip == from_ip {
                let key = derived_prefix_edge_key(&link.to, to_prefix);
                if self.store.set_prefix_edge_latency(&key, latency).await? {
                    affected.push(key);
                }
            }
        }
        self.finish("PrefixEdges", &format!("{}=>{}", from_ip, to_prefix), affected)
    }

    pub async fn get_prefix_latency_derived(
        &self,
        from_ip: &str,
        to_prefix: &str,
    ) -> Result<Vec<Option<u64>>> {
        let mut keys = Vec::new();
        for link in self.store.link_edges().await? {
            if link.from_ip == from_ip {
                keys.push(derived_prefix_edge_key(&link.to, to_prefix));
            }
        }
        Ok(self
            .store
            .prefix_edges()
            .await?
            .into_iter()
            .filter(|e| keys.contains(&e.key()))
            .map(|e| e.latency)
            .collect())
    }

    /// Update the latency of the Path identified by
    /// (Source, Label_Path, Destination). The label stack is the
    /// underscore-joined form (`24004_24001_24011`); ordering is part of
    /// the key and is never permuted.
    pub async fn update_path_latency(
        &self,
        source: &str,
        label_stack: &str,
        destination: &str,
        latency: &str,
    ) -> Result<Vec<String>> {
        let latency = parse_latency(latency)?;
        let mut affected = Vec::new();
        for path in self.store.paths().await? {
            if path.source == source
                && path.label_path == label_stack
                && path.destination == destination
            {
                let key = path.key();
                if self.store.set_path_latency(&key, latency).await? {
                    affected.push(key);
                }
            }
        }
        self.finish(
            "Paths",
            &format!("{}[{}]{}", source, label_stack, destination),
            affected,
        )
    }

    fn finish(&self, collection: &str, target: &str, affected: Vec<String>) -> Result<Vec<String>> {
        if affected.is_empty() {
            debug!(collection, target, "metric update matched no records");
            if self.settings.pathfinding.strict_no_match {
                return Err(TopologyError::NotFound(format!(
                    "no {} record matches {}",
                    collection, target
                )));
            }
        } else {
            info!(collection, target, affected = affected.len(), "latency updated");
        }
        Ok(affected)
    }
}

/// Parse a latency argument as a non-negative integer. Rejects signs,
/// fractions, and non-numeric text before any store mutation happens.
fn parse_latency(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| TopologyError::InvalidArgument(format!("latency '{}' is not a number", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_must_be_a_non_negative_integer() {
        assert!(parse_latency("0").is_ok());
        assert_eq!(parse_latency("42").unwrap(), 42);
        assert!(matches!(
            parse_latency("fast"),
            Err(TopologyError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_latency("-3"),
            Err(TopologyError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_latency("1.5"),
            Err(TopologyError::InvalidArgument(_))
        ));
    }
}
