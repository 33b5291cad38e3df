//! # Netpath Topology SDK
//!
//! A Rust library modeling a network topology as a weighted multi-graph and
//! answering traffic-engineering queries: lowest-latency or
//! highest-available-bandwidth paths between routers, prefixes, and
//! external peers, returned as the ordered stack of forwarding labels
//! (segment-routing/MPLS style) that steers traffic along the chosen path.
//!
//! ## Overview
//!
//! The SDK is the schema and query core of a larger system. It focuses on:
//!
//! - **Schema**: routers, prefixes, link/prefix edges, precomputed paths,
//!   and egress-peer-engineering (EPE) paths
//! - **Metric updates**: applying latency observations to edges and paths
//!   as telemetry arrives
//! - **Path resolution**: weighted shortest-path search over two metric
//!   dimensions with label-stack derivation
//! - **Materialized lookups**: best precomputed path / EPE candidate by
//!   stored metric
//! - **Snapshot export**: the `{nodes, links}` view for visualization
//!
//! HTTP routing, the graph-database engine, telemetry ingestion, and
//! rendering are external collaborators; the store sits behind the
//! [`store::TopologyStore`] trait.
//!
//! ## Architecture
//!
//! ### Store layer
//! Document/edge collections with atomic per-key metric mutation. The
//! in-memory backend serves tests and the CLI; production uses an external
//! graph database behind the same trait.
//!
//! ### Query layer
//! One generic Dijkstra traversal parameterized by a weight-extraction
//! strategy serves both objectives; precomputed-path lookups avoid
//! traversal entirely.
//!
//! ### Normalization layer
//! Every entry point addressing a prefix funnels through one normalization
//! function; topology-specific alias tables are configuration, not code.

// Core Types
/// Entity schema: documents, edges, materialized paths
pub mod schema;
/// Error taxonomy
pub mod error;

// Store Layer
/// Persistence seam and in-memory reference backend
pub mod store;

// Query Layer
/// Key normalization and alias handling
pub mod normalization;
/// Latency updates for edges and paths
pub mod metric_updater;
/// Live weighted shortest-path search and label-stack derivation
pub mod path_resolver;
/// Materialized best-path / EPE lookups
pub mod path_index;
/// `{nodes, links}` export for visualization
pub mod snapshot;

// Settings & Configuration
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use error::{Result, TopologyError};
pub use metric_updater::MetricUpdater;
pub use path_index::PathIndex;
pub use path_resolver::{Objective, PathResolver, QueryTarget, ResolvedPath};
pub use settings::Settings;
pub use snapshot::{MetricView, SnapshotExporter};
pub use store::{MemoryStore, TopologyStore};
