//! # Topology Query CLI
//!
//! Operational entry point for the Netpath Topology SDK: loads a topology
//! seed (JSON capture of discovery/precomputation output) into the
//! in-memory store and runs any of the SDK operations against it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin topology_query -- --seed topology.json \
//!     resolve --source 10.1.2.1 --destination 10.11.0.0/24 --objective latency
//! ```
//!
//! Output is JSON on stdout; diagnostics go to stderr via tracing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::sync::Arc;
use tracing::info;

use netpath_topology_sdk::schema::EpeMetric;
use netpath_topology_sdk::store::TopologySeed;
use netpath_topology_sdk::{
    MemoryStore, MetricUpdater, MetricView, Objective, PathIndex, PathResolver, QueryTarget,
    Settings, SnapshotExporter,
};

#[derive(Parser)]
#[command(name = "topology_query", about = "Query a topology seed with the Netpath SDK")]
struct Cli {
    /// Topology seed file (JSON). Falls back to `store.seed_file` in Config.toml.
    #[arg(long)]
    seed: Option<String>,
    /// Settings file; defaults to Config.toml in the working directory.
    #[arg(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    Latency,
    Bandwidth,
}

impl From<ObjectiveArg> for Objective {
    fn from(o: ObjectiveArg) -> Self {
        match o {
            ObjectiveArg::Latency => Objective::Latency,
            ObjectiveArg::Bandwidth => Objective::Bandwidth,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EpeMetricArg {
    Latency,
    Bandwidth,
    BandwidthOpenconfig,
}

impl From<EpeMetricArg> for EpeMetric {
    fn from(m: EpeMetricArg) -> Self {
        match m {
            EpeMetricArg::Latency => EpeMetric::Latency,
            EpeMetricArg::Bandwidth => EpeMetric::Bandwidth,
            EpeMetricArg::BandwidthOpenconfig => EpeMetric::BandwidthOpenConfig,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Live weighted shortest path and its label stack
    Resolve {
        #[arg(long)]
        source: String,
        /// Destination prefix (CIDR or prefix key)
        #[arg(long)]
        destination: String,
        #[arg(long, value_enum, default_value = "latency")]
        objective: ObjectiveArg,
    },
    /// Label stack for router->host (host aliases apply)
    Labels {
        #[arg(long)]
        router: String,
        #[arg(long)]
        host: String,
    },
    /// Lowest-latency materialized path for (source, destination)
    BestPath {
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
    },
    /// Minimum-metric EPE path for a destination
    BestEpe {
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        destination: String,
        #[arg(long, value_enum, default_value = "latency")]
        metric: EpeMetricArg,
    },
    /// Update the latency of a LinkEdge
    UpdateLink {
        #[arg(long)]
        from_ip: String,
        #[arg(long)]
        to_ip: String,
        #[arg(long)]
        latency: String,
    },
    /// Update the latency of a PrefixEdge
    UpdatePrefix {
        #[arg(long)]
        from_ip: String,
        #[arg(long)]
        to_prefix: String,
        #[arg(long)]
        latency: String,
        /// Use the graph-relative addressing mode
        #[arg(long)]
        derived: bool,
    },
    /// Update the latency of a materialized Path
    UpdatePath {
        #[arg(long)]
        source: String,
        /// Underscore-joined label stack (e.g. 24004_24001_24011)
        #[arg(long)]
        label_stack: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        latency: String,
    },
    /// {nodes, links} view for visualization
    Snapshot {
        #[arg(long, value_enum, default_value = "latency")]
        view: ObjectiveArg,
    },
    /// Interface IPs of a router
    InterfaceIps {
        #[arg(long)]
        router: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };
    let settings = Arc::new(settings);

    let seed_path = cli
        .seed
        .clone()
        .or_else(|| settings.store.seed_file.clone())
        .context("no topology seed: pass --seed or set store.seed_file")?;
    let raw = fs::read_to_string(&seed_path)
        .with_context(|| format!("failed to read seed file {}", seed_path))?;
    let seed: TopologySeed =
        serde_json::from_str(&raw).with_context(|| format!("invalid seed file {}", seed_path))?;
    let store = Arc::new(MemoryStore::from_seed(seed));
    info!(seed = %seed_path, "topology loaded");

    match cli.command {
        Command::Resolve {
            source,
            destination,
            objective,
        } => {
            let resolver = PathResolver::new(store, settings);
            let resolved = resolver
                .resolve_path(&source, QueryTarget::Prefix(destination), objective.into())
                .await?;
            match resolved {
                Some(p) => print_json(&serde_json::json!({
                    "nodes": p.nodes,
                    "labels": p.labels,
                    "cost": p.cost,
                }))?,
                None => print_json(&serde_json::json!({ "found": false }))?,
            }
        }
        Command::Labels { router, host } => {
            let resolver = PathResolver::new(store, settings);
            let labels = resolver.label_stack_for_host(&router, &host).await?;
            print_json(&labels)?;
        }
        Command::BestPath {
            source,
            destination,
        } => {
            let index = PathIndex::new(store);
            match index.best_path(&source, &destination).await? {
                Some(best) => print_json(&serde_json::json!({
                    "key": best.key,
                    "path": best.path,
                    "label_stack": best.label_stack,
                    "latency": best.latency,
                }))?,
                None => print_json(&serde_json::json!([]))?,
            }
        }
        Command::BestEpe {
            source,
            destination,
            metric,
        } => {
            let index = PathIndex::new(store);
            match index
                .best_epe_path(source.as_deref(), &destination, metric.into())
                .await?
            {
                Some(best) => print_json(&serde_json::json!({
                    "key": best.key,
                    "label_stack": best.label_stack,
                }))?,
                None => print_json(&serde_json::json!([]))?,
            }
        }
        Command::UpdateLink {
            from_ip,
            to_ip,
            latency,
        } => {
            let updater = MetricUpdater::new(store, settings);
            let affected = updater.update_link_latency(&from_ip, &to_ip, &latency).await?;
            print_json(&affected)?;
        }
        Command::UpdatePrefix {
            from_ip,
            to_prefix,
            latency,
            derived,
        } => {
            let updater = MetricUpdater::new(store, settings);
            let affected = if derived {
                updater
                    .update_prefix_latency_derived(&from_ip, &to_prefix, &latency)
                    .await?
            } else {
                updater.update_prefix_latency(&from_ip, &to_prefix, &latency).await?
            };
            print_json(&affected)?;
        }
        Command::UpdatePath {
            source,
            label_stack,
            destination,
            latency,
        } => {
            let updater = MetricUpdater::new(store, settings);
            let affected = updater
                .update_path_latency(&source, &label_stack, &destination, &latency)
                .await?;
            print_json(&affected)?;
        }
        Command::Snapshot { view } => {
            let exporter = SnapshotExporter::new(store);
            let view = match view {
                ObjectiveArg::Latency => MetricView::Latency,
                ObjectiveArg::Bandwidth => MetricView::Bandwidth,
            };
            let snap = exporter.snapshot(view).await?;
            print_json(&snap)?;
        }
        Command::InterfaceIps { router } => {
            let exporter = SnapshotExporter::new(store);
            let ips = exporter.interface_ips(&router).await?;
            print_json(&ips)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
