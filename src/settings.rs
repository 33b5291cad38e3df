use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// Path-search tuning knobs.
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingSettings {
    /// Sentinel weight for edges with no recorded latency. Unmeasured edges
    /// are penalized rather than treated as free.
    #[serde(default = "default_latency_weight")]
    pub default_latency_weight: u64,
    /// Sentinel weight for edges with no recorded bandwidth cost. The stored
    /// bandwidth field is minimized as a proxy cost, so the default
    /// represents minimal available capacity.
    #[serde(default = "default_bandwidth_weight")]
    pub default_bandwidth_weight: u64,
    /// Mask length appended to host identifiers that arrive without one.
    #[serde(default = "default_prefix_masklen")]
    pub default_prefix_masklen: u8,
    /// When true, metric updates that match zero records fail with NotFound
    /// instead of succeeding as a zero-key no-op.
    #[serde(default = "default_false")]
    pub strict_no_match: bool,
}

fn default_latency_weight() -> u64 {
    1000
}
fn default_bandwidth_weight() -> u64 {
    200_000_000_000_000
}
fn default_prefix_masklen() -> u8 {
    24
}
fn default_false() -> bool {
    false
}

impl Default for PathfindingSettings {
    fn default() -> Self {
        Self {
            default_latency_weight: default_latency_weight(),
            default_bandwidth_weight: default_bandwidth_weight(),
            default_prefix_masklen: default_prefix_masklen(),
            strict_no_match: default_false(),
        }
    }
}

/// Topology-specific alias tables. These are deployment configuration, not
/// code constants: each network ships its own mapping.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AliasSettings {
    /// Short-host to prefix-key shortcuts (e.g. `10.11.0.1` -> `10.11.0.0_24`).
    #[serde(default)]
    pub host_to_prefix: HashMap<String, String>,
    /// Legacy source identifiers rewritten to canonical router keys before
    /// lookup (historical IP substitutions).
    #[serde(default)]
    pub source_rewrites: HashMap<String, String>,
}

/// Store binding knobs.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    /// Named graph binding Routers/Prefixes via LinkEdges/PrefixEdges.
    #[serde(default = "default_graph_name")]
    pub graph_name: String,
    /// Optional topology seed file loaded by the CLI into the in-memory store.
    #[serde(default)]
    pub seed_file: Option<String>,
}

fn default_graph_name() -> String {
    crate::schema::TOPOLOGY_GRAPH.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            graph_name: default_graph_name(),
            seed_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub pathfinding: PathfindingSettings,
    #[serde(default)]
    pub aliases: AliasSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

impl Settings {
    /// Load `Config.toml` from the working directory (optional) and apply
    /// environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name("Config.toml").required(false)))
    }

    /// Load settings from an explicit file path plus environment overrides.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name(path)))
    }

    fn load(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self, ConfigError> {
        let s = builder.build()?;
        let mut settings: Self = s.try_deserialize()?;

        // Environment variable overrides for per-deployment knobs
        if let Ok(raw) = env::var("SDK_STRICT_NO_MATCH") {
            if let Ok(v) = raw.trim().parse::<bool>() {
                settings.pathfinding.strict_no_match = v;
            }
        }
        if let Ok(raw) = env::var("SDK_DEFAULT_LATENCY_WEIGHT") {
            if let Ok(v) = raw.trim().parse::<u64>() {
                settings.pathfinding.default_latency_weight = v;
            }
        }

        // Optional: alias table overrides via ENV (JSON: { host: prefix_key })
        if let Ok(raw_aliases) = env::var("SDK_HOST_TO_PREFIX") {
            let trimmed = raw_aliases.trim();
            if !trimmed.is_empty() {
                match serde_json::from_str::<HashMap<String, String>>(trimmed) {
                    Ok(map) => {
                        for (host, prefix) in map {
                            if !host.trim().is_empty() && !prefix.trim().is_empty() {
                                settings.aliases.host_to_prefix.insert(host, prefix);
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("Failed to parse SDK_HOST_TO_PREFIX as JSON: {}", e);
                    }
                }
            }
        }

        Ok(settings)
    }
}
