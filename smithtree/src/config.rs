//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/smithtree/smithtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `SMITHTREE_*` prefix, `__` between section and key
//!    (e.g. `SMITHTREE_GENERATE__NODES=5000`)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid traversal order: {0} (expected pre-order, post-order or breadth-first)")]
    InvalidOrder(String),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Visiting order used when listing a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    #[default]
    PreOrder,
    PostOrder,
    BreadthFirst,
}

impl FromStr for TraversalOrder {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre-order" | "preorder" => Ok(Self::PreOrder),
            "post-order" | "postorder" => Ok(Self::PostOrder),
            "breadth-first" | "breadthfirst" | "bfs" => Ok(Self::BreadthFirst),
            other => Err(SettingsError::InvalidOrder(other.to_string())),
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PreOrder => "pre-order",
            Self::PostOrder => "post-order",
            Self::BreadthFirst => "breadth-first",
        };
        f.write_str(name)
    }
}

/// Random tree generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerateConfig {
    /// Total number of nodes, root included
    pub nodes: usize,
    /// Upper bound of children per expanded node
    pub max_children: usize,
    /// Fixed RNG seed, random when absent
    pub seed: Option<u64>,
    /// Payload of the n-th node is `n % payload_modulo`
    pub payload_modulo: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            nodes: 1_000,
            max_children: 5,
            seed: None,
            payload_modulo: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub order: TraversalOrder,
    /// Maximum number of payloads printed by list-like commands
    pub max_listed: usize,
    /// Levels drawn by `generate --render`; deeper subtrees collapse into one marker
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            order: TraversalOrder::default(),
            max_listed: 50,
            max_depth: crate::tree_traits::DEFAULT_RENDER_DEPTH,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub generate: RawGenerateConfig,
    pub render: RawRenderConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGenerateConfig {
    pub nodes: Option<usize>,
    pub max_children: Option<usize>,
    pub seed: Option<u64>,
    pub payload_modulo: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub order: Option<TraversalOrder>,
    pub max_listed: Option<usize>,
    pub max_depth: Option<usize>,
}

/// Unified configuration for smithtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub generate: GenerateConfig,
    pub render: RenderConfig,
}

/// Get the XDG config directory for smithtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "smithtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("smithtree.toml"))
}

/// Environment source for `SMITHTREE_*` overrides.
pub fn env_source() -> Environment {
    Environment::with_prefix("SMITHTREE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let generate = &overlay.generate;
        let render = &overlay.render;
        Self {
            generate: GenerateConfig {
                nodes: generate.nodes.unwrap_or(self.generate.nodes),
                max_children: generate.max_children.unwrap_or(self.generate.max_children),
                seed: generate.seed.or(self.generate.seed),
                payload_modulo: generate
                    .payload_modulo
                    .unwrap_or(self.generate.payload_modulo),
            },
            render: RenderConfig {
                order: render.order.unwrap_or(self.render.order),
                max_listed: render.max_listed.unwrap_or(self.render.max_listed),
                max_depth: render.max_depth.unwrap_or(self.render.max_depth),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; unlike the
    ///   global file it must exist
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current.apply_env(env_source())
    }

    /// Load settings from a single TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    /// Apply environment overrides; env values replace whatever is set.
    pub fn apply_env(mut self, env: Environment) -> SettingsResult<Self> {
        let config = Config::builder().add_source(env).build()?;

        if let Ok(val) = config.get::<usize>("generate.nodes") {
            self.generate.nodes = val;
        }
        if let Ok(val) = config.get::<usize>("generate.max_children") {
            self.generate.max_children = val;
        }
        if let Ok(val) = config.get::<u64>("generate.seed") {
            self.generate.seed = Some(val);
        }
        if let Ok(val) = config.get::<usize>("generate.payload_modulo") {
            self.generate.payload_modulo = val;
        }
        if let Ok(val) = config.get_string("render.order") {
            self.render.order = val.parse()?;
        }
        if let Ok(val) = config.get::<usize>("render.max_listed") {
            self.render.max_listed = val;
        }
        if let Ok(val) = config.get::<usize>("render.max_depth") {
            self.render.max_depth = val;
        }

        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# smithtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/smithtree/smithtree.toml
#   Local:  file passed with --config
#   Env:    SMITHTREE_<SECTION>__<KEY>, e.g. SMITHTREE_GENERATE__NODES=5000

[generate]
# Total number of nodes, root included
# nodes = 1000

# Upper bound of children per expanded node
# max_children = 5

# Fixed RNG seed (random when unset)
# seed = 42

# Payload of the n-th node is n % payload_modulo
# payload_modulo = 100

[render]
# pre-order | post-order | breadth-first
# order = "pre-order"

# Maximum number of payloads printed by list-like commands
# max_listed = 50

# Levels drawn by `generate --render` before a subtree collapses into "..."
# max_depth = 64
"#
        .to_string()
    }
}
