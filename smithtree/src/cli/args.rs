//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{Settings, TraversalOrder};

/// Build, search and prune random parent-linked trees
#[derive(Parser, Debug)]
#[command(name = "smithtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered on top of the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[generate]` settings
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Total number of nodes, root included
    #[arg(short, long)]
    pub nodes: Option<usize>,

    /// Upper bound of children per expanded node
    #[arg(short, long)]
    pub max_children: Option<usize>,

    /// RNG seed for a reproducible tree
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Payload of the n-th node is n % modulo
    #[arg(long)]
    pub modulo: Option<usize>,
}

impl GenerateArgs {
    /// Command line flags win over every config layer.
    pub fn apply(&self, settings: &mut Settings) {
        let generate = &mut settings.generate;
        if let Some(nodes) = self.nodes {
            generate.nodes = nodes;
        }
        if let Some(max_children) = self.max_children {
            generate.max_children = max_children;
        }
        if self.seed.is_some() {
            generate.seed = self.seed;
        }
        if let Some(modulo) = self.modulo {
            generate.payload_modulo = modulo;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a random tree and print its statistics
    Generate {
        #[command(flatten)]
        tree: GenerateArgs,

        /// Draw the tree
        #[arg(short, long)]
        render: bool,
    },

    /// Find nodes holding a payload
    Find {
        value: usize,

        /// Report only topmost matches
        #[arg(short, long)]
        top: bool,

        #[command(flatten)]
        tree: GenerateArgs,
    },

    /// Detach every topmost subtree holding a payload
    Prune {
        value: usize,

        #[command(flatten)]
        tree: GenerateArgs,
    },

    /// Print payloads in traversal order
    List {
        #[arg(short, long, value_enum)]
        order: Option<TraversalOrder>,

        #[command(flatten)]
        tree: GenerateArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
