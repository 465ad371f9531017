use std::io;
use std::time::Instant;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::cli::args::{Cli, Commands, ConfigCommands, GenerateArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, GenerateConfig, Settings, TraversalOrder};
use crate::factory::TreeFactory;
use crate::traverser::{BreadthFirstTraverser, PostOrderTraverser, PreOrderTraverser};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Generate { tree, render } => _generate(settings, tree, *render),
        Commands::Find { value, top, tree } => _find(settings, tree, *value, *top),
        Commands::Prune { value, tree } => _prune(settings, tree, *value),
        Commands::List { order, tree } => _list(settings, tree, *order),
        Commands::Config { command } => _config(&settings, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Builds the random tree described by `config`; payloads are `n % payload_modulo`.
#[instrument(level = "debug")]
pub fn build_tree(config: &GenerateConfig) -> CliResult<(TreeArena<usize>, NodeId)> {
    if config.payload_modulo == 0 {
        return Err(CliError::InvalidArgs("payload modulo must be positive".into()));
    }
    if config.nodes == 0 {
        return Err(CliError::InvalidArgs("a tree holds at least one node".into()));
    }
    let modulo = config.payload_modulo;
    let mut arena = TreeArena::new();
    let root = arena.new_node(0);

    let factory = TreeFactory::new(move |n: usize| n % modulo);
    let mut factory = match config.seed {
        Some(seed) => factory.seed(seed),
        None => factory,
    };
    factory.populate_total(&mut arena, root, config.nodes, config.max_children)?;
    Ok((arena, root))
}

fn effective(mut settings: Settings, args: &GenerateArgs) -> Settings {
    args.apply(&mut settings);
    debug!(?settings, "effective settings");
    settings
}

fn listed(values: impl IntoIterator<Item = impl std::fmt::Display>, limit: usize) -> String {
    let mut values = values.into_iter();
    let mut text = values.by_ref().take(limit).join(", ");
    if values.next().is_some() {
        text.push_str(", ...");
    }
    text
}

#[instrument(level = "debug", skip(settings))]
fn _generate(settings: Settings, args: &GenerateArgs, render: bool) -> CliResult<()> {
    let settings = effective(settings, args);
    let started = Instant::now();
    let (arena, root) = build_tree(&settings.generate)?;
    let built = started.elapsed();

    let started = Instant::now();
    let size = arena.size(root);
    let counted = started.elapsed();

    output::header("Tree");
    output::stat("size", &size);
    output::stat("depth", &arena.depth(root));
    output::stat("leaves", &arena.leaves(root).len());
    output::stat("built in", &format!("{built:?}"));
    output::stat("counted in", &format!("{counted:?}"));
    if render {
        if size > 1_000 {
            output::warning(&format!("rendering {size} nodes"));
        }
        output::info(&arena.to_tree_string_with_depth(root, settings.render.max_depth));
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _find(settings: Settings, args: &GenerateArgs, value: usize, top: bool) -> CliResult<()> {
    let settings = effective(settings, args);
    let (arena, root) = build_tree(&settings.generate)?;

    let matches = if top {
        arena.find_top_descendants_with(root, &value)
    } else {
        arena.find_descendants_with(root, &value)
    };
    let label = if top { "topmost matches" } else { "matches" };
    output::stat(label, &matches.len());
    for &node in matches.iter().take(settings.render.max_listed) {
        output::node(node, arena.size(node));
    }
    match arena.find_descendant_with(root, &value) {
        Some(unique) => output::stat("unique match", &unique),
        None if matches.is_empty() => output::stat("unique match", &"none"),
        None => output::stat("unique match", &"ambiguous"),
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _prune(settings: Settings, args: &GenerateArgs, value: usize) -> CliResult<()> {
    let settings = effective(settings, args);
    let (mut arena, root) = build_tree(&settings.generate)?;
    let before = arena.size(root);

    let removed = arena.remove_descendants_with(root, &value);
    output::header(&format!("Pruned {} subtree(s) holding {value}", removed.len()));
    for &node in removed.iter().take(settings.render.max_listed) {
        output::pruned(node, arena.size(node));
    }
    if removed.contains(&root) {
        output::warning("the root itself matched and stays a standalone tree");
    }
    output::stat("size", &format!("{before} -> {}", arena.size(root)));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _list(settings: Settings, args: &GenerateArgs, order: Option<TraversalOrder>) -> CliResult<()> {
    let settings = effective(settings, args);
    let order = order.unwrap_or(settings.render.order);
    let (arena, root) = build_tree(&settings.generate)?;

    let payloads = match order {
        TraversalOrder::PreOrder => arena.to_data_list_with(root, &PreOrderTraverser),
        TraversalOrder::PostOrder => arena.to_data_list_with(root, &PostOrderTraverser),
        TraversalOrder::BreadthFirst => arena.to_data_list_with(root, &BreadthFirstTraverser),
    };
    output::header(&format!("{order} ({} nodes)", payloads.len()));
    output::info(&listed(payloads, settings.render.max_listed));
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no home directory, global config disabled"),
        },
    }
    Ok(())
}
