//! Shared test setup: log capture plus the small trees most tests start from.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;

static TEST_SETUP: Once = Once::new();

/// Installs the global test subscriber once per test binary.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // traversals log per node at trace; keep them quiet unless RUST_LOG asks
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,smithtree::traverser=warn"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// The six node tree used across the docs and tests:
///
/// ```text
///      0
///    / | \
///   1  2  3
///  / \
/// 4   5
/// ```
pub fn scenario_tree() -> (TreeArena<i32>, NodeId) {
    try_scenario_tree().unwrap_or_else(|e| panic!("scenario tree: {e}"))
}

fn try_scenario_tree() -> TreeResult<(TreeArena<i32>, NodeId)> {
    let mut arena = TreeArena::new();
    let root = arena.new_node(0);
    let one = arena.add_child_with(root, 1)?;
    for payload in [2, 3] {
        arena.add_child_with(root, payload)?;
    }
    for payload in [4, 5] {
        arena.add_child_with(one, payload)?;
    }
    Ok((arena, root))
}

/// Payloads of `ids` in order; stale and cleared handles are skipped.
pub fn payloads(arena: &TreeArena<i32>, ids: &[NodeId]) -> Vec<i32> {
    ids.iter().filter_map(|&id| arena.data(id).copied()).collect()
}
