use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;
use crate::traverser::Traverser;

/// Grows random trees of a requested size.
///
/// The n-th node of a subtree (counting from 0 at its root) receives `payload(n)`,
/// so payloads are deterministic for a given seed.
pub struct TreeFactory<F> {
    payload: F,
    rng: StdRng,
}

impl<F> TreeFactory<F> {
    pub fn new(payload: F) -> Self {
        Self {
            payload,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Adds nodes under `root` until its subtree holds `total_nodes` nodes.
    ///
    /// Nodes are expanded level by level; each expanded node receives between 1
    /// and `max_children` children. Returns the number of nodes added, 0 when the
    /// subtree is already large enough or `max_children` is 0.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn populate_total<T, Tr>(
        &mut self,
        arena: &mut TreeArena<T, Tr>,
        root: NodeId,
        total_nodes: usize,
        max_children: usize,
    ) -> TreeResult<usize>
    where
        F: FnMut(usize) -> T,
        Tr: Traverser,
    {
        let start = arena.size(root);
        if max_children == 0 || total_nodes <= start {
            return Ok(0);
        }

        let mut current = start;
        let mut frontier = VecDeque::from([root]);
        while current < total_nodes {
            let Some(node) = frontier.pop_front() else {
                break;
            };
            let count = self
                .rng
                .gen_range(1..=max_children)
                .min(total_nodes - current);
            for _ in 0..count {
                let child = arena.add_child_with(node, (self.payload)(current))?;
                frontier.push_back(child);
                current += 1;
            }
        }

        debug!(added = current - start, "populated tree");
        Ok(current - start)
    }
}
