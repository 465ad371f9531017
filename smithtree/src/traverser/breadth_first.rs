use std::collections::VecDeque;

use tracing::{instrument, trace};

use super::{FullVisitor, NodeVisitor, Traverser};
use crate::arena::NodeId;
use crate::tree_traits::TreeRead;

/// Level order: every node of depth `n` before any node of depth `n + 1`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BreadthFirstTraverser;

impl Traverser for BreadthFirstTraverser {
    #[instrument(level = "trace", skip(self, tree, visitor, ctx))]
    fn traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C) -> bool
    where
        R: TreeRead + ?Sized,
        V: NodeVisitor<R::Data, C> + ?Sized,
    {
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            let Some(children) = tree.node_children(current) else {
                continue;
            };
            let data = tree.node_data(current);
            if !visitor.visit(current, data, ctx) {
                trace!(%current, "traversal stopped by visitor");
                return false;
            }
            if visitor.accept_children(current, data, ctx) {
                queue.extend(children.iter().copied());
            }
        }
        true
    }

    #[instrument(level = "trace", skip(self, tree, visitor, ctx))]
    fn full_traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C)
    where
        R: TreeRead + ?Sized,
        V: FullVisitor<R::Data, C> + ?Sized,
    {
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            if let Some(children) = tree.node_children(current) {
                visitor.visit(current, tree.node_data(current), ctx);
                queue.extend(children.iter().copied());
            }
        }
    }
}
