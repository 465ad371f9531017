use tracing::{instrument, trace};

use super::{FullVisitor, NodeVisitor, Traverser};
use crate::arena::NodeId;
use crate::tree_traits::TreeRead;

/// Depth-first, parent before children, children left to right.
///
/// Iterative: an explicit stack replaces the call stack, so arbitrarily deep trees
/// cannot overflow. Children are pushed in reverse so the leftmost one pops first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreOrderTraverser;

impl PreOrderTraverser {
    pub fn of() -> Self {
        Self
    }
}

impl Traverser for PreOrderTraverser {
    #[instrument(level = "trace", skip(self, tree, visitor, ctx))]
    fn traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C) -> bool
    where
        R: TreeRead + ?Sized,
        V: NodeVisitor<R::Data, C> + ?Sized,
    {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(children) = tree.node_children(current) else {
                continue;
            };
            let data = tree.node_data(current);
            if !visitor.visit(current, data, ctx) {
                trace!(%current, "traversal stopped by visitor");
                return false;
            }
            if visitor.accept_children(current, data, ctx) {
                stack.extend(children.iter().rev().copied());
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
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if let Some(children) = tree.node_children(current) {
                visitor.visit(current, tree.node_data(current), ctx);
                stack.extend(children.iter().rev().copied());
            }
        }
    }
}
