use tracing::{instrument, trace};

use super::{FullVisitor, NodeVisitor, Traverser};
use crate::arena::NodeId;
use crate::tree_traits::TreeRead;

/// Depth-first, children (left to right) before their parent.
///
/// For early-exit walks the pruning decision is taken when a node is first reached,
/// before any of its descendants are visited; a pruned node is visited as if it had
/// no children.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PostOrderTraverser;

impl Traverser for PostOrderTraverser {
    #[instrument(level = "trace", skip(self, tree, visitor, ctx))]
    fn traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C) -> bool
    where
        R: TreeRead + ?Sized,
        V: NodeVisitor<R::Data, C> + ?Sized,
    {
        // (node, children already scheduled)
        let mut stack = vec![(root, false)];
        while let Some((current, expanded)) = stack.pop() {
            let Some(children) = tree.node_children(current) else {
                continue;
            };
            let data = tree.node_data(current);
            if expanded {
                if !visitor.visit(current, data, ctx) {
                    trace!(%current, "traversal stopped by visitor");
                    return false;
                }
                continue;
            }
            stack.push((current, true));
            if visitor.accept_children(current, data, ctx) {
                stack.extend(children.iter().rev().map(|&child| (child, false)));
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
        let mut stack = vec![(root, false)];
        while let Some((current, expanded)) = stack.pop() {
            let Some(children) = tree.node_children(current) else {
                continue;
            };
            if expanded {
                visitor.visit(current, tree.node_data(current), ctx);
            } else {
                stack.push((current, true));
                stack.extend(children.iter().rev().map(|&child| (child, false)));
            }
        }
    }
}
