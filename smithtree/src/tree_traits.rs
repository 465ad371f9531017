//! Read-only view of a tree, and conversions built on top of it.

use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::arena::{NodeId, TreeArena};

/// The read contract a [`Traverser`](crate::traverser::Traverser) walks over.
///
/// Implementors expose exactly two things per node: its ordered children and its
/// payload. Traversers never need (and never get) mutable access.
pub trait TreeRead {
    type Data;

    /// Children of `id` in insertion order, `None` if `id` is not a live node.
    fn node_children(&self, id: NodeId) -> Option<&[NodeId]>;

    /// Payload of `id`, `None` if the node is unknown or its payload was cleared.
    fn node_data(&self, id: NodeId) -> Option<&Self::Data>;
}

impl<T, Tr> TreeRead for TreeArena<T, Tr> {
    type Data = T;

    fn node_children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).map(|node| node.children())
    }

    fn node_data(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|node| node.data())
    }
}

/// Levels [`TreeNodeConvert::to_tree_string`] draws before collapsing a subtree.
pub const DEFAULT_RENDER_DEPTH: usize = 64;

pub trait TreeNodeConvert {
    /// Renders the subtree at `id`, at most [`DEFAULT_RENDER_DEPTH`] levels deep.
    fn to_tree_string(&self, id: NodeId) -> Tree<String> {
        self.to_tree_string_with_depth(id, DEFAULT_RENDER_DEPTH)
    }

    /// Renders at most `max_depth` levels (the root is level 1, 0 counts as 1).
    ///
    /// A node on the last level that still has children gets a single
    /// [`COLLAPSED_LABEL`] leaf. `termtree` formats and drops trees recursively;
    /// the cap bounds that recursion.
    fn to_tree_string_with_depth(&self, id: NodeId, max_depth: usize) -> Tree<String>;
}

const CLEARED_LABEL: &str = "<cleared>";
const EMPTY_LABEL: &str = "Empty tree";
/// Stands in for the children of a node on the last rendered level.
pub const COLLAPSED_LABEL: &str = "...";

impl<T: Display, Tr> TreeNodeConvert for TreeArena<T, Tr> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string_with_depth(&self, id: NodeId, max_depth: usize) -> Tree<String> {
        let label = |idx: NodeId| -> String {
            self.data(idx)
                .map(|d| d.to_string())
                .unwrap_or_else(|| CLEARED_LABEL.to_string())
        };
        if !self.contains_node(id) {
            return Tree::new(EMPTY_LABEL.to_string());
        }
        let max_depth = max_depth.max(1);

        // (node, level, finished children waiting on `built`); None until expanded
        let mut pending: Vec<(NodeId, usize, Option<usize>)> = vec![(id, 1, None)];
        let mut built: Vec<Tree<String>> = Vec::new();
        while let Some((node, level, expanded)) = pending.pop() {
            let children = self.children(node);
            match expanded {
                Some(count) => {
                    let leaves = built.split_off(built.len() - count);
                    built.push(Tree::new(label(node)).with_leaves(leaves));
                }
                None if children.is_empty() => built.push(Tree::new(label(node))),
                None if level >= max_depth => built.push(
                    Tree::new(label(node)).with_leaves([Tree::new(COLLAPSED_LABEL.to_string())]),
                ),
                None => {
                    pending.push((node, level, Some(children.len())));
                    pending.extend(children.iter().rev().map(|&child| (child, level + 1, None)));
                }
            }
        }
        built
            .pop()
            .unwrap_or_else(|| Tree::new(EMPTY_LABEL.to_string()))
    }
}
