use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::errors::{TreeError, TreeResult};
use crate::traverser::{full_visitor, visitor, NodeVisitor, PreOrderTraverser, Traverser};

/// Stable handle of a node inside a [`TreeArena`].
///
/// Handles are generational: once a node is freed with
/// [`TreeArena::remove_subtree`] its handle never resolves again, even if the slot
/// is reused. Two handles are equal iff they address the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{slot}v{generation}")
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Payload, None once the node has been cleared
    data: Option<T>,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in insertion order
    children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    fn new(data: T) -> Self {
        Self {
            data: Some(data),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-based storage for any number of mutable, parent-linked trees.
///
/// Every node is owned by the arena and addressed through a [`NodeId`]. Parent
/// links are plain handles, so detaching and re-attaching subtrees never leaves a
/// dangling reference behind. A detached subtree is simply another root in the
/// same arena.
///
/// Query operations (`size`, `contains`, the `find_*` family, the `to_*`
/// flatteners) walk the subtree with the arena's traverser, [`PreOrderTraverser`]
/// unless another one was chosen through [`TreeArena::with_traverser`].
#[derive(Debug)]
pub struct TreeArena<T, Tr = PreOrderTraverser> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
    traverser: Tr,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self::with_traverser(PreOrderTraverser)
    }
}

impl<T, Tr> TreeArena<T, Tr> {
    pub fn with_traverser(traverser: Tr) -> Self {
        Self {
            arena: Arena::new(),
            traverser,
        }
    }

    pub fn traverser(&self) -> &Tr {
        &self.traverser
    }

    /// Creates a detached node holding `data`; it starts out as its own root.
    #[instrument(level = "trace", skip(self, data))]
    pub fn new_node(&mut self, data: T) -> NodeId {
        NodeId(self.arena.insert(TreeNode::new(data)))
    }

    /// Number of live nodes across all trees in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode<T>> {
        self.arena.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    /// Unlinks `id` from its parent on both sides. A parent link with no matching
    /// entry in the parent's children (left by a raw `set_parent`) is dropped too.
    fn detach(&mut self, id: NodeId) {
        let unlinked = self
            .parent(id)
            .and_then(|parent| self.remove_child(parent, id));
        if unlinked.is_none() {
            if let Some(node) = self.arena.get_mut(id.0) {
                node.parent = None;
            }
        }
    }

    fn ensure_live(&self, id: NodeId) -> TreeResult<()> {
        if self.contains_node(id) {
            Ok(())
        } else {
            Err(TreeError::NodeNotFound(id))
        }
    }

    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(TreeNode::data)
    }

    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id.0).and_then(|node| node.data.as_mut())
    }

    /// Replaces the payload of `id`, returning the previous one.
    #[instrument(level = "trace", skip(self, data))]
    pub fn set_data(&mut self, id: NodeId, data: T) -> TreeResult<Option<T>> {
        Ok(self.node_mut(id)?.data.replace(data))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(TreeNode::parent)
    }

    /// Overwrites the parent link of `id` only.
    ///
    /// The new parent's children are left untouched; use [`add_child`] and
    /// [`remove_child`] to keep both sides consistent.
    ///
    /// [`add_child`]: TreeArena::add_child
    /// [`remove_child`]: TreeArena::remove_child
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> TreeResult<()> {
        if let Some(parent) = parent {
            self.ensure_live(parent)?;
        }
        self.node_mut(id)?.parent = parent;
        Ok(())
    }

    /// Children of `id` in insertion order; empty for unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Attaches `child` as the last child of `parent` and returns it.
    ///
    /// Fails if either handle is stale, if `child` already has a parent, or if
    /// `child` is `parent` itself or one of its ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<NodeId> {
        self.ensure_live(parent)?;
        self.ensure_live(child)?;
        if let Some(owner) = self.parent(child) {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: owner,
            });
        }
        // a childless node cannot be anybody's ancestor
        let may_be_ancestor = !self.children(child).is_empty();
        if parent == child
            || (may_be_ancestor && self.ancestors(parent).any(|ancestor| ancestor == child))
        {
            return Err(TreeError::CycleDetected { parent, child });
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        debug!(%parent, %child, "attached child");
        Ok(child)
    }

    /// Creates a node for `data` and attaches it under `parent`.
    #[instrument(level = "debug", skip(self, data))]
    pub fn add_child_with(&mut self, parent: NodeId, data: T) -> TreeResult<NodeId> {
        self.ensure_live(parent)?;
        let child = self.new_node(data);
        self.add_child(parent, child)
    }

    /// Detaches `child` if it is a direct child of `parent`.
    ///
    /// Returns the detached handle, now the root of its own subtree, or `None` when
    /// `child` is not among `parent`'s children.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let siblings = &mut self.arena.get_mut(parent.0)?.children;
        let position = siblings.iter().position(|&c| c == child)?;
        siblings.remove(position);
        if let Some(node) = self.arena.get_mut(child.0) {
            node.parent = None;
        }
        debug!(%parent, %child, "detached child");
        Some(child)
    }

    pub fn is_parent_of(&self, parent: NodeId, node: NodeId) -> bool {
        self.parent(node) == Some(parent)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.parent.is_none())
    }

    /// True for attached nodes without children.
    ///
    /// A lone, unattached node is a root and not a leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| node.parent.is_some() && node.children.is_empty())
    }

    /// Shallow wipe of `id`: drops its payload, its parent link and its children.
    ///
    /// Former children become roots of their own subtrees; descendants are not
    /// touched otherwise. Returns the previous payload.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self, id: NodeId) -> Option<T> {
        let node = self.arena.get_mut(id.0)?;
        let data = node.data.take();
        let parent = node.parent.take();
        let children = std::mem::take(&mut node.children);

        for child in children {
            if let Some(child_node) = self.arena.get_mut(child.0) {
                child_node.parent = None;
            }
        }
        if let Some(parent) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent.0) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        data
    }

    /// Upward walk from the parent of `id` to its root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T, Tr> {
        Ancestors::new(self, id)
    }

    /// Pre-order iterator over the subtree under `id`.
    pub fn iter(&self, id: NodeId) -> TreeIterator<'_, T, Tr> {
        TreeIterator::new(self, id)
    }

    /// Post-order iterator over the subtree under `id`.
    pub fn iter_postorder(&self, id: NodeId) -> PostOrderIterator<'_, T, Tr> {
        PostOrderIterator::new(self, id)
    }

    /// All parentless nodes, one per tree stored in the arena.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
    }

    /// Number of levels in the subtree under `id`: 1 for a lone node, 0 for an
    /// unknown handle.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(id, 1)];

        while let Some((current, depth)) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
        }

        max_depth
    }

    /// Childless nodes of the subtree under `id`, in pre-order.
    ///
    /// Structural: unlike [`is_leaf`](TreeArena::is_leaf), a lone root counts.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.iter(id)
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Detaches the subtree under `id` and frees all of its nodes.
    ///
    /// Every handle into the subtree becomes stale. Returns the number of nodes
    /// freed, 0 if `id` was unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
        let doomed: Vec<NodeId> = self.iter(id).map(|(idx, _)| idx).collect();
        for idx in &doomed {
            self.arena.remove(idx.0);
        }
        debug!(root = %id, freed = doomed.len(), "removed subtree");
        doomed.len()
    }
}

impl<T, Tr: Traverser> TreeArena<T, Tr> {
    /// Number of nodes in the subtree under `id`, `id` included.
    #[instrument(level = "trace", skip(self))]
    pub fn size(&self, id: NodeId) -> usize {
        let mut count = 0usize;
        self.traverser.full_traverse(
            self,
            id,
            &mut full_visitor(|_: NodeId, _: Option<&T>, count: &mut usize| *count += 1),
            &mut count,
        );
        count
    }

    pub fn to_list(&self, id: NodeId) -> Vec<NodeId> {
        self.to_list_with(id, &self.traverser)
    }

    pub fn to_array(&self, id: NodeId) -> Box<[NodeId]> {
        self.to_list(id).into_boxed_slice()
    }

    /// Payloads of the subtree in traversal order; cleared payloads are skipped.
    pub fn to_data_list(&self, id: NodeId) -> Vec<&T> {
        self.to_data_list_with(id, &self.traverser)
    }

    /// Flattens the subtree under `id` in the order of `traverser`.
    #[instrument(level = "trace", skip(self, traverser))]
    pub fn to_list_with<U: Traverser>(&self, id: NodeId, traverser: &U) -> Vec<NodeId> {
        let mut found = Vec::new();
        traverser.full_traverse(
            self,
            id,
            &mut full_visitor(|idx: NodeId, _: Option<&T>, found: &mut Vec<NodeId>| {
                found.push(idx)
            }),
            &mut found,
        );
        found
    }

    pub fn to_data_list_with<U: Traverser>(&self, id: NodeId, traverser: &U) -> Vec<&T> {
        self.to_list_with(id, traverser)
            .into_iter()
            .filter_map(|idx| self.data(idx))
            .collect()
    }

    /// Every node of the subtree under `id` whose payload satisfies `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_descendants_matching<P>(&self, id: NodeId, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        let mut found = Vec::new();
        self.traverser.full_traverse(
            self,
            id,
            &mut full_visitor(|idx: NodeId, data: Option<&T>, found: &mut Vec<NodeId>| {
                if data.is_some_and(&mut predicate) {
                    found.push(idx);
                }
            }),
            &mut found,
        );
        found
    }
}

impl<T: Clone, Tr: Traverser> TreeArena<T, Tr> {
    pub fn to_data_array(&self, id: NodeId) -> Box<[T]> {
        self.to_data_list(id).into_iter().cloned().collect()
    }
}

/// Collects the topmost nodes holding `target`; matched subtrees are not entered.
struct TopMatches<'a, T> {
    target: &'a T,
    found: Vec<NodeId>,
}

impl<T: PartialEq> NodeVisitor<T> for TopMatches<'_, T> {
    fn visit(&mut self, id: NodeId, data: Option<&T>, _: &mut ()) -> bool {
        if data == Some(self.target) {
            self.found.push(id);
        }
        true
    }

    fn accept_children(&mut self, _: NodeId, data: Option<&T>, _: &mut ()) -> bool {
        data != Some(self.target)
    }
}

impl<T: PartialEq, Tr: Traverser> TreeArena<T, Tr> {
    /// Whether any node of the subtree under `id`, `id` included, holds `target`.
    #[instrument(level = "trace", skip(self, target))]
    pub fn contains(&self, id: NodeId, target: &T) -> bool {
        let completed = self.traverser.visit(
            self,
            id,
            &mut visitor(|_: NodeId, data: Option<&T>, _: &mut ()| data != Some(target)),
        );
        !completed
    }

    /// The single node of the subtree holding `target`.
    ///
    /// Returns `None` both when nothing matches and when the match is ambiguous
    /// (two or more nodes hold an equal payload).
    #[instrument(level = "trace", skip(self, target))]
    pub fn find_descendant_with(&self, id: NodeId, target: &T) -> Option<NodeId> {
        // (first match, number of matches)
        let mut hits: (Option<NodeId>, usize) = (None, 0);
        self.traverser.traverse(
            self,
            id,
            &mut visitor(
                |idx: NodeId, data: Option<&T>, hits: &mut (Option<NodeId>, usize)| {
                    if data == Some(target) {
                        hits.0.get_or_insert(idx);
                        hits.1 += 1;
                    }
                    hits.1 < 2
                },
            ),
            &mut hits,
        );
        match hits {
            (Some(found), 1) => Some(found),
            (Some(_), _) => {
                trace!(root = %id, "ambiguous match, reporting none");
                None
            }
            _ => None,
        }
    }

    pub fn find_descendants_with(&self, id: NodeId, target: &T) -> Vec<NodeId> {
        self.find_descendants_matching(id, |data| data == target)
    }

    /// Matches of `target` none of whose ancestors (within the subtree) match.
    #[instrument(level = "trace", skip(self, target))]
    pub fn find_top_descendants_with(&self, id: NodeId, target: &T) -> Vec<NodeId> {
        let mut top = TopMatches {
            target,
            found: Vec::new(),
        };
        self.traverser.visit(self, id, &mut top);
        top.found
    }

    /// Detaches the unique node holding `target` from its parent and returns it.
    ///
    /// Nothing is detached when the match is missing or ambiguous. `id` itself is a
    /// candidate: when it is the match, it is cut from its own parent, which lies
    /// outside the searched subtree. The returned node is always a root.
    #[instrument(level = "debug", skip(self, target))]
    pub fn remove_descendant_with(&mut self, id: NodeId, target: &T) -> Option<NodeId> {
        let found = self.find_descendant_with(id, target)?;
        self.detach(found);
        Some(found)
    }

    /// Detaches every topmost node holding `target` from its parent.
    ///
    /// As with [`remove_descendant_with`](Self::remove_descendant_with), a
    /// matching `id` is cut from its own parent and then is the only node returned.
    #[instrument(level = "debug", skip(self, target))]
    pub fn remove_descendants_with(&mut self, id: NodeId, target: &T) -> Vec<NodeId> {
        let found = self.find_top_descendants_with(id, target);
        for &node in &found {
            self.detach(node);
        }
        found
    }
}

pub struct TreeIterator<'a, T, Tr> {
    arena: &'a TreeArena<T, Tr>,
    stack: Vec<NodeId>,
}

impl<'a, T, Tr> TreeIterator<'a, T, Tr> {
    fn new(arena: &'a TreeArena<T, Tr>, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a, T, Tr> Iterator for TreeIterator<'a, T, Tr> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T, Tr> {
    arena: &'a TreeArena<T, Tr>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T, Tr> PostOrderIterator<'a, T, Tr> {
    fn new(arena: &'a TreeArena<T, Tr>, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a, T, Tr> Iterator for PostOrderIterator<'a, T, Tr> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

pub struct Ancestors<'a, T, Tr> {
    arena: &'a TreeArena<T, Tr>,
    next: Option<NodeId>,
    // bounds the walk if raw `set_parent` calls produced a parent cycle
    remaining: usize,
}

impl<'a, T, Tr> Ancestors<'a, T, Tr> {
    fn new(arena: &'a TreeArena<T, Tr>, start: NodeId) -> Self {
        Self {
            arena,
            next: arena.parent(start),
            remaining: arena.len(),
        }
    }
}

impl<T, Tr> Iterator for Ancestors<'_, T, Tr> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.arena.parent(current);
        Some(current)
    }
}
