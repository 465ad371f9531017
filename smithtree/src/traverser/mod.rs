//! Traversal strategies over anything implementing [`TreeRead`].
//!
//! A [`Traverser`] is stateless: it owns no per-walk data and can be shared across
//! calls and trees. Per-walk data travels in the caller-supplied context `C`, which
//! is handed to every visit unchanged by the traverser itself.
//!
//! Two modes are offered:
//! * [`Traverser::traverse`]: early-exit walk. The visitor returns `false` to stop,
//!   and may prune a node's subtree through [`NodeVisitor::accept_children`].
//! * [`Traverser::full_traverse`]: visits every node of the subtree unconditionally.

mod breadth_first;
mod post_order;
mod pre_order;

pub use breadth_first::BreadthFirstTraverser;
pub use post_order::PostOrderTraverser;
pub use pre_order::PreOrderTraverser;

use crate::arena::NodeId;
use crate::tree_traits::TreeRead;

/// Visitor for early-exit traversals.
pub trait NodeVisitor<T, C = ()> {
    /// Called once per visited node. Returning `false` aborts the traversal.
    fn visit(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C) -> bool;

    /// Whether the children of `id` should be walked at all.
    fn accept_children(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C) -> bool {
        let _ = (id, data, ctx);
        true
    }
}

/// Visitor for full traversals: no early exit, no pruning.
pub trait FullVisitor<T, C = ()> {
    fn visit(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C);
}

pub trait Traverser {
    /// Walks the subtree under `root`, returning `true` if every scheduled node was
    /// visited and `false` if the visitor stopped the walk.
    fn traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C) -> bool
    where
        R: TreeRead + ?Sized,
        V: NodeVisitor<R::Data, C> + ?Sized;

    fn full_traverse<R, V, C>(&self, tree: &R, root: NodeId, visitor: &mut V, ctx: &mut C)
    where
        R: TreeRead + ?Sized,
        V: FullVisitor<R::Data, C> + ?Sized;

    /// [`traverse`](Traverser::traverse) without caller context.
    fn visit<R, V>(&self, tree: &R, root: NodeId, visitor: &mut V) -> bool
    where
        R: TreeRead + ?Sized,
        V: NodeVisitor<R::Data> + ?Sized,
    {
        self.traverse(tree, root, visitor, &mut ())
    }

    /// [`full_traverse`](Traverser::full_traverse) without caller context.
    fn full_visit<R, V>(&self, tree: &R, root: NodeId, visitor: &mut V)
    where
        R: TreeRead + ?Sized,
        V: FullVisitor<R::Data> + ?Sized,
    {
        self.full_traverse(tree, root, visitor, &mut ())
    }
}

/// Closure-backed [`NodeVisitor`], see [`visitor`] and [`pruning_visitor`].
pub struct FnVisitor<F, A> {
    visit: F,
    accept: A,
}

type AcceptFn<T, C> = fn(NodeId, Option<&T>, &mut C) -> bool;

fn accept_all<T, C>(_: NodeId, _: Option<&T>, _: &mut C) -> bool {
    true
}

/// Wraps a closure as an early-exit visitor that descends into every node.
pub fn visitor<T, C, F>(visit: F) -> FnVisitor<F, AcceptFn<T, C>>
where
    F: FnMut(NodeId, Option<&T>, &mut C) -> bool,
{
    FnVisitor {
        visit,
        accept: accept_all::<T, C>,
    }
}

/// Wraps two closures as an early-exit visitor with a pruning predicate.
pub fn pruning_visitor<T, C, F, A>(visit: F, accept: A) -> FnVisitor<F, A>
where
    F: FnMut(NodeId, Option<&T>, &mut C) -> bool,
    A: FnMut(NodeId, Option<&T>, &mut C) -> bool,
{
    FnVisitor { visit, accept }
}

impl<T, C, F, A> NodeVisitor<T, C> for FnVisitor<F, A>
where
    F: FnMut(NodeId, Option<&T>, &mut C) -> bool,
    A: FnMut(NodeId, Option<&T>, &mut C) -> bool,
{
    fn visit(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C) -> bool {
        (self.visit)(id, data, ctx)
    }

    fn accept_children(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C) -> bool {
        (self.accept)(id, data, ctx)
    }
}

/// Closure-backed [`FullVisitor`], see [`full_visitor`].
pub struct FnFullVisitor<F>(F);

pub fn full_visitor<T, C, F>(visit: F) -> FnFullVisitor<F>
where
    F: FnMut(NodeId, Option<&T>, &mut C),
{
    FnFullVisitor(visit)
}

impl<T, C, F> FullVisitor<T, C> for FnFullVisitor<F>
where
    F: FnMut(NodeId, Option<&T>, &mut C),
{
    fn visit(&mut self, id: NodeId, data: Option<&T>, ctx: &mut C) {
        (self.0)(id, data, ctx)
    }
}
