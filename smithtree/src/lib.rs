//! Mutable, parent-linked multi-way trees.
//!
//! Nodes live in a [`TreeArena`] and are addressed by [`NodeId`] handles, so
//! parent links never dangle. Queries walk subtrees through a pluggable
//! [`Traverser`](traverser::Traverser); pre-order is the default.
//!
//! ```
//! use smithtree::TreeArena;
//!
//! let mut arena = TreeArena::new();
//! let root = arena.new_node(0);
//! let one = arena.add_child_with(root, 1).unwrap();
//! arena.add_child_with(root, 2).unwrap();
//! arena.add_child_with(one, 3).unwrap();
//!
//! assert_eq!(arena.size(root), 4);
//! assert_eq!(arena.to_data_list(root), vec![&0, &1, &3, &2]);
//! ```

pub mod arena;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod factory;
pub mod traverser;
pub mod tree_traits;
pub mod util;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use errors::{TreeError, TreeResult};
pub use factory::TreeFactory;
pub use traverser::{
    BreadthFirstTraverser, FullVisitor, NodeVisitor, PostOrderTraverser, PreOrderTraverser,
    Traverser,
};
pub use tree_traits::{TreeNodeConvert, TreeRead};
