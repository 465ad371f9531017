use thiserror::Error;

use crate::arena::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found in arena: {0}")]
    NodeNotFound(NodeId),

    #[error("Attaching {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("Node {child} is already attached to parent {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },
}

pub type TreeResult<T> = Result<T, TreeError>;
