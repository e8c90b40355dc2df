//! Solver error types.

use pf_core::NodeId;
use thiserror::Error;

pub type SolveResult<T> = Result<T, SolveError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Node {node} not found")]
    NodeNotFound { node: NodeId },

    #[error("Output pin index {index} out of range on node {node}")]
    PinOutOfRange { node: NodeId, index: usize },

    #[error("Node {node} is not an Output sink")]
    NotASink { node: NodeId },

    #[error("Cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    #[error("Node {node} has not completed a balance")]
    Unbalanced { node: NodeId },

    #[error("Catalog reference missing: {what}")]
    CatalogRef { what: String },

    #[error("Operation not supported: {what}")]
    NotSupported { what: &'static str },
}
