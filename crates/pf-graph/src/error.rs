//! Graph-specific error types.

use pf_core::NodeId;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {node} not found")]
    NodeNotFound { node: NodeId },

    #[error("Node id {node} already present")]
    DuplicateNode { node: NodeId },

    #[error("Pin '{pin}' not found on node {node}")]
    PinNotFound { node: NodeId, pin: String },

    #[error("Pin '{pin}' already exists on node {node}")]
    DuplicatePin { node: NodeId, pin: String },

    #[error("Cannot connect pins of different value types ({from_node}.{from_pin} -> {to_node}.{to_pin})")]
    TypeMismatch {
        from_node: NodeId,
        from_pin: String,
        to_node: NodeId,
        to_pin: String,
    },

    #[error("Cannot connect node {node} to itself")]
    SelfLoop { node: NodeId },

    #[error("Connecting {from} -> {to} would create a cycle")]
    WouldCycle { from: NodeId, to: NodeId },

    #[error("Operation not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Catalog reference missing: {what}")]
    CatalogRef { what: String },
}
