//! Error types for the Postcards UI core
//!
//! Everything here is a structural error: the client-side element tree no
//! longer matches what the server believes. None of them are recoverable
//! locally; the host is expected to reload the table.

use crate::core::{ChildId, NodeId, NodeKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Duplicate child {kind}:{child_id} under node {parent}")]
    DuplicateChild {
        parent: NodeId,
        kind: NodeKind,
        child_id: ChildId,
    },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Child {kind}:{child_id} not found under node {parent}")]
    ChildNotFound {
        parent: NodeId,
        kind: NodeKind,
        child_id: ChildId,
    },

    #[error("Root element is missing")]
    MissingRoot,

    #[error("No top card in {0} supply")]
    NoTopCard(String),

    #[error("Unknown game state: {0}")]
    UnknownState(String),

    #[error("Unknown notification: {0}")]
    UnknownNotification(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Presentation diverged from node {node}: {detail}")]
    PresentationDiverged { node: NodeId, detail: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UiError>;
