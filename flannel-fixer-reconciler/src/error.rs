use std::error::Error as StdError;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures that stop the reconciler; none of them is retried
#[derive(Debug, Error)]
pub enum Error {
    #[error("list/watch returned a malformed node object ({reason})")]
    MalformedNode {
        node: Option<String>,
        reason: &'static str,
    },

    #[error("cannot update node annotation on {node}: {source}")]
    UpdateNode {
        node: String,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("node event source closed")]
    EventSourceClosed,
}

impl Error {
    /// Name of the node being reconciled when the error happened, if known.
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::MalformedNode { node, .. } => node.as_deref(),
            Self::UpdateNode { node, .. } => Some(node),
            Self::EventSourceClosed => None,
        }
    }
}
