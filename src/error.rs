//! Error types for the conformance engine.
//!
//! These are engine errors: broken handles, caller misuse of the tagging hooks,
//! bad configuration. Conformance violations are ordinary data
//! ([`ViolationRecord`](crate::compliance::ViolationRecord)) and only travel
//! through this type when the caller asked for fail-fast tagging.

use crate::compliance::ViolationRecord;
use crate::structure::{NamespaceId, NodeId};

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a check.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A handle points at a structure node that does not exist
    #[error("Dangling structure node reference: {0}")]
    DanglingNode(NodeId),

    /// A handle points at a namespace that does not exist
    #[error("Dangling namespace reference: {0}")]
    DanglingNamespace(NamespaceId),

    /// An object reference points at an annotation that does not exist
    #[error("Dangling annotation reference: #{0}")]
    DanglingAnnotation(usize),

    /// The same annotation is referenced from two structure elements
    #[error("Annotation #{annotation} is referenced by both {first} and {second}")]
    AnnotationOwnedTwice {
        /// Annotation index
        annotation: usize,
        /// First owning node
        first: NodeId,
        /// Second owning node
        second: NodeId,
    },

    /// `closeTag` was called with no open marked-content sequence
    #[error("Unbalanced marked content: close without matching open on page {page}")]
    UnbalancedMarkedContent {
        /// Page (content stream) the close happened on
        page: u32,
    },

    /// A marked-content stream was finished with sequences still open
    #[error("Marked content left open at end of stream on page {page}: {open} sequence(s)")]
    UnclosedMarkedContent {
        /// Page (content stream)
        page: u32,
        /// Number of sequences still open
        open: usize,
    },

    /// Every MCID on a page has been handed out
    #[error("No marked-content identifiers left on page {page}")]
    McidExhausted {
        /// Page the MCID was requested for
        page: u32,
    },

    /// Fail-fast conformance failure raised by the tagging hook
    #[error("{0}")]
    Conformance(Box<ViolationRecord>),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The violation carried by a fail-fast error, if this is one.
    pub fn violation(&self) -> Option<&ViolationRecord> {
        match self {
            Error::Conformance(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}
