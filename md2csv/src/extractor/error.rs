//! Error types for section extraction

use thiserror::Error;

/// Errors that can occur while walking a parsed document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The parser closed a node other than the innermost open one
    ///
    /// This indicates a contract violation between the markdown parser and
    /// the extractor, never bad input.
    #[error("Parse inconsistency: expected end of {expected}, found end of {found}")]
    ParseInconsistency {
        /// The node that should have been closed
        expected: String,
        /// The node the parser actually closed
        found: String,
    },

    /// The parser finished with nodes still open
    #[error("Parse inconsistency: {open} node(s) left open at end of document")]
    UnterminatedNodes {
        /// Number of nodes still open
        open: usize,
    },

    /// The row sink stopped receiving before the walk was finished
    #[error("Row sink closed before extraction finished")]
    SinkClosed,
}
