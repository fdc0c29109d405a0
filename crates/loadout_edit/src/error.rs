//! Unified error types for loadout_edit

use thiserror::Error;

/// Main error type for build edit operations
#[derive(Debug, Error)]
pub enum EditError {
    /// Reverting a transaction that was never applied is a programming
    /// error: there is nothing to revert.
    #[error("Undo called before apply")]
    UndoBeforeApply,

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias using EditError
pub type Result<T> = std::result::Result<T, EditError>;
