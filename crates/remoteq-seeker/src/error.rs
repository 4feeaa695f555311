//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while applying query documents to a [`QuerySet`](crate::QuerySet).
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The record type declares its fields and this one is not among them.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The lookup cannot compare against this kind of operand.
    #[error("lookup '{lookup}' does not accept a {operand} operand")]
    UnsupportedOperand {
        lookup: &'static str,
        operand: &'static str,
    },

    /// A `range` lookup needs exactly two bounds.
    #[error("range lookup expects [low, high], got {0}")]
    InvalidRange(String),

    /// Two query sets over different record slices cannot be combined.
    #[error("cannot union query sets over different records")]
    ForeignQuerySet,
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
