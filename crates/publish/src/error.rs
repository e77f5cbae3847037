//! Publish Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A publish error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for publish operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Missing entities never surface here: instances whose folder resolves
/// nothing are simply left untouched. These kinds cover the collaborators
/// failing outright.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An entity-store lookup failed (store unreachable or erroring).
    #[display("entity store query failed")]
    Entity,
    /// A resolved descriptor could not be formatted into a path.
    #[display("representation path could not be resolved")]
    Anatomy,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Entity)
    }
}
