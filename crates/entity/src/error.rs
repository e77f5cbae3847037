//! Entity Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An entity-store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for entity-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Absence of an entity is never an error: lookups return fewer results
/// instead. These kinds cover the store itself misbehaving.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The store was unreachable or a query failed mid-flight.
    #[display("entity store unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
    /// The store returned data this crate cannot represent.
    #[display("invalid entity data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
