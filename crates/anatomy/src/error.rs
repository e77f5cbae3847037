//! Anatomy Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An anatomy error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for anatomy operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The template failed to compile or render (bad syntax, missing
    /// variable, or a descriptor missing the fields the template needs).
    #[display("issue with path generation from template")]
    Template,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
