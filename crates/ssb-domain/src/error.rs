//! Error types for store lookups and stack checks

use thiserror::Error;

/// Errors reported by a substance or interaction store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The store answered with something that could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The store did not answer in time
    #[error("Store request timed out")]
    Timeout,
}

/// Errors that abort a stack check
///
/// Any upstream failure aborts the whole check. A partial report is never
/// returned, because a missing record could not be told apart from a failed
/// lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Batch lookup of substance types failed
    #[error("Failed to fetch substance types: {0}")]
    SubstanceLookup(LookupError),

    /// Batch lookup of interaction records failed
    #[error("Failed to query interactions: {0}")]
    InteractionLookup(LookupError),
}
