//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates (ssb-store).

use crate::error::LookupError;
use crate::interaction::InteractionRecord;
use crate::pair::Pair;
use crate::substance::{SubstanceCounts, SubstanceId, SubstanceType};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read-only access to substance types
///
/// Implemented by the infrastructure layer (ssb-store)
#[async_trait]
pub trait SubstanceStore: Send + Sync {
    /// Look up the type of every identifier in one batch call
    ///
    /// Identifiers unknown to the store are absent from the returned map;
    /// that is not an error.
    async fn lookup_types(
        &self,
        ids: &[SubstanceId],
    ) -> Result<HashMap<SubstanceId, SubstanceType>, LookupError>;

    /// Count active substances by type
    async fn substance_counts(&self) -> Result<SubstanceCounts, LookupError>;
}

/// Read-only access to interaction records
///
/// Implemented by the infrastructure layer (ssb-store)
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Fetch the records matching any of `pairs` in one batch call
    ///
    /// Implementations must guarantee at most one record per pair and must
    /// not be called with an empty slice.
    async fn lookup_interactions(
        &self,
        pairs: &[Pair],
    ) -> Result<Vec<InteractionRecord>, LookupError>;
}
