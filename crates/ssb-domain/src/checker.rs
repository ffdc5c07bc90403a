//! Stack checker - runs the full Enumerate → Classify → Resolve → Assemble pipeline

use crate::classify::classify_and_filter;
use crate::error::CheckError;
use crate::mode::Mode;
use crate::pair::enumerate;
use crate::report::{assemble, StackReport};
use crate::resolve::resolve;
use crate::substance::SubstanceId;
use crate::traits::{InteractionStore, SubstanceStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

/// Checks a list of substances for known pairwise interactions
///
/// Holds no per-request state; a single checker can serve concurrent checks.
/// Stores are injected so their lifecycle is owned by the host process.
#[derive(Clone)]
pub struct StackChecker {
    substances: Arc<dyn SubstanceStore>,
    interactions: Arc<dyn InteractionStore>,
}

impl StackChecker {
    /// Create a checker over the given stores
    pub fn new(
        substances: Arc<dyn SubstanceStore>,
        interactions: Arc<dyn InteractionStore>,
    ) -> Self {
        Self {
            substances,
            interactions,
        }
    }

    /// The substance store this checker reads from
    pub fn substance_store(&self) -> &Arc<dyn SubstanceStore> {
        &self.substances
    }

    /// Check `items` for interactions relevant to `mode`
    ///
    /// Performs at most two store round trips: one type lookup and one
    /// interaction lookup. Neither happens when there is nothing to look up.
    ///
    /// # Errors
    ///
    /// Returns an error if either batch lookup fails. No partial report is
    /// produced in that case.
    pub async fn check<S: AsRef<str>>(
        &self,
        items: &[S],
        mode: Mode,
    ) -> Result<StackReport, CheckError> {
        info!("Checking {} substances (mode: {})", items.len(), mode.as_str());

        let pairs = enumerate(items);
        info!("Generated {} total pairs", pairs.len());
        if pairs.is_empty() {
            return Ok(StackReport::empty());
        }

        let mut seen = HashSet::new();
        let ids: Vec<SubstanceId> = pairs
            .iter()
            .flat_map(|pair| [pair.a(), pair.b()])
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        let types = self.substances.lookup_types(&ids).await.map_err(|e| {
            error!("Error fetching substance types: {}", e);
            CheckError::SubstanceLookup(e)
        })?;

        let classified = classify_and_filter(pairs, &types, mode);
        info!(
            "Filtered to {} pairs for mode: {}",
            classified.len(),
            mode.as_str()
        );
        if classified.is_empty() {
            return Ok(StackReport::empty());
        }

        let keys: Vec<_> = classified.iter().map(|c| c.pair.clone()).collect();
        let resolution = resolve(&*self.interactions, &keys)
            .await
            .map_err(|e| {
                error!("Batch interaction query failed: {}", e);
                CheckError::InteractionLookup(e)
            })?;
        info!(
            "Found {} interactions out of {} pairs",
            resolution.found_count(),
            keys.len()
        );

        let report = assemble(classified, &resolution);
        info!(
            total_pairs = report.summary.total_pairs,
            worst_severity = %report.summary.worst_severity,
            "Stack check complete"
        );

        Ok(report)
    }
}
