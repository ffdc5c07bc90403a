//! Report assembly - per-pair results, severity counts and ordering

use crate::classify::ClassifiedPair;
use crate::interaction::InteractionRecord;
use crate::resolve::Resolution;
use crate::severity::Severity;
use crate::substance::{SubstanceId, SubstanceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome for a single classified pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    /// Lesser substance identifier
    pub a_substance_id: SubstanceId,

    /// Greater substance identifier
    pub b_substance_id: SubstanceId,

    /// Whether an interaction record exists
    pub found: bool,

    /// The record, when found
    pub interaction: Option<InteractionRecord>,

    /// Type of `a_substance_id`
    pub a_type: SubstanceType,

    /// Type of `b_substance_id`
    pub b_type: SubstanceType,
}

impl PairResult {
    /// Severity used for counting and ordering (`none` when not found)
    pub fn severity(&self) -> Severity {
        self.interaction
            .as_ref()
            .map(|record| record.severity)
            .unwrap_or(Severity::None)
    }
}

/// Aggregate view of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of pairs checked
    pub total_pairs: usize,

    /// Most concerning severity present, `none` if nothing was found
    pub worst_severity: Severity,

    /// Pair count per severity
    ///
    /// Empty for a report with no pairs; otherwise holds all five buckets,
    /// zero included, summing to `total_pairs`.
    pub by_severity: BTreeMap<Severity, usize>,
}

impl ReportSummary {
    /// Summary of a report with no pairs
    pub fn empty() -> Self {
        Self {
            total_pairs: 0,
            worst_severity: Severity::None,
            by_severity: BTreeMap::new(),
        }
    }

    /// Count for one bucket (0 if absent)
    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Result of a stack check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackReport {
    /// Aggregate counts
    pub summary: ReportSummary,

    /// Per-pair results, most concerning first
    pub results: Vec<PairResult>,
}

impl StackReport {
    /// Report for a check that produced no pairs
    pub fn empty() -> Self {
        Self {
            summary: ReportSummary::empty(),
            results: Vec::new(),
        }
    }

    /// Number of pairs with an interaction record
    pub fn found_count(&self) -> usize {
        self.results.iter().filter(|r| r.found).count()
    }
}

/// Merge classified pairs with their resolved records into a report
///
/// Results are stably sorted by severity rank, so pairs of equal severity keep
/// their classification order.
pub fn assemble(pairs: Vec<ClassifiedPair>, resolution: &Resolution) -> StackReport {
    if pairs.is_empty() {
        return StackReport::empty();
    }

    let mut by_severity: BTreeMap<Severity, usize> =
        Severity::ALL.into_iter().map(|sev| (sev, 0)).collect();
    let mut worst_severity = Severity::None;

    let mut results: Vec<PairResult> = pairs
        .into_iter()
        .map(|classified| {
            let interaction = resolution.get(&classified.pair).cloned();
            let (a, b) = (classified.pair.a().clone(), classified.pair.b().clone());

            PairResult {
                a_substance_id: a,
                b_substance_id: b,
                found: interaction.is_some(),
                interaction,
                a_type: classified.a_type,
                b_type: classified.b_type,
            }
        })
        .collect();

    for result in &results {
        let severity = result.severity();
        *by_severity.entry(severity).or_insert(0) += 1;
        worst_severity = worst_severity.worst(severity);
    }

    // Vec::sort_by_key is stable
    results.sort_by_key(PairResult::severity);

    StackReport {
        summary: ReportSummary {
            total_pairs: results.len(),
            worst_severity,
            by_severity,
        },
        results,
    }
}
