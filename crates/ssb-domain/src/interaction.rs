//! Interaction module - records from the interaction table

use crate::pair::Pair;
use crate::severity::Severity;
use crate::substance::SubstanceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A known interaction between two substances
///
/// Keyed by the canonical pair `(a_substance_id, b_substance_id)` with
/// `a_substance_id < b_substance_id`. The store guarantees at most one record
/// per pair. Columns beyond the ones modelled here are preserved in `extra`
/// and passed through to callers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Lesser substance identifier
    pub a_substance_id: SubstanceId,

    /// Greater substance identifier
    pub b_substance_id: SubstanceId,

    /// How concerning the interaction is
    pub severity: Severity,

    /// Stable interaction identifier (e.g. `INT_0042`)
    #[serde(default)]
    pub interaction_id: Option<String>,

    /// One-line summary
    #[serde(default)]
    pub summary_short: Option<String>,

    /// Pharmacological mechanism
    #[serde(default)]
    pub mechanism: Option<String>,

    /// Expected clinical effect
    #[serde(default)]
    pub clinical_effect: Option<String>,

    /// Management advice
    #[serde(default)]
    pub management: Option<String>,

    /// Evidence grade
    #[serde(default)]
    pub evidence_grade: Option<String>,

    /// Supporting citations, as stored (usually a JSON array)
    #[serde(default)]
    pub citations: Value,

    /// Any further columns of the row
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InteractionRecord {
    /// Create a record with only the key and severity populated
    pub fn new(
        a: impl Into<SubstanceId>,
        b: impl Into<SubstanceId>,
        severity: Severity,
    ) -> Self {
        Self {
            a_substance_id: a.into(),
            b_substance_id: b.into(),
            severity,
            interaction_id: None,
            summary_short: None,
            mechanism: None,
            clinical_effect: None,
            management: None,
            evidence_grade: None,
            citations: Value::Null,
            extra: Map::new(),
        }
    }

    /// Set the one-line summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary_short = Some(summary.into());
        self
    }

    /// The pair this record is keyed by
    ///
    /// Returns `None` for a malformed row that pairs a substance with itself.
    /// A row stored in reverse order still maps onto the canonical pair.
    pub fn pair(&self) -> Option<Pair> {
        Pair::new(self.a_substance_id.clone(), self.b_substance_id.clone())
    }
}
