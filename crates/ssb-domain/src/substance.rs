//! Substance module - identifiers and types of drugs and supplements

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque substance identifier (e.g. `"D_WARFARIN"`, `"S_GINKGO"`)
///
/// Identifiers are totally ordered by byte-lexicographic string comparison.
/// That ordering is what canonicalizes a [`Pair`](crate::Pair) and must agree
/// with the ordering used for `(a_substance_id, b_substance_id)` in the
/// interaction table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstanceId(String);

impl SubstanceId {
    /// Create a new identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SubstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SubstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for SubstanceId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl AsRef<str> for SubstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of substance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstanceType {
    /// Prescription or over-the-counter medication
    Drug,

    /// Dietary supplement, herb or nutrient
    Supplement,
}

impl SubstanceType {
    /// Get the type name as stored in the substance table
    pub fn as_str(&self) -> &'static str {
        match self {
            SubstanceType::Drug => "drug",
            SubstanceType::Supplement => "supplement",
        }
    }

    /// Parse a type from its stored name
    ///
    /// Matching is exact; anything else is an unresolvable type.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "drug" => Some(SubstanceType::Drug),
            "supplement" => Some(SubstanceType::Supplement),
            _ => None,
        }
    }
}

impl std::str::FromStr for SubstanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid substance type: {}", s))
    }
}

/// Number of active substances known to the substance store, by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstanceCounts {
    /// Active supplements
    pub supplements: u64,

    /// Active drugs
    pub drugs: u64,
}

impl SubstanceCounts {
    /// Total active substances
    pub fn total(&self) -> u64 {
        self.supplements + self.drugs
    }
}
