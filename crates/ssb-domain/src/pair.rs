//! Pair module - canonical substance pairs and their enumeration

use crate::substance::{SubstanceId, SubstanceType};
use std::collections::HashSet;
use std::fmt;

/// An unordered pair of two distinct substances
///
/// Stored canonically with `a < b`, so `Pair::new(x, y)` and `Pair::new(y, x)`
/// are equal and hash identically. A substance never pairs with itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    a: SubstanceId,
    b: SubstanceId,
}

impl Pair {
    /// Create a canonical pair, or `None` if both identifiers are equal
    pub fn new(x: impl Into<SubstanceId>, y: impl Into<SubstanceId>) -> Option<Self> {
        let (x, y) = (x.into(), y.into());
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lesser identifier
    pub fn a(&self) -> &SubstanceId {
        &self.a
    }

    /// The greater identifier
    pub fn b(&self) -> &SubstanceId {
        &self.b
    }

    /// Check whether the pair references the given identifier
    pub fn contains(&self, id: &SubstanceId) -> bool {
        &self.a == id || &self.b == id
    }

    /// `"{a}|{b}"` rendering, for logs
    pub fn key(&self) -> String {
        format!("{}|{}", self.a, self.b)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.a, self.b)
    }
}

/// Type combination of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairType {
    /// Both substances are supplements
    SupplementSupplement,

    /// One supplement and one drug, in either order
    SupplementDrug,

    /// Both substances are drugs (never reported)
    DrugDrug,

    /// At least one substance type could not be resolved
    Unknown,
}

impl PairType {
    /// Classify a pair from its two (possibly unresolved) substance types
    pub fn classify(a: Option<SubstanceType>, b: Option<SubstanceType>) -> Self {
        use SubstanceType::{Drug, Supplement};

        match (a, b) {
            (Some(Supplement), Some(Supplement)) => PairType::SupplementSupplement,
            (Some(Supplement), Some(Drug)) | (Some(Drug), Some(Supplement)) => {
                PairType::SupplementDrug
            }
            (Some(Drug), Some(Drug)) => PairType::DrugDrug,
            _ => PairType::Unknown,
        }
    }

    /// Get the pair type name
    pub fn as_str(&self) -> &'static str {
        match self {
            PairType::SupplementSupplement => "supplement-supplement",
            PairType::SupplementDrug => "supplement-drug",
            PairType::DrugDrug => "drug-drug",
            PairType::Unknown => "unknown",
        }
    }
}

/// Build every unordered pair of distinct identifiers from `items`
///
/// Duplicates are collapsed first, keeping the first occurrence. For `n`
/// distinct identifiers exactly `n * (n - 1) / 2` pairs are returned, in
/// nested-loop order over the deduplicated input. Fewer than two distinct
/// identifiers yields an empty list.
pub fn enumerate<S: AsRef<str>>(items: &[S]) -> Vec<Pair> {
    let mut seen = HashSet::with_capacity(items.len());
    let unique: Vec<&str> = items
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect();

    let mut pairs = Vec::with_capacity(unique.len() * unique.len().saturating_sub(1) / 2);
    for (i, x) in unique.iter().enumerate() {
        for y in &unique[i + 1..] {
            // Distinct after deduplication, so construction cannot fail
            if let Some(pair) = Pair::new(*x, *y) {
                pairs.push(pair);
            }
        }
    }

    pairs
}
