//! Mode module - which pair types a check is interested in

use crate::pair::PairType;
use serde::{Deserialize, Serialize};

/// Checking mode for a stack check
///
/// Each mode retains exactly one [`PairType`]. No mode retains
/// [`PairType::DrugDrug`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Supplement-drug interactions
    #[default]
    #[serde(rename = "supplements-drugs")]
    SupplementsDrugs,

    /// Supplement-supplement interactions
    #[serde(rename = "supplements-supplements")]
    SupplementsSupplements,
}

impl Mode {
    /// Get the mode name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::SupplementsDrugs => "supplements-drugs",
            Mode::SupplementsSupplements => "supplements-supplements",
        }
    }

    /// Parse a mode from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supplements-drugs" => Some(Mode::SupplementsDrugs),
            "supplements-supplements" => Some(Mode::SupplementsSupplements),
            _ => None,
        }
    }

    /// The only pair type this mode keeps
    pub fn retained_pair_type(&self) -> PairType {
        match self {
            Mode::SupplementsDrugs => PairType::SupplementDrug,
            Mode::SupplementsSupplements => PairType::SupplementSupplement,
        }
    }

    /// Whether a pair of the given type survives classification in this mode
    pub fn retains(&self, pair_type: PairType) -> bool {
        // Drug-drug is out of scope whatever the mode
        pair_type != PairType::DrugDrug && pair_type == self.retained_pair_type()
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid mode: {}", s))
    }
}
