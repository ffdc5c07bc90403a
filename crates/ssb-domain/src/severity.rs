//! Severity module - ranked interaction severities

use serde::{Deserialize, Serialize};

/// Severity of an interaction, most concerning first
///
/// The derived ordering is the rank order: `Avoid < Caution < Monitor < Info < None`.
/// `None` is a sentinel for "looked up, no record found" and is not expected
/// as a stored value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Do not combine
    Avoid,

    /// Combine only with care
    Caution,

    /// Combine, watching for effects
    Monitor,

    /// Informational only
    Info,

    /// No known interaction
    None,
}

impl Severity {
    /// Every severity bucket in rank order
    pub const ALL: [Severity; 5] = [
        Severity::Avoid,
        Severity::Caution,
        Severity::Monitor,
        Severity::Info,
        Severity::None,
    ];

    /// Rank of the severity, 0 (avoid) to 4 (none)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Avoid => 0,
            Severity::Caution => 1,
            Severity::Monitor => 2,
            Severity::Info => 3,
            Severity::None => 4,
        }
    }

    /// Get the severity name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Avoid => "avoid",
            Severity::Caution => "caution",
            Severity::Monitor => "monitor",
            Severity::Info => "info",
            Severity::None => "none",
        }
    }

    /// Parse a severity from its name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sev| sev.as_str() == s)
    }

    /// The more concerning of two severities
    pub fn worst(self, other: Severity) -> Severity {
        self.min(other)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid severity: {}", s))
    }
}
