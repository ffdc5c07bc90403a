//! Supplement Safety Bible Domain Layer
//!
//! This crate contains the interaction-checking logic behind the stack checker.
//! It owns the value types, the pipeline stages and the trait interfaces that
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Substance**: a drug or supplement identified by an opaque ID
//! - **Pair**: an unordered, canonically ordered combination of two substances
//! - **Mode**: which substance-type combination a check is interested in
//! - **Severity**: `avoid < caution < monitor < info < none`
//!
//! ## Pipeline
//!
//! A check runs strictly linearly:
//!
//! 1. [`enumerate`] builds every unordered pair from the deduplicated input
//! 2. [`classify_and_filter`] tags pairs by type combination and applies the mode
//! 3. [`resolve`] batch-fetches interaction records through an [`InteractionStore`]
//! 4. [`assemble`] produces the severity-ranked report
//!
//! [`StackChecker`] wires the stages to injected stores.
//!
//! ```
//! use ssb_domain::{enumerate, Pair};
//!
//! let pairs = enumerate(&["S_ZINC", "D_WARFARIN", "S_ZINC"]);
//! assert_eq!(pairs, vec![Pair::new("D_WARFARIN", "S_ZINC").unwrap()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checker;
pub mod classify;
pub mod error;
pub mod interaction;
pub mod mode;
pub mod pair;
pub mod report;
pub mod resolve;
pub mod severity;
pub mod substance;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use checker::StackChecker;
pub use classify::{classify_and_filter, ClassifiedPair};
pub use error::{CheckError, LookupError};
pub use interaction::InteractionRecord;
pub use mode::Mode;
pub use pair::{enumerate, Pair, PairType};
pub use report::{assemble, PairResult, ReportSummary, StackReport};
pub use resolve::{resolve, Resolution};
pub use severity::Severity;
pub use substance::{SubstanceCounts, SubstanceId, SubstanceType};
pub use traits::{InteractionStore, SubstanceStore};
