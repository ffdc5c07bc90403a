//! Interaction resolution - one batch lookup for all surviving pairs

use crate::error::LookupError;
use crate::interaction::InteractionRecord;
use crate::pair::Pair;
use crate::traits::InteractionStore;
use std::collections::HashMap;
use tracing::debug;

/// Lookup result for a set of pairs
///
/// Every requested pair has an entry: the matching record, or `None` when the
/// store holds no record for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    records: HashMap<Pair, Option<InteractionRecord>>,
}

impl Resolution {
    /// Record for `pair`, if one was found
    pub fn get(&self, pair: &Pair) -> Option<&InteractionRecord> {
        self.records.get(pair).and_then(Option::as_ref)
    }

    /// Whether `pair` was part of the lookup
    pub fn contains(&self, pair: &Pair) -> bool {
        self.records.contains_key(pair)
    }

    /// Number of pairs looked up
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no pairs were looked up
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of pairs with a record
    pub fn found_count(&self) -> usize {
        self.records.values().filter(|r| r.is_some()).count()
    }
}

/// Resolve interaction records for `pairs` with a single store round trip
///
/// An empty `pairs` slice returns an empty resolution without contacting the
/// store. A store failure fails the whole resolution; no pair is marked as
/// not found because of it.
pub async fn resolve(
    store: &dyn InteractionStore,
    pairs: &[Pair],
) -> Result<Resolution, LookupError> {
    if pairs.is_empty() {
        return Ok(Resolution::default());
    }

    let rows = store.lookup_interactions(pairs).await?;
    debug!("Interaction lookup returned {} rows for {} pairs", rows.len(), pairs.len());

    let mut by_pair: HashMap<Pair, InteractionRecord> = HashMap::with_capacity(rows.len());
    for record in rows {
        if let Some(pair) = record.pair() {
            by_pair.insert(pair, record);
        }
    }

    let records = pairs
        .iter()
        .map(|pair| (pair.clone(), by_pair.remove(pair)))
        .collect();

    Ok(Resolution { records })
}
