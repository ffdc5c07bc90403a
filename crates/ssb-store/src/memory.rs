//! In-memory store
//!
//! Holds substances and interactions in process. Used by tests and for
//! running the service without a database.

use async_trait::async_trait;
use ssb_domain::{
    InteractionRecord, InteractionStore, LookupError, Pair, SubstanceCounts, SubstanceId,
    SubstanceStore, SubstanceType,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Inner {
    substances: HashMap<SubstanceId, (SubstanceType, bool)>,
    interactions: HashMap<Pair, InteractionRecord>,
}

/// In-memory substance and interaction store
///
/// Clones share the same data and call counters.
///
/// # Examples
///
/// ```
/// use ssb_domain::{InteractionRecord, Severity, SubstanceType};
/// use ssb_store::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_substance("D_WARFARIN", SubstanceType::Drug)
///     .with_substance("S_GINKGO", SubstanceType::Supplement)
///     .with_interaction(InteractionRecord::new("D_WARFARIN", "S_GINKGO", Severity::Avoid));
/// assert_eq!(store.interaction_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    type_calls: Arc<AtomicUsize>,
    interaction_calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
    interactions_unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active substance
    pub fn with_substance(self, id: impl Into<SubstanceId>, ty: SubstanceType) -> Self {
        self.insert_substance(id, ty, true);
        self
    }

    /// Add an interaction record, keyed by its canonical pair
    ///
    /// Records that pair a substance with itself are ignored. A later record
    /// for the same pair replaces the earlier one.
    pub fn with_interaction(self, record: InteractionRecord) -> Self {
        self.insert_interaction(record);
        self
    }

    /// Insert or replace a substance
    pub fn insert_substance(&self, id: impl Into<SubstanceId>, ty: SubstanceType, active: bool) {
        self.write().substances.insert(id.into(), (ty, active));
    }

    /// Insert or replace an interaction record
    pub fn insert_interaction(&self, record: InteractionRecord) {
        if let Some(pair) = record.pair() {
            self.write().interactions.insert(pair, record);
        }
    }

    /// Make every lookup fail, as an unreachable database would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only interaction lookups fail, leaving type lookups working
    pub fn set_interactions_unavailable(&self, unavailable: bool) {
        self.interactions_unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored interaction records
    pub fn interaction_count(&self) -> usize {
        self.read().interactions.len()
    }

    /// Number of `lookup_types` calls so far
    pub fn type_calls(&self) -> usize {
        self.type_calls.load(Ordering::SeqCst)
    }

    /// Number of `lookup_interactions` calls so far
    pub fn interaction_calls(&self) -> usize {
        self.interaction_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), LookupError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Communication("Store unavailable".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SubstanceStore for MemoryStore {
    async fn lookup_types(
        &self,
        ids: &[SubstanceId],
    ) -> Result<HashMap<SubstanceId, SubstanceType>, LookupError> {
        self.type_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let inner = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.substances.get(id).map(|(ty, _)| (id.clone(), *ty)))
            .collect())
    }

    async fn substance_counts(&self) -> Result<SubstanceCounts, LookupError> {
        self.check_available()?;

        let inner = self.read();
        let mut counts = SubstanceCounts::default();
        for (ty, active) in inner.substances.values() {
            match (ty, active) {
                (SubstanceType::Supplement, true) => counts.supplements += 1,
                (SubstanceType::Drug, true) => counts.drugs += 1,
                (_, false) => {}
            }
        }

        Ok(counts)
    }
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn lookup_interactions(
        &self,
        pairs: &[Pair],
    ) -> Result<Vec<InteractionRecord>, LookupError> {
        self.interaction_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.interactions_unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Communication(
                "Interaction table unavailable".to_string(),
            ));
        }

        let inner = self.read();
        Ok(pairs
            .iter()
            .filter_map(|pair| inner.interactions.get(pair).cloned())
            .collect())
    }
}
