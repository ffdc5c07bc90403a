//! In-crate fake store for unit tests

use crate::error::LookupError;
use crate::interaction::InteractionRecord;
use crate::pair::Pair;
use crate::substance::{SubstanceCounts, SubstanceId, SubstanceType};
use crate::traits::{InteractionStore, SubstanceStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    types: HashMap<SubstanceId, SubstanceType>,
    interactions: Vec<InteractionRecord>,
    return_all: bool,
    fail_types: bool,
    fail_interactions: bool,
    type_calls: AtomicUsize,
    interaction_calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn with_substance(mut self, id: &str, ty: SubstanceType) -> Self {
        self.types.insert(SubstanceId::from(id), ty);
        self
    }

    pub(crate) fn with_interaction(mut self, record: InteractionRecord) -> Self {
        self.interactions.push(record);
        self
    }

    /// Return every stored row regardless of the requested pairs
    pub(crate) fn returning_all_interactions(mut self) -> Self {
        self.return_all = true;
        self
    }

    pub(crate) fn failing_types(mut self) -> Self {
        self.fail_types = true;
        self
    }

    pub(crate) fn failing_interactions(mut self) -> Self {
        self.fail_interactions = true;
        self
    }

    pub(crate) fn type_calls(&self) -> usize {
        self.type_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn interaction_calls(&self) -> usize {
        self.interaction_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubstanceStore for FakeStore {
    async fn lookup_types(
        &self,
        ids: &[SubstanceId],
    ) -> Result<HashMap<SubstanceId, SubstanceType>, LookupError> {
        self.type_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_types {
            return Err(LookupError::Communication("connection refused".to_string()));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.types.get(id).map(|ty| (id.clone(), *ty)))
            .collect())
    }

    async fn substance_counts(&self) -> Result<SubstanceCounts, LookupError> {
        let drugs = self.types.values().filter(|t| **t == SubstanceType::Drug).count();
        Ok(SubstanceCounts {
            supplements: (self.types.len() - drugs) as u64,
            drugs: drugs as u64,
        })
    }
}

#[async_trait]
impl InteractionStore for FakeStore {
    async fn lookup_interactions(
        &self,
        pairs: &[Pair],
    ) -> Result<Vec<InteractionRecord>, LookupError> {
        self.interaction_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_interactions {
            return Err(LookupError::Communication("connection reset".to_string()));
        }

        Ok(self
            .interactions
            .iter()
            .filter(|record| {
                self.return_all
                    || record
                        .pair()
                        .map(|p| pairs.contains(&p))
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}
