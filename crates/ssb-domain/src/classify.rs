//! Pair classification and mode filtering

use crate::mode::Mode;
use crate::pair::{Pair, PairType};
use crate::substance::{SubstanceId, SubstanceType};
use std::collections::HashMap;

/// A pair that survived classification, with both substance types resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPair {
    /// The canonical pair
    pub pair: Pair,

    /// Type of `pair.a()`
    pub a_type: SubstanceType,

    /// Type of `pair.b()`
    pub b_type: SubstanceType,
}

impl ClassifiedPair {
    /// Type combination of the pair
    pub fn pair_type(&self) -> PairType {
        PairType::classify(Some(self.a_type), Some(self.b_type))
    }
}

/// Tag each pair by type combination and keep only those `mode` retains
///
/// A pair referencing an identifier absent from `types` is unknown and is
/// dropped without trace. Drug-drug pairs are dropped in every mode. The
/// relative order of `pairs` is preserved.
pub fn classify_and_filter(
    pairs: Vec<Pair>,
    types: &HashMap<SubstanceId, SubstanceType>,
    mode: Mode,
) -> Vec<ClassifiedPair> {
    pairs
        .into_iter()
        .filter_map(|pair| {
            let a_type = types.get(pair.a()).copied();
            let b_type = types.get(pair.b()).copied();

            if !mode.retains(PairType::classify(a_type, b_type)) {
                return None;
            }

            // Retained pair types are never unknown, so both sides resolved
            Some(ClassifiedPair {
                a_type: a_type?,
                b_type: b_type?,
                pair,
            })
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::pair::enumerate;
    use proptest::prelude::*;

    fn arb_type() -> impl Strategy<Value = Option<SubstanceType>> {
        prop_oneof![
            Just(Some(SubstanceType::Drug)),
            Just(Some(SubstanceType::Supplement)),
            Just(None),
        ]
    }

    fn arb_mode() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::SupplementsDrugs), Just(Mode::SupplementsSupplements)]
    }

    proptest! {
        /// Property: survivors match the mode, never drug-drug, never unknown
        #[test]
        fn test_filter_respects_mode(
            substances in prop::collection::vec(("[a-f]{1,3}", arb_type()), 0..16),
            mode in arb_mode(),
        ) {
            let ids: Vec<String> = substances.iter().map(|(id, _)| id.clone()).collect();
            let mut types = HashMap::new();
            for (id, ty) in &substances {
                if let Some(ty) = ty {
                    types.entry(SubstanceId::from(id)).or_insert(*ty);
                }
            }

            let pairs = enumerate(&ids);
            let kept = classify_and_filter(pairs.clone(), &types, mode);

            for classified in &kept {
                prop_assert_eq!(classified.pair_type(), mode.retained_pair_type());
                prop_assert!(
                    !(classified.a_type == SubstanceType::Drug
                        && classified.b_type == SubstanceType::Drug)
                );
                prop_assert!(types.contains_key(classified.pair.a()));
                prop_assert!(types.contains_key(classified.pair.b()));
            }

            // Survivors keep their enumeration order
            let positions: Vec<usize> = kept
                .iter()
                .map(|c| pairs.iter().position(|p| *p == c.pair).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
