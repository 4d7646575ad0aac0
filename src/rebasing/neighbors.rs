use std::collections::BTreeSet;

use ahash::AHashMap;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::market::{Market, PairId};

static NO_NEIGHBORS: BTreeSet<PairId> = BTreeSet::new();

/// Pairs that can extend a conversion path from one pair, per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Pairs quoted in this pair's base asset.
    pub base: BTreeSet<PairId>,
    /// Pairs based in this pair's quote asset.
    pub quote: BTreeSet<PairId>,
}

/// Adjacency of every pair in one market snapshot.
///
/// Built from the market's content and borrowed by every rebase task of the
/// same request. Only valid for the market it was built from.
#[derive(Debug, Clone, Default)]
pub struct NeighborIndex {
    by_pair: AHashMap<PairId, Neighbors>,
}

impl NeighborIndex {
    #[instrument(level = "debug", skip(market), fields(pairs = market.len()))]
    pub fn build(market: &Market) -> Self {
        let by_quote = market.iter().map(|(id, pair)| (&pair.quote_id, *id)).into_group_map();
        let by_base = market.iter().map(|(id, pair)| (&pair.base_id, *id)).into_group_map();

        let by_pair: AHashMap<PairId, Neighbors> = market
            .iter()
            .map(|(id, pair)| {
                let base = by_quote
                    .get(&pair.base_id)
                    .into_iter()
                    .flatten()
                    .filter(|other| *other != id)
                    .copied()
                    .collect();
                let quote = by_base
                    .get(&pair.quote_id)
                    .into_iter()
                    .flatten()
                    .filter(|other| *other != id)
                    .copied()
                    .collect();
                (*id, Neighbors { base, quote })
            })
            .collect();

        let edges: usize = by_pair.values().map(|n| n.base.len() + n.quote.len()).sum();
        debug!(pairs = by_pair.len(), edges, "Built neighbor index");
        Self { by_pair }
    }

    pub fn get(&self, id: &PairId) -> Option<&Neighbors> {
        self.by_pair.get(id)
    }

    pub fn base_neighbors(&self, id: &PairId) -> &BTreeSet<PairId> {
        self.by_pair.get(id).map_or(&NO_NEIGHBORS, |n| &n.base)
    }

    pub fn quote_neighbors(&self, id: &PairId) -> &BTreeSet<PairId> {
        self.by_pair.get(id).map_or(&NO_NEIGHBORS, |n| &n.quote)
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Pair;
    use proptest::prelude::*;

    fn set(ids: &[PairId]) -> BTreeSet<PairId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_adjacent_pairs_are_neighbors() {
        let a = Pair::new("1", "2");
        let b = Pair::new("2", "3");
        let market: Market = [a.clone(), b.clone()].into_iter().collect();

        let index = NeighborIndex::build(&market);

        assert_eq!(index.get(&a.id()), Some(&Neighbors { base: set(&[]), quote: set(&[b.id()]) }));
        assert_eq!(index.get(&b.id()), Some(&Neighbors { base: set(&[a.id()]), quote: set(&[]) }));
    }

    #[test]
    fn test_disjoint_pairs_have_no_neighbors() {
        let a = Pair::new("1", "2");
        let b = Pair::new("3", "4");
        let market: Market = [a.clone(), b.clone()].into_iter().collect();

        let index = NeighborIndex::build(&market);

        assert_eq!(index.len(), 2);
        assert!(index.base_neighbors(&a.id()).is_empty());
        assert!(index.quote_neighbors(&a.id()).is_empty());
        assert!(index.base_neighbors(&b.id()).is_empty());
        assert!(index.quote_neighbors(&b.id()).is_empty());
    }

    #[test]
    fn test_pair_is_never_its_own_neighbor() {
        let a = Pair::new("1", "1");
        let market: Market = [a.clone()].into_iter().collect();

        let index = NeighborIndex::build(&market);

        assert!(index.base_neighbors(&a.id()).is_empty());
        assert!(index.quote_neighbors(&a.id()).is_empty());
    }

    #[test]
    fn test_reciprocal_pairs() {
        let a = Pair::new("1", "2");
        let b = Pair::new("2", "1");
        let market: Market = [a.clone(), b.clone()].into_iter().collect();

        let index = NeighborIndex::build(&market);

        assert_eq!(index.base_neighbors(&a.id()), &set(&[b.id()]));
        assert_eq!(index.quote_neighbors(&a.id()), &set(&[b.id()]));
    }

    #[test]
    fn test_unknown_pair_has_no_neighbors() {
        let index = NeighborIndex::build(&Market::new());
        assert!(index.is_empty());
        assert!(index.base_neighbors(&Pair::new("x", "y").id()).is_empty());
    }

    proptest! {
        // Q is a base neighbor of P exactly when P is a quote neighbor of Q.
        #[test]
        fn prop_directions_mirror_each_other(edges in prop::collection::vec((0u8..6, 0u8..6), 0..20)) {
            let market: Market = edges
                .iter()
                .map(|(b, q)| Pair::new(b.to_string(), q.to_string()))
                .collect();
            let index = NeighborIndex::build(&market);

            for (id, pair) in market.iter() {
                for n in index.base_neighbors(id) {
                    prop_assert_eq!(&market.get(n).unwrap().quote_id, &pair.base_id);
                    prop_assert!(index.quote_neighbors(n).contains(id));
                }
                for n in index.quote_neighbors(id) {
                    prop_assert_eq!(&market.get(n).unwrap().base_id, &pair.quote_id);
                    prop_assert!(index.base_neighbors(n).contains(id));
                }
            }
        }
    }
}
