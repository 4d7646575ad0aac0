use std::collections::BTreeSet;

use ahash::AHashSet;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::market::{AssetId, Market, PairId};
use crate::rebasing::neighbors::NeighborIndex;

/// Pair ids ordered from the reference-anchored pair to the origin pair.
pub type Path = SmallVec<[PairId; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Walk through pairs quoted in the frontier's base asset.
    Base,
    /// Walk through pairs based in the frontier's quote asset.
    Quote,
}

impl Direction {
    fn neighbors<'a>(&self, index: &'a NeighborIndex, id: &PairId) -> &'a BTreeSet<PairId> {
        match self {
            Direction::Base => index.base_neighbors(id),
            Direction::Quote => index.quote_neighbors(id),
        }
    }
}

/// Every path found for one origin pair, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebasePaths {
    pub base: Vec<Path>,
    pub quote: Vec<Path>,
}

impl RebasePaths {
    pub fn discover(
        origin: &PairId,
        reference: &AssetId,
        max_depth: u8,
        market: &Market,
        index: &NeighborIndex,
    ) -> Self {
        Self {
            base: find_paths(Direction::Base, origin, reference, max_depth, market, index),
            quote: find_paths(Direction::Quote, origin, reference, max_depth, market, index),
        }
    }

    pub fn len(&self) -> usize {
        self.base.len() + self.quote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.quote.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &Path)> {
        self.base
            .iter()
            .map(|p| (Direction::Base, p))
            .chain(self.quote.iter().map(|p| (Direction::Quote, p)))
    }
}

struct Search<'a> {
    direction: Direction,
    reference: &'a AssetId,
    max_depth: usize,
    market: &'a Market,
    index: &'a NeighborIndex,
}

/// Depth-first search for simple paths from `origin` to a pair based in
/// `reference`, at most `max_depth` pairs long (origin included).
pub fn find_paths(
    direction: Direction,
    origin: &PairId,
    reference: &AssetId,
    max_depth: u8,
    market: &Market,
    index: &NeighborIndex,
) -> Vec<Path> {
    let search = Search { direction, reference, max_depth: max_depth as usize, market, index };

    // trail grows away from the origin; emitted paths are reversed
    let mut trail: Path = smallvec![*origin];
    let mut visited = AHashSet::new();
    visited.insert(*origin);

    let mut found = Vec::new();
    search.walk(&mut trail, &mut visited, &mut found);
    trace!(?direction, origin = %origin, paths = found.len(), "Path search finished");
    found
}

impl Search<'_> {
    fn walk(&self, trail: &mut Path, visited: &mut AHashSet<PairId>, found: &mut Vec<Path>) {
        if trail.len() > self.max_depth {
            return;
        }
        let Some(frontier) = trail.last().copied() else {
            return;
        };
        let Some(pair) = self.market.get(&frontier) else {
            return;
        };
        if pair.base_id == *self.reference {
            found.push(trail.iter().rev().copied().collect());
            return;
        }

        for next in self.direction.neighbors(self.index, &frontier) {
            // simple paths only, whatever the depth bound
            if !visited.insert(*next) {
                continue;
            }
            trail.push(*next);
            self.walk(trail, visited, found);
            trail.pop();
            visited.remove(next);
        }
    }
}
