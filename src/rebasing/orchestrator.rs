use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::market::{AssetId, ExchangeQuote, Market, Pair, PairId};
use crate::rebasing::composer::deep_rebase;
use crate::rebasing::error::{RebaseError, RebaseResult};
use crate::rebasing::neighbors::NeighborIndex;
use crate::rebasing::paths::RebasePaths;

/// How a single pair came out of a market rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RebaseStatus {
    /// Base asset already is the reference; quotes copied as-is.
    Reference,
    /// Converted through `paths` weighted paths.
    Rebased { paths: usize },
    /// No path carried weight; every quote field was zeroed.
    Unreachable,
}

/// Rebased market plus the per-pair status that tells a real zero apart
/// from a pair that could not be converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebaseOutcome {
    pub market: Market,
    pub statuses: BTreeMap<PairId, RebaseStatus>,
}

impl RebaseOutcome {
    pub fn status(&self, id: &PairId) -> Option<RebaseStatus> {
        self.statuses.get(id).copied()
    }

    pub fn unreachable(&self) -> impl Iterator<Item = &PairId> {
        self.statuses
            .iter()
            .filter(|(_, status)| **status == RebaseStatus::Unreachable)
            .map(|(id, _)| id)
    }

    pub fn is_fully_rebased(&self) -> bool {
        self.unreachable().next().is_none()
    }
}

type Slot = (PairId, Pair, RebaseStatus);

/// Fans the pairs of one market out over scoped worker threads.
///
/// Workers share the input market and its neighbor index read-only and each
/// returns its own result vector; the calling thread merges them after the
/// join.
#[derive(Debug, Clone, Copy)]
pub struct RebaseOrchestrator {
    workers: NonZeroUsize,
}

impl Default for RebaseOrchestrator {
    fn default() -> Self {
        let workers = std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        Self { workers }
    }
}

impl RebaseOrchestrator {
    /// `0` picks the available parallelism.
    pub fn new(workers: usize) -> Self {
        NonZeroUsize::new(workers).map_or_else(Self::default, |workers| Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    #[instrument(skip(self, market), fields(reference = %reference, pairs = market.len(), workers = self.workers.get()))]
    pub fn rebase(&self, reference: &AssetId, max_depth: u8, market: &Market) -> RebaseResult<RebaseOutcome> {
        let started = Instant::now();
        let index = NeighborIndex::build(market);

        let ids: Vec<PairId> = market.ids().copied().collect();
        let chunk_size = ids.len().div_ceil(self.workers.get()).max(1);

        let per_worker: Vec<Vec<Slot>> = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = ids
                .chunks(chunk_size)
                .map(|chunk| {
                    let index = &index;
                    s.spawn(move |_| {
                        chunk
                            .iter()
                            .filter_map(|id| rebase_pair(id, reference, max_depth, market, index))
                            .collect::<Vec<Slot>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| RebaseError::WorkerPanicked)?
        .map_err(|_| RebaseError::WorkerPanicked)?;

        let mut output = Market::new();
        let mut statuses = BTreeMap::new();
        for (id, pair, status) in per_worker.into_iter().flatten() {
            output.insert(pair);
            statuses.insert(id, status);
        }

        let outcome = RebaseOutcome { market: output, statuses };
        let unreachable = outcome.unreachable().count();
        let elapsed = started.elapsed();

        metrics::counter!("rebase_pairs_total").increment(market.len() as u64);
        metrics::counter!("rebase_pairs_unreachable_total").increment(unreachable as u64);
        metrics::histogram!("rebase_market_duration_seconds").record(elapsed.as_secs_f64());
        info!(
            pairs = market.len(),
            unreachable,
            elapsed_us = elapsed.as_micros() as u64,
            "Rebased market"
        );
        Ok(outcome)
    }
}

/// Rebases every pair of `market` into `reference` using all available cores.
pub fn rebase_market(reference: &AssetId, max_depth: u8, market: &Market) -> RebaseResult<RebaseOutcome> {
    RebaseOrchestrator::default().rebase(reference, max_depth, market)
}

fn rebase_pair(
    id: &PairId,
    reference: &AssetId,
    max_depth: u8,
    market: &Market,
    index: &NeighborIndex,
) -> Option<Slot> {
    let pair = market.get(id)?;
    if pair.base_id == *reference {
        return Some((*id, pair.clone(), RebaseStatus::Reference));
    }

    let paths = RebasePaths::discover(id, reference, max_depth, market, index);
    metrics::counter!("rebase_paths_discovered_total").increment(paths.len() as u64);
    debug!(pair = %id, base = paths.base.len(), quote = paths.quote.len(), "Discovered paths");

    // weights do not depend on the rate, so a unit probe decides reachability
    let rebased = deep_rebase(1.0, reference, &paths, market).and_then(|probe| {
        let quotes = pair
            .quotes
            .iter()
            .map(|q| q.try_map_fields(|rate| deep_rebase(rate, reference, &paths, market).map(|r| r.rate)))
            .collect::<RebaseResult<Vec<ExchangeQuote>>>()?;
        Ok((quotes, probe.paths))
    });

    let (quotes, status) = match rebased {
        Ok((quotes, paths)) => (quotes, RebaseStatus::Rebased { paths }),
        Err(RebaseError::Unreachable { .. }) => {
            debug!(pair = %id, "No path to reference asset");
            (pair.quotes.iter().map(ExchangeQuote::zeroed).collect(), RebaseStatus::Unreachable)
        }
        Err(e) => {
            warn!(pair = %id, error = %e, "Rebase failed");
            (pair.quotes.iter().map(ExchangeQuote::zeroed).collect(), RebaseStatus::Unreachable)
        }
    };

    let rebased_pair = Pair { base_id: pair.base_id.clone(), quote_id: pair.quote_id.clone(), quotes };
    Some((*id, rebased_pair, status))
}
