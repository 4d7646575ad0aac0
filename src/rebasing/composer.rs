//! Rate conversion along discovered paths.
//!
//! `shallow_rebase` crosses a single bridging pair; `deep_rebase` walks every
//! path of a pair and blends the per-path results by anchor volume.

use tracing::trace;

use crate::market::{AssetId, Market, PairId};
use crate::rebasing::error::{RebaseError, RebaseResult};
use crate::rebasing::paths::{Direction, Path, RebasePaths};

/// Result of a successful deep rebase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeepRebase {
    pub rate: f64,
    /// Paths that survived and carried weight.
    pub paths: usize,
}

/// Re-expresses `rate` through the pair `(reference, asset)`.
pub fn shallow_rebase(rate: f64, reference: &AssetId, asset: &AssetId, market: &Market) -> RebaseResult<f64> {
    if asset == reference {
        return Ok(rate);
    }
    let bridge = market.find(reference, asset).ok_or_else(|| RebaseError::NoConversionPair {
        reference: reference.clone(),
        asset: asset.clone(),
    })?;
    Ok(rate * bridge.spread_average()?)
}

/// Volume-weighted blend of `rate` converted along every path in `paths`.
///
/// A path that hits a missing bridge or a zero-volume pair is dropped on its
/// own. If nothing carries weight the rate is `Unreachable`.
pub fn deep_rebase(rate: f64, reference: &AssetId, paths: &RebasePaths, market: &Market) -> RebaseResult<DeepRebase> {
    // a lone-pair path means the origin is already based in the reference
    if paths.iter().any(|(_, path)| path.len() == 1) {
        return Ok(DeepRebase { rate, paths: 1 });
    }

    let mut weight_sum = 0.0;
    let mut weighted_rate_sum = 0.0;
    let mut contributing = 0;

    for (direction, path) in paths.iter() {
        match rebase_along(direction, rate, reference, path, market) {
            Ok((path_rate, weight)) if weight > 0.0 => {
                weight_sum += weight;
                weighted_rate_sum += weight * path_rate;
                contributing += 1;
            }
            Ok(_) => trace!(?direction, len = path.len(), "Path carries no weight"),
            Err(e) => trace!(?direction, len = path.len(), error = %e, "Dropping path"),
        }
    }

    if weight_sum == 0.0 {
        return Err(RebaseError::Unreachable { reference: reference.clone() });
    }
    Ok(DeepRebase { rate: weighted_rate_sum / weight_sum, paths: contributing })
}

/// Converts `rate` along one path and returns `(converted rate, path weight)`.
fn rebase_along(
    direction: Direction,
    rate: f64,
    reference: &AssetId,
    path: &Path,
    market: &Market,
) -> RebaseResult<(f64, f64)> {
    let (anchor_id, rest) = path.split_first().ok_or_else(|| RebaseError::Unreachable {
        reference: reference.clone(),
    })?;
    let anchor = market.pair(anchor_id)?;

    // Base walks skip the origin and cross each pair as (base -> quote).
    // Quote walks skip the anchor and cross each pair the other way round.
    let steps: &[PairId] = match direction {
        Direction::Base => &path[..path.len() - 1],
        Direction::Quote => rest,
    };

    let mut converted = rate;
    for id in steps {
        let step = market.pair(id)?;
        converted = match direction {
            Direction::Base => shallow_rebase(converted, &step.base_id, &step.quote_id, market)?,
            Direction::Quote => shallow_rebase(converted, &step.quote_id, &step.base_id, market)?,
        };
    }

    let anchor_volume = shallow_rebase(anchor.combined_base_volume(), reference, &anchor.base_id, market)?;
    Ok((converted, anchor_volume / path.len() as f64))
}
