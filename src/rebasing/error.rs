use thiserror::Error;

use crate::market::{AssetId, MarketError, PairId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebaseError {
    #[error("no pair in market to rebase {asset} into {reference}")]
    NoConversionPair { reference: AssetId, asset: AssetId },

    #[error("pair {pair} has zero combined base volume")]
    ZeroVolume { pair: PairId },

    #[error("no path reaches reference asset {reference}")]
    Unreachable { reference: AssetId },

    #[error("rebase worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Market(MarketError),
}

impl From<MarketError> for RebaseError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::ZeroVolume { pair } => RebaseError::ZeroVolume { pair },
            other => RebaseError::Market(other),
        }
    }
}

pub type RebaseResult<T> = Result<T, RebaseError>;
