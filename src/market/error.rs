use thiserror::Error;

use crate::market::types::PairId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("pair stored under {key} hashes to {expected}")]
    IdMismatch { key: PairId, expected: PairId },

    #[error("pair {pair} is not in the market")]
    UnknownPair { pair: PairId },

    #[error("pair {pair} has zero combined base volume")]
    ZeroVolume { pair: PairId },
}

pub type MarketResult<T> = Result<T, MarketError>;
