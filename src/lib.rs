pub mod config;
pub mod market;
pub mod rebasing;
pub mod telemetry;

pub use market::{AssetId, ExchangeId, ExchangeQuote, Market, Pair, PairId};
pub use rebasing::{rebase_market, RebaseError, RebaseOrchestrator, RebaseOutcome, RebaseStatus};
