// Market data model entrypoint
pub mod types;  // asset/pair ids, exchange quotes
pub mod pair;   // a single base/quote market and its volume math
pub mod graph;  // the id-keyed snapshot of all pairs
pub mod error;

pub use error::{MarketError, MarketResult};
pub use graph::Market;
pub use pair::Pair;
pub use types::{AssetId, ExchangeId, ExchangeQuote, PairId};
