use serde::{Deserialize, Serialize};

use crate::market::error::{MarketError, MarketResult};
use crate::market::types::{AssetId, ExchangeQuote, PairId};

/// A base/quote market carrying quotes from zero or more exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub base_id: AssetId,
    pub quote_id: AssetId,
    #[serde(default, rename = "exchangeMarkets")]
    pub quotes: Vec<ExchangeQuote>,
}

impl Pair {
    pub fn new(base_id: impl Into<AssetId>, quote_id: impl Into<AssetId>) -> Self {
        Self { base_id: base_id.into(), quote_id: quote_id.into(), quotes: Vec::new() }
    }

    pub fn with_quote(mut self, quote: ExchangeQuote) -> Self {
        self.quotes.push(quote);
        self
    }

    pub fn id(&self) -> PairId {
        PairId::from_assets(&self.base_id, &self.quote_id)
    }

    pub fn combined_base_volume(&self) -> f64 {
        self.quotes.iter().map(|q| q.base_volume).sum()
    }

    pub fn volume_weighted_bid_sum(&self) -> f64 {
        self.quotes.iter().map(|q| q.base_volume * q.current_bid).sum()
    }

    pub fn volume_weighted_ask_sum(&self) -> f64 {
        self.quotes.iter().map(|q| q.base_volume * q.current_ask).sum()
    }

    /// Volume-weighted mid of bid and ask across all exchanges.
    ///
    /// A pair without volume has no defined rate; callers get `ZeroVolume`
    /// rather than a zero they could mistake for a real price.
    pub fn spread_average(&self) -> MarketResult<f64> {
        let volume = self.combined_base_volume();
        if volume == 0.0 {
            return Err(MarketError::ZeroVolume { pair: self.id() });
        }
        let mid_sum = (self.volume_weighted_bid_sum() + self.volume_weighted_ask_sum()) / 2.0;
        Ok(mid_sum / volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::ExchangeId;
    use approx::assert_relative_eq;

    fn two_exchange_pair() -> Pair {
        Pair::new("WETH", "DAI")
            .with_quote(ExchangeQuote::new(0.0, 100.7, 103.5, 1.5).on(ExchangeId::Kyber))
            .with_quote(ExchangeQuote::new(0.0, 150.1, 155.2, 3.0).on(ExchangeId::Uniswap))
    }

    #[test]
    fn test_combined_base_volume() {
        assert_relative_eq!(two_exchange_pair().combined_base_volume(), 4.5);
    }

    #[test]
    fn test_volume_weighted_sums() {
        let pair = two_exchange_pair();
        assert_relative_eq!(pair.volume_weighted_bid_sum(), 100.7 * 1.5 + 150.1 * 3.0);
        assert_relative_eq!(pair.volume_weighted_ask_sum(), 103.5 * 1.5 + 155.2 * 3.0);
    }

    #[test]
    fn test_spread_average() {
        let pair = two_exchange_pair();
        let expected = (pair.volume_weighted_bid_sum() + pair.volume_weighted_ask_sum()) / 2.0 / 4.5;
        assert_relative_eq!(pair.spread_average().unwrap(), expected);
    }

    #[test]
    fn test_spread_average_zero_volume() {
        let pair = Pair::new("1", "2").with_quote(ExchangeQuote::new(1.0, 2.0, 2.0, 0.0));
        assert_eq!(pair.spread_average(), Err(MarketError::ZeroVolume { pair: pair.id() }));

        let empty = Pair::new("1", "2");
        assert!(empty.spread_average().is_err());
    }

    #[test]
    fn test_id_ignores_quotes() {
        assert_eq!(two_exchange_pair().id(), Pair::new("WETH", "DAI").id());
    }

    #[test]
    fn test_json_shape() {
        let pair: Pair = serde_json::from_str(
            r#"{"baseId":"1","quoteId":"2","exchangeMarkets":[{"currentBid":2,"currentAsk":2,"baseVolume":1}]}"#,
        )
        .unwrap();
        assert_eq!(pair.base_id, AssetId::from("1"));
        assert_eq!(pair.quotes.len(), 1);
        assert_relative_eq!(pair.spread_average().unwrap(), 2.0);
    }
}
