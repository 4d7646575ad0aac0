use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::market::error::{MarketError, MarketResult};
use crate::market::pair::Pair;
use crate::market::types::{AssetId, ExchangeId, PairId};

/// Snapshot of every pair in the market, keyed by pair id.
///
/// Keys are always derived from the stored pair, so `market.get(&p.id())`
/// finds `p`. Deserialization rejects payloads that break this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<PairId, Pair>", into = "BTreeMap<PairId, Pair>")]
pub struct Market {
    pairs: BTreeMap<PairId, Pair>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `pair` under its own id, replacing any pair over the same assets.
    pub fn insert(&mut self, pair: Pair) -> Option<Pair> {
        self.pairs.insert(pair.id(), pair)
    }

    pub fn get(&self, id: &PairId) -> Option<&Pair> {
        self.pairs.get(id)
    }

    pub fn pair(&self, id: &PairId) -> MarketResult<&Pair> {
        self.pairs.get(id).ok_or(MarketError::UnknownPair { pair: *id })
    }

    /// Looks a pair up by its assets instead of its id.
    pub fn find(&self, base: &AssetId, quote: &AssetId) -> Option<&Pair> {
        self.pairs.get(&PairId::from_assets(base, quote))
    }

    pub fn contains(&self, id: &PairId) -> bool {
        self.pairs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PairId> {
        self.pairs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairId, &Pair)> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    /// Distinct exchanges quoting anything in this market.
    pub fn exchange_ids(&self) -> Vec<ExchangeId> {
        self.pairs
            .values()
            .flat_map(|p| p.quotes.iter().filter_map(|q| q.exchange))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<Pair> for Market {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        let mut market = Market::new();
        for pair in iter {
            market.insert(pair);
        }
        market
    }
}

impl TryFrom<BTreeMap<PairId, Pair>> for Market {
    type Error = MarketError;

    fn try_from(pairs: BTreeMap<PairId, Pair>) -> MarketResult<Self> {
        for (key, pair) in &pairs {
            let expected = pair.id();
            if *key != expected {
                return Err(MarketError::IdMismatch { key: *key, expected });
            }
        }
        Ok(Self { pairs })
    }
}

impl From<Market> for BTreeMap<PairId, Pair> {
    fn from(market: Market) -> Self {
        market.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::ExchangeQuote;

    #[test]
    fn test_insert_keys_by_pair_id() {
        let mut market = Market::new();
        let pair = Pair::new("1", "2");
        assert!(market.insert(pair.clone()).is_none());
        assert_eq!(market.get(&pair.id()), Some(&pair));
        assert_eq!(market.find(&"1".into(), &"2".into()), Some(&pair));
        assert!(market.find(&"2".into(), &"1".into()).is_none());

        // same assets replace, never duplicate
        let replaced = market.insert(Pair::new("1", "2").with_quote(ExchangeQuote::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(replaced, Some(pair));
        assert_eq!(market.len(), 1);
    }

    #[test]
    fn test_exchange_ids_are_distinct() {
        let market: Market = [
            Pair::new("1", "2")
                .with_quote(ExchangeQuote::default().on(ExchangeId::Kyber))
                .with_quote(ExchangeQuote::default().on(ExchangeId::Uniswap)),
            Pair::new("2", "3")
                .with_quote(ExchangeQuote::default().on(ExchangeId::Kyber))
                .with_quote(ExchangeQuote::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(market.exchange_ids(), vec![ExchangeId::Kyber, ExchangeId::Uniswap]);
    }

    #[test]
    fn test_json_round_trip_keeps_ids() {
        let market: Market = [Pair::new("1", "2"), Pair::new("2", "3")].into_iter().collect();
        let json = serde_json::to_string(&market).unwrap();
        let parsed: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, market);
    }

    #[test]
    fn test_rejects_mismatched_key() {
        let wrong_key = Pair::new("9", "9").id();
        let json = format!(r#"{{"{}":{{"baseId":"1","quoteId":"2"}}}}"#, wrong_key);
        let err = serde_json::from_str::<Market>(&json).unwrap_err();
        assert!(err.to_string().contains("hashes to"));
    }
}
