use std::fmt;

use hex::FromHex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Opaque asset identifier. Only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pair identity: SHA-256 over `"{base}/{quote}"`.
///
/// Quote data never enters the digest, so two pairs over the same assets
/// always share an id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId([u8; 32]);

impl PairId {
    pub fn from_assets(base: &AssetId, quote: &AssetId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(base.as_str().as_bytes());
        hasher.update(b"/");
        hasher.update(quote.as_str().as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        <[u8; 32]>::from_hex(s).map(Self)
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Short form keeps log lines readable.
impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairId({})", &self.to_hex()[..12])
    }
}

impl Serialize for PairId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PairId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PairId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Venues a quote can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExchangeId {
    Kyber,
    Uniswap,
    Idex,
    Oasis,
    Radar,
}

/// One exchange's observation of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<ExchangeId>,
    #[serde(default)]
    pub last_price: f64,
    pub current_bid: f64,
    pub current_ask: f64,
    pub base_volume: f64,
}

impl ExchangeQuote {
    pub fn new(last_price: f64, current_bid: f64, current_ask: f64, base_volume: f64) -> Self {
        Self { exchange: None, last_price, current_bid, current_ask, base_volume }
    }

    pub fn on(mut self, exchange: ExchangeId) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Applies `f` to every rate-carrying field, volume included.
    pub fn try_map_fields<E>(&self, mut f: impl FnMut(f64) -> Result<f64, E>) -> Result<Self, E> {
        Ok(Self {
            exchange: self.exchange,
            last_price: f(self.last_price)?,
            current_bid: f(self.current_bid)?,
            current_ask: f(self.current_ask)?,
            base_volume: f(self.base_volume)?,
        })
    }

    /// Same venue tag, every field zeroed.
    pub fn zeroed(&self) -> Self {
        Self { exchange: self.exchange, ..Self::default() }
    }
}
