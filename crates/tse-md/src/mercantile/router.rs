//! Market message router: picks one sub-market's payload out of a poll batch.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tse_core::{Result, TseError};

/// The eight sub-markets pushed by the hub, keyed by their wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketName {
    /// Certificate (gavahi) funds.
    Gavahi,
    /// Investment funds.
    Sandoq,
    /// Forward-settlement (salaf) contracts.
    Salaf,
    /// Currency and commodity derivative contracts.
    Cdc,
    /// Aggregate market summary (single object).
    AllMarket,
    /// Futures timestamp.
    FutureDateTime,
    /// Futures contract list.
    Future,
    /// Combined call/put strike matrix.
    MarketsInfo,
}

impl MarketName {
    pub const ALL: [MarketName; 8] = [
        Self::Gavahi,
        Self::Sandoq,
        Self::Salaf,
        Self::Cdc,
        Self::AllMarket,
        Self::FutureDateTime,
        Self::Future,
        Self::MarketsInfo,
    ];

    /// Wire tag carried in the record's `M` field.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Gavahi => "updateGavahiMarketsInfo",
            Self::Sandoq => "updateSandoqMarketsInfo",
            Self::Salaf => "updateSalafMarketsInfo",
            Self::Cdc => "updateCDCMarketsInfo",
            Self::AllMarket => "updateAllMarketData",
            Self::FutureDateTime => "updateFutureDateTime",
            Self::Future => "updateFutureMarketsInfo",
            Self::MarketsInfo => "updateMarketsInfo",
        }
    }

    /// Short alias used on the command line.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Gavahi => "gavahi",
            Self::Sandoq => "sandoq",
            Self::Salaf => "salaf",
            Self::Cdc => "cdc",
            Self::AllMarket => "all_market",
            Self::FutureDateTime => "future_date_time",
            Self::Future => "future",
            Self::MarketsInfo => "markets_info",
        }
    }
}

impl fmt::Display for MarketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MarketName {
    type Err = TseError;

    /// Accepts either the wire tag or the short alias.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.tag() == s || m.alias() == s)
            .ok_or_else(|| TseError::InvalidParameter(format!("unknown market name: {s}")))
    }
}

/// One tagged record of a poll batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Hub name, `marketsHub` in practice.
    #[serde(rename = "H", default)]
    pub hub: String,
    /// Market tag; kept as a string so unknown tags don't break the batch.
    #[serde(rename = "M")]
    pub market: String,
    #[serde(rename = "A", default)]
    pub args: Vec<Value>,
}

/// Payload of the first record tagged `name`: the first element of its `A` array.
///
/// Later records with the same tag and later elements of `A` are ignored.
pub fn extract<'a>(batch: &'a [MarketRecord], name: MarketName) -> Result<&'a Value> {
    if batch.is_empty() {
        return Err(TseError::EmptyData("no market data yet; update first".into()));
    }
    let record = batch
        .iter()
        .find(|r| r.market == name.tag())
        .ok_or_else(|| TseError::UnknownMarket(name.tag().to_string()))?;
    record
        .args
        .first()
        .ok_or_else(|| TseError::MalformedResponse(format!("{}: empty payload array", name.tag())))
}

/// Latest poll batch with typed per-market access.
#[derive(Debug, Clone, Default)]
pub struct MercantileData {
    batch: Vec<MarketRecord>,
}

impl MercantileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_batch(batch: Vec<MarketRecord>) -> Self {
        Self { batch }
    }

    /// Replace the held batch, even with an empty one.
    pub fn update(&mut self, batch: Vec<MarketRecord>) {
        self.batch = batch;
    }

    pub fn batch(&self) -> &[MarketRecord] {
        &self.batch
    }

    pub fn extract(&self, name: MarketName) -> Result<&Value> {
        extract(&self.batch, name)
    }

    /// Typed projection of [`extract`].
    ///
    /// List markets deserialize into `Vec<Row>`, the summary into
    /// [`MarketSummary`](super::schema::MarketSummary), and a `null`
    /// heartbeat into `Option<_>`.
    pub fn market<T: DeserializeOwned>(&self, name: MarketName) -> Result<T> {
        let payload = self.extract(name)?;
        T::deserialize(payload).map_err(|e| TseError::MalformedResponse(format!("{}: {e}", name.tag())))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mercantile::schema::{FundQuote, MarketSummary};

    fn record(tag: &str, args: Value) -> MarketRecord {
        serde_json::from_value(json!({"H": "marketsHub", "M": tag, "A": args})).unwrap()
    }

    #[test]
    fn names_round_trip_through_tags_and_aliases() {
        for name in MarketName::ALL {
            assert_eq!(name.tag().parse::<MarketName>().unwrap(), name);
            assert_eq!(name.alias().parse::<MarketName>().unwrap(), name);
        }
        assert!(matches!("updateNothing".parse::<MarketName>(), Err(TseError::InvalidParameter(_))));
    }

    #[test]
    fn empty_batch_is_empty_data() {
        assert!(matches!(extract(&[], MarketName::Future), Err(TseError::EmptyData(_))));
        let data = MercantileData::new();
        assert!(matches!(data.extract(MarketName::Cdc), Err(TseError::EmptyData(_))));
    }

    #[test]
    fn missing_tag_is_unknown_market() {
        let batch = vec![record("updateCDCMarketsInfo", json!([[]]))];
        assert!(matches!(extract(&batch, MarketName::Future), Err(TseError::UnknownMarket(_))));
    }

    #[test]
    fn returns_first_element_of_first_match() {
        let batch = vec![
            record("updateAllMarketData", json!([{"id": 1}])),
            record("updateFutureMarketsInfo", json!([[{"ContractCode": "A"}], [{"ContractCode": "B"}]])),
            record("updateFutureMarketsInfo", json!([[{"ContractCode": "C"}]])),
        ];
        assert_eq!(extract(&batch, MarketName::Future).unwrap(), &json!([{"ContractCode": "A"}]));
        assert_eq!(extract(&batch, MarketName::AllMarket).unwrap(), &json!({"id": 1}));
    }

    #[test]
    fn empty_args_is_malformed() {
        let batch = vec![record("updateFutureDateTime", json!([]))];
        assert!(matches!(extract(&batch, MarketName::FutureDateTime), Err(TseError::MalformedResponse(_))));
    }

    #[test]
    fn update_replaces_batch() {
        let mut data = MercantileData::from_batch(vec![record("updateAllMarketData", json!([{"id": 1}]))]);
        assert!(data.extract(MarketName::AllMarket).is_ok());
        data.update(Vec::new());
        assert!(matches!(data.extract(MarketName::AllMarket), Err(TseError::EmptyData(_))));
    }

    #[test]
    fn typed_projection() {
        let data = MercantileData::from_batch(vec![
            record("updateSandoqMarketsInfo", json!([[{"Symbol": "FUND1", "LastPrice": 1200, "Quantity": 3}]])),
            record("updateAllMarketData", json!([{"id": 7, "Description": "x", "TradeCount": 42}])),
            record("updateFutureDateTime", json!([null])),
        ]);
        let funds: Vec<FundQuote> = data.market(MarketName::Sandoq).unwrap();
        assert_eq!(funds[0].symbol.as_deref(), Some("FUND1"));
        assert_eq!(funds[0].last_price, Some(1200.0));

        let summary: MarketSummary = data.market(MarketName::AllMarket).unwrap();
        assert_eq!(summary.trade_count, Some(42));

        let heartbeat: Option<Value> = data.market(MarketName::FutureDateTime).unwrap();
        assert!(heartbeat.is_none());

        let wrong: Result<Vec<FundQuote>> = data.market(MarketName::AllMarket);
        assert!(matches!(wrong, Err(TseError::MalformedResponse(_))));
    }
}
