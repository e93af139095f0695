//! Typed rows for the hub's sub-market payloads.
//!
//! Every field is optional: the hub omits or nulls fields freely, and a row
//! that is missing a price must still deserialize. Unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tse_core::parse_str_f64;

/// Certificate / investment fund / forward contract quote
/// (`updateGavahiMarketsInfo`, `updateSandoqMarketsInfo`, `updateSalafMarketsInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FundQuote {
    #[serde(rename = "ID", default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub yesterday_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub final_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub last_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub price_change: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub first_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub value: Option<f64>,
    #[serde(rename = "DemandPrice1", default, deserialize_with = "opt_f64")]
    pub demand_price_1: Option<f64>,
    #[serde(rename = "DemandVolume1", default, deserialize_with = "opt_f64")]
    pub demand_volume_1: Option<f64>,
    #[serde(rename = "OfferPrice1", default, deserialize_with = "opt_f64")]
    pub offer_price_1: Option<f64>,
    #[serde(rename = "OfferVolume1", default, deserialize_with = "opt_f64")]
    pub offer_volume_1: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub modify_date: Option<String>,
    #[serde(default)]
    pub modify_time: Option<String>,
}

/// Currency / commodity derivative contract (`updateCDCMarketsInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CdcQuote {
    #[serde(rename = "ContractID", default)]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub contract_code: Option<String>,
    #[serde(default)]
    pub contract_description: Option<String>,
    #[serde(default)]
    pub last_trading_persian_date: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub contract_size: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub last_settlement_price: Option<f64>,
    #[serde(rename = "BidPrice1", default, deserialize_with = "opt_f64")]
    pub bid_price_1: Option<f64>,
    #[serde(rename = "BidVolume1", default, deserialize_with = "opt_f64")]
    pub bid_volume_1: Option<f64>,
    #[serde(rename = "AskPrice1", default, deserialize_with = "opt_f64")]
    pub ask_price_1: Option<f64>,
    #[serde(rename = "AskVolume1", default, deserialize_with = "opt_f64")]
    pub ask_volume_1: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub last_traded_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub trades_value: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub trades_volume: Option<f64>,
    #[serde(default)]
    pub trades_count: Option<i64>,
    #[serde(default)]
    pub commodity_name: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// Futures contract (`updateFutureMarketsInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FutureQuote {
    #[serde(rename = "ContractID", default)]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub contract_code: Option<String>,
    #[serde(default)]
    pub contract_description: Option<String>,
    #[serde(default)]
    pub last_trading_date: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub contract_size: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub last_settlement_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub last_traded_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub closing_price: Option<f64>,
    #[serde(rename = "BidPrice1", default, deserialize_with = "opt_f64")]
    pub bid_price_1: Option<f64>,
    #[serde(rename = "BidVolume1", default, deserialize_with = "opt_f64")]
    pub bid_volume_1: Option<f64>,
    #[serde(rename = "AskPrice1", default, deserialize_with = "opt_f64")]
    pub ask_price_1: Option<f64>,
    #[serde(rename = "AskVolume1", default, deserialize_with = "opt_f64")]
    pub ask_volume_1: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub open_interests: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub open_interests_changes: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub yesterday_open_interests: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub initial_margin: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub maintenance_margin: Option<f64>,
    #[serde(default)]
    pub trades_count: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub trades_volume: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub trades_value: Option<f64>,
    #[serde(default)]
    pub expired: Option<bool>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// Aggregate summary object (`updateAllMarketData`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketSummary {
    #[serde(rename = "id", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trade_count: Option<i64>,
    #[serde(default)]
    pub buyers: Option<i64>,
    #[serde(default)]
    pub sellers: Option<i64>,
    #[serde(default)]
    pub legal_buyer_count: Option<i64>,
    #[serde(default)]
    pub natural_buyer_count: Option<i64>,
    #[serde(default)]
    pub legal_seller_count: Option<i64>,
    #[serde(default)]
    pub natural_seller_count: Option<i64>,
}

/// One strike level of the call/put matrix (`updateMarketsInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StrikeMatrixRow {
    #[serde(default)]
    pub strike_level: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub strike_price: Option<f64>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub contract_category: Option<String>,
    #[serde(default)]
    pub commodity_group: Option<String>,
    #[serde(default)]
    pub contract_sub_group: Option<String>,

    #[serde(rename = "_CallContractCode", default)]
    pub call_contract_code: Option<String>,
    #[serde(rename = "_CallLastTradedPrice", default, deserialize_with = "opt_f64")]
    pub call_last_traded_price: Option<f64>,
    #[serde(rename = "_CallBidPrice1", default, deserialize_with = "opt_f64")]
    pub call_bid_price_1: Option<f64>,
    #[serde(rename = "_CallAskPrice1", default, deserialize_with = "opt_f64")]
    pub call_ask_price_1: Option<f64>,
    #[serde(rename = "_CallTradesValue", default, deserialize_with = "opt_f64")]
    pub call_trades_value: Option<f64>,
    #[serde(rename = "_CallOpenInterests", default, deserialize_with = "opt_f64")]
    pub call_open_interests: Option<f64>,

    #[serde(rename = "_PutContractCode", default)]
    pub put_contract_code: Option<String>,
    #[serde(rename = "_PutLastTradedPrice", default, deserialize_with = "opt_f64")]
    pub put_last_traded_price: Option<f64>,
    #[serde(rename = "_PutBidPrice1", default, deserialize_with = "opt_f64")]
    pub put_bid_price_1: Option<f64>,
    #[serde(rename = "_PutAskPrice1", default, deserialize_with = "opt_f64")]
    pub put_ask_price_1: Option<f64>,
    #[serde(rename = "_PutTradesValue", default, deserialize_with = "opt_f64")]
    pub put_trades_value: Option<f64>,
    #[serde(rename = "_PutOpenInterests", default, deserialize_with = "opt_f64")]
    pub put_open_interests: Option<f64>,
}

fn opt_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(de)?;
    match v {
        Value::Null => Ok(None),
        Value::String(ref s) if s.trim().is_empty() => Ok(None),
        ref other => parse_str_f64(other)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected number, got {other}"))),
    }
}

fn opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fund_quote_tolerates_string_numbers_and_missing_fields() {
        let q: FundQuote = serde_json::from_value(json!({
            "ID": 12, "Symbol": "ETF1", "LastPrice": "15200", "DemandPrice1": 15100, "Status": true
        }))
        .unwrap();
        assert_eq!(q.id.as_deref(), Some("12"));
        assert_eq!(q.last_price, Some(15200.0));
        assert_eq!(q.demand_price_1, Some(15100.0));
        assert_eq!(q.offer_price_1, None);
        assert_eq!(q.status, Some(true));
    }

    #[test]
    fn strike_matrix_reads_prefixed_sides() {
        let row: StrikeMatrixRow = serde_json::from_value(json!({
            "StrikeLevel": 3, "StrikePrice": 45000000,
            "_CallContractCode": "CGD1", "_CallLastTradedPrice": 1200,
            "_PutContractCode": "PGD1", "_PutOpenInterests": null
        }))
        .unwrap();
        assert_eq!(row.strike_price, Some(45_000_000.0));
        assert_eq!(row.call_contract_code.as_deref(), Some("CGD1"));
        assert_eq!(row.put_contract_code.as_deref(), Some("PGD1"));
        assert_eq!(row.put_open_interests, None);
    }

    #[test]
    fn future_quote_rejects_non_numeric_price() {
        let res: Result<FutureQuote, _> = serde_json::from_value(json!({"LastTradedPrice": "n/a"}));
        assert!(res.is_err());
    }
}
