//! Normalized (long-form) option contract.
//!
//! One [`OptionContract`] per single call or put, as produced by the option
//! market reshaper after column renaming. Field names are the renamed column
//! names, so a reshaped [`Frame`](crate::frame::Frame) deserializes directly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::enums::OptionType;

/// A single option contract from the market-watch snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    // --- underlying / general fields ---
    #[serde(default, deserialize_with = "lenient_string")]
    pub ua_tse_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ua_ticker: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ua_close_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ua_yesterday_price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub begin_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub strike_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub contract_size: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub days_to_maturity: f64,

    // --- contract-specific fields ---
    #[serde(default, deserialize_with = "lenient_string")]
    pub tse_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub yesterday_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open_positions: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub yesterday_open_positions: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub notional_value: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trades_value: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trades_volume: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trades_num: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bid_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bid_volume: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ask_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ask_volume: f64,

    pub option_type: OptionType,
}

impl OptionContract {
    /// Net change in open interest since the previous session.
    pub fn open_position_change(&self) -> f64 {
        self.open_positions - self.yesterday_open_positions
    }
}

/// Parse a JSON value (string or number) as `f64`.
///
/// Feeds encode numbers either natively (`30000.5`) or as strings
/// (`"30000.5"`); both are accepted.
#[inline]
pub fn parse_str_f64(v: &Value) -> Option<f64> {
    if let Some(s) = v.as_str() {
        fast_float2::parse(s.trim()).ok()
    } else {
        v.as_f64()
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(de)?;
    match v {
        Value::Null => Ok(0.0),
        Value::String(ref s) if s.trim().is_empty() => Ok(0.0),
        ref other => parse_str_f64(other)
            .ok_or_else(|| serde::de::Error::custom(format!("expected number, got {other}"))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let v = Value::deserialize(de)?;
    Ok(match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
