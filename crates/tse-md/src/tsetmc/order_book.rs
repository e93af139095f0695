//! Historical best-limits (limit order book) for one instrument and day.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use tse_core::{Frame, Result, TseError, calendar};

use super::api::TsetmcClient;
use super::schema::LOB_COLUMN_NAMES;
use crate::transport::HttpTransport;

const BEST_LIMITS_KEY: &str = "bestLimitsHistory";

/// Validated request: instrument code plus a Gregorian trading day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalLobRequest {
    tse_code: String,
    date: NaiveDate,
}

impl HistoricalLobRequest {
    /// `jalali_date` is `YYYY-MM-DD` in the Jalali calendar. Invalid dates
    /// and Thursday/Friday are rejected before any request is made.
    pub fn new(tse_code: impl Into<String>, jalali_date: &str) -> Result<Self> {
        let tse_code = tse_code.into();
        if tse_code.trim().is_empty() {
            return Err(TseError::InvalidParameter("empty tse_code".into()));
        }
        let date = calendar::jalali_trading_day(jalali_date)?;
        Ok(Self { tse_code, date })
    }

    pub fn tse_code(&self) -> &str {
        &self.tse_code
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYYMMDD`, as used in the URL path.
    pub fn date_param(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

/// One order-book level update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobLevel {
    pub time: NaiveTime,
    pub level: u32,
    pub bid_number: u64,
    pub bid_volume: u64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub ask_volume: u64,
    pub ask_number: u64,
}

#[derive(Deserialize)]
struct RenamedRow {
    #[serde(rename = "hEven")]
    h_even: u32,
    level: u32,
    #[serde(default)]
    bid_number: u64,
    #[serde(default)]
    bid_volume: u64,
    #[serde(default)]
    bid_price: f64,
    #[serde(default)]
    ask_price: f64,
    #[serde(default)]
    ask_volume: u64,
    #[serde(default)]
    ask_number: u64,
}

/// `HHMMSS` integer (e.g. `60127` → 06:01:27).
pub fn parse_hhmmss(value: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(value / 10_000, (value / 100) % 100, value % 100)
}

impl<T: HttpTransport> TsetmcClient<T> {
    /// Fetch one day of best-limit updates, sorted by `(time, level)`.
    pub async fn fetch_historical_lob(&self, request: &HistoricalLobRequest) -> Result<Vec<LobLevel>> {
        let body = self
            .get(&format!("BestLimits/{}/{}", request.tse_code, request.date_param()))
            .await?;
        let raw = body
            .get(BEST_LIMITS_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| TseError::MalformedResponse(format!("missing {BEST_LIMITS_KEY} array")))?;
        if raw.is_empty() {
            return Err(TseError::EmptyData(format!(
                "no order book for {} on {}",
                request.tse_code, request.date
            )));
        }
        let levels = process_best_limits(raw)?;
        debug!("[tsetmc] {} on {}: {} lob update(s)", request.tse_code, request.date, levels.len());
        Ok(levels)
    }
}

/// Rename, derive `time` and sort raw `bestLimitsHistory` rows.
pub fn process_best_limits(raw: &[Value]) -> Result<Vec<LobLevel>> {
    let mut frame = Frame::from_records(raw)?;
    frame.rename(LOB_COLUMN_NAMES);

    let mut levels = frame
        .to_typed::<RenamedRow>()?
        .into_iter()
        .map(|r| {
            let time = parse_hhmmss(r.h_even)
                .ok_or_else(|| TseError::MalformedResponse(format!("hEven {} is not HHMMSS", r.h_even)))?;
            Ok(LobLevel {
                time,
                level: r.level,
                bid_number: r.bid_number,
                bid_volume: r.bid_volume,
                bid_price: r.bid_price,
                ask_price: r.ask_price,
                ask_volume: r.ask_volume,
                ask_number: r.ask_number,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    levels.sort_by_key(|l| (l.time, l.level));
    Ok(levels)
}

/// Book state at `hh_mm` (`"HH:MM"`): per level, the last update at or
/// before `HH:MM:00`. Output is ordered by level.
pub fn take_lob_snapshot(levels: &[LobLevel], hh_mm: &str) -> Result<Vec<LobLevel>> {
    let at = NaiveTime::parse_from_str(&format!("{hh_mm}:00"), "%H:%M:%S")
        .map_err(|e| TseError::InvalidParameter(format!("time {hh_mm:?}: {e}")))?;

    let mut latest: BTreeMap<u32, &LobLevel> = BTreeMap::new();
    for level in levels.iter().filter(|l| l.time <= at) {
        latest.insert(level.level, level);
    }
    Ok(latest.into_values().cloned().collect())
}
