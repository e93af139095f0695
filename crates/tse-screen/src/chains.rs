//! Option-chain index: contracts grouped per underlying, then by expiry or strike.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;
use tse_core::{OptionContract, OptionFilter, Result, TseError};

/// One underlying asset present in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderlyingAsset {
    pub ua_tse_code: String,
    pub ua_ticker: String,
    pub trades_value: f64,
}

/// Contracts sharing one expiry, ordered by strike.
#[derive(Debug, Clone, PartialEq)]
pub struct DateChain<'a> {
    pub end_date: &'a str,
    pub options: Vec<&'a OptionContract>,
}

/// Contracts sharing one strike, ordered by expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeChain<'a> {
    pub strike_price: f64,
    pub options: Vec<&'a OptionContract>,
}

/// Chain views over an immutable snapshot. Build a new one for fresh data.
#[derive(Debug)]
pub struct OptionChains {
    contracts: Vec<OptionContract>,
    underlying: OnceLock<Vec<UnderlyingAsset>>,
}

impl OptionChains {
    pub fn new(contracts: Vec<OptionContract>) -> Self {
        Self { contracts, underlying: OnceLock::new() }
    }

    /// Underlyings ranked by summed trade value, computed on first use.
    pub fn underlying_asset_info(&self) -> &[UnderlyingAsset] {
        self.underlying.get_or_init(|| {
            let mut grouped: BTreeMap<&str, UnderlyingAsset> = BTreeMap::new();
            for c in &self.contracts {
                let entry = grouped.entry(c.ua_tse_code.as_str()).or_insert_with(|| UnderlyingAsset {
                    ua_tse_code: c.ua_tse_code.clone(),
                    ua_ticker: c.ua_ticker.clone(),
                    trades_value: 0.0,
                });
                if c.ua_ticker > entry.ua_ticker {
                    entry.ua_ticker = c.ua_ticker.clone();
                }
                entry.trades_value += c.trades_value;
            }
            let mut info: Vec<UnderlyingAsset> = grouped.into_values().collect();
            info.sort_by(|a, b| b.trades_value.total_cmp(&a.trades_value));
            debug!("[chains] {} underlying asset(s)", info.len());
            info
        })
    }

    pub fn ua_tse_codes(&self) -> Vec<&str> {
        self.underlying_asset_info().iter().map(|u| u.ua_tse_code.as_str()).collect()
    }

    /// Contracts of one underlying, in snapshot order.
    pub fn options(&self, ua_tse_code: &str, filter: OptionFilter) -> Result<Vec<&OptionContract>> {
        if !self.underlying_asset_info().iter().any(|u| u.ua_tse_code == ua_tse_code) {
            return Err(TseError::InvalidUnderlying(ua_tse_code.to_string()));
        }
        Ok(self
            .contracts
            .iter()
            .filter(|c| c.ua_tse_code == ua_tse_code && filter.accepts(c.option_type))
            .collect())
    }

    /// One chain per expiry (ascending), each sorted by strike.
    pub fn date_chains(&self, ua_tse_code: &str, filter: OptionFilter) -> Result<Vec<DateChain<'_>>> {
        let options = self.options(ua_tse_code, filter)?;

        let mut dates: Vec<&str> = options.iter().map(|c| c.end_date.as_str()).collect();
        dates.sort_unstable();
        dates.dedup();

        Ok(dates
            .into_iter()
            .map(|end_date| {
                let mut chain: Vec<&OptionContract> =
                    options.iter().copied().filter(|c| c.end_date == end_date).collect();
                chain.sort_by(|a, b| a.strike_price.total_cmp(&b.strike_price));
                DateChain { end_date, options: chain }
            })
            .collect())
    }

    /// One chain per strike (ascending), each sorted by expiry.
    pub fn strike_chains(&self, ua_tse_code: &str, filter: OptionFilter) -> Result<Vec<StrikeChain<'_>>> {
        let options = self.options(ua_tse_code, filter)?;

        let mut strikes: Vec<f64> = options.iter().map(|c| c.strike_price).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();

        Ok(strikes
            .into_iter()
            .map(|strike_price| {
                let mut chain: Vec<&OptionContract> =
                    options.iter().copied().filter(|c| c.strike_price == strike_price).collect();
                chain.sort_by(|a, b| a.end_date.cmp(&b.end_date));
                StrikeChain { strike_price, options: chain }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tse_core::OptionType;

    use super::*;

    fn contract(ticker: &str, ua: &str, side: &str, end_date: &str, strike: f64, value: f64) -> OptionContract {
        serde_json::from_value(json!({
            "ticker": ticker, "ua_tse_code": ua, "ua_ticker": format!("T-{ua}"),
            "end_date": end_date, "strike_price": strike, "trades_value": value, "option_type": side
        }))
        .unwrap()
    }

    fn snapshot() -> OptionChains {
        OptionChains::new(vec![
            contract("c-b-200", "U1", "call", "20250301", 200.0, 1.0),
            contract("p-a-100", "U1", "put", "20250101", 100.0, 1.0),
            contract("c-a-300", "U1", "call", "20250101", 300.0, 1.0),
            contract("c-a-100", "U1", "call", "20250101", 100.0, 1.0),
            contract("c-b-100", "U1", "call", "20250301", 100.0, 1.0),
            contract("x", "U2", "call", "20250101", 100.0, 50.0),
        ])
    }

    fn names<'a>(options: &[&'a OptionContract]) -> Vec<&'a str> {
        options.iter().map(|c| c.ticker.as_str()).collect()
    }

    #[test]
    fn underlying_info_ranked_by_trade_value() {
        let chains = snapshot();
        assert_eq!(chains.ua_tse_codes(), ["U2", "U1"]);
        let info = chains.underlying_asset_info();
        assert_eq!(info[1].trades_value, 5.0);
        assert_eq!(info[1].ua_ticker, "T-U1");
        // memoized
        assert!(std::ptr::eq(info, chains.underlying_asset_info()));
    }

    #[test]
    fn unknown_underlying_rejected() {
        let chains = snapshot();
        assert!(matches!(chains.options("nope", OptionFilter::Both), Err(TseError::InvalidUnderlying(_))));
        assert!(matches!(chains.date_chains("nope", OptionFilter::Call), Err(TseError::InvalidUnderlying(_))));
    }

    #[test]
    fn options_filtered_by_side() {
        let chains = snapshot();
        assert_eq!(chains.options("U1", OptionFilter::Both).unwrap().len(), 5);
        let puts = chains.options("U1", OptionFilter::Put).unwrap();
        assert!(puts.iter().all(|c| c.option_type == OptionType::Put));
        assert_eq!(names(&puts), ["p-a-100"]);
    }

    #[test]
    fn date_chains_sorted_by_expiry_then_strike() {
        let chains = snapshot();
        let by_date = chains.date_chains("U1", OptionFilter::Call).unwrap();
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].end_date, "20250101");
        assert_eq!(names(&by_date[0].options), ["c-a-100", "c-a-300"]);
        assert_eq!(by_date[1].end_date, "20250301");
        assert_eq!(names(&by_date[1].options), ["c-b-100", "c-b-200"]);
    }

    #[test]
    fn strike_chains_sorted_by_strike_then_expiry() {
        let chains = snapshot();
        let by_strike = chains.strike_chains("U1", OptionFilter::Both).unwrap();
        let strikes: Vec<_> = by_strike.iter().map(|c| c.strike_price).collect();
        assert_eq!(strikes, [100.0, 200.0, 300.0]);
        // put and call at the same strike/expiry keep snapshot order
        assert_eq!(names(&by_strike[0].options), ["p-a-100", "c-a-100", "c-b-100"]);
    }
}
