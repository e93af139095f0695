//! Market-wide screens over one option snapshot.

use std::collections::BTreeMap;

use serde::Serialize;
use tse_core::{OptionContract, OptionType};

/// Open-interest change of one contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionChange {
    pub ticker: String,
    pub delta: f64,
}

/// Largest increases (`best`, descending) and decreases (`worst`, ascending).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeChanges {
    pub best: Vec<PositionChange>,
    pub worst: Vec<PositionChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeValueEntry {
    pub ticker: String,
    pub trades_value: f64,
}

/// Top contracts by trade value, per option side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostTraded {
    pub call: Vec<TradeValueEntry>,
    pub put: Vec<TradeValueEntry>,
}

/// Trade value of one underlying, split by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderlyingTradeValue {
    pub ua_ticker: String,
    pub call: f64,
    pub put: f64,
    pub total: f64,
}

/// Read-only screens over a normalized snapshot.
///
/// All rankings use stable sorts, so equal keys keep snapshot order.
#[derive(Debug, Clone)]
pub struct OptionMarket {
    contracts: Vec<OptionContract>,
}

impl OptionMarket {
    pub fn new(contracts: Vec<OptionContract>) -> Self {
        Self { contracts }
    }

    pub fn contracts(&self) -> &[OptionContract] {
        &self.contracts
    }

    pub fn total_trade_value(&self) -> f64 {
        self.contracts.iter().map(|c| c.trades_value).sum()
    }

    pub fn extreme_open_position_changes(&self, n: usize) -> ExtremeChanges {
        let changes: Vec<PositionChange> = self
            .contracts
            .iter()
            .map(|c| PositionChange { ticker: c.ticker.clone(), delta: c.open_position_change() })
            .collect();

        let mut best = changes.clone();
        best.sort_by(|a, b| b.delta.total_cmp(&a.delta));
        best.truncate(n);

        let mut worst = changes;
        worst.sort_by(|a, b| a.delta.total_cmp(&b.delta));
        worst.truncate(n);

        ExtremeChanges { best, worst }
    }

    pub fn most_traded(&self, n: usize) -> MostTraded {
        let mut ranked: Vec<&OptionContract> = self.contracts.iter().collect();
        ranked.sort_by(|a, b| b.trades_value.total_cmp(&a.trades_value));

        let top = |side: OptionType| -> Vec<TradeValueEntry> {
            ranked
                .iter()
                .filter(|c| c.option_type == side)
                .take(n)
                .map(|c| TradeValueEntry { ticker: c.ticker.clone(), trades_value: c.trades_value })
                .collect()
        };
        MostTraded { call: top(OptionType::Call), put: top(OptionType::Put) }
    }

    /// Sum of trade value per underlying ticker, pivoted into call/put
    /// columns (missing side = 0), ranked by total.
    pub fn most_traded_by_underlying(&self, n: usize) -> Vec<UnderlyingTradeValue> {
        let mut by_ticker: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for c in &self.contracts {
            let entry = by_ticker.entry(c.ua_ticker.as_str()).or_default();
            match c.option_type {
                OptionType::Call => entry.0 += c.trades_value,
                OptionType::Put => entry.1 += c.trades_value,
            }
        }

        let mut rows: Vec<UnderlyingTradeValue> = by_ticker
            .into_iter()
            .map(|(ua_ticker, (call, put))| UnderlyingTradeValue {
                ua_ticker: ua_ticker.to_string(),
                call,
                put,
                total: call + put,
            })
            .collect();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));
        rows.truncate(n);
        rows
    }
}

/// Rial amount as billions of Toman, e.g. `1.53 B Toman`.
pub fn format_billion_toman(rials: f64) -> String {
    format!("{:.2} B Toman", rials / 1e10)
}
