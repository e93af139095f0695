//! Tadbir payload shapes and the short-key rename tables.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tse_core::frame::ColumnRenames;

/// Bulk `getstockprice2` keys → readable column names.
pub const BULK_DATA_COLUMN_NAMES: ColumnRenames<'static> = &[
    ("bv", "BasisVolume"),
    ("cp", "ClosingPrice"),
    ("cn", "CompanyName"),
    ("bbp", "BestBuyPrice"),
    ("bbq", "BestBuyQuantity"),
    ("bsp", "BestSellPrice"),
    ("bsq", "BestSellQuantity"),
    ("nbb", "NoBestBuy"),
    ("nbs", "NoBestSell"),
    ("ftp", "FirstTradedPrice"),
    ("gs", "GroupStateID"),
    ("hap", "HighAllowedPrice"),
    ("hp", "HighPrice"),
    ("ltp", "LastTradedPrice"),
    ("lap", "LowAllowedPrice"),
    ("lp", "LowPrice"),
    ("mtd", "MTradeDate"),
    ("mxqo", "MaxQuantityOrder"),
    ("mnqo", "MinQuantityOrder"),
    ("nc", "isin"),
    ("pcp", "PreClosingPrice"),
    ("rp", "RefPrice"),
    ("sc", "SectorCode"),
    ("sf", "ticker"),
    ("ss", "SymbolStateId"),
    ("nst", "TotalNumberOfSharesTraded"),
    ("nt", "TotalNumberOfTrades"),
    ("tv", "TotalTradeValue"),
    ("td", "TradeDate"),
    ("vs", "varSign"),
    ("cpv", "ClosingPriceVar"),
    ("cpvp", "ClosingPriceVarPercent"),
    ("lpv", "LastTradedPriceVar"),
    ("lpvp", "LastTradedPriceVarPercent"),
    ("ic", "tse_code"),
    ("csid", "SectorCodeId"),
];

/// `symbolinfo` keys → readable names. Unlisted keys are kept as-is.
pub const SYMBOL_INFO_COLUMN_NAMES: ColumnRenames<'static> = &[
    ("est", "Symbol"),
    ("InsCode", "InsCode"),
    ("ltp", "LastTradedPrice"),
    ("bltp", "UA_LastTradedPrice"),
    ("bisin", "UA_isin"),
    ("ltd", "TradeDate"),
    ("cp", "ClosingPrice"),
    ("lp", "LowPrice"),
    ("nt", "TotalNumberOfTrades"),
    ("hp", "HighPrice"),
    ("nst", "TotalNumberOfSharesTraded"),
    ("pcp", "YesterdayPrice"),
    ("minprod", "MinQuantityOrder"),
    ("mxp", "MaxQuantityOrder"),
    ("lt", "LowAllowedPrice"),
    ("ht", "HighAllowedPrice"),
    ("tv", "TotalTradeValue"),
    ("rp", "RefPrice"),
    ("st", "SymbolStateId"),
    ("ect", "CompanyTitle"),
    ("gs", "GroupStateID"),
    ("bv", "BaseVolume"),
    ("cp12", "CP12"),
    ("mp", "MaxPercent"),
    ("mlp", "LowPercent"),
    ("mt", "MarketType"),
    ("nc", "NSCCode"),
    ("iscu", "IsCautionAgreement"),
    ("isagsp", "IsSepahAgreement"),
    ("ic", "InstrumentCode"),
    ("sti", "GroupName"),
    ("ftp", "FirstTradePrice"),
    ("fvavg", "Volume90avg"),
    ("ffp", "FloatPercent"),
    ("uc", "UnitCount"),
    ("opts", "TickSize"),
    ("lot", "LotSize"),
    ("ed", "exerciseDate"),
    ("sd", "contractStartDate"),
    ("im", "initial_margin"),
    ("op", "openPositionNum"),
    ("cs", "contractSize"),
    ("sp", "strikePrice"),
];

/// One row of `symbolqueue.Value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderBookLevel {
    #[serde(default)]
    pub place: u32,
    #[serde(default)]
    pub best_buy_price: f64,
    #[serde(default)]
    pub best_buy_quantity: u64,
    #[serde(default)]
    pub no_best_buy: u32,
    #[serde(default)]
    pub best_sell_price: f64,
    #[serde(default)]
    pub best_sell_quantity: u64,
    #[serde(default)]
    pub no_best_sell: u32,
    #[serde(rename = "NSCCode", default)]
    pub nsc_code: String,
}

/// Renamed symbol info plus its order queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolDetail {
    pub symbol_info: Map<String, Value>,
    pub order_book: Vec<OrderBookLevel>,
}

impl SymbolDetail {
    /// Renamed field lookup, e.g. `"LastTradedPrice"`.
    pub fn info(&self, key: &str) -> Option<&Value> {
        self.symbol_info.get(key)
    }
}
