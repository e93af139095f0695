//! TSETMC wire constants: market segments and column rename tables.

use std::fmt;
use std::str::FromStr;

use tse_core::frame::ColumnRenames;
use tse_core::{Result, TseError};

use crate::reshape::ReshapeRules;

/// Exchange segment whose option market watch is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketSegment {
    Bourse,
    FaraBourse,
}

impl MarketSegment {
    /// Path id used by `GetInstrumentOptionMarketWatch/{id}`.
    pub fn id(&self) -> u8 {
        match self {
            Self::Bourse => 1,
            Self::FaraBourse => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bourse => "bourse",
            Self::FaraBourse => "fara_bourse",
        }
    }
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketSegment {
    type Err = TseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bourse" => Ok(Self::Bourse),
            "fara_bourse" => Ok(Self::FaraBourse),
            other => Err(TseError::InvalidParameter(format!(
                "market segment {other:?}, expected \"bourse\" or \"fara_bourse\""
            ))),
        }
    }
}

/// Renames applied to the whole long table after the call/put split.
pub const GENERAL_COLUMN_NAMES: ColumnRenames<'static> = &[
    ("uaInsCode", "ua_tse_code"),
    ("lval30_UA", "ua_ticker"),
    ("remainedDay", "days_to_maturity"),
    ("strikePrice", "strike_price"),
    ("contractSize", "contract_size"),
    ("pClosing_UA", "ua_close_price"),
    ("priceYesterday_UA", "ua_yesterday_price"),
    ("beginDate", "begin_date"),
    ("endDate", "end_date"),
];

/// Renames applied to de-suffixed per-contract columns.
pub const SPECIFIC_COLUMN_NAMES: ColumnRenames<'static> = &[
    ("insCode", "tse_code"),
    ("lVal18AFC", "ticker"),
    ("zTotTran", "trades_num"),
    ("qTotTran5J", "trades_volume"),
    ("qTotCap", "trades_value"),
    ("pDrCotVal", "last_price"),
    ("pClosing", "close_price"),
    ("priceYesterday", "yesterday_price"),
    ("oP", "open_positions"),
    ("yesterdayOP", "yesterday_open_positions"),
    ("notionalValue", "notional_value"),
    ("pMeDem", "bid_price"),
    ("qTitMeDem", "bid_volume"),
    ("pMeOf", "ask_price"),
    ("qTitMeOf", "ask_volume"),
    ("lVal30", "name"),
];

/// Split rules for `instrumentOptMarketWatch` rows.
pub const OPTION_RESHAPE_RULES: ReshapeRules<'static> = ReshapeRules {
    call_suffix: "_C",
    put_suffix: "_P",
    specific_renames: SPECIFIC_COLUMN_NAMES,
    general_renames: GENERAL_COLUMN_NAMES,
};

/// `bestLimitsHistory` renames.
pub const LOB_COLUMN_NAMES: ColumnRenames<'static> = &[
    ("number", "level"),
    ("zOrdMeOf", "ask_number"),
    ("qTitMeOf", "ask_volume"),
    ("pMeOf", "ask_price"),
    ("pMeDem", "bid_price"),
    ("qTitMeDem", "bid_volume"),
    ("zOrdMeDem", "bid_number"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_ids_and_names() {
        assert_eq!(MarketSegment::Bourse.id(), 1);
        assert_eq!(MarketSegment::FaraBourse.id(), 2);
        assert_eq!("fara_bourse".parse::<MarketSegment>().unwrap(), MarketSegment::FaraBourse);
        assert!(matches!("ifb".parse::<MarketSegment>(), Err(TseError::InvalidParameter(_))));
    }

    #[test]
    fn underlying_columns_are_not_contract_suffixed() {
        for (from, _) in GENERAL_COLUMN_NAMES {
            assert!(!from.ends_with("_C") && !from.ends_with("_P"), "{from}");
        }
    }
}
