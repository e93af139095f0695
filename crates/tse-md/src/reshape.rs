//! Wide-to-long option market reshaper.
//!
//! The option market watch sends one row per underlying/strike/expiry with
//! every contract field duplicated: `pClosing_C` for the call, `pClosing_P`
//! for the put. [`split_call_put`] turns that into one row per contract:
//!
//! ```text
//! general cols | X_C | Y_C | X_P | Y_P        general | x | y | option_type
//! -------------+-----+-----+-----+-----  ──►  --------+---+---+------------
//!     g1       | c1  | c2  | p1  | p2          g1     | c1| c2| call
//!                                              g1     | p1| p2| put
//! ```
//!
//! Calls come first, then puts, each block in input row order. Suffix sets
//! are handled independently: a field that only exists as `_C` is `null` in
//! the put rows and vice versa.

use serde_json::Value;
use tse_core::{OptionType, frame::{ColumnRenames, Frame}};

/// Name of the tag column added to the long table.
pub const OPTION_TYPE_COLUMN: &str = "option_type";

/// Column naming rules for one wide-form feed.
#[derive(Debug, Clone, Copy)]
pub struct ReshapeRules<'a> {
    pub call_suffix: &'a str,
    pub put_suffix: &'a str,
    /// Applied to de-suffixed contract columns.
    pub specific_renames: ColumnRenames<'a>,
    /// Applied last, to the whole long table.
    pub general_renames: ColumnRenames<'a>,
}

/// Split a wide call/put table into the long, one-contract-per-row form.
///
/// A table without any suffixed column is already long: it passes through
/// with only the general renames applied and no `option_type` column. A
/// table with suffixed columns but no rows yields the full long schema with
/// zero rows.
pub fn split_call_put(wide: &Frame, rules: &ReshapeRules<'_>) -> Frame {
    let mut general: Vec<String> = Vec::new();
    let mut specific: Vec<&str> = Vec::new();

    for column in wide.columns() {
        let base = column
            .strip_suffix(rules.call_suffix)
            .or_else(|| column.strip_suffix(rules.put_suffix));
        match base {
            Some(base) if !base.is_empty() => {
                if !specific.contains(&base) {
                    specific.push(base);
                }
            }
            _ => general.push(column.clone()),
        }
    }

    if specific.is_empty() {
        let mut passthrough = wide.clone();
        passthrough.rename(rules.general_renames);
        return passthrough;
    }

    let side = |suffix: &str, option_type: OptionType| -> Frame {
        let mut projection: Vec<(String, String)> =
            general.iter().map(|c| (c.clone(), c.clone())).collect();
        projection.extend(
            specific
                .iter()
                .map(|base| (format!("{base}{suffix}"), rename_one(base, rules.specific_renames))),
        );
        wide.select_as(&projection)
            .with_constant(OPTION_TYPE_COLUMN, Value::String(option_type.as_str().into()))
    };

    let mut long = Frame::concat(vec![
        side(rules.call_suffix, OptionType::Call),
        side(rules.put_suffix, OptionType::Put),
    ]);
    long.rename(rules.general_renames);
    long
}

fn rename_one(column: &str, renames: ColumnRenames<'_>) -> String {
    renames
        .iter()
        .find(|(from, _)| *from == column)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| column.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const RULES: ReshapeRules<'static> = ReshapeRules {
        call_suffix: "_C",
        put_suffix: "_P",
        specific_renames: &[("lastPrice", "last_price")],
        general_renames: &[],
    };

    #[test]
    fn splits_example_row() {
        let wide = Frame::from_records(&[json!({
            "ua_code": "U1", "strike": 100, "end_date": "2025-01-01",
            "lastPrice_C": 10, "lastPrice_P": 5
        })])
        .unwrap();
        let long = split_call_put(&wide, &RULES);

        assert_eq!(long.columns(), ["ua_code", "strike", "end_date", "last_price", "option_type"]);
        assert_eq!(long.len(), 2);
        assert_eq!(long.rows()[0], vec![json!("U1"), json!(100), json!("2025-01-01"), json!(10), json!("call")]);
        assert_eq!(long.rows()[1], vec![json!("U1"), json!(100), json!("2025-01-01"), json!(5), json!("put")]);
    }

    #[test]
    fn doubles_rows_and_keeps_general_values() {
        let records: Vec<_> = (0..4)
            .map(|i| json!({"g": i, "h": format!("r{i}"), "p_C": i * 10, "p_P": -i}))
            .collect();
        let wide = Frame::from_records(&records).unwrap();
        let long = split_call_put(&wide, &RULES);

        let n = wide.len();
        assert_eq!(long.len(), 2 * n);
        let calls = (0..long.len()).filter(|&r| long.get(r, "option_type") == Some(&json!("call"))).count();
        assert_eq!(calls, n);
        for i in 0..n {
            for col in ["g", "h"] {
                assert_eq!(long.get(i, col), wide.get(i, col));
                assert_eq!(long.get(n + i, col), wide.get(i, col));
            }
            assert_eq!(long.get(n + i, "option_type"), Some(&json!("put")));
        }
    }

    #[test]
    fn unpaired_suffix_columns_are_null_on_other_side() {
        let wide = Frame::from_records(&[json!({"g": 1, "onlyCall_C": 7, "onlyPut_P": 8})]).unwrap();
        let long = split_call_put(&wide, &RULES);
        assert_eq!(long.columns(), ["g", "onlyCall", "onlyPut", "option_type"]);
        assert_eq!(long.get(0, "onlyCall"), Some(&json!(7)));
        assert_eq!(long.get(0, "onlyPut"), Some(&Value::Null));
        assert_eq!(long.get(1, "onlyCall"), Some(&Value::Null));
        assert_eq!(long.get(1, "onlyPut"), Some(&json!(8)));
    }

    #[test]
    fn general_renames_apply_last() {
        let rules = ReshapeRules { general_renames: &[("ua_code", "ua_tse_code")], ..RULES };
        let wide = Frame::from_records(&[json!({"ua_code": "U1", "lastPrice_C": 1, "lastPrice_P": 2})]).unwrap();
        let long = split_call_put(&wide, &rules);
        assert_eq!(long.columns(), ["ua_tse_code", "last_price", "option_type"]);
    }

    #[test]
    fn long_table_passes_through() {
        let already_long = Frame::from_records(&[json!({"ticker": "A", "option_type": "call"})]).unwrap();
        let out = split_call_put(&already_long, &RULES);
        assert_eq!(out, already_long);
        assert_eq!(split_call_put(&out, &RULES), out);
    }

    #[test]
    fn zero_rows_keep_long_schema() {
        let wide = Frame::new(vec!["g".into(), "lastPrice_C".into(), "lastPrice_P".into()]);
        let long = split_call_put(&wide, &RULES);
        assert!(long.is_empty());
        assert_eq!(long.columns(), ["g", "last_price", "option_type"]);

        let nothing = split_call_put(&Frame::default(), &RULES);
        assert!(nothing.is_empty());
        assert!(nothing.columns().is_empty());
    }
}
