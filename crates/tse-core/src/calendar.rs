//! Jalali (Solar Hijri) calendar conversion and trading-day checks.
//!
//! The exchange publishes and accepts dates in two calendars: users think in
//! Jalali `YYYY-MM-DD`, the historical endpoints want Gregorian `YYYYMMDD`.
//! Conversion uses the 33-year arithmetic cycle, which matches the official
//! calendar for the 1178–1633 AP range.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Result, TseError};

/// Years for which the 33-year cycle agrees with the official calendar.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1178..=1633;

/// A validated Jalali calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Build a date, rejecting impossible month/day combinations
    /// (including Esfand 30 in a non-leap year).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(TseError::InvalidParameter(format!("jalali year out of range: {year}")));
        }
        let max_day = match month {
            1..=6 => 31,
            7..=11 => 30,
            12 => 30,
            _ => return Err(TseError::InvalidParameter(format!("jalali month out of range: {month}"))),
        };
        if day == 0 || day > max_day {
            return Err(TseError::InvalidParameter(format!("jalali day out of range: {year}-{month}-{day}")));
        }
        let date = Self { year, month, day };
        // Esfand 30 only exists in leap years: it must not collide with
        // Farvardin 1 of the following year.
        if month == 12 && day == 30 {
            let next_new_year = Self { year: year + 1, month: 1, day: 1 };
            if date.day_number() == next_new_year.day_number() {
                return Err(TseError::InvalidParameter(format!("{year} is not a leap year")));
            }
        }
        Ok(date)
    }

    /// Day count since 0001-01-01 (proleptic Gregorian, day 1).
    fn day_number(&self) -> i64 {
        let jy = self.year as i64 + 1595;
        let jm = self.month as i64;
        let jd = self.day as i64;
        let month_offset = if jm < 7 { (jm - 1) * 31 } else { (jm - 7) * 30 + 186 };
        let days = -355_668 + 365 * jy + (jy / 33) * 8 + ((jy % 33) + 3) / 4 + jd + month_offset;
        days - 365
    }

    /// Convert to the proleptic Gregorian calendar.
    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        i32::try_from(self.day_number())
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| TseError::InvalidParameter(format!("date out of range: {self}")))
    }
}

impl std::fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::str::FromStr for JalaliDate {
    type Err = TseError;

    /// Parse `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TseError::InvalidParameter(format!("expected jalali YYYY-MM-DD, got {s:?}"));
        let mut parts = s.trim().split('-');
        let year = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let month = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let day = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::new(year, month, day)
    }
}

/// Saturday through Wednesday are trading days on the Tehran exchanges.
///
/// Holidays are not checked here.
pub fn is_trading_weekday(date: NaiveDate) -> bool {
    matches!(
        date.weekday(),
        Weekday::Sat | Weekday::Sun | Weekday::Mon | Weekday::Tue | Weekday::Wed
    )
}

/// Convert a Jalali `YYYY-MM-DD` string into a Gregorian trading day.
///
/// Fails with [`TseError::InvalidParameter`] on malformed input or when the
/// date falls on Thursday/Friday.
pub fn jalali_trading_day(jalali: &str) -> Result<NaiveDate> {
    let date: JalaliDate = jalali.parse()?;
    let gregorian = date.to_gregorian()?;
    if !is_trading_weekday(gregorian) {
        return Err(TseError::InvalidParameter(format!(
            "{date} ({gregorian}, {}) is not a trading day",
            gregorian.weekday()
        )));
    }
    Ok(gregorian)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn known_conversions() {
        assert_eq!(JalaliDate::new(1403, 10, 24).unwrap().to_gregorian().unwrap(), g(2025, 1, 13));
        assert_eq!(JalaliDate::new(1403, 1, 1).unwrap().to_gregorian().unwrap(), g(2024, 3, 20));
        assert_eq!(JalaliDate::new(1402, 12, 29).unwrap().to_gregorian().unwrap(), g(2024, 3, 19));
        assert_eq!(JalaliDate::new(1367, 6, 31).unwrap().to_gregorian().unwrap(), g(1988, 9, 22));
        assert_eq!(JalaliDate::new(1403, 7, 1).unwrap().to_gregorian().unwrap(), g(2024, 9, 22));
    }

    #[test]
    fn leap_esfand() {
        assert_eq!(JalaliDate::new(1399, 12, 30).unwrap().to_gregorian().unwrap(), g(2021, 3, 20));
        assert_eq!(JalaliDate::new(1403, 12, 30).unwrap().to_gregorian().unwrap(), g(2025, 3, 20));
        assert!(JalaliDate::new(1402, 12, 30).is_err());
    }

    #[test]
    fn rejects_bad_fields() {
        assert!(JalaliDate::new(1403, 13, 1).is_err());
        assert!(JalaliDate::new(1403, 7, 31).is_err());
        assert!(JalaliDate::new(1403, 1, 0).is_err());
        assert!(matches!(JalaliDate::new(1177, 12, 29), Err(TseError::InvalidParameter(_))));
        assert!(matches!(JalaliDate::new(1634, 1, 1), Err(TseError::InvalidParameter(_))));
        assert!(JalaliDate::new(1178, 1, 1).is_ok());
        assert!(JalaliDate::new(1633, 1, 1).is_ok());
        assert!(matches!(jalali_trading_day("0001-01-01"), Err(TseError::InvalidParameter(_))));
        assert!("1403/10/24".parse::<JalaliDate>().is_err());
        assert!("1403-10".parse::<JalaliDate>().is_err());
        assert!("1403-10-24-1".parse::<JalaliDate>().is_err());
    }

    #[test]
    fn parse_and_display() {
        let d: JalaliDate = "1403-1-5".parse().unwrap();
        assert_eq!(d.to_string(), "1403-01-05");
    }

    #[test]
    fn trading_day_filter() {
        // 1403-10-24 is a Monday.
        assert_eq!(jalali_trading_day("1403-10-24").unwrap(), g(2025, 1, 13));
        // 1400-01-01 is a Sunday.
        assert_eq!(jalali_trading_day("1400-01-01").unwrap(), g(2021, 3, 21));
        // 1403-01-02 is a Thursday, 1403-01-03 a Friday.
        assert!(matches!(jalali_trading_day("1403-01-02"), Err(TseError::InvalidParameter(_))));
        assert!(matches!(jalali_trading_day("1403-01-03"), Err(TseError::InvalidParameter(_))));
    }
}
