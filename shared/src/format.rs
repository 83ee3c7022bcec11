//! Display formatting for numbers, dates and percentages
//!
//! Formatters never fail: unusable input renders as a neutral placeholder
//! ("0", "" or "0%") so a single bad cell cannot break a table.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Anything that can be shown as a whole number
pub trait WholeNumber {
    /// Integer part, truncated toward zero; `None` when not representable
    fn whole_number(&self) -> Option<i128>;
}

macro_rules! impl_whole_number_for_int {
    ($($t:ty),*) => {
        $(impl WholeNumber for $t {
            fn whole_number(&self) -> Option<i128> {
                Some(*self as i128)
            }
        })*
    };
}

impl_whole_number_for_int!(i16, i32, i64, i128, u16, u32, u64, usize);

impl WholeNumber for f64 {
    fn whole_number(&self) -> Option<i128> {
        if self.is_finite() {
            Some(self.trunc() as i128)
        } else {
            None
        }
    }
}

impl WholeNumber for f32 {
    fn whole_number(&self) -> Option<i128> {
        f64::from(*self).whole_number()
    }
}

impl WholeNumber for Decimal {
    fn whole_number(&self) -> Option<i128> {
        self.trunc().to_i128()
    }
}

/// Text must hold an integer; anything else is not a number
impl WholeNumber for str {
    fn whole_number(&self) -> Option<i128> {
        self.trim().parse::<i128>().ok()
    }
}

impl WholeNumber for String {
    fn whole_number(&self) -> Option<i128> {
        self.as_str().whole_number()
    }
}

impl<T: WholeNumber> WholeNumber for Option<T> {
    fn whole_number(&self) -> Option<i128> {
        self.as_ref().and_then(WholeNumber::whole_number)
    }
}

impl<T: WholeNumber + ?Sized> WholeNumber for &T {
    fn whole_number(&self) -> Option<i128> {
        (**self).whole_number()
    }
}

/// Format with South-Asian digit grouping: the last three digits, then pairs.
///
/// `1234567` becomes `"12,34,567"`. Missing or non-numeric input gives `"0"`.
pub fn format_grouped<T: WholeNumber + ?Sized>(value: &T) -> String {
    let Some(number) = value.whole_number() else {
        return "0".to_string();
    };

    let digits = number.unsigned_abs().to_string();
    let sign = if number < 0 { "-" } else { "" };
    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{sign}{},{last_three}", groups.join(","))
}

/// Text date formats tried in order. Month-first comes before day-first so
/// `03/04/2025` reads as 4 March.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d.%m.%Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Parse free-form date text
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|ts| ts.date())
        })
}

/// Anything that can be shown as a calendar date
pub trait DateInput {
    fn to_date(&self) -> Option<NaiveDate>;
}

impl DateInput for NaiveDate {
    fn to_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl DateInput for NaiveDateTime {
    fn to_date(&self) -> Option<NaiveDate> {
        Some(self.date())
    }
}

impl DateInput for DateTime<Utc> {
    fn to_date(&self) -> Option<NaiveDate> {
        Some(self.date_naive())
    }
}

impl DateInput for str {
    fn to_date(&self) -> Option<NaiveDate> {
        parse_date_text(self)
    }
}

impl DateInput for String {
    fn to_date(&self) -> Option<NaiveDate> {
        parse_date_text(self)
    }
}

impl<T: DateInput> DateInput for Option<T> {
    fn to_date(&self) -> Option<NaiveDate> {
        self.as_ref().and_then(DateInput::to_date)
    }
}

impl<T: DateInput + ?Sized> DateInput for &T {
    fn to_date(&self) -> Option<NaiveDate> {
        (**self).to_date()
    }
}

/// Format as `dd-Mon-yyyy` (`23-Jul-2025`); unparseable input gives `""`
pub fn format_date<T: DateInput + ?Sized>(value: &T) -> String {
    value
        .to_date()
        .map(|date| date.format("%d-%b-%Y").to_string())
        .unwrap_or_default()
}

/// Whole percent, ties to even (`87.5` becomes `"88%"`, `86.5` becomes `"86%"`)
pub fn format_percent(value: Option<Decimal>) -> String {
    let whole = value
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|v| v.to_i128())
        .unwrap_or(0);
    format!("{whole}%")
}

/// Months of stock with two decimals
pub fn format_position(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Display emphasis for a purchase order's supply percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyEmphasis {
    Over,
    Low,
    Normal,
}

impl SupplyEmphasis {
    pub fn for_percent(percent: Option<Decimal>) -> Self {
        match percent {
            Some(p) if p > Decimal::ONE_HUNDRED => SupplyEmphasis::Over,
            Some(p) if p < Decimal::from(90) => SupplyEmphasis::Low,
            _ => SupplyEmphasis::Normal,
        }
    }

    /// Style applied to the whole row
    pub fn css(&self) -> Option<&'static str> {
        match self {
            SupplyEmphasis::Over => Some("color: green"),
            SupplyEmphasis::Low => Some("color: red"),
            SupplyEmphasis::Normal => None,
        }
    }
}

/// Display emphasis for an item's pending supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingEmphasis {
    High,
    Elevated,
    Normal,
}

impl PendingEmphasis {
    pub fn for_pending(pending: i64) -> Self {
        if pending > 10 {
            PendingEmphasis::High
        } else if pending > 0 {
            PendingEmphasis::Elevated
        } else {
            PendingEmphasis::Normal
        }
    }

    /// Style applied to the pending-supply cell
    pub fn css(&self) -> Option<&'static str> {
        match self {
            PendingEmphasis::High => {
                Some("background-color: tomato; color: white; font-weight: bold")
            }
            PendingEmphasis::Elevated => Some("background-color: lightyellow; font-weight: bold"),
            PendingEmphasis::Normal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(&1234567i64), "12,34,567");
        assert_eq!(format_grouped(&100i64), "100");
        assert_eq!(format_grouped(&1000i64), "1,000");
        assert_eq!(format_grouped(&100000i64), "1,00,000");
        assert_eq!(format_grouped(&123456789u64), "12,34,56,789");
        assert_eq!(format_grouped(&0i32), "0");
    }

    #[test]
    fn test_format_grouped_negative() {
        assert_eq!(format_grouped(&-20i64), "-20");
        assert_eq!(format_grouped(&-1234567i64), "-12,34,567");
    }

    #[test]
    fn test_format_grouped_placeholders() {
        assert_eq!(format_grouped(&None::<i64>), "0");
        assert_eq!(format_grouped(&f64::NAN), "0");
        assert_eq!(format_grouped(&f64::INFINITY), "0");
        assert_eq!(format_grouped("abc"), "0");
        assert_eq!(format_grouped(""), "0");
    }

    #[test]
    fn test_format_grouped_truncates() {
        assert_eq!(format_grouped(&1234.99f64), "1,234");
        assert_eq!(format_grouped(&-1.9f64), "-1");
        assert_eq!(format_grouped(&dec("98765.43")), "98,765");
        assert_eq!(format_grouped(&Some(dec("5.5"))), "5");
        assert_eq!(format_grouped(" 4500 "), "4,500");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 23).unwrap();
        assert_eq!(format_date(&date), "23-Jul-2025");
        assert_eq!(format_date("2025-07-23"), "23-Jul-2025");
        assert_eq!(format_date("2025-07-23 10:15:00"), "23-Jul-2025");
        assert_eq!(format_date("2025-07-23T10:15:00+05:30"), "23-Jul-2025");
        assert_eq!(format_date("07/23/2025"), "23-Jul-2025");
        assert_eq!(format_date("23/07/2025"), "23-Jul-2025");
        assert_eq!(format_date("23-Jul-2025"), "23-Jul-2025");
    }

    #[test]
    fn test_format_date_month_first() {
        assert_eq!(format_date("03/04/2025"), "04-Mar-2025");
    }

    #[test]
    fn test_format_date_unparseable() {
        assert_eq!(format_date("not a date"), "");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date(&None::<NaiveDate>), "");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(dec("87.4"))), "87%");
        assert_eq!(format_percent(Some(dec("87.5"))), "88%");
        assert_eq!(format_percent(Some(dec("86.5"))), "86%");
        assert_eq!(format_percent(Some(dec("100"))), "100%");
        assert_eq!(format_percent(Some(dec("-0.4"))), "0%");
        assert_eq!(format_percent(None), "0%");
    }

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(dec("1")), "1.00");
        assert_eq!(format_position(dec("2.345")), "2.35");
        assert_eq!(format_position(dec("0.004")), "0.00");
    }

    #[test]
    fn test_supply_emphasis() {
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("89.99"))), SupplyEmphasis::Low);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("90"))), SupplyEmphasis::Normal);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("100"))), SupplyEmphasis::Normal);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("100.5"))), SupplyEmphasis::Over);
        assert_eq!(SupplyEmphasis::for_percent(None), SupplyEmphasis::Normal);
        assert_eq!(SupplyEmphasis::Low.css(), Some("color: red"));
    }

    #[test]
    fn test_pending_emphasis() {
        assert_eq!(PendingEmphasis::for_pending(11), PendingEmphasis::High);
        assert_eq!(PendingEmphasis::for_pending(10), PendingEmphasis::Elevated);
        assert_eq!(PendingEmphasis::for_pending(1), PendingEmphasis::Elevated);
        assert_eq!(PendingEmphasis::for_pending(0), PendingEmphasis::Normal);
        assert_eq!(PendingEmphasis::for_pending(-5), PendingEmphasis::Normal);
        assert_eq!(PendingEmphasis::Normal.css(), None);
    }
}
