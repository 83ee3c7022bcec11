//! Rate contract models

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Days ahead of today within which a contract counts as expiring
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 90;

/// One row of `rate_contract_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RateContract {
    #[validate(length(min = 1, message = "Item Code is required"))]
    pub item_code: String,
    pub supplier: Option<String>,
    pub rate: Decimal,
    pub rate_unit: Option<String>,
    pub tender_date: Option<NaiveDate>,
    pub contract_from_date: Option<NaiveDate>,
    pub contract_to_date: Option<NaiveDate>,
    pub rate_contract_level: Option<String>,
}

/// Contract ending within the expiry window, joined with its item name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringContract {
    pub item_code: String,
    pub item_name: Option<String>,
    pub supplier: Option<String>,
    pub rate: Option<Decimal>,
    pub contract_from_date: Option<NaiveDate>,
    pub contract_to_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Expiring,
    Expired,
}

impl ContractStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ContractStatus::Active => "Active",
            ContractStatus::Expiring => "Expiring",
            ContractStatus::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Status of a contract ending on `to_date`, as seen on `today`.
///
/// A contract ending today is still expiring, not expired.
pub fn contract_status(to_date: NaiveDate, today: NaiveDate, window_days: i64) -> ContractStatus {
    if to_date < today {
        ContractStatus::Expired
    } else if to_date <= today + Duration::days(window_days) {
        ContractStatus::Expiring
    } else {
        ContractStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contract_status_boundaries() {
        let today = date(2025, 7, 23);
        assert_eq!(contract_status(date(2025, 7, 22), today, 90), ContractStatus::Expired);
        assert_eq!(contract_status(today, today, 90), ContractStatus::Expiring);
        assert_eq!(contract_status(date(2025, 10, 21), today, 90), ContractStatus::Expiring);
        assert_eq!(contract_status(date(2025, 10, 22), today, 90), ContractStatus::Active);
    }

    #[test]
    fn test_contract_status_zero_window() {
        let today = date(2025, 1, 1);
        assert_eq!(contract_status(today, today, 0), ContractStatus::Expiring);
        assert_eq!(contract_status(date(2025, 1, 2), today, 0), ContractStatus::Active);
    }
}
