//! Display formatting tests
//!
//! Tests for value formatting including:
//! - South-Asian digit grouping
//! - Lenient date parsing and dd-Mon-yyyy output
//! - Supply percentage rounding and row emphasis

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    format_date, format_grouped, format_percent, format_position, purchase_order_view,
    PurchaseOrderDetail, SupplyEmphasis,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn order(po_number: &str, supply_status: Option<&str>) -> PurchaseOrderDetail {
    PurchaseOrderDetail {
        po_number: po_number.to_string(),
        po_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 23),
        supplier: Some("Acme Pharma".to_string()),
        po_qty: 1000,
        received_qty: 875,
        supply_status: supply_status.map(dec),
        pending_qty: 125,
        scheduled_delivery_date: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test grouping of whole numbers
    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(&0i64), "0");
        assert_eq!(format_grouped(&999i64), "999");
        assert_eq!(format_grouped(&1000i64), "1,000");
        assert_eq!(format_grouped(&100000i64), "1,00,000");
        assert_eq!(format_grouped(&1234567i64), "12,34,567");
        assert_eq!(format_grouped(&-1234567i64), "-12,34,567");
    }

    /// Test grouping of fractional and textual input
    #[test]
    fn test_grouping_other_inputs() {
        assert_eq!(format_grouped(&1234.9f64), "1,234");
        assert_eq!(format_grouped(&dec("98765.43")), "98,765");
        assert_eq!(format_grouped("250000"), "2,50,000");
        assert_eq!(format_grouped("lots"), "0");
        assert_eq!(format_grouped(&None::<i64>), "0");
        assert_eq!(format_grouped(&f64::NAN), "0");
    }

    /// Test date formatting from several layouts
    #[test]
    fn test_date_formatting() {
        assert_eq!(format_date("2025-07-23"), "23-Jul-2025");
        assert_eq!(format_date("2025-07-23 10:15:00"), "23-Jul-2025");
        assert_eq!(format_date("23-Jul-2025"), "23-Jul-2025");
        assert_eq!(format_date("not a date"), "");
        assert_eq!(format_date(""), "");
    }

    /// Test ambiguous dates read month first
    #[test]
    fn test_ambiguous_dates() {
        assert_eq!(format_date("03/04/2025"), "04-Mar-2025");
        assert_eq!(format_date("13/04/2025"), "13-Apr-2025");
    }

    /// Test percent rounding
    #[test]
    fn test_percent() {
        assert_eq!(format_percent(Some(dec("87.5"))), "88%");
        assert_eq!(format_percent(Some(dec("86.5"))), "86%");
        assert_eq!(format_percent(Some(dec("100"))), "100%");
        assert_eq!(format_percent(None), "0%");
    }

    /// Test stock position always shows two decimals
    #[test]
    fn test_position() {
        assert_eq!(format_position(dec("3")), "3.00");
        assert_eq!(format_position(dec("2.005")), "2.01");
        assert_eq!(format_position(dec("0.1")), "0.10");
    }

    /// Test supply emphasis thresholds
    #[test]
    fn test_supply_emphasis() {
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("100.5"))), SupplyEmphasis::Over);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("100"))), SupplyEmphasis::Normal);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("90"))), SupplyEmphasis::Normal);
        assert_eq!(SupplyEmphasis::for_percent(Some(dec("89.9"))), SupplyEmphasis::Low);
        assert_eq!(SupplyEmphasis::for_percent(None), SupplyEmphasis::Normal);
    }

    /// Test purchase order rows carry formatted cells and row styles
    #[test]
    fn test_purchase_order_view() {
        let view = purchase_order_view(
            "Amoxicillin 250mg",
            &[order("PO/1", Some("87.5")), order("PO/2", Some("120")), order("PO/3", None)],
        );

        assert_eq!(view.title, "Showing PO Details for: Amoxicillin 250mg");
        let first = &view.table.rows[0];
        assert_eq!(first.cells[1], "23-Jul-2025");
        assert_eq!(first.cells[3], "1,000");
        assert_eq!(first.cells[5], "88%");
        assert_eq!(first.cells[7], "");
        assert_eq!(first.highlight.as_ref().unwrap().css, "color: red");
        assert!(first.highlight.as_ref().unwrap().column.is_none());

        assert_eq!(view.table.rows[1].highlight.as_ref().unwrap().css, "color: green");
        assert!(view.table.rows[2].highlight.is_none());
    }

    /// Test an item without orders gets the empty message
    #[test]
    fn test_no_purchase_orders() {
        let view = purchase_order_view("D404", &[]);
        assert_eq!(
            view.message.as_deref(),
            Some("No purchase orders found for this item.")
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Removing separators gives back the original number
        #[test]
        fn prop_grouping_round_trips(n in any::<i64>()) {
            let formatted = format_grouped(&n);
            let digits: String = formatted.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(digits.parse::<i64>().unwrap(), n);
        }

        /// Last group has three digits, every earlier group at most two
        #[test]
        fn prop_grouping_shape(n in 1000u64..u64::MAX / 2) {
            let formatted = format_grouped(&n);
            let groups: Vec<&str> = formatted.split(',').collect();
            prop_assert_eq!(groups.last().unwrap().len(), 3);
            for group in &groups[..groups.len() - 1] {
                prop_assert!(!group.is_empty() && group.len() <= 2);
            }
            for group in &groups[1..groups.len() - 1] {
                prop_assert_eq!(group.len(), 2);
            }
        }

        /// Formatted percent is always a whole number with a sign
        #[test]
        fn prop_percent_is_whole(hundredths in 0i64..100_000i64) {
            let formatted = format_percent(Some(Decimal::new(hundredths, 2)));
            prop_assert!(formatted.ends_with('%'));
            prop_assert!(formatted.trim_end_matches('%').parse::<i64>().is_ok());
        }
    }
}
