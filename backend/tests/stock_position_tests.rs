//! Stock position tests
//!
//! Tests for months-of-stock derivation including:
//! - Rounding to two decimals
//! - Fallback when no usable reference exists
//! - Consumption versus demand references per item type

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{stock_position, PositionInputs, FALLBACK_POSITION};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn inputs(kind: Option<&str>, stock: i64, cons: Option<i64>, dem: Option<i64>) -> PositionInputs {
    PositionInputs {
        item_code: "D010".to_string(),
        warehouse_name: "CMS Nizamabad".to_string(),
        stock_quantity: stock,
        type_cons_dem: kind.map(str::to_string),
        cons_qty_ref: cons,
        dem_qty_ref: dem,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test months of stock against an annual reference
    #[test]
    fn test_position_from_reference() {
        assert_eq!(stock_position(100, Some(1200)), dec("1.00"));
        assert_eq!(stock_position(25, Some(100)), dec("3.00"));
        assert_eq!(stock_position(10, Some(7)), dec("17.14"));
        assert_eq!(stock_position(0, Some(100)), dec("0.00"));
    }

    /// Test half-way values round away from zero
    #[test]
    fn test_rounding() {
        // 1 * 12 / 800 = 0.015
        assert_eq!(stock_position(1, Some(800)), dec("0.02"));
    }

    /// Test fallback without a usable reference
    #[test]
    fn test_fallback() {
        assert_eq!(stock_position(5, None), FALLBACK_POSITION);
        assert_eq!(stock_position(5, Some(0)), dec("3.00"));
        assert_eq!(stock_position(5, Some(-20)), dec("3.00"));
        assert_eq!(stock_position(0, None), Decimal::ZERO);
    }

    /// Test results always carry two decimals
    #[test]
    fn test_scale() {
        assert_eq!(stock_position(100, Some(1200)).to_string(), "1.00");
        assert_eq!(stock_position(0, None).to_string(), "0.00");
    }

    /// Test consumption items reuse the consumption position
    #[test]
    fn test_recompute_consumption_item() {
        let result = inputs(Some("Cons"), 60, Some(240), Some(60)).recompute();
        assert_eq!(result.stock_pos_cons, dec("3.00"));
        assert_eq!(result.stock_pos_con_dem, Some(dec("3.00")));
    }

    /// Test demand items use the demand reference
    #[test]
    fn test_recompute_demand_item() {
        let result = inputs(Some(" dem "), 60, Some(240), Some(60)).recompute();
        assert_eq!(result.stock_pos_cons, dec("3.00"));
        assert_eq!(result.stock_pos_con_dem, Some(dec("12.00")));
    }

    /// Test unknown item types leave the combined position empty
    #[test]
    fn test_recompute_unknown_type() {
        let result = inputs(None, 60, Some(240), Some(60)).recompute();
        assert_eq!(result.stock_pos_con_dem, None);

        let result = inputs(Some("other"), 60, None, None).recompute();
        assert_eq!(result.stock_pos_cons, FALLBACK_POSITION);
        assert_eq!(result.stock_pos_con_dem, None);
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

        /// Positions are never negative for non-negative stock
        #[test]
        fn prop_position_non_negative(stock in 0i64..10_000_000, reference in prop::option::of(-100i64..10_000_000)) {
            prop_assert!(stock_position(stock, reference) >= Decimal::ZERO);
        }

        /// More stock never means fewer months
        #[test]
        fn prop_position_monotonic(stock in 0i64..1_000_000, extra in 0i64..1_000_000, reference in 1i64..1_000_000) {
            prop_assert!(stock_position(stock + extra, Some(reference)) >= stock_position(stock, Some(reference)));
        }

        /// Rounded position is within half a hundredth of the exact value
        #[test]
        fn prop_position_close_to_exact(stock in 0i64..1_000_000, reference in 1i64..1_000_000) {
            let exact = Decimal::from(stock) * Decimal::from(12) / Decimal::from(reference);
            let diff = (stock_position(stock, Some(reference)) - exact).abs();
            prop_assert!(diff <= dec("0.005"));
        }

        /// Consumption items always agree on both positions
        #[test]
        fn prop_consumption_positions_agree(stock in 0i64..100_000, cons in prop::option::of(0i64..100_000)) {
            let result = inputs(Some("cons"), stock, cons, Some(1)).recompute();
            prop_assert_eq!(result.stock_pos_con_dem, Some(result.stock_pos_cons));
        }
    }
}
