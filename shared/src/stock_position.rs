//! Stock position derivation
//!
//! A stock position is the number of months the current stock lasts at the
//! annual reference rate: `round(stock / reference * 12, 2)`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::ConsDemType;

/// Position assumed when stock exists but there is no usable reference
pub const FALLBACK_POSITION: Decimal = Decimal::from_parts(300, 0, 0, false, 2);

const MONTHS_PER_YEAR: i64 = 12;

/// Months of stock, rounded to two decimals (half away from zero).
///
/// A missing or non-positive reference yields 3.00 when there is stock and
/// 0.00 otherwise.
pub fn stock_position(stock_quantity: i64, reference_qty: Option<i64>) -> Decimal {
    let mut position = match reference_qty {
        Some(reference) if reference > 0 => {
            (Decimal::from(stock_quantity) * Decimal::from(MONTHS_PER_YEAR)
                / Decimal::from(reference))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        _ if stock_quantity > 0 => FALLBACK_POSITION,
        _ => Decimal::ZERO,
    };
    position.rescale(2);
    position
}

/// Everything needed to recompute the positions of one `stock_data` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInputs {
    pub item_code: String,
    pub warehouse_name: String,
    pub stock_quantity: i64,
    pub type_cons_dem: Option<String>,
    pub cons_qty_ref: Option<i64>,
    pub dem_qty_ref: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecomputedPosition {
    pub stock_pos_cons: Decimal,
    /// `None` when the item's reference type is unknown
    pub stock_pos_con_dem: Option<Decimal>,
}

impl PositionInputs {
    pub fn recompute(&self) -> RecomputedPosition {
        let stock_pos_cons = stock_position(self.stock_quantity, self.cons_qty_ref);
        let stock_pos_con_dem = match self.type_cons_dem.as_deref().and_then(ConsDemType::parse) {
            Some(ConsDemType::Cons) => Some(stock_pos_cons),
            Some(ConsDemType::Dem) => Some(stock_position(self.stock_quantity, self.dem_qty_ref)),
            None => None,
        };
        RecomputedPosition {
            stock_pos_cons,
            stock_pos_con_dem,
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

    fn inputs(kind: Option<&str>, stock: i64, cons: Option<i64>, dem: Option<i64>) -> PositionInputs {
        PositionInputs {
            item_code: "D001".to_string(),
            warehouse_name: "CMS Adilabad".to_string(),
            stock_quantity: stock,
            type_cons_dem: kind.map(str::to_string),
            cons_qty_ref: cons,
            dem_qty_ref: dem,
        }
    }

    #[test]
    fn test_stock_position_fallbacks() {
        assert_eq!(stock_position(10, Some(0)), dec("3.00"));
        assert_eq!(stock_position(10, None), dec("3.00"));
        assert_eq!(stock_position(0, Some(0)), dec("0.00"));
        assert_eq!(stock_position(0, None), dec("0.00"));
    }

    #[test]
    fn test_stock_position_ratio() {
        assert_eq!(stock_position(10, Some(120)), dec("1.00"));
        assert_eq!(stock_position(0, Some(120)), dec("0.00"));
        assert_eq!(stock_position(100, Some(300)), dec("4.00"));
        // 7 / 9 * 12 = 9.333...
        assert_eq!(stock_position(7, Some(9)), dec("9.33"));
        // 1 / 800 * 12 = 0.015 rounds away from zero
        assert_eq!(stock_position(1, Some(800)), dec("0.02"));
    }

    #[test]
    fn test_stock_position_always_two_decimals() {
        assert_eq!(stock_position(10, Some(120)).scale(), 2);
        assert_eq!(stock_position(0, None).scale(), 2);
        assert_eq!(stock_position(5, Some(0)).to_string(), "3.00");
    }

    #[test]
    fn test_recompute_by_type() {
        let cons = inputs(Some("cons"), 10, Some(120), Some(60)).recompute();
        assert_eq!(cons.stock_pos_cons, dec("1.00"));
        assert_eq!(cons.stock_pos_con_dem, Some(dec("1.00")));

        let dem = inputs(Some("dem"), 10, Some(120), Some(60)).recompute();
        assert_eq!(dem.stock_pos_cons, dec("1.00"));
        assert_eq!(dem.stock_pos_con_dem, Some(dec("2.00")));

        let unknown = inputs(None, 10, Some(120), Some(60)).recompute();
        assert_eq!(unknown.stock_pos_cons, dec("1.00"));
        assert_eq!(unknown.stock_pos_con_dem, None);
    }

    #[test]
    fn test_recompute_demand_without_reference() {
        let row = inputs(Some("dem"), 4, None, None).recompute();
        assert_eq!(row.stock_pos_cons, dec("3.00"));
        assert_eq!(row.stock_pos_con_dem, Some(dec("3.00")));
    }
}
