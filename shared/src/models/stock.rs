//! Stock records and stock position rows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of `stock_data`: stock held by a warehouse for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StockRecord {
    #[validate(length(min = 1, message = "Item Code is required"))]
    pub item_code: String,
    #[validate(length(min = 1, message = "Warehouse Name is required"))]
    pub warehouse_name: String,
    #[validate(range(min = 0, message = "Stock Quantity cannot be negative"))]
    pub stock_quantity: i64,
    /// Months of stock against consumption
    pub stock_pos_cons: Option<Decimal>,
    /// Months of stock against consumption or demand, per item type
    pub stock_pos_con_dem: Option<Decimal>,
}

/// Which reference quantity an item is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsDemType {
    Cons,
    Dem,
}

impl ConsDemType {
    /// Lenient parse of the `type_cons_dem` column
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cons" | "consumption" => Some(ConsDemType::Cons),
            "dem" | "demand" => Some(ConsDemType::Dem),
            _ => None,
        }
    }
}

/// Value of `item_master.priority_item` marking a priority drug
pub const PRIORITY_FLAG: &str = "Yes";

/// Position and quantity of one (item, warehouse) row, as fed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSample {
    pub item_code: String,
    pub warehouse_name: String,
    pub position: Decimal,
    pub quantity: i64,
}

/// One row of the dashboard stock table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockListingRow {
    pub serial_no: i64,
    pub item_code: String,
    pub item_name: Option<String>,
    pub eml_aml_type: Option<String>,
    pub priority_item: Option<String>,
    pub type_cons_dem: Option<String>,
    pub stock_quantity: i64,
    pub stock_position: Decimal,
    /// Ordered minus received across all purchase orders for the item
    pub pending_supply: i64,
}

/// A State Total item running low with no supply on order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub item_code: String,
    pub item_name: Option<String>,
    pub stock_quantity: i64,
    pub stock_position: Decimal,
    pub pending_supply: i64,
}
