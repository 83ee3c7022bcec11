//! Consumption and demand reference quantities

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which reference table a quantity comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Consumption,
    Demand,
}

impl ReferenceKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceKind::Consumption => "consumption_reference",
            ReferenceKind::Demand => "demand_reference",
        }
    }

    pub fn quantity_column(&self) -> &'static str {
        match self {
            ReferenceKind::Consumption => "cons_qty_ref",
            ReferenceKind::Demand => "dem_qty_ref",
        }
    }
}

/// Annual reference quantity for an (item, warehouse) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReferenceRecord {
    #[validate(length(min = 1, message = "Item Code is required"))]
    pub item_code: String,
    #[validate(length(min = 1, message = "Warehouse Name is required"))]
    pub warehouse_name: String,
    #[validate(range(min = 0, message = "Reference quantity cannot be negative"))]
    pub reference_qty: i64,
}
