//! Purchase order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of `purchase_order_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PurchaseOrder {
    pub entry_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "PO NO is required"))]
    pub po_number: String,
    pub po_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Item Code is required"))]
    pub item_code: String,
    pub supplier: Option<String>,
    pub rate: Decimal,
    pub rate_unit: Option<String>,
    #[validate(range(min = 0, message = "PO QTY cannot be negative"))]
    pub po_qty: i64,
    pub po_value: Decimal,
    #[validate(range(min = 0, message = "RECEIVED QTY cannot be negative"))]
    pub received_qty: i64,
    pub received_value: Decimal,
    /// Percent of the order supplied so far
    pub supply_status: Decimal,
    pub tender_number: Option<String>,
    pub scheduled_delivery_date: Option<NaiveDate>,
    pub extended_delivery_period_days: i64,
}

/// Purchase order line shown in the item detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderDetail {
    pub po_number: String,
    pub po_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub po_qty: i64,
    pub received_qty: i64,
    pub supply_status: Option<Decimal>,
    /// Negative when more was received than ordered
    pub pending_qty: i64,
    pub scheduled_delivery_date: Option<NaiveDate>,
}
