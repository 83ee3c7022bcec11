//! Database models for the Drug Stock Dashboard
//!
//! Re-exports models from the shared crate and adds the sqlx row types the
//! services decode query results into.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub use shared::models::*;
use shared::PositionInputs;

/// Columns of the stock-position sample queries
#[derive(Debug, sqlx::FromRow)]
pub struct StockSampleRow {
    pub item_code: String,
    pub warehouse_name: String,
    pub position: Decimal,
    pub quantity: i64,
}

impl From<StockSampleRow> for StockSample {
    fn from(row: StockSampleRow) -> Self {
        StockSample {
            item_code: row.item_code,
            warehouse_name: row.warehouse_name,
            position: row.position,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct StockListingDbRow {
    pub serial_no: i64,
    pub item_code: String,
    pub item_name: Option<String>,
    pub eml_aml_type: Option<String>,
    pub priority_item: Option<String>,
    pub type_cons_dem: Option<String>,
    pub stock_quantity: i64,
    pub stock_position: Option<Decimal>,
    pub pending_supply: i64,
}

impl From<StockListingDbRow> for StockListingRow {
    fn from(row: StockListingDbRow) -> Self {
        StockListingRow {
            serial_no: row.serial_no,
            item_code: row.item_code,
            item_name: row.item_name,
            eml_aml_type: row.eml_aml_type,
            priority_item: row.priority_item,
            type_cons_dem: row.type_cons_dem,
            stock_quantity: row.stock_quantity,
            stock_position: row.stock_position.unwrap_or_default(),
            pending_supply: row.pending_supply,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PurchaseOrderDetailRow {
    pub po_number: String,
    pub po_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub po_qty: i64,
    pub received_qty: i64,
    pub supply_status: Option<Decimal>,
    pub pending_qty: i64,
    pub scheduled_delivery_date: Option<NaiveDate>,
}

impl From<PurchaseOrderDetailRow> for PurchaseOrderDetail {
    fn from(row: PurchaseOrderDetailRow) -> Self {
        PurchaseOrderDetail {
            po_number: row.po_number,
            po_date: row.po_date,
            supplier: row.supplier,
            po_qty: row.po_qty,
            received_qty: row.received_qty,
            supply_status: row.supply_status,
            pending_qty: row.pending_qty,
            scheduled_delivery_date: row.scheduled_delivery_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ExpiringContractRow {
    pub item_code: String,
    pub item_name: Option<String>,
    pub supplier: Option<String>,
    pub rate: Option<Decimal>,
    pub contract_from_date: Option<NaiveDate>,
    pub contract_to_date: NaiveDate,
}

impl From<ExpiringContractRow> for ExpiringContract {
    fn from(row: ExpiringContractRow) -> Self {
        ExpiringContract {
            item_code: row.item_code,
            item_name: row.item_name,
            supplier: row.supplier,
            rate: row.rate,
            contract_from_date: row.contract_from_date,
            contract_to_date: row.contract_to_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct LowStockRow {
    pub item_code: String,
    pub item_name: Option<String>,
    pub stock_quantity: i64,
    pub stock_position: Decimal,
    pub pending_supply: i64,
}

impl From<LowStockRow> for LowStockItem {
    fn from(row: LowStockRow) -> Self {
        LowStockItem {
            item_code: row.item_code,
            item_name: row.item_name,
            stock_quantity: row.stock_quantity,
            stock_position: row.stock_position,
            pending_supply: row.pending_supply,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PositionInputRow {
    pub item_code: String,
    pub warehouse_name: String,
    pub stock_quantity: i64,
    pub type_cons_dem: Option<String>,
    pub cons_qty_ref: Option<i64>,
    pub dem_qty_ref: Option<i64>,
}

impl From<PositionInputRow> for PositionInputs {
    fn from(row: PositionInputRow) -> Self {
        PositionInputs {
            item_code: row.item_code,
            warehouse_name: row.warehouse_name,
            stock_quantity: row.stock_quantity,
            type_cons_dem: row.type_cons_dem,
            cons_qty_ref: row.cons_qty_ref,
            dem_qty_ref: row.dem_qty_ref,
        }
    }
}
