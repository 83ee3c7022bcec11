//! Render-ready views built from query results
//!
//! Each builder turns typed rows into a [`DisplayTable`] with formatted cells
//! and emphasis, so the front end only has to draw.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::{Bucket, BucketCounts, WarehouseBuckets};
use crate::format::{
    format_date, format_grouped, format_percent, format_position, PendingEmphasis, SupplyEmphasis,
};
use crate::models::{contract_status, ExpiringContract, LowStockItem, PurchaseOrderDetail, StockListingRow};
use crate::table::{DisplayTable, Highlight};
use crate::types::{DrugCategory, SelectedMetric};

pub const STOCK_LISTING_COLUMNS: [&str; 9] = [
    "S No.",
    "Item Code",
    "Item Name",
    "EML/AML",
    "Priority Status",
    "Cons/Dem Type",
    "Stock Qty",
    "Stock Position",
    "Pending Supply",
];

pub const PURCHASE_ORDER_COLUMNS: [&str; 8] = [
    "PO No.",
    "PO Date",
    "Supplier Name",
    "PO Qty",
    "Received Qty",
    "Supply %",
    "Pending Qty",
    "Scheduled Delivery Date",
];

pub const EXPIRING_CONTRACT_COLUMNS: [&str; 8] = [
    "Item Code",
    "Item Name",
    "Supplier",
    "Rate",
    "Contract From Date",
    "Contract To Date",
    "Days Remaining",
    "Status",
];

pub const LOW_STOCK_COLUMNS: [&str; 5] = [
    "Item Code",
    "Item Name",
    "Stock Qty",
    "Stock Position",
    "Pending Supply",
];

pub const NO_RECORDS_MESSAGE: &str = "No records found for the selected filters.";
pub const NO_PURCHASE_ORDERS_MESSAGE: &str = "No purchase orders found for this item.";
pub const NO_LOW_STOCK_MESSAGE: &str = "No such low stock items found.";

/// A titled table, with a message instead of rows when nothing matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    pub table: DisplayTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TableView {
    pub fn new(title: impl Into<String>, table: DisplayTable, empty_message: &str) -> Self {
        let message = table.is_empty().then(|| empty_message.to_string());
        Self {
            title: title.into(),
            table,
            message,
        }
    }
}

/// One clickable metric tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTile {
    pub metric: SelectedMetric,
    pub label: String,
    pub count: usize,
    pub color: String,
    pub selected: bool,
}

pub fn metric_tiles(counts: &BucketCounts, selected: SelectedMetric) -> Vec<MetricTile> {
    SelectedMetric::TILES
        .iter()
        .map(|&metric| MetricTile {
            metric,
            label: metric.tile_label().to_string(),
            count: metric.bucket().map(|b| counts.get(b)).unwrap_or(counts.total),
            color: metric.tile_color().to_string(),
            selected: metric == selected,
        })
        .collect()
}

pub fn stock_listing_table(rows: &[StockListingRow]) -> DisplayTable {
    let mut table = DisplayTable::new(STOCK_LISTING_COLUMNS);
    for row in rows {
        let highlight = PendingEmphasis::for_pending(row.pending_supply)
            .css()
            .map(|css| Highlight::cell("Pending Supply", css));
        table.push_row(
            vec![
                row.serial_no.to_string(),
                row.item_code.clone(),
                row.item_name.clone().unwrap_or_default(),
                row.eml_aml_type.clone().unwrap_or_default(),
                row.priority_item.clone().unwrap_or_default(),
                row.type_cons_dem.clone().unwrap_or_default(),
                format_grouped(&row.stock_quantity),
                format_position(row.stock_position),
                format_grouped(&row.pending_supply),
            ],
            highlight,
        );
    }
    table
}

pub fn stock_listing_view(rows: &[StockListingRow], metric: SelectedMetric) -> TableView {
    TableView::new(metric.heading(), stock_listing_table(rows), NO_RECORDS_MESSAGE)
}

pub fn purchase_order_table(rows: &[PurchaseOrderDetail]) -> DisplayTable {
    let mut table = DisplayTable::new(PURCHASE_ORDER_COLUMNS);
    for row in rows {
        let highlight = SupplyEmphasis::for_percent(row.supply_status)
            .css()
            .map(Highlight::row);
        table.push_row(
            vec![
                row.po_number.clone(),
                format_date(&row.po_date),
                row.supplier.clone().unwrap_or_default(),
                format_grouped(&row.po_qty),
                format_grouped(&row.received_qty),
                format_percent(row.supply_status),
                format_grouped(&row.pending_qty),
                format_date(&row.scheduled_delivery_date),
            ],
            highlight,
        );
    }
    table
}

pub fn purchase_order_view(item_name: &str, rows: &[PurchaseOrderDetail]) -> TableView {
    TableView::new(
        format!("Showing PO Details for: {item_name}"),
        purchase_order_table(rows),
        NO_PURCHASE_ORDERS_MESSAGE,
    )
}

pub fn expiring_contract_table(
    rows: &[ExpiringContract],
    today: NaiveDate,
    window_days: i64,
) -> DisplayTable {
    let mut table = DisplayTable::new(EXPIRING_CONTRACT_COLUMNS);
    for row in rows {
        let status = contract_status(row.contract_to_date, today, window_days);
        let days_remaining = (row.contract_to_date - today).num_days();
        table.push_row(
            vec![
                row.item_code.clone(),
                row.item_name.clone().unwrap_or_default(),
                row.supplier.clone().unwrap_or_default(),
                row.rate.map(|r| r.round_dp(2).to_string()).unwrap_or_default(),
                format_date(&row.contract_from_date),
                format_date(&row.contract_to_date),
                days_remaining.to_string(),
                status.to_string(),
            ],
            None,
        );
    }
    table
}

pub fn expiring_contract_view(
    rows: &[ExpiringContract],
    today: NaiveDate,
    window_days: i64,
) -> TableView {
    TableView::new(
        format!("Rate contracts expiring in the next {window_days} days"),
        expiring_contract_table(rows, today, window_days),
        &format!("No rate contracts expiring in the next {window_days} days."),
    )
}

pub fn low_stock_table(rows: &[LowStockItem]) -> DisplayTable {
    let mut table = DisplayTable::new(LOW_STOCK_COLUMNS);
    for row in rows {
        table.push_row(
            vec![
                row.item_code.clone(),
                row.item_name.clone().unwrap_or_default(),
                format_grouped(&row.stock_quantity),
                format_position(row.stock_position),
                format_grouped(&row.pending_supply),
            ],
            None,
        );
    }
    table
}

pub fn low_stock_view(rows: &[LowStockItem]) -> TableView {
    TableView::new(
        "Low stock, RC available, but no pending supply",
        low_stock_table(rows),
        NO_LOW_STOCK_MESSAGE,
    )
}

/// Chart series in stacking order, bottom first
const CHART_BUCKETS: [Bucket; 4] = [
    Bucket::AboveThreeMonths,
    Bucket::OneToThreeMonths,
    Bucket::BelowOneMonth,
    Bucket::ZeroStock,
];

pub fn distribution_table(summary: &[WarehouseBuckets]) -> DisplayTable {
    let mut columns = vec!["CMS Name".to_string()];
    columns.extend(CHART_BUCKETS.iter().map(|b| b.chart_label().to_string()));
    columns.push("Total".to_string());

    let mut table = DisplayTable::new(columns);
    for warehouse in summary {
        let mut cells = vec![warehouse.warehouse_name.clone()];
        cells.extend(CHART_BUCKETS.iter().map(|&b| warehouse.get(b).to_string()));
        cells.push(warehouse.total().to_string());
        table.push_row(cells, None);
    }
    table
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub color: String,
    pub values: Vec<usize>,
    /// Where the value labels sit relative to the bar
    pub text_position: String,
}

/// Stacked bar chart of item counts per CMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedBarChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

pub fn distribution_chart(summary: &[WarehouseBuckets], category: DrugCategory) -> StackedBarChart {
    let categories = summary.iter().map(|w| w.warehouse_name.clone()).collect();
    let series = CHART_BUCKETS
        .iter()
        .map(|&bucket| {
            // Zero-stock counts for priority drugs are labelled outside the bar
            let text_position = if bucket == Bucket::ZeroStock && category == DrugCategory::Priority {
                "outside"
            } else {
                "auto"
            };
            ChartSeries {
                name: bucket.chart_label().to_string(),
                color: bucket.chart_color().to_string(),
                values: summary.iter().map(|w| w.get(bucket)).collect(),
                text_position: text_position.to_string(),
            }
        })
        .collect();

    StackedBarChart {
        title: "Stock Position Across CMSs".to_string(),
        x_axis_title: "CMS Name".to_string(),
        y_axis_title: "No. of Items".to_string(),
        categories,
        series,
    }
}
