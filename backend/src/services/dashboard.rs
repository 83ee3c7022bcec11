//! Dashboard service: selector options, metric tiles, stock table and
//! purchase order detail

use shared::query;
use shared::{BucketCounts, PurchaseOrderDetail, SelectedMetric, StockFilter, StockListingRow, StockSample};
use sqlx::PgPool;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{PurchaseOrderDetailRow, StockListingDbRow, StockSampleRow};

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Warehouse selector entries, "State Total" first
    pub async fn warehouse_options(&self) -> AppResult<Vec<String>> {
        let built = query::warehouse_options();
        let names = db::query_scalar::<String>(&built)
            .fetch_all(&self.db)
            .await?;

        Ok(shared::warehouse_selector_options(names))
    }

    /// Counts behind the metric tiles
    pub async fn metrics(&self, filter: &StockFilter) -> AppResult<BucketCounts> {
        let built = query::stock_positions(filter);
        let samples: Vec<StockSample> = db::query_as::<StockSampleRow>(&built)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StockSample::from)
            .collect();

        let counts = BucketCounts::tally(&samples);
        tracing::debug!(
            warehouse = filter.warehouse.warehouse_name(),
            total = counts.total,
            "Computed dashboard metrics"
        );
        Ok(counts)
    }

    /// Stock table rows for the filter and selected tile
    pub async fn stock_listing(
        &self,
        filter: &StockFilter,
        metric: SelectedMetric,
    ) -> AppResult<Vec<StockListingRow>> {
        let built = query::stock_listing(filter, metric);
        let rows = db::query_as::<StockListingDbRow>(&built)
            .fetch_all(&self.db)
            .await?;

        tracing::debug!(metric = metric.as_str(), rows = rows.len(), "Fetched stock listing");
        Ok(rows.into_iter().map(StockListingRow::from).collect())
    }

    /// Item name and purchase orders for one item, newest first
    pub async fn purchase_orders(
        &self,
        item_code: &str,
    ) -> AppResult<(String, Vec<PurchaseOrderDetail>)> {
        let name_query = query::item_name(item_code);
        let item_name = db::query_scalar::<String>(&name_query)
            .fetch_optional(&self.db)
            .await?;

        let built = query::purchase_orders_for_item(item_code);
        let orders: Vec<PurchaseOrderDetail> = db::query_as::<PurchaseOrderDetailRow>(&built)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(PurchaseOrderDetail::from)
            .collect();

        match item_name {
            Some(name) => Ok((name, orders)),
            None if !orders.is_empty() => Ok((item_code.to_string(), orders)),
            None => Err(AppError::NotFound(format!("Item {}", item_code))),
        }
    }
}
