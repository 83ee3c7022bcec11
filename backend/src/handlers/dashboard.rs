//! Dashboard handlers: metric tiles, stock table and purchase order detail

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{
    BucketCounts, DrugCategory, MetricTile, ReferenceBasis, SelectedMetric, StockFilter,
    WarehouseSelector,
};

use super::{respond, ResponseFormat};
use crate::error::AppResult;
use crate::services::DashboardService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub category: DrugCategory,
    #[serde(default)]
    pub basis: ReferenceBasis,
    pub warehouse: Option<String>,
    #[serde(default)]
    pub metric: SelectedMetric,
    #[serde(default)]
    pub format: ResponseFormat,
}

impl DashboardQuery {
    pub fn filter(&self) -> StockFilter {
        StockFilter {
            category: self.category,
            basis: self.basis,
            warehouse: WarehouseSelector::from_param(self.warehouse.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: ResponseFormat,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub warehouse: String,
    pub counts: BucketCounts,
    pub tiles: Vec<MetricTile>,
}

/// Metric tile counts for the current filter
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<MetricsResponse>> {
    let service = DashboardService::new(state.db.clone());
    let filter = query.filter();
    let counts = service.metrics(&filter).await?;

    Ok(Json(MetricsResponse {
        warehouse: filter.warehouse.warehouse_name().to_string(),
        tiles: shared::metric_tiles(&counts, query.metric),
        counts,
    }))
}

/// Stock table for the current filter and selected tile
pub async fn get_stock_listing(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
    let service = DashboardService::new(state.db.clone());
    let rows = service.stock_listing(&query.filter(), query.metric).await?;
    let view = shared::stock_listing_view(&rows, query.metric);

    respond(query.format, &view, &view.table, "filtered_data.csv")
}

/// Purchase orders of one item
pub async fn get_purchase_orders(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
    Query(query): Query<FormatQuery>,
) -> AppResult<Response> {
    let service = DashboardService::new(state.db.clone());
    let (item_name, orders) = service.purchase_orders(item_code.trim()).await?;
    let view = shared::purchase_order_view(&item_name, &orders);

    respond(query.format, &view, &view.table, "purchase_orders.csv")
}
