//! Per-warehouse stock distribution

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use shared::{
    DisplayTable, DistributionSort, DrugCategory, ReferenceBasis, StackedBarChart,
    WarehouseBuckets,
};

use super::{respond, ResponseFormat};
use crate::error::AppResult;
use crate::services::DistributionService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DistributionQuery {
    #[serde(default)]
    pub category: DrugCategory,
    #[serde(default)]
    pub basis: ReferenceBasis,
    #[serde(default)]
    pub sort: DistributionSort,
    #[serde(default)]
    pub format: ResponseFormat,
}

#[derive(Serialize)]
pub struct DistributionResponse {
    pub sort: DistributionSort,
    pub warehouses: Vec<WarehouseBuckets>,
    pub chart: StackedBarChart,
    pub table: DisplayTable,
}

/// Stacked bucket counts for every CMS
pub async fn get_distribution(
    State(state): State<AppState>,
    Query(query): Query<DistributionQuery>,
) -> AppResult<Response> {
    let service = DistributionService::new(state.db.clone());
    let warehouses = service
        .distribution(query.basis, query.category, query.sort)
        .await?;

    let chart = shared::distribution_chart(&warehouses, query.category);
    let table = shared::distribution_table(&warehouses);
    let body = DistributionResponse {
        sort: query.sort,
        warehouses,
        chart,
        table: table.clone(),
    };

    respond(query.format, body, &table, "stock_distribution.csv")
}
