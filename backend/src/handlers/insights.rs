//! Insight handlers

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use shared::ReferenceBasis;

use super::{respond, ResponseFormat};
use crate::error::{AppError, AppResult};
use crate::services::InsightsService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExpiringContractsQuery {
    /// Overrides the configured expiry window
    pub days: Option<i64>,
    #[serde(default)]
    pub format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    #[serde(default)]
    pub basis: ReferenceBasis,
    #[serde(default)]
    pub format: ResponseFormat,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rate contracts ending within the expiry window
pub async fn get_expiring_contracts(
    State(state): State<AppState>,
    Query(query): Query<ExpiringContractsQuery>,
) -> AppResult<Response> {
    let window_days = match query.days {
        Some(days) => shared::validation::validate_window_days(days)
            .map_err(|msg| AppError::validation("days", msg))?,
        None => state.config.dashboard.contract_expiry_window_days,
    };

    let today = today();
    let service = InsightsService::new(state.db.clone());
    let contracts = service.expiring_contracts(today, window_days).await?;
    let view = shared::expiring_contract_view(&contracts, today, window_days);

    respond(query.format, &view, &view.table, "expiring_rate_contracts.csv")
}

/// Low-stock State Total items with an active contract and nothing pending
pub async fn get_low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Response> {
    let service = InsightsService::new(state.db.clone());
    let items = service
        .low_stock_without_pending_supply(query.basis, today())
        .await?;
    let view = shared::low_stock_view(&items);

    respond(query.format, &view, &view.table, "low_stock_no_pending_supply.csv")
}
