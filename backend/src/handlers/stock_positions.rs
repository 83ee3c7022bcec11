//! Stock position recalculation handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::{RecalculationSummary, StockPositionService};
use crate::AppState;

/// Recompute stored stock positions from the current reference tables
pub async fn recalculate_stock_positions(
    State(state): State<AppState>,
) -> AppResult<Json<RecalculationSummary>> {
    let service = StockPositionService::new(state.db.clone());
    let summary = service.recalculate().await?;
    Ok(Json(summary))
}
