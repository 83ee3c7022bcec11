//! Batch recomputation of stored stock positions

use serde::Serialize;
use shared::query;
use shared::{PositionInputs, RecomputedPosition};
use sqlx::PgPool;

use crate::db;
use crate::error::AppResult;
use crate::models::PositionInputRow;

/// Outcome of a recomputation run
#[derive(Debug, Serialize)]
pub struct RecalculationSummary {
    pub rows_read: usize,
    pub rows_updated: u64,
    /// Rows whose item has no cons/dem type, left without a con/dem position
    pub rows_without_type: usize,
}

/// Stock position service
#[derive(Clone)]
pub struct StockPositionService {
    db: PgPool,
}

impl StockPositionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Recompute both positions of every `stock_data` row in one transaction
    pub async fn recalculate(&self) -> AppResult<RecalculationSummary> {
        let read = query::stock_position_inputs();

        // Start transaction
        let mut tx = self.db.begin().await?;

        let inputs: Vec<PositionInputs> = db::query_as::<PositionInputRow>(&read)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(PositionInputs::from)
            .collect();

        let updates: Vec<(PositionInputs, RecomputedPosition)> = inputs
            .into_iter()
            .map(|row| {
                let recomputed = row.recompute();
                (row, recomputed)
            })
            .collect();
        let rows_without_type = updates
            .iter()
            .filter(|(_, pos)| pos.stock_pos_con_dem.is_none())
            .count();

        let write = query::update_stock_positions(&updates);
        let rows_updated = db::query(&write).execute(&mut *tx).await?.rows_affected();

        tx.commit().await?;

        tracing::info!(
            rows_read = updates.len(),
            rows_updated,
            rows_without_type,
            "Recalculated stock positions"
        );
        Ok(RecalculationSummary {
            rows_read: updates.len(),
            rows_updated,
            rows_without_type,
        })
    }
}
