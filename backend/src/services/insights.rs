//! Insights: expiring rate contracts and low stock with nothing on order

use chrono::{Duration, NaiveDate};
use shared::query;
use shared::{ExpiringContract, LowStockItem, ReferenceBasis};
use sqlx::PgPool;

use crate::db;
use crate::error::AppResult;
use crate::models::{ExpiringContractRow, LowStockRow};

/// Insights service
#[derive(Clone)]
pub struct InsightsService {
    db: PgPool,
}

impl InsightsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Contracts ending within `window_days` of `today`, including ones already ended
    pub async fn expiring_contracts(
        &self,
        today: NaiveDate,
        window_days: i64,
    ) -> AppResult<Vec<ExpiringContract>> {
        let built = query::expiring_contracts(today + Duration::days(window_days));
        let contracts = db::query_as::<ExpiringContractRow>(&built)
            .fetch_all(&self.db)
            .await?;

        Ok(contracts.into_iter().map(ExpiringContract::from).collect())
    }

    /// State Total items under one month of stock with an active contract and no pending supply
    pub async fn low_stock_without_pending_supply(
        &self,
        basis: ReferenceBasis,
        today: NaiveDate,
    ) -> AppResult<Vec<LowStockItem>> {
        let built = query::low_stock_without_pending_supply(basis, today);
        let items = db::query_as::<LowStockRow>(&built)
            .fetch_all(&self.db)
            .await?;

        Ok(items.into_iter().map(LowStockItem::from).collect())
    }
}
