//! Per-CMS stock distribution

use shared::query;
use shared::{DistributionSort, DrugCategory, ReferenceBasis, StockSample, WarehouseBuckets};
use sqlx::PgPool;

use crate::db;
use crate::error::AppResult;
use crate::models::StockSampleRow;

/// Distribution service
#[derive(Clone)]
pub struct DistributionService {
    db: PgPool,
}

impl DistributionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Bucket counts for every real warehouse, sorted ascending by `sort`
    pub async fn distribution(
        &self,
        basis: ReferenceBasis,
        category: DrugCategory,
        sort: DistributionSort,
    ) -> AppResult<Vec<WarehouseBuckets>> {
        let built = query::warehouse_distribution(basis, category);
        let samples: Vec<StockSample> = db::query_as::<StockSampleRow>(&built)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StockSample::from)
            .collect();

        let summary = shared::distribute(&samples, sort);
        tracing::debug!(
            rows = samples.len(),
            warehouses = summary.len(),
            "Computed stock distribution"
        );
        Ok(summary)
    }
}
