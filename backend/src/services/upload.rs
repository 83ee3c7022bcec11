//! Upload service: wholesale replacement of an upload table

use chrono::NaiveDate;
use shared::query;
use shared::UploadBatch;
use sqlx::PgPool;

use crate::db;
use crate::error::AppResult;

/// Upload service
#[derive(Clone)]
pub struct UploadService {
    db: PgPool,
}

impl UploadService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Delete every row of the batch's table and insert the batch, atomically.
    ///
    /// Returns the number of rows inserted. On error the transaction is
    /// dropped and the previous contents stay in place.
    pub async fn replace(&self, batch: &UploadBatch, entry_date: NaiveDate) -> AppResult<u64> {
        let kind = batch.kind();
        let delete = query::delete_all(kind);
        let insert = query::bulk_insert(batch, entry_date);

        // Start transaction
        let mut tx = self.db.begin().await?;

        let deleted = db::query(&delete).execute(&mut *tx).await?.rows_affected();
        let inserted = db::query(&insert).execute(&mut *tx).await?.rows_affected();

        tx.commit().await?;

        tracing::info!(
            table = kind.table_name(),
            deleted,
            inserted,
            "Replaced upload table"
        );
        Ok(inserted)
    }
}
