//! CSV upload handlers
//!
//! Every upload kind replaces its table wholesale. Previews parse and
//! validate without touching the database.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use shared::{DisplayTable, UploadKind};

use crate::error::{AppError, AppResult};
use crate::services::UploadService;
use crate::AppState;

#[derive(Serialize)]
pub struct UploadPreviewResponse {
    pub kind: UploadKind,
    pub file_name: String,
    pub row_count: usize,
    pub preview: DisplayTable,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub kind: UploadKind,
    pub file_name: String,
    pub rows_inserted: u64,
    /// Stored stock positions no longer reflect the reference tables
    pub stock_positions_stale: bool,
    pub message: String,
}

struct UploadedFile {
    name: String,
    data: Vec<u8>,
}

/// Pull the `file` part out of the multipart body
async fn read_file(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("file", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        shared::validation::validate_upload_file_name(&name)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation("file", e.body_text()))?;
        return Ok(UploadedFile {
            name,
            data: data.to_vec(),
        });
    }
    Err(AppError::validation("file", "No file was uploaded"))
}

/// Parse an upload and show its first rows
pub async fn preview_upload(
    State(state): State<AppState>,
    Path(kind): Path<UploadKind>,
    multipart: Multipart,
) -> AppResult<Json<UploadPreviewResponse>> {
    let file = read_file(multipart).await?;
    let batch = shared::parse_upload(kind, &file.data)?;

    Ok(Json(UploadPreviewResponse {
        kind,
        file_name: file.name,
        row_count: batch.len(),
        preview: batch.preview(state.config.dashboard.preview_rows),
    }))
}

/// Replace a table with the uploaded file
pub async fn upload(
    State(state): State<AppState>,
    Path(kind): Path<UploadKind>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let file = read_file(multipart).await?;
    let batch = shared::parse_upload(kind, &file.data)?;

    let service = UploadService::new(state.db.clone());
    let rows_inserted = service
        .replace(&batch, chrono::Local::now().date_naive())
        .await?;

    let stale = kind.affects_stock_positions();
    let mut message = format!("{} uploaded and inserted into {}", file.name, kind.table_name());
    if stale {
        message.push_str(". Recalculate stock positions to refresh the dashboard");
    }

    Ok(Json(UploadResponse {
        kind,
        file_name: file.name,
        rows_inserted,
        stock_positions_stale: stale,
        message,
    }))
}
