//! HTTP handlers for the Drug Stock Dashboard

mod dashboard;
mod distribution;
mod filters;
mod health;
mod insights;
mod stock_positions;
mod uploads;

pub use dashboard::*;
pub use distribution::*;
pub use filters::*;
pub use health::*;
pub use insights::*;
pub use stock_positions::*;
pub use uploads::*;

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::DisplayTable;

use crate::error::AppResult;

/// Response body format selected by `?format=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

/// Render a table as a CSV download
pub(crate) fn csv_download(table: &DisplayTable, file_name: &str) -> AppResult<Response> {
    let csv = table.to_csv()?;
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// JSON body, or the given table as CSV when requested
pub(crate) fn respond<T: Serialize>(
    format: ResponseFormat,
    body: T,
    table: &DisplayTable,
    file_name: &str,
) -> AppResult<Response> {
    match format {
        ResponseFormat::Csv => csv_download(table, file_name),
        ResponseFormat::Json => Ok(Json(body).into_response()),
    }
}
