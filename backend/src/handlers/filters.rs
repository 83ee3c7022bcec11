//! Selector options for the dashboard sidebar

use axum::{extract::State, Json};
use serde::Serialize;
use shared::{DistributionSort, DrugCategory, ReferenceBasis, SelectedMetric};

use crate::error::AppResult;
use crate::services::DashboardService;
use crate::AppState;

#[derive(Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Serialize)]
pub struct TileOption {
    pub metric: SelectedMetric,
    pub label: String,
    pub color: String,
}

#[derive(Serialize)]
pub struct FilterOptions {
    pub categories: Vec<SelectOption>,
    pub reference_bases: Vec<SelectOption>,
    pub warehouses: Vec<String>,
    pub metric_tiles: Vec<TileOption>,
    pub distribution_sorts: Vec<SelectOption>,
}

/// Everything the sidebar selectors and tiles need
pub async fn get_filters(State(state): State<AppState>) -> AppResult<Json<FilterOptions>> {
    let service = DashboardService::new(state.db.clone());
    let warehouses = service.warehouse_options().await?;

    Ok(Json(FilterOptions {
        categories: DrugCategory::ALL
            .iter()
            .map(|c| SelectOption {
                value: c.as_str().to_string(),
                label: c.display_name().to_string(),
            })
            .collect(),
        reference_bases: ReferenceBasis::ALL
            .iter()
            .map(|b| SelectOption {
                value: b.as_str().to_string(),
                label: b.display_name().to_string(),
            })
            .collect(),
        warehouses,
        metric_tiles: SelectedMetric::TILES
            .iter()
            .map(|&metric| TileOption {
                metric,
                label: metric.tile_label().to_string(),
                color: metric.tile_color().to_string(),
            })
            .collect(),
        distribution_sorts: DistributionSort::ALL
            .iter()
            .map(|s| SelectOption {
                value: s.as_str().to_string(),
                label: s.display_name().to_string(),
            })
            .collect(),
    }))
}
