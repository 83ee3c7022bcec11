//! Route definitions for the Drug Stock Dashboard

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Sidebar selector options
        .route("/filters", get(handlers::get_filters))
        .nest("/dashboard", dashboard_routes())
        .route("/distribution", get(handlers::get_distribution))
        .nest("/insights", insight_routes())
        .nest("/uploads", upload_routes())
        .route(
            "/stock-positions/recalculate",
            post(handlers::recalculate_stock_positions),
        )
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .route("/stock", get(handlers::get_stock_listing))
        .route(
            "/items/:item_code/purchase-orders",
            get(handlers::get_purchase_orders),
        )
}

fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/expiring-contracts", get(handlers::get_expiring_contracts))
        .route("/low-stock", get(handlers::get_low_stock))
}

fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/:kind", post(handlers::upload))
        .route("/:kind/preview", post(handlers::preview_upload))
}
