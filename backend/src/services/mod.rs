//! Business logic services for the Drug Stock Dashboard

pub mod dashboard;
pub mod distribution;
pub mod insights;
pub mod stock_position;
pub mod upload;

pub use dashboard::DashboardService;
pub use distribution::DistributionService;
pub use insights::InsightsService;
pub use stock_position::{RecalculationSummary, StockPositionService};
pub use upload::UploadService;
