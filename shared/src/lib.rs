//! Shared types and logic for the Drug Stock Dashboard
//!
//! This crate contains everything that does not need a database connection:
//! filter options, the stock-sufficiency classifier, stock-position
//! derivation, SQL query construction, display formatting and upload parsing.
//! It is used by the backend server and compiled to WASM for the browser.

pub mod classify;
pub mod format;
pub mod models;
pub mod query;
pub mod stock_position;
pub mod table;
pub mod types;
pub mod upload;
pub mod validation;
pub mod views;

pub use classify::*;
pub use format::*;
pub use models::*;
pub use stock_position::*;
pub use table::*;
pub use types::*;
pub use upload::*;
pub use views::*;
