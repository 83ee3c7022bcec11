//! Domain models for the Drug Stock Dashboard

mod contract;
mod purchase;
mod reference;
mod stock;

pub use contract::*;
pub use purchase::*;
pub use reference::*;
pub use stock::*;
