//! Filter options and request-scoped selections used across the dashboard

use serde::{Deserialize, Serialize};

use crate::classify::Bucket;

/// Warehouse name of the synthetic row that aggregates every CMS for an item
pub const STATE_TOTAL: &str = "State Total";

/// Drug category selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugCategory {
    #[default]
    All,
    Priority,
}

impl DrugCategory {
    pub const ALL: [DrugCategory; 2] = [DrugCategory::All, DrugCategory::Priority];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrugCategory::All => "all",
            DrugCategory::Priority => "priority",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DrugCategory::All => "All Drugs",
            DrugCategory::Priority => "Priority Drugs",
        }
    }
}

/// Reference quantity the stock position is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceBasis {
    /// Consumption or demand, depending on the item's type
    #[default]
    ConsumptionDemand,
    OnlyConsumption,
}

impl ReferenceBasis {
    pub const ALL: [ReferenceBasis; 2] = [
        ReferenceBasis::ConsumptionDemand,
        ReferenceBasis::OnlyConsumption,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceBasis::ConsumptionDemand => "consumption_demand",
            ReferenceBasis::OnlyConsumption => "only_consumption",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceBasis::ConsumptionDemand => "Consumption/Demand",
            ReferenceBasis::OnlyConsumption => "Only Consumption",
        }
    }

    /// Column of `stock_data` holding the position for this basis
    pub fn stock_position_column(&self) -> &'static str {
        match self {
            ReferenceBasis::ConsumptionDemand => "stock_pos_con_dem",
            ReferenceBasis::OnlyConsumption => "stock_pos_cons",
        }
    }
}

/// Warehouse (CMS) selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WarehouseSelector {
    #[default]
    StateTotal,
    Named(String),
}

impl WarehouseSelector {
    /// Build from a request parameter; blank or "State Total" selects the aggregate
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => WarehouseSelector::StateTotal,
            Some(name) if name.eq_ignore_ascii_case(STATE_TOTAL) => WarehouseSelector::StateTotal,
            Some(name) => WarehouseSelector::Named(name.to_string()),
        }
    }

    /// Warehouse name matched against `stock_data.warehouse_name`
    pub fn warehouse_name(&self) -> &str {
        match self {
            WarehouseSelector::StateTotal => STATE_TOTAL,
            WarehouseSelector::Named(name) => name,
        }
    }
}

/// The sidebar selections that scope every stock query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockFilter {
    pub category: DrugCategory,
    pub basis: ReferenceBasis,
    pub warehouse: WarehouseSelector,
}

/// Metric tile currently selected on the dashboard.
///
/// `None` shows every record. Selecting a tile always replaces the previous
/// selection; buckets are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectedMetric {
    #[default]
    None,
    ZeroStock,
    BelowOneMonth,
    OneToThreeMonths,
    AboveThreeMonths,
}

impl SelectedMetric {
    /// Tiles in the order they are laid out on the dashboard
    pub const TILES: [SelectedMetric; 5] = [
        SelectedMetric::None,
        SelectedMetric::AboveThreeMonths,
        SelectedMetric::OneToThreeMonths,
        SelectedMetric::BelowOneMonth,
        SelectedMetric::ZeroStock,
    ];

    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            SelectedMetric::None => None,
            SelectedMetric::ZeroStock => Some(Bucket::ZeroStock),
            SelectedMetric::BelowOneMonth => Some(Bucket::BelowOneMonth),
            SelectedMetric::OneToThreeMonths => Some(Bucket::OneToThreeMonths),
            SelectedMetric::AboveThreeMonths => Some(Bucket::AboveThreeMonths),
        }
    }

    /// Transition triggered by clicking a tile
    pub fn select(self, tile: SelectedMetric) -> SelectedMetric {
        tile
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectedMetric::None => "none",
            SelectedMetric::ZeroStock => "zero_stock",
            SelectedMetric::BelowOneMonth => "below_one_month",
            SelectedMetric::OneToThreeMonths => "one_to_three_months",
            SelectedMetric::AboveThreeMonths => "above_three_months",
        }
    }

    pub fn tile_label(&self) -> &'static str {
        match self.bucket() {
            Some(bucket) => bucket.label(),
            None => "Total Drugs",
        }
    }

    pub fn tile_color(&self) -> &'static str {
        match self.bucket() {
            Some(bucket) => bucket.tile_color(),
            None => "#E5E4E2",
        }
    }

    /// Heading shown above the stock table
    pub fn heading(&self) -> &'static str {
        match self {
            SelectedMetric::None => "Showing all drugs",
            SelectedMetric::AboveThreeMonths => "Showing drugs with stock > 3 months",
            SelectedMetric::OneToThreeMonths => "Showing drugs with stock between 1 and 3 months",
            SelectedMetric::BelowOneMonth => "Showing drugs with stock < 1 month",
            SelectedMetric::ZeroStock => "Showing drugs with zero stock position",
        }
    }
}

impl From<Bucket> for SelectedMetric {
    fn from(bucket: Bucket) -> Self {
        match bucket {
            Bucket::ZeroStock => SelectedMetric::ZeroStock,
            Bucket::BelowOneMonth => SelectedMetric::BelowOneMonth,
            Bucket::OneToThreeMonths => SelectedMetric::OneToThreeMonths,
            Bucket::AboveThreeMonths => SelectedMetric::AboveThreeMonths,
        }
    }
}

/// Warehouse selector entries: "State Total" first, then each CMS once
pub fn warehouse_selector_options<I>(warehouse_names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = vec![STATE_TOTAL.to_string()];
    for name in warehouse_names {
        let name = name.trim();
        if name.is_empty() || options.iter().any(|existing| existing == name) {
            continue;
        }
        options.push(name.to_string());
    }
    options
}
