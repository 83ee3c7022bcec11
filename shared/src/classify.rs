//! Stock-sufficiency classification
//!
//! Every (stock position in months, stock quantity) pair falls into exactly
//! one [`Bucket`]. The same boundaries drive the dashboard tiles, the SQL
//! bucket filters in [`crate::query`] and the per-CMS distribution chart.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StockSample;

/// Upper bound (inclusive) of the "< 1 month" bucket
pub const ONE_MONTH: Decimal = Decimal::ONE;

/// Upper bound (inclusive) of the "1-3 months" bucket
pub const THREE_MONTHS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Stock sufficiency bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    ZeroStock,
    BelowOneMonth,
    OneToThreeMonths,
    AboveThreeMonths,
}

impl Bucket {
    /// Buckets in tile order (most stock first)
    pub const ALL: [Bucket; 4] = [
        Bucket::AboveThreeMonths,
        Bucket::OneToThreeMonths,
        Bucket::BelowOneMonth,
        Bucket::ZeroStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::ZeroStock => "zero_stock",
            Bucket::BelowOneMonth => "below_one_month",
            Bucket::OneToThreeMonths => "one_to_three_months",
            Bucket::AboveThreeMonths => "above_three_months",
        }
    }

    /// Tile label
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::ZeroStock => "Zero Stock",
            Bucket::BelowOneMonth => "< 1 Month",
            Bucket::OneToThreeMonths => "1-3 Months",
            Bucket::AboveThreeMonths => "> 3 months",
        }
    }

    /// Series name in the distribution chart
    pub fn chart_label(&self) -> &'static str {
        match self {
            Bucket::ZeroStock => "No Stock",
            Bucket::BelowOneMonth => "<1 month",
            Bucket::OneToThreeMonths => "1-3 months",
            Bucket::AboveThreeMonths => ">3 months",
        }
    }

    pub fn chart_color(&self) -> &'static str {
        match self {
            Bucket::ZeroStock => "red",
            Bucket::BelowOneMonth => "orange",
            Bucket::OneToThreeMonths => "lightgreen",
            Bucket::AboveThreeMonths => "skyblue",
        }
    }

    pub fn tile_color(&self) -> &'static str {
        match self {
            Bucket::ZeroStock => "#FF7F7F",
            Bucket::BelowOneMonth | Bucket::OneToThreeMonths => "#FFFACD",
            Bucket::AboveThreeMonths => "#90EE90",
        }
    }

    /// Whether a position/quantity pair belongs to this bucket
    pub fn contains(&self, position: Decimal, quantity: i64) -> bool {
        classify(position, quantity) == *self
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a stock position (months) and quantity into a bucket.
///
/// A zero position with stock on hand counts as low stock, not zero stock.
/// Non-positive positions and quantities are treated as zero.
pub fn classify(position: Decimal, quantity: i64) -> Bucket {
    if position <= Decimal::ZERO {
        if quantity > 0 {
            Bucket::BelowOneMonth
        } else {
            Bucket::ZeroStock
        }
    } else if position <= ONE_MONTH {
        Bucket::BelowOneMonth
    } else if position <= THREE_MONTHS {
        Bucket::OneToThreeMonths
    } else {
        Bucket::AboveThreeMonths
    }
}

/// Counts behind the dashboard metric tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    /// Distinct items in scope
    pub total: usize,
    pub above_three_months: usize,
    pub one_to_three_months: usize,
    pub below_one_month: usize,
    pub zero_stock: usize,
}

impl BucketCounts {
    pub fn tally<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a StockSample>,
    {
        let mut counts = BucketCounts::default();
        let mut items = HashSet::new();
        for sample in samples {
            items.insert(sample.item_code.as_str());
            counts.add(classify(sample.position, sample.quantity));
        }
        counts.total = items.len();
        counts
    }

    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::ZeroStock => self.zero_stock,
            Bucket::BelowOneMonth => self.below_one_month,
            Bucket::OneToThreeMonths => self.one_to_three_months,
            Bucket::AboveThreeMonths => self.above_three_months,
        }
    }

    fn add(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::ZeroStock => self.zero_stock += 1,
            Bucket::BelowOneMonth => self.below_one_month += 1,
            Bucket::OneToThreeMonths => self.one_to_three_months += 1,
            Bucket::AboveThreeMonths => self.above_three_months += 1,
        }
    }
}

/// Bucket counts for one warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseBuckets {
    pub warehouse_name: String,
    pub above_three_months: usize,
    pub one_to_three_months: usize,
    pub below_one_month: usize,
    pub zero_stock: usize,
}

impl WarehouseBuckets {
    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::ZeroStock => self.zero_stock,
            Bucket::BelowOneMonth => self.below_one_month,
            Bucket::OneToThreeMonths => self.one_to_three_months,
            Bucket::AboveThreeMonths => self.above_three_months,
        }
    }

    pub fn total(&self) -> usize {
        self.above_three_months + self.one_to_three_months + self.below_one_month + self.zero_stock
    }
}

/// Sort order for the per-CMS distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionSort {
    #[default]
    ZeroStock,
    AboveThreeMonths,
    WarehouseName,
}

impl DistributionSort {
    pub const ALL: [DistributionSort; 3] = [
        DistributionSort::ZeroStock,
        DistributionSort::AboveThreeMonths,
        DistributionSort::WarehouseName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionSort::ZeroStock => "zero_stock",
            DistributionSort::AboveThreeMonths => "above_three_months",
            DistributionSort::WarehouseName => "warehouse_name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DistributionSort::ZeroStock => "Zero Stock Items",
            DistributionSort::AboveThreeMonths => ">3 month Items",
            DistributionSort::WarehouseName => "CMS Name",
        }
    }
}

/// Count items per bucket for every warehouse, ascending by the sort key.
///
/// Ties keep warehouse-name order.
pub fn distribute<'a, I>(samples: I, sort: DistributionSort) -> Vec<WarehouseBuckets>
where
    I: IntoIterator<Item = &'a StockSample>,
{
    let mut by_warehouse: BTreeMap<&str, WarehouseBuckets> = BTreeMap::new();
    for sample in samples {
        let entry = by_warehouse
            .entry(sample.warehouse_name.as_str())
            .or_insert_with(|| WarehouseBuckets {
                warehouse_name: sample.warehouse_name.clone(),
                ..Default::default()
            });
        match classify(sample.position, sample.quantity) {
            Bucket::ZeroStock => entry.zero_stock += 1,
            Bucket::BelowOneMonth => entry.below_one_month += 1,
            Bucket::OneToThreeMonths => entry.one_to_three_months += 1,
            Bucket::AboveThreeMonths => entry.above_three_months += 1,
        }
    }

    let mut summary: Vec<WarehouseBuckets> = by_warehouse.into_values().collect();
    match sort {
        DistributionSort::ZeroStock => summary.sort_by_key(|w| w.zero_stock),
        DistributionSort::AboveThreeMonths => summary.sort_by_key(|w| w.above_three_months),
        DistributionSort::WarehouseName => {}
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample(warehouse: &str, item: &str, position: &str, quantity: i64) -> StockSample {
        StockSample {
            item_code: item.to_string(),
            warehouse_name: warehouse.to_string(),
            position: dec(position),
            quantity,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(dec("0"), 0), Bucket::ZeroStock);
        assert_eq!(classify(dec("0"), 5), Bucket::BelowOneMonth);
        assert_eq!(classify(dec("1"), 5), Bucket::BelowOneMonth);
        assert_eq!(classify(dec("1.01"), 5), Bucket::OneToThreeMonths);
        assert_eq!(classify(dec("3"), 5), Bucket::OneToThreeMonths);
        assert_eq!(classify(dec("3.01"), 5), Bucket::AboveThreeMonths);
    }

    #[test]
    fn test_classify_positive_position_without_stock() {
        // Position wins once it is positive, even if quantity is zero
        assert_eq!(classify(dec("0.5"), 0), Bucket::BelowOneMonth);
        assert_eq!(classify(dec("4"), 0), Bucket::AboveThreeMonths);
    }

    #[test]
    fn test_classify_scale_does_not_matter() {
        assert_eq!(classify(dec("1.00"), 5), Bucket::BelowOneMonth);
        assert_eq!(classify(dec("3.000"), 5), Bucket::OneToThreeMonths);
        assert_eq!(classify(dec("0.00"), 0), Bucket::ZeroStock);
    }

    #[test]
    fn test_bucket_contains_matches_classify() {
        assert!(Bucket::ZeroStock.contains(dec("0"), 0));
        assert!(!Bucket::ZeroStock.contains(dec("0"), 1));
        assert!(Bucket::AboveThreeMonths.contains(dec("12"), 40));
    }

    #[test]
    fn test_tally_counts_distinct_items() {
        let samples = vec![
            sample("State Total", "D001", "4.5", 900),
            sample("State Total", "D002", "2", 100),
            sample("State Total", "D003", "0", 10),
            sample("State Total", "D004", "0.4", 3),
            sample("State Total", "D005", "0", 0),
            sample("State Total", "D005", "0", 0),
        ];
        let counts = BucketCounts::tally(&samples);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.above_three_months, 1);
        assert_eq!(counts.one_to_three_months, 1);
        assert_eq!(counts.below_one_month, 2);
        assert_eq!(counts.zero_stock, 2);
        assert_eq!(counts.get(Bucket::BelowOneMonth), 2);
    }

    #[test]
    fn test_tally_empty() {
        let counts = BucketCounts::tally(&Vec::new());
        assert_eq!(counts, BucketCounts::default());
    }

    #[test]
    fn test_distribute_sorted_by_zero_stock() {
        let samples = vec![
            sample("CMS B", "D1", "0", 0),
            sample("CMS B", "D2", "0", 0),
            sample("CMS A", "D1", "5", 50),
            sample("CMS A", "D2", "0", 0),
            sample("CMS C", "D1", "2", 20),
        ];
        let summary = distribute(&samples, DistributionSort::ZeroStock);
        let names: Vec<&str> = summary.iter().map(|w| w.warehouse_name.as_str()).collect();
        assert_eq!(names, vec!["CMS C", "CMS A", "CMS B"]);
        assert_eq!(summary[2].zero_stock, 2);
        assert_eq!(summary[1].above_three_months, 1);
        assert_eq!(summary[1].total(), 2);
    }

    #[test]
    fn test_distribute_sorted_by_name() {
        let samples = vec![
            sample("CMS Warangal", "D1", "0", 0),
            sample("CMS Adilabad", "D1", "5", 50),
        ];
        let summary = distribute(&samples, DistributionSort::WarehouseName);
        assert_eq!(summary[0].warehouse_name, "CMS Adilabad");
        assert_eq!(summary[1].warehouse_name, "CMS Warangal");
    }

    #[test]
    fn test_distribute_sorted_by_above_three_months() {
        let samples = vec![
            sample("CMS A", "D1", "5", 50),
            sample("CMS A", "D2", "6", 50),
            sample("CMS B", "D1", "5", 50),
        ];
        let summary = distribute(&samples, DistributionSort::AboveThreeMonths);
        assert_eq!(summary[0].warehouse_name, "CMS B");
        assert_eq!(summary[1].get(Bucket::AboveThreeMonths), 2);
    }
}
