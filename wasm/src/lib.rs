//! WebAssembly module for the Drug Stock Dashboard
//!
//! Provides client-side computation for:
//! - Stock-sufficiency classification
//! - Months-of-stock derivation
//! - Display formatting (digit grouping, dates, percentages)
//! - Upload checks before a file is sent

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("drug stock dashboard wasm loaded"));
}

/// NaN reads as zero; magnitudes beyond `Decimal` saturate
fn decimal(value: f64) -> Decimal {
    if value.is_nan() {
        return Decimal::ZERO;
    }
    Decimal::try_from(value).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

fn whole(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// Bucket label for a stock position (months) and quantity
#[wasm_bindgen]
pub fn classify_stock(position: f64, quantity: f64) -> String {
    shared::classify(decimal(position), whole(quantity))
        .label()
        .to_string()
}

/// Bucket tile labels, most stock first
#[wasm_bindgen]
pub fn bucket_labels() -> js_sys::Array {
    shared::Bucket::ALL
        .iter()
        .map(|bucket| JsValue::from_str(bucket.label()))
        .collect()
}

/// Months of stock at the annual reference rate
#[wasm_bindgen]
pub fn stock_position_months(stock_quantity: f64, reference_qty: Option<f64>) -> f64 {
    let position = shared::stock_position(whole(stock_quantity), reference_qty.map(whole));
    position.to_string().parse().unwrap_or(0.0)
}

/// Whole number with South-Asian digit grouping
#[wasm_bindgen]
pub fn format_indian_number(value: f64) -> String {
    shared::format_grouped(&value)
}

/// Date text as dd-Mon-yyyy, or "" when unparseable
#[wasm_bindgen]
pub fn format_display_date(text: &str) -> String {
    shared::format_date(text)
}

#[wasm_bindgen]
pub fn format_supply_percent(percent: Option<f64>) -> String {
    shared::format_percent(percent.map(decimal))
}

/// Row style for a purchase order's supply percentage
#[wasm_bindgen]
pub fn supply_row_style(percent: Option<f64>) -> Option<String> {
    shared::SupplyEmphasis::for_percent(percent.map(decimal))
        .css()
        .map(str::to_string)
}

/// Cell style for an item's pending supply
#[wasm_bindgen]
pub fn pending_supply_style(pending: f64) -> Option<String> {
    shared::PendingEmphasis::for_pending(whole(pending))
        .css()
        .map(str::to_string)
}

/// Parse a CSV upload in the browser and return its preview table as JSON
#[wasm_bindgen]
pub fn preview_upload(kind: &str, data: &[u8], rows: usize) -> Result<String, JsValue> {
    let kind: shared::UploadKind = serde_json::from_value(serde_json::Value::from(kind))
        .map_err(|_| JsValue::from_str(&format!("Unknown upload kind: {}", kind)))?;
    let batch = shared::parse_upload(kind, data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&batch.preview(rows))
        .map_err(|e| JsValue::from_str(&format!("Could not encode preview: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stock() {
        assert_eq!(classify_stock(0.0, 0.0), "Zero Stock");
        assert_eq!(classify_stock(0.0, 3.0), "< 1 Month");
        assert_eq!(classify_stock(2.0, 3.0), "1-3 Months");
        assert_eq!(classify_stock(4.5, 3.0), "> 3 months");
        assert_eq!(classify_stock(f64::NAN, 0.0), "Zero Stock");
    }

    #[test]
    fn test_classify_stock_saturates_out_of_range_positions() {
        assert_eq!(classify_stock(1e30, 5.0), "> 3 months");
        assert_eq!(classify_stock(f64::INFINITY, 5.0), "> 3 months");
        assert_eq!(classify_stock(-1e30, 5.0), "< 1 Month");
        assert_eq!(classify_stock(f64::NEG_INFINITY, 0.0), "Zero Stock");
        assert_eq!(decimal(1e30), Decimal::MAX);
        assert_eq!(decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_stock_position_months() {
        assert!((stock_position_months(100.0, Some(1200.0)) - 1.0).abs() < 0.001);
        assert!((stock_position_months(5.0, None) - 3.0).abs() < 0.001);
        assert_eq!(stock_position_months(0.0, None), 0.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_indian_number(1234567.0), "12,34,567");
        assert_eq!(format_display_date("2025-07-23"), "23-Jul-2025");
        assert_eq!(format_supply_percent(Some(87.5)), "88%");
        assert_eq!(format_supply_percent(None), "0%");
    }

    #[test]
    fn test_styles() {
        assert_eq!(supply_row_style(Some(120.0)).as_deref(), Some("color: green"));
        assert_eq!(supply_row_style(Some(95.0)), None);
        assert!(pending_supply_style(11.0).unwrap().contains("tomato"));
        assert_eq!(pending_supply_style(0.0), None);
    }

    #[test]
    fn test_preview_upload() {
        let json = preview_upload(
            "stock",
            b"Item Code,Warehouse Name,Stock Quantity\nD1,CMS A,10\nD2,CMS A,20\n",
            1,
        )
        .unwrap();
        let table: shared::DisplayTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].cells, vec!["D1", "CMS A", "10"]);
    }
}
