//! Parsing of uploaded CSV files into typed batches
//!
//! Headers and cells are trimmed. Blank numeric cells read as 0, blank dates
//! as NULL. Every row is checked before anything is handed to the database,
//! so a bad file never causes a partial replace.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::parse_date_text;
use crate::models::{PurchaseOrder, RateContract, ReferenceKind, ReferenceRecord, StockRecord};
use crate::table::DisplayTable;
use crate::validation::validate_record;

/// Table an upload replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    Stock,
    PurchaseOrders,
    RateContracts,
    ConsumptionReference,
    DemandReference,
}

impl UploadKind {
    pub const ALL: [UploadKind; 5] = [
        UploadKind::Stock,
        UploadKind::PurchaseOrders,
        UploadKind::RateContracts,
        UploadKind::ConsumptionReference,
        UploadKind::DemandReference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Stock => "stock",
            UploadKind::PurchaseOrders => "purchase-orders",
            UploadKind::RateContracts => "rate-contracts",
            UploadKind::ConsumptionReference => "consumption-reference",
            UploadKind::DemandReference => "demand-reference",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UploadKind::Stock => "Stock Data",
            UploadKind::PurchaseOrders => "Purchase Order Data",
            UploadKind::RateContracts => "Rate Contract Data",
            UploadKind::ConsumptionReference => "Consumption Reference Data",
            UploadKind::DemandReference => "Demand Reference Data",
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            UploadKind::Stock => "stock_data",
            UploadKind::PurchaseOrders => "purchase_order_data",
            UploadKind::RateContracts => "rate_contract_data",
            UploadKind::ConsumptionReference => ReferenceKind::Consumption.table_name(),
            UploadKind::DemandReference => ReferenceKind::Demand.table_name(),
        }
    }

    /// Header names the file must carry
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Stock => &[col::ITEM_CODE, col::WAREHOUSE_NAME, col::STOCK_QUANTITY],
            UploadKind::PurchaseOrders => &[
                col::PO_NO,
                col::PO_DATE,
                col::ITEM_CODE,
                col::SUPPLIER_UPPER,
                col::RATE_UPPER,
                col::RATE_UNIT,
                col::PO_QTY,
                col::PO_VALUE,
                col::RECEIVED_QTY,
                col::RECEIVED_VALUE,
                col::SUPPLY_STATUS,
                col::TENDER_NO,
                col::SCHEDULED_DELIVERY_DATE,
                col::EXTENDED_DELIVERY_PERIOD,
            ],
            UploadKind::RateContracts => &[
                col::ITEM_CODE,
                col::SUPPLIER,
                col::RATE,
                col::RATE_UNIT,
                col::TENDER_DATE,
                col::CONTRACT_FROM_DATE,
                col::CONTRACT_TO_DATE,
                col::RATE_CONTRACT_LEVEL,
            ],
            UploadKind::ConsumptionReference => {
                &[col::ITEM_CODE, col::WAREHOUSE_NAME, col::CONSUMPTION_QTY]
            }
            UploadKind::DemandReference => &[col::ITEM_CODE, col::WAREHOUSE_NAME, col::DEMAND_QTY],
        }
    }

    /// Whether replacing this table leaves stored stock positions stale
    pub fn affects_stock_positions(&self) -> bool {
        matches!(
            self,
            UploadKind::Stock | UploadKind::ConsumptionReference | UploadKind::DemandReference
        )
    }
}

impl std::fmt::Display for UploadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload file headers
mod col {
    pub const ITEM_CODE: &str = "Item Code";
    pub const WAREHOUSE_NAME: &str = "Warehouse Name";
    pub const STOCK_QUANTITY: &str = "Stock Quantity";
    pub const PO_NO: &str = "PO NO";
    pub const PO_DATE: &str = "PO DATE";
    pub const SUPPLIER_UPPER: &str = "SUPPLIER";
    pub const RATE_UPPER: &str = "RATE";
    pub const RATE_UNIT: &str = "RATE UNIT";
    pub const PO_QTY: &str = "PO QTY";
    pub const PO_VALUE: &str = "PO VALUE (Rs.)";
    pub const RECEIVED_QTY: &str = "RECEIVED QTY";
    pub const RECEIVED_VALUE: &str = "RECEIVED VALUE (Rs.)";
    pub const SUPPLY_STATUS: &str = "SUPPLY STATUS (%)";
    pub const TENDER_NO: &str = "Tender No.";
    pub const SCHEDULED_DELIVERY_DATE: &str = "Scheduled Delivery Date";
    pub const EXTENDED_DELIVERY_PERIOD: &str = "Extended Delivery Period (in Days)";
    pub const SUPPLIER: &str = "Supplier";
    pub const RATE: &str = "Rate";
    pub const TENDER_DATE: &str = "Tender Date";
    pub const CONTRACT_FROM_DATE: &str = "Contract From Date";
    pub const CONTRACT_TO_DATE: &str = "Contract To Date";
    pub const RATE_CONTRACT_LEVEL: &str = "Rate Contract Level";
    pub const CONSUMPTION_QTY: &str = "Consumption Qty";
    pub const DEMAND_QTY: &str = "Demand Qty";
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Only .csv files are accepted")]
    UnsupportedFileType(String),

    #[error("The uploaded file has no data rows")]
    Empty,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("Could not read CSV: {0}")]
    Csv(String),
}

impl UploadError {
    /// Column the error refers to, if any
    pub fn field(&self) -> Option<String> {
        match self {
            UploadError::MissingColumns(columns) => Some(columns.join(", ")),
            UploadError::InvalidValue { column, .. } => Some(column.clone()),
            _ => None,
        }
    }
}

impl From<csv::Error> for UploadError {
    fn from(err: csv::Error) -> Self {
        UploadError::Csv(err.to_string())
    }
}

/// Parsed rows of one upload, ready to replace their table
#[derive(Debug, Clone, PartialEq)]
pub enum UploadBatch {
    Stock(Vec<StockRecord>),
    PurchaseOrders(Vec<PurchaseOrder>),
    RateContracts(Vec<RateContract>),
    ConsumptionReference(Vec<ReferenceRecord>),
    DemandReference(Vec<ReferenceRecord>),
}

impl UploadBatch {
    pub fn kind(&self) -> UploadKind {
        match self {
            UploadBatch::Stock(_) => UploadKind::Stock,
            UploadBatch::PurchaseOrders(_) => UploadKind::PurchaseOrders,
            UploadBatch::RateContracts(_) => UploadKind::RateContracts,
            UploadBatch::ConsumptionReference(_) => UploadKind::ConsumptionReference,
            UploadBatch::DemandReference(_) => UploadKind::DemandReference,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            UploadBatch::Stock(rows) => rows.len(),
            UploadBatch::PurchaseOrders(rows) => rows.len(),
            UploadBatch::RateContracts(rows) => rows.len(),
            UploadBatch::ConsumptionReference(rows) | UploadBatch::DemandReference(rows) => {
                rows.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First `n` parsed rows under the upload's own headers
    pub fn preview(&self, n: usize) -> DisplayTable {
        let mut table = DisplayTable::new(self.kind().required_columns().iter().copied());
        let rows: Vec<Vec<String>> = match self {
            UploadBatch::Stock(rows) => rows
                .iter()
                .take(n)
                .map(|r| {
                    vec![
                        r.item_code.clone(),
                        r.warehouse_name.clone(),
                        r.stock_quantity.to_string(),
                    ]
                })
                .collect(),
            UploadBatch::PurchaseOrders(rows) => rows
                .iter()
                .take(n)
                .map(|r| {
                    vec![
                        r.po_number.clone(),
                        date_cell(r.po_date),
                        r.item_code.clone(),
                        r.supplier.clone().unwrap_or_default(),
                        r.rate.to_string(),
                        r.rate_unit.clone().unwrap_or_default(),
                        r.po_qty.to_string(),
                        r.po_value.to_string(),
                        r.received_qty.to_string(),
                        r.received_value.to_string(),
                        r.supply_status.to_string(),
                        r.tender_number.clone().unwrap_or_default(),
                        date_cell(r.scheduled_delivery_date),
                        r.extended_delivery_period_days.to_string(),
                    ]
                })
                .collect(),
            UploadBatch::RateContracts(rows) => rows
                .iter()
                .take(n)
                .map(|r| {
                    vec![
                        r.item_code.clone(),
                        r.supplier.clone().unwrap_or_default(),
                        r.rate.to_string(),
                        r.rate_unit.clone().unwrap_or_default(),
                        date_cell(r.tender_date),
                        date_cell(r.contract_from_date),
                        date_cell(r.contract_to_date),
                        r.rate_contract_level.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
            UploadBatch::ConsumptionReference(rows) | UploadBatch::DemandReference(rows) => rows
                .iter()
                .take(n)
                .map(|r| {
                    vec![
                        r.item_code.clone(),
                        r.warehouse_name.clone(),
                        r.reference_qty.to_string(),
                    ]
                })
                .collect(),
        };
        for cells in rows {
            table.push_row(cells, None);
        }
        table
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// One data row with header lookup
struct CsvRow<'a> {
    record: &'a csv::StringRecord,
    headers: &'a HashMap<String, usize>,
    /// 1-based line number in the file, header included
    number: usize,
}

impl<'a> CsvRow<'a> {
    fn raw(&self, column: &str) -> &'a str {
        self.headers
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    /// Trimmed text; blank and `nan` cells are absent
    fn text(&self, column: &str) -> Option<String> {
        let value = self.raw(column).trim();
        if value.is_empty() || value.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn required_text(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }

    fn invalid(&self, column: &str) -> UploadError {
        UploadError::InvalidValue {
            row: self.number,
            column: column.to_string(),
            value: self.raw(column).trim().to_string(),
        }
    }

    fn decimal(&self, column: &str) -> Result<Decimal, UploadError> {
        let Some(value) = self.text(column) else {
            return Ok(Decimal::ZERO);
        };
        let cleaned = value.replace(',', "");
        let cleaned = cleaned.trim_end_matches('%').trim();
        Decimal::from_str(cleaned)
            .or_else(|_| Decimal::from_scientific(cleaned))
            .map_err(|_| self.invalid(column))
    }

    /// Whole number; fractional input is truncated
    fn integer(&self, column: &str) -> Result<i64, UploadError> {
        self.decimal(column)?
            .trunc()
            .to_i64()
            .ok_or_else(|| self.invalid(column))
    }

    fn date(&self, column: &str) -> Result<Option<NaiveDate>, UploadError> {
        match self.text(column) {
            None => Ok(None),
            Some(value) => parse_date_text(&value)
                .map(Some)
                .ok_or_else(|| self.invalid(column)),
        }
    }
}

/// Parse an uploaded CSV file for the given kind
pub fn parse_upload(kind: UploadKind, data: &[u8]) -> Result<UploadBatch, UploadError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    let missing: Vec<String> = kind
        .required_columns()
        .iter()
        .filter(|column| !headers.contains_key(**column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(UploadError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }
    if records.is_empty() {
        return Err(UploadError::Empty);
    }

    let rows = records.iter().enumerate().map(|(i, record)| CsvRow {
        record,
        headers: &headers,
        number: record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2),
    });

    let batch = match kind {
        UploadKind::Stock => UploadBatch::Stock(collect_rows(rows, parse_stock)?),
        UploadKind::PurchaseOrders => {
            UploadBatch::PurchaseOrders(collect_rows(rows, parse_purchase_order)?)
        }
        UploadKind::RateContracts => {
            UploadBatch::RateContracts(collect_rows(rows, parse_rate_contract)?)
        }
        UploadKind::ConsumptionReference => UploadBatch::ConsumptionReference(collect_rows(
            rows,
            |row| parse_reference(row, col::CONSUMPTION_QTY),
        )?),
        UploadKind::DemandReference => UploadBatch::DemandReference(collect_rows(rows, |row| {
            parse_reference(row, col::DEMAND_QTY)
        })?),
    };
    Ok(batch)
}

fn collect_rows<'a, T, I, F>(rows: I, parse: F) -> Result<Vec<T>, UploadError>
where
    T: validator::Validate,
    I: Iterator<Item = CsvRow<'a>>,
    F: Fn(&CsvRow<'a>) -> Result<T, UploadError>,
{
    rows.map(|row| {
        let parsed = parse(&row)?;
        validate_record(row.number, &parsed)?;
        Ok(parsed)
    })
    .collect()
}

fn parse_stock(row: &CsvRow<'_>) -> Result<StockRecord, UploadError> {
    Ok(StockRecord {
        item_code: row.required_text(col::ITEM_CODE),
        warehouse_name: row.required_text(col::WAREHOUSE_NAME),
        stock_quantity: row.integer(col::STOCK_QUANTITY)?,
        stock_pos_cons: None,
        stock_pos_con_dem: None,
    })
}

fn parse_purchase_order(row: &CsvRow<'_>) -> Result<PurchaseOrder, UploadError> {
    Ok(PurchaseOrder {
        entry_date: None,
        po_number: row.required_text(col::PO_NO),
        po_date: row.date(col::PO_DATE)?,
        item_code: row.required_text(col::ITEM_CODE),
        supplier: row.text(col::SUPPLIER_UPPER),
        rate: row.decimal(col::RATE_UPPER)?,
        rate_unit: row.text(col::RATE_UNIT),
        po_qty: row.integer(col::PO_QTY)?,
        po_value: row.decimal(col::PO_VALUE)?,
        received_qty: row.integer(col::RECEIVED_QTY)?,
        received_value: row.decimal(col::RECEIVED_VALUE)?,
        supply_status: row.decimal(col::SUPPLY_STATUS)?,
        tender_number: row.text(col::TENDER_NO),
        scheduled_delivery_date: row.date(col::SCHEDULED_DELIVERY_DATE)?,
        extended_delivery_period_days: row.integer(col::EXTENDED_DELIVERY_PERIOD)?,
    })
}

fn parse_rate_contract(row: &CsvRow<'_>) -> Result<RateContract, UploadError> {
    Ok(RateContract {
        item_code: row.required_text(col::ITEM_CODE),
        supplier: row.text(col::SUPPLIER),
        rate: row.decimal(col::RATE)?,
        rate_unit: row.text(col::RATE_UNIT),
        tender_date: row.date(col::TENDER_DATE)?,
        contract_from_date: row.date(col::CONTRACT_FROM_DATE)?,
        contract_to_date: row.date(col::CONTRACT_TO_DATE)?,
        rate_contract_level: row.text(col::RATE_CONTRACT_LEVEL),
    })
}

fn parse_reference(row: &CsvRow<'_>, quantity_column: &str) -> Result<ReferenceRecord, UploadError> {
    Ok(ReferenceRecord {
        item_code: row.required_text(col::ITEM_CODE),
        warehouse_name: row.required_text(col::WAREHOUSE_NAME),
        reference_qty: row.integer(quantity_column)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock_trims_and_defaults() {
        let data = b" Item Code , Warehouse Name ,Stock Quantity\n 00123 , CMS Adilabad ,\nD2,State Total,\"1,200\"\n";
        let batch = parse_upload(UploadKind::Stock, data).unwrap();
        match batch {
            UploadBatch::Stock(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].item_code, "00123");
                assert_eq!(rows[0].warehouse_name, "CMS Adilabad");
                assert_eq!(rows[0].stock_quantity, 0);
                assert_eq!(rows[1].stock_quantity, 1200);
            }
            other => panic!("unexpected batch: {other:?}"),
        }
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let data = b"Item Code,Stock Qty\nD1,5\n";
        let err = parse_upload(UploadKind::Stock, data).unwrap_err();
        assert_eq!(
            err,
            UploadError::MissingColumns(vec![
                "Warehouse Name".to_string(),
                "Stock Quantity".to_string()
            ])
        );
        assert_eq!(err.field().as_deref(), Some("Warehouse Name, Stock Quantity"));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let data = b"Item Code,Warehouse Name,Consumption Qty\n";
        assert_eq!(
            parse_upload(UploadKind::ConsumptionReference, data),
            Err(UploadError::Empty)
        );
    }

    #[test]
    fn test_invalid_number_names_row_and_column() {
        let data = b"Item Code,Warehouse Name,Demand Qty\nD1,CMS A,12\nD2,CMS A,lots\n";
        assert_eq!(
            parse_upload(UploadKind::DemandReference, data),
            Err(UploadError::InvalidValue {
                row: 3,
                column: "Demand Qty".to_string(),
                value: "lots".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let data = b"Item Code,Warehouse Name,Stock Quantity\nD1,CMS A,-3\n";
        match parse_upload(UploadKind::Stock, data) {
            Err(UploadError::InvalidRow { row, message }) => {
                assert_eq!(row, 2);
                assert!(message.contains("Stock Quantity"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_purchase_orders() {
        let data = "PO NO,PO DATE,Item Code,SUPPLIER,RATE,RATE UNIT,PO QTY,PO VALUE (Rs.),RECEIVED QTY,\
RECEIVED VALUE (Rs.),SUPPLY STATUS (%),Tender No.,Scheduled Delivery Date,Extended Delivery Period (in Days)\n\
PO/1,2025-07-01,D1,Acme,12.50,Strip,100,1250,80,1000,80%,T-9,07/15/2025,\n\
PO/2,,D1,,,,,,,,,,,\n";
        let batch = parse_upload(UploadKind::PurchaseOrders, data.as_bytes()).unwrap();
        let UploadBatch::PurchaseOrders(rows) = batch else {
            panic!("expected purchase orders");
        };
        assert_eq!(rows[0].po_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(rows[0].rate, Decimal::new(1250, 2));
        assert_eq!(rows[0].supply_status, Decimal::from(80));
        assert_eq!(rows[0].scheduled_delivery_date, NaiveDate::from_ymd_opt(2025, 7, 15));
        assert_eq!(rows[0].extended_delivery_period_days, 0);
        assert_eq!(rows[1].po_date, None);
        assert_eq!(rows[1].supplier, None);
        assert_eq!(rows[1].po_qty, 0);
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let data = "Item Code,Supplier,Rate,RATE UNIT,Tender Date,Contract From Date,Contract To Date,Rate Contract Level\n\
D1,Acme,5,Vial,,2025-01-01,someday,State\n";
        assert_eq!(
            parse_upload(UploadKind::RateContracts, data.as_bytes()),
            Err(UploadError::InvalidValue {
                row: 2,
                column: "Contract To Date".to_string(),
                value: "someday".to_string(),
            })
        );
    }

    #[test]
    fn test_preview_limits_rows() {
        let data = b"Item Code,Warehouse Name,Stock Quantity\nD1,A,1\nD2,A,2\nD3,A,3\n";
        let batch = parse_upload(UploadKind::Stock, data).unwrap();
        let preview = batch.preview(2);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview.columns, vec!["Item Code", "Warehouse Name", "Stock Quantity"]);
        assert_eq!(preview.rows[1].cells, vec!["D2", "A", "2"]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let data = b"\xEF\xBB\xBFItem Code,Warehouse Name,Stock Quantity\nD1,A,1\n";
        assert_eq!(parse_upload(UploadKind::Stock, data).unwrap().len(), 1);
    }

    #[test]
    fn test_kind_path_names() {
        for kind in UploadKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!(UploadKind::Stock.affects_stock_positions());
        assert!(!UploadKind::RateContracts.affects_stock_positions());
    }
}
