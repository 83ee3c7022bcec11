//! Render-ready tables and their CSV form

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer error: {0}")]
    Writer(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Style attached to a row, or to one of its cells when `column` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub column: Option<String>,
    pub css: String,
}

impl Highlight {
    pub fn row(css: &str) -> Self {
        Self {
            column: None,
            css: css.to_string(),
        }
    }

    pub fn cell(column: &str, css: &str) -> Self {
        Self {
            column: Some(column.to_string()),
            css: css.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayRow {
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
}

/// Formatted cells under named columns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
}

impl DisplayTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>, highlight: Option<Highlight>) {
        self.rows.push(DisplayRow { cells, highlight });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> DisplayTable {
        DisplayTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.cells.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Header line followed by one line per row, cells exactly as displayed
    pub fn to_csv(&self) -> Result<String, TableError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(&row.cells)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| TableError::Writer(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Parse CSV produced by [`DisplayTable::to_csv`]; highlights are not kept
    pub fn from_csv(data: &str) -> Result<DisplayTable, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());
        let columns = rdr.headers()?.iter().map(str::to_string).collect();
        let mut table = DisplayTable {
            columns,
            rows: Vec::new(),
        };
        for record in rdr.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect(), None);
        }
        Ok(table)
    }
}
