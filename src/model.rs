use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type RawRow = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{}", format_number(*value)),
            Self::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::Null => Ok(()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub fields: &'static [&'static str],
    pub date_fields: &'static [&'static str],
}

impl ColumnSchema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

pub const AGING_REPORT_SCHEMA: ColumnSchema = ColumnSchema {
    fields: &[
        "Name/Company",
        "Telephone",
        "Publication",
        "Order Invoice Number",
        "Date 1",
        "Amount Qty",
        "Payment Paid",
        "Date 2",
        "Not Invoiced",
        "Current",
        "31-60",
        "61-90",
        "Over 90",
        "St",
    ],
    date_fields: &["Date 1", "Date 2"],
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub records: Vec<Vec<Cell>>,
}

impl RecordSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageCounts {
    pub raw_rows: usize,
    pub body_rows: usize,
    pub merged_continuations: usize,
    pub propagated_rows: usize,
    pub records: usize,
    pub columns: usize,
    pub dropped_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,
    pub sha256: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub command: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: String,
    pub source: SourceInfo,
    pub pdftotext: Option<String>,
    pub output_path: String,
    pub output_records_read_back: usize,
    pub counts: StageCounts,
    pub warnings: Vec<String>,
}
