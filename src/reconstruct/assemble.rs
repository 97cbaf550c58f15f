use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::model::{Cell, ColumnSchema, RecordSet};

use super::coerce::parse_short_date;

const DATE_FALLBACK_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Debug)]
pub struct AssembledRecords {
    pub record_set: RecordSet,
    pub dropped_columns: Vec<String>,
}

pub fn assemble_record_set(rows: Vec<Vec<Cell>>, schema: &ColumnSchema) -> Result<AssembledRecords> {
    for (index, row) in rows.iter().enumerate() {
        if row.len() != schema.len() {
            bail!(
                "row {index} has {} fields but the column schema has {}",
                row.len(),
                schema.len()
            );
        }
    }

    let blank = Regex::new(r"^\s*$").context("failed to compile blank cell regex")?;

    let mut record_set = RecordSet {
        columns: schema.fields.iter().map(|name| name.to_string()).collect(),
        records: rows,
    };

    normalize_blank_cells(&mut record_set, &blank);
    let dropped_columns = drop_null_columns(&mut record_set);
    normalize_date_columns(&mut record_set, schema);
    normalize_blank_cells(&mut record_set, &blank);

    Ok(AssembledRecords {
        record_set,
        dropped_columns,
    })
}

fn normalize_blank_cells(record_set: &mut RecordSet, blank: &Regex) {
    for cell in record_set.records.iter_mut().flatten() {
        if let Cell::Text(text) = cell
            && blank.is_match(text)
        {
            *cell = Cell::Null;
        }
    }
}

pub(super) fn drop_null_columns(record_set: &mut RecordSet) -> Vec<String> {
    let keep = (0..record_set.columns.len())
        .map(|column| {
            record_set
                .records
                .iter()
                .any(|record| record.get(column).is_some_and(|cell| !cell.is_null()))
        })
        .collect::<Vec<bool>>();

    let mut dropped = Vec::new();
    let columns = std::mem::take(&mut record_set.columns);
    for (name, kept) in columns.into_iter().zip(&keep) {
        if *kept {
            record_set.columns.push(name);
        } else {
            dropped.push(name);
        }
    }

    for record in &mut record_set.records {
        let mut column = 0usize;
        record.retain(|_| {
            let kept = keep.get(column).copied().unwrap_or(true);
            column += 1;
            kept
        });
    }

    dropped
}

fn normalize_date_columns(record_set: &mut RecordSet, schema: &ColumnSchema) {
    for name in schema.date_fields {
        let Some(index) = record_set.column_index(name) else {
            continue;
        };

        for record in &mut record_set.records {
            let Some(cell) = record.get_mut(index) else {
                continue;
            };
            let normalized = to_calendar_date(cell);
            if matches!(&normalized, Cell::Text(text) if text.is_empty()) {
                warn!(column = %name, value = %cell, "date cell could not be parsed");
            }
            *cell = normalized;
        }
    }
}

fn to_calendar_date(cell: &Cell) -> Cell {
    match cell {
        Cell::Timestamp(timestamp) => Cell::Date(timestamp.date()),
        Cell::Date(date) => Cell::Date(*date),
        Cell::Null => Cell::Null,
        Cell::Text(text) => parse_short_date(text.trim())
            .or_else(|| {
                DATE_FALLBACK_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
            })
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(String::new())),
        Cell::Number(_) => Cell::Text(String::new()),
    }
}
