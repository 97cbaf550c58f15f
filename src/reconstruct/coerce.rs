use chrono::{Datelike, NaiveDate};

use crate::model::{Cell, RawRow};

const CELL_DATE_FORMAT: &str = "%m/%d/%y";

pub fn coerce_rows(rows: Vec<RawRow>) -> Vec<Vec<Cell>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(|text| coerce_cell(Cell::Text(text))).collect())
        .collect()
}

pub fn coerce_cell(cell: Cell) -> Cell {
    let text = match cell {
        Cell::Text(text) => text,
        typed => return typed,
    };

    if let Some(number) = parse_number(&text) {
        return Cell::Number(number);
    }

    match parse_short_date(&text) {
        Some(date) => Cell::Timestamp(date.and_time(chrono::NaiveTime::MIN)),
        None => Cell::Text(text),
    }
}

pub(super) fn parse_short_date(text: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(text, CELL_DATE_FORMAT).ok()?;
    // chrono pivots two-digit years at 70, strptime at 69.
    if date.year() == 2069 {
        date.with_year(1969)
    } else {
        Some(date)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !trimmed.starts_with(|ch: char| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.')) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
