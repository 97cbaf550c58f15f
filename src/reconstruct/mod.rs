use anyhow::Result;
use tracing::{debug, info};

use crate::model::{ColumnSchema, RawRow, RecordSet};

mod assemble;
mod coerce;
mod merge;
mod propagate;
mod split;

use assemble::assemble_record_set;
use coerce::coerce_rows;
use merge::merge_continuation_rows;
use propagate::propagate_labels;
use split::split_combined_columns;

#[derive(Debug)]
pub struct Reconstruction {
    pub record_set: RecordSet,
    pub merged_continuations: usize,
    pub propagated_rows: usize,
    pub dropped_columns: Vec<String>,
}

pub fn reconstruct(mut rows: Vec<RawRow>, schema: &ColumnSchema) -> Result<Reconstruction> {
    let body_rows = rows.len();

    let merged_continuations = merge_continuation_rows(&mut rows);
    debug!(merged = merged_continuations, rows = rows.len(), "merged continuation rows");

    let propagated_rows = propagate_labels(&mut rows);
    debug!(propagated = propagated_rows, "propagated row labels");

    split_combined_columns(&mut rows)?;
    debug!(rows = rows.len(), "split combined columns");

    let typed = coerce_rows(rows);
    let assembled = assemble_record_set(typed, schema)?;

    info!(
        body_rows,
        merged_continuations,
        propagated_rows,
        records = assembled.record_set.records.len(),
        columns = assembled.record_set.columns.len(),
        "table reconstructed"
    );

    Ok(Reconstruction {
        record_set: assembled.record_set,
        merged_continuations,
        propagated_rows,
        dropped_columns: assembled.dropped_columns,
    })
}
