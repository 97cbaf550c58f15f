use anyhow::Result;
use tracing::info;

use crate::cli::RepairArgs;
use crate::model::RawRow;
use crate::util::read_json;

use super::run::{RunRequest, execute};

pub fn run(args: RepairArgs) -> Result<()> {
    let raw_rows: Vec<RawRow> = read_json(&args.rows)?;
    info!(path = %args.rows.display(), rows = raw_rows.len(), "loaded raw rows");

    let request = RunRequest {
        command: "repair",
        source_path: &args.rows,
        title: args.title.clone(),
        output_dir: &args.output_dir,
        body_range: args.body.range_or(0, None),
        manifest_path: args.manifest_path.clone(),
        pdftotext: None,
        dry_run: args.dry_run,
    };
    let summary = execute(request, raw_rows)?;
    info!(
        output = %summary.output_path.display(),
        written = summary.written,
        warnings = summary.warnings.len(),
        "run finished"
    );
    Ok(())
}
