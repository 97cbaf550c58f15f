use anyhow::Result;
use tracing::info;

use crate::cli::ExtractArgs;
use crate::pdf_text::{ColumnOffsets, extract_rows, extract_title, pdftotext_version};

use super::run::{RunRequest, execute};

// Report header and two-line column header above, footer from row 28.
const BODY_START: usize = 5;
const BODY_END: usize = 28;

pub fn run(args: ExtractArgs) -> Result<()> {
    let columns = ColumnOffsets::new(args.columns.clone())?;
    let raw_rows = extract_rows(&args.pdf, &columns)?;
    let title = match &args.title {
        Some(title) => title.clone(),
        None => extract_title(&args.pdf)?,
    };

    let request = RunRequest {
        command: "extract",
        source_path: &args.pdf,
        title,
        output_dir: &args.output_dir,
        body_range: args.body.range_or(BODY_START, Some(BODY_END)),
        manifest_path: args.manifest_path.clone(),
        pdftotext: pdftotext_version(),
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
