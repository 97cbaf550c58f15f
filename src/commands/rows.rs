use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RowsArgs;
use crate::pdf_text::{ColumnOffsets, extract_rows};
use crate::util::write_json_pretty;

pub fn run(args: RowsArgs) -> Result<()> {
    let columns = ColumnOffsets::new(args.columns)?;
    let rows = extract_rows(&args.pdf, &columns)?;

    match args.output {
        Some(path) => {
            write_json_pretty(&path, &rows)?;
            info!(path = %path.display(), rows = rows.len(), "wrote raw rows");
        }
        None => {
            let data = serde_json::to_string_pretty(&rows).context("failed to serialize rows")?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{data}").context("failed to write rows to stdout")?;
        }
    }

    Ok(())
}
