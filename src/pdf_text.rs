use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

const TITLE_CROP: (u32, u32, u32, u32) = (200, 25, 400, 20);

#[derive(Debug, Clone)]
pub struct ColumnOffsets(Vec<usize>);

impl ColumnOffsets {
    pub fn new(offsets: Vec<usize>) -> Result<Self> {
        if offsets.is_empty() {
            bail!("at least one column offset is required");
        }
        if offsets.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("column offsets must be strictly increasing: {offsets:?}");
        }
        Ok(Self(offsets))
    }

    pub fn split_line(&self, line: &str) -> Vec<String> {
        let chars = line.chars().collect::<Vec<char>>();
        self.0
            .iter()
            .enumerate()
            .map(|(index, &start)| {
                let end = self.0.get(index + 1).copied().unwrap_or(chars.len());
                let start = start.min(chars.len());
                let end = end.clamp(start, chars.len());
                chars[start..end].iter().collect::<String>().trim().to_string()
            })
            .collect()
    }
}

pub fn rows_from_layout_text(text: &str, columns: &ColumnOffsets) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| columns.split_line(line))
        .collect()
}

pub fn extract_rows(pdf_path: &Path, columns: &ColumnOffsets) -> Result<Vec<Vec<String>>> {
    let text = run_pdftotext(pdf_path, &[])?;
    let rows = rows_from_layout_text(&text, columns);
    debug!(path = %pdf_path.display(), rows = rows.len(), "extracted layout rows");
    Ok(rows)
}

pub fn extract_title(pdf_path: &Path) -> Result<String> {
    let (x, y, width, height) = TITLE_CROP;
    let crop = [
        "-x".to_string(),
        x.to_string(),
        "-y".to_string(),
        y.to_string(),
        "-W".to_string(),
        width.to_string(),
        "-H".to_string(),
        height.to_string(),
    ];
    let text = run_pdftotext(pdf_path, &crop)?;
    let title = collapse_title(&text)?;
    if title.is_empty() {
        bail!("no title text found in {}", pdf_path.display());
    }
    Ok(title)
}

fn collapse_title(text: &str) -> Result<String> {
    let spaces = Regex::new(r"\s+").context("failed to compile whitespace regex")?;
    Ok(spaces.replace_all(text.trim(), " ").into_owned())
}

fn run_pdftotext(pdf_path: &Path, extra_args: &[String]) -> Result<String> {
    let mut command = Command::new("pdftotext");
    command
        .arg("-enc")
        .arg("UTF-8")
        .arg("-layout")
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .args(extra_args)
        .arg(pdf_path)
        .arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .replace(['\u{000C}', '\u{0000}'], ""))
}

pub fn pdftotext_version() -> Option<String> {
    let output = Command::new("pdftotext").arg("-v").output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_offsets_must_increase() {
        assert!(ColumnOffsets::new(vec![]).is_err());
        assert!(ColumnOffsets::new(vec![0, 10, 10]).is_err());
        assert!(ColumnOffsets::new(vec![0, 10, 20]).is_ok());
    }

    #[test]
    fn split_line_keeps_inner_whitespace_runs() {
        let columns = ColumnOffsets::new(vec![0, 10, 30]).unwrap();
        let line = "Acme Co   500.00    Paid      N";

        let cells = columns.split_line(line);

        assert_eq!(cells, vec!["Acme Co", "500.00    Paid", "N"]);
    }

    #[test]
    fn split_line_pads_short_lines_with_empty_cells() {
        let columns = ColumnOffsets::new(vec![0, 10, 30]).unwrap();

        let cells = columns.split_line("Beta");

        assert_eq!(cells, vec!["Beta", "", ""]);
    }

    #[test]
    fn rows_from_layout_text_skips_blank_lines() {
        let columns = ColumnOffsets::new(vec![0, 6]).unwrap();
        let text = "Name  Amount\n\n   \nAcme  10.00\n";

        let rows = rows_from_layout_text(text, &columns);

        assert_eq!(rows, vec![vec!["Name", "Amount"], vec!["Acme", "10.00"]]);
    }

    #[test]
    fn collapse_title_joins_lines() {
        assert_eq!(
            collapse_title("  CWC Software,\n  Inc.\n").unwrap(),
            "CWC Software, Inc."
        );
    }
}
