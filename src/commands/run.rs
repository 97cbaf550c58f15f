use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::BodyArgs;
use crate::model::{
    AGING_REPORT_SCHEMA, ExtractRunManifest, RawRow, SourceInfo, StageCounts,
};
use crate::output::{output_path, verify_record_set, write_record_set};
use crate::reconstruct::reconstruct;
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

pub(super) struct RunRequest<'a> {
    pub command: &'static str,
    pub source_path: &'a Path,
    pub title: String,
    pub output_dir: &'a Path,
    pub body_range: (usize, Option<usize>),
    pub manifest_path: Option<PathBuf>,
    pub pdftotext: Option<String>,
    pub dry_run: bool,
}

impl BodyArgs {
    pub(super) fn range_or(&self, default_start: usize, default_end: Option<usize>) -> (usize, Option<usize>) {
        (
            self.body_start.unwrap_or(default_start),
            self.body_end.or(default_end),
        )
    }
}

pub(super) fn slice_body(
    mut rows: Vec<RawRow>,
    (start, end): (usize, Option<usize>),
    warnings: &mut Vec<String>,
) -> Vec<RawRow> {
    let len = rows.len();
    let end = match end {
        Some(end) if end > len => {
            warnings.push(format!(
                "table has {len} raw rows, fewer than the body end {end}"
            ));
            len
        }
        Some(end) => end,
        None => len,
    };
    let start = start.min(end);
    rows.truncate(end);
    rows.drain(..start);
    rows
}

#[derive(Debug)]
pub(super) struct RunSummary {
    pub output_path: PathBuf,
    pub written: bool,
    pub warnings: Vec<String>,
}

pub(super) fn execute(request: RunRequest<'_>, raw_rows: Vec<RawRow>) -> Result<RunSummary> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let mut warnings = Vec::new();

    info!(
        run_id = %run_id,
        source = %request.source_path.display(),
        title = %request.title,
        "starting table reconstruction"
    );

    let raw_row_count = raw_rows.len();
    let body = slice_body(raw_rows, request.body_range, &mut warnings);
    let body_rows = body.len();
    for warning in &warnings {
        warn!(warning = %warning, "run warning");
    }

    let reconstruction = reconstruct(body, &AGING_REPORT_SCHEMA)?;
    let path = output_path(request.output_dir, &request.title)?;

    if request.dry_run {
        info!(
            output = %path.display(),
            records = reconstruction.record_set.records.len(),
            "dry-run complete"
        );
        return Ok(RunSummary {
            output_path: path,
            written: false,
            warnings,
        });
    }

    let source_sha256 = sha256_file(request.source_path)?;

    write_record_set(&path, &reconstruction.record_set)?;
    let records_read_back = verify_record_set(&path, &reconstruction.record_set)?;
    info!(path = %path.display(), records = records_read_back, "wrote record set");

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        command: request.command.to_string(),
        status: "completed".to_string(),
        started_at,
        completed_at: now_utc_string(),
        source: SourceInfo {
            path: request.source_path.display().to_string(),
            sha256: source_sha256,
            title: request.title,
        },
        pdftotext: request.pdftotext,
        output_path: path.display().to_string(),
        output_records_read_back: records_read_back,
        counts: StageCounts {
            raw_rows: raw_row_count,
            body_rows,
            merged_continuations: reconstruction.merged_continuations,
            propagated_rows: reconstruction.propagated_rows,
            records: reconstruction.record_set.records.len(),
            columns: reconstruction.record_set.columns.len(),
            dropped_columns: reconstruction.dropped_columns,
        },
        warnings: warnings.clone(),
    };

    let manifest_path = request.manifest_path.unwrap_or_else(|| {
        request.output_dir.join("manifests").join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(RunSummary {
        output_path: path,
        written: true,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_rows(count: usize) -> Vec<RawRow> {
        (0..count).map(|index| vec![index.to_string()]).collect()
    }

    #[test]
    fn slice_body_takes_half_open_range() {
        let mut warnings = Vec::new();

        let body = slice_body(numbered_rows(30), (5, Some(28)), &mut warnings);

        assert_eq!(body.len(), 23);
        assert_eq!(body[0][0], "5");
        assert_eq!(body[22][0], "27");
        assert!(warnings.is_empty());
    }

    #[test]
    fn slice_body_clamps_short_tables_with_warning() {
        let mut warnings = Vec::new();

        let body = slice_body(numbered_rows(10), (5, Some(28)), &mut warnings);

        assert_eq!(body.len(), 5);
        assert_eq!(warnings.len(), 1);

        let body = slice_body(numbered_rows(3), (5, None), &mut warnings);
        assert!(body.is_empty());
    }

    fn source_file(dir: &Path) -> PathBuf {
        let path = dir.join("rows.json");
        std::fs::write(&path, "[]").unwrap();
        path
    }

    fn request<'a>(source_path: &'a Path, output_dir: &'a Path, dry_run: bool) -> RunRequest<'a> {
        RunRequest {
            command: "repair",
            source_path,
            title: "Acme Media".to_string(),
            output_dir,
            body_range: (0, Some(5)),
            manifest_path: Some(output_dir.join("manifest.json")),
            pdftotext: None,
            dry_run,
        }
    }

    fn aging_row() -> RawRow {
        [
            "Acme Co",
            "555-0100",
            "WSJ 1041",
            "03/15/20    250.00",
            "3",
            "100.00",
            "04/01/20",
            "",
            "150.00",
            "",
            "12.50   7.25",
            " N",
        ]
        .iter()
        .map(|cell| cell.to_string())
        .collect()
    }

    #[test]
    fn dry_run_keeps_slice_warnings_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_file(dir.path());

        let summary = execute(request(&source, dir.path(), true), vec![aging_row()]).unwrap();

        assert!(!summary.written);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].contains("fewer than the body end 5"));
        assert!(!summary.output_path.exists());
        assert!(!dir.path().join("manifest.json").exists());
    }

    #[test]
    fn unreadable_source_fails_before_csv_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let err = execute(request(&missing, dir.path(), false), vec![aging_row()]).unwrap_err();

        assert!(err.to_string().contains("failed to open source for hashing"));
        let expected = dir.path().join("output_Acme Media.csv");
        assert!(!expected.exists());
    }

    #[test]
    fn execute_writes_verified_csv_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_file(dir.path());

        let summary = execute(request(&source, dir.path(), false), vec![aging_row()]).unwrap();

        assert!(summary.written);
        assert_eq!(summary.output_path, dir.path().join("output_Acme Media.csv"));
        assert!(summary.output_path.exists());

        let manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["output_records_read_back"], 1);
        assert_eq!(manifest["counts"]["records"], 1);
        assert_eq!(manifest["warnings"].as_array().unwrap().len(), 1);
    }
}
