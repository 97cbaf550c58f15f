use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::model::{Cell, RecordSet};
use crate::util::ensure_parent_directory;

pub fn output_path(output_dir: &Path, title: &str) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        bail!("cannot name output file from an empty title");
    }
    let file_name = format!("output_{}.csv", title.replace(['/', '\\'], "_"));
    Ok(output_dir.join(file_name))
}

pub fn write_record_set(path: &Path, record_set: &RecordSet) -> Result<()> {
    ensure_parent_directory(path)?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;

    let header = std::iter::once("").chain(record_set.columns.iter().map(String::as_str));
    writer
        .write_record(header)
        .with_context(|| format!("failed to write csv header: {}", path.display()))?;

    for (index, record) in record_set.records.iter().enumerate() {
        let fields = std::iter::once(index.to_string()).chain(record.iter().map(Cell::to_string));
        writer
            .write_record(fields)
            .with_context(|| format!("failed to write csv row {index}: {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush csv file: {}", path.display()))?;
    Ok(())
}

pub fn read_record_set(path: &Path) -> Result<RecordSet> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open csv file: {}", path.display()))?;

    let columns = reader
        .headers()
        .with_context(|| format!("failed to read csv header: {}", path.display()))?
        .iter()
        .skip(1)
        .map(ToOwned::to_owned)
        .collect::<Vec<String>>();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to read csv row {index}: {}", path.display()))?;
        let record = row
            .iter()
            .skip(1)
            .map(|field| {
                if field.is_empty() {
                    Cell::Null
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect::<Vec<Cell>>();
        records.push(record);
    }

    Ok(RecordSet { columns, records })
}

pub fn verify_record_set(path: &Path, expected: &RecordSet) -> Result<usize> {
    let written = read_record_set(path)?;

    if written.columns != expected.columns {
        bail!(
            "{} has columns {:?}, expected {:?}",
            path.display(),
            written.columns,
            expected.columns
        );
    }
    if written.records.len() != expected.records.len() {
        bail!(
            "{} has {} records, expected {}",
            path.display(),
            written.records.len(),
            expected.records.len()
        );
    }

    for (index, (read, original)) in written.records.iter().zip(&expected.records).enumerate() {
        let read_nulls = read.iter().map(Cell::is_null);
        let original_nulls = original.iter().map(|cell| cell.to_string().is_empty());
        if !read_nulls.eq(original_nulls) {
            bail!("{} row {index} does not match the written nulls", path.display());
        }
    }

    Ok(written.records.len())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn output_path_prefixes_title() {
        let path = output_path(Path::new("out"), " CWC Software, Inc. ").unwrap();
        assert_eq!(path, Path::new("out").join("output_CWC Software, Inc..csv"));
    }

    #[test]
    fn output_path_replaces_separators_and_rejects_empty_titles() {
        let path = output_path(Path::new("out"), "A/B\\C").unwrap();
        assert_eq!(path, Path::new("out").join("output_A_B_C.csv"));
        assert!(output_path(Path::new("out"), "  ").is_err());
    }

    #[test]
    fn record_set_round_trips_order_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("output_test.csv");
        let record_set = RecordSet {
            columns: vec!["Name/Company".into(), "Date 1".into(), "Current".into()],
            records: vec![
                vec![
                    Cell::Text("Acme, Co".into()),
                    Cell::Date(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap()),
                    Cell::Number(500.0),
                ],
                vec![Cell::Text("Beta".into()), Cell::Null, Cell::Number(12.25)],
            ],
        };

        write_record_set(&path, &record_set).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(",Name/Company,Date 1,Current"));
        assert!(raw.contains("0,\"Acme, Co\",2020-03-15,500.0"));
        assert!(raw.contains("1,Beta,,12.25"));

        let read_back = read_record_set(&path).unwrap();
        assert_eq!(read_back.columns, record_set.columns);
        assert_eq!(
            read_back.records[0],
            vec![
                Cell::Text("Acme, Co".into()),
                Cell::Text("2020-03-15".into()),
                Cell::Text("500.0".into()),
            ]
        );
        assert_eq!(read_back.records[1][1], Cell::Null);
    }

    #[test]
    fn verify_record_set_rejects_mismatched_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_check.csv");
        let record_set = RecordSet {
            columns: vec!["Name/Company".into(), "St".into()],
            records: vec![
                vec![Cell::Text("Acme".into()), Cell::Null],
                vec![Cell::Text("Beta".into()), Cell::Text("N".into())],
            ],
        };
        write_record_set(&path, &record_set).unwrap();

        assert_eq!(verify_record_set(&path, &record_set).unwrap(), 2);

        let mut fewer = record_set.clone();
        fewer.records.pop();
        assert!(verify_record_set(&path, &fewer).is_err());

        let mut renamed = record_set.clone();
        renamed.columns[1] = "Status".into();
        assert!(verify_record_set(&path, &renamed).is_err());

        let mut moved_null = record_set;
        moved_null.records[0][1] = Cell::Text("Y".into());
        let err = verify_record_set(&path, &moved_null).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }
}
