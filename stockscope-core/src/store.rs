//! Report store: an append-only CSV table of stock report rows.
//!
//! Appends read the whole file, add the row, and rewrite the file through a
//! `.tmp` sibling renamed into place. There is no locking: run a single writer at a time. Two processes appending at once, or
//! an edit made in another program while a batch runs, can lose rows.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{StockReportRow, REPORT_HEADER};
use crate::error::StockError;

/// Append `row` to the table at `path`, creating it with `header` if absent.
pub fn append_row(path: &Path, row: &[String], header: &[&str]) -> Result<(), StockError> {
    let mut records = if path.exists() {
        read_records(path)?
    } else {
        Vec::new()
    };
    // A missing or empty file starts with the header.
    if records.is_empty() {
        tracing::info!(path = %path.display(), "creating report store");
        records.push(header.iter().map(|h| h.to_string()).collect());
    }

    if let Some(existing) = records.first() {
        if existing.iter().map(String::as_str).ne(header.iter().copied()) {
            tracing::warn!(
                path = %path.display(),
                "store header differs from the expected schema; appending anyway"
            );
        }
    }

    records.push(row.to_vec());
    write_records(path, &records)?;
    tracing::debug!(path = %path.display(), rows = records.len() - 1, "row appended");
    Ok(())
}

/// Every record in the file, header included.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>, StockError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    reader
        .records()
        .map(|rec| {
            rec.map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| csv_error(path, e))
        })
        .collect()
}

/// Writes are atomic: write to `.tmp`, then rename over the store.
fn write_records(path: &Path, records: &[Vec<String>]) -> Result<(), StockError> {
    let tmp_path = path.with_extension("csv.tmp");
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| io_error(path, e))?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    for rec in records {
        writer.write_record(rec).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    drop(writer);

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        io_error(path, e)
    })
}

fn io_error(path: &Path, err: io::Error) -> StockError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        StockError::FilePermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        StockError::StoreWriteFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

fn csv_error(path: &Path, err: csv::Error) -> StockError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => io_error(path, e),
        _ => StockError::StoreWriteFailed {
            path: path.to_path_buf(),
            reason,
        },
    }
}

/// The report store at a fixed path, using the canonical header.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &StockReportRow) -> Result<(), StockError> {
        append_row(&self.path, &row.to_fields(), &REPORT_HEADER)?;
        tracing::info!(
            ticker = %row.ticker,
            exchange = %row.exchange,
            label = %row.label,
            "report row saved"
        );
        Ok(())
    }

    /// Data rows (header excluded). A missing store has no rows.
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>, StockError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut records = read_records(&self.path)?;
        if !records.is_empty() {
            records.remove(0);
        }
        Ok(records)
    }
}
