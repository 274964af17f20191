//! CSV export of the workout log.
//!
//! The log itself stays append-only JSONL; this writes a spreadsheet-friendly
//! copy alongside it.

use crate::log::{LogEntry, LogStore};
use crate::Result;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    finished_at: String,
    exercise: String,
    distance: f64,
    measuring: &'static str,
    total: String,
    average: String,
    points: u64,
    points_lost: u64,
}

impl From<&LogEntry> for CsvRow {
    fn from(entry: &LogEntry) -> Self {
        let finished_at = chrono::DateTime::<chrono::Utc>::from_timestamp(entry.utc, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        CsvRow {
            date: entry.date.to_string(),
            finished_at,
            exercise: entry.exercise.to_string(),
            distance: entry.distance,
            measuring: entry.measuring.code(),
            total: entry.total.to_string(),
            average: entry.average.clone(),
            points: entry.points,
            points_lost: entry.points_lost().unwrap_or(0),
        }
    }
}

/// Write every log entry to `csv_path`, replacing any previous export
///
/// Rows go to a temp file that is synced and renamed into place, so a failed
/// export never leaves a half-written file. Returns the number of rows.
pub fn export_csv(logs: &LogStore, csv_path: &Path) -> Result<usize> {
    let entries = logs.entries()?;

    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let temp = NamedTempFile::new_in(&parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(temp.as_file());
        for entry in &entries {
            writer.serialize(CsvRow::from(entry))?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(csv_path)
        .map_err(|e| crate::Error::Io(e.error))?;

    tracing::info!("Exported {} log entries to {:?}", entries.len(), csv_path);
    Ok(entries.len())
}
