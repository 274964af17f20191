//! Workout log: append-only JSONL file of completed workouts and decay ticks.
//!
//! Entries are appended with file locking, one sorted-key JSON object per
//! line. The log is the source of truth for XP, so unlike the settings file
//! a malformed line is never skipped.

use crate::schema::diff_keys;
use crate::{Error, Exercise, MeasuringSystem, Result, Total};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Every key a log line must contain, and nothing else
pub const LOG_KEYS: &[&str] = &[
    "Average",
    "Date",
    "Distance",
    "Exercise",
    "Measuring",
    "Points",
    "Total",
    "UTC",
];

/// A single line of the workout log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    #[serde(rename = "Average")]
    pub average: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(rename = "Exercise")]
    pub exercise: Exercise,
    #[serde(rename = "Measuring")]
    pub measuring: MeasuringSystem,
    #[serde(rename = "Points")]
    pub points: u64,
    #[serde(rename = "Total")]
    pub total: Total,
    #[serde(rename = "UTC")]
    pub utc: i64,
}

impl LogEntry {
    /// Points removed by this entry, if it is a deterioration tick
    pub fn points_lost(&self) -> Option<u64> {
        match (self.exercise, &self.total) {
            (Exercise::Deteriorate, Total::PointsLost(lost)) => Some(*lost),
            _ => None,
        }
    }

    /// A deterioration tick must carry the points lost and a workout its
    /// elapsed time; anything else would skew the XP the log accounts for
    fn check_total(&self) -> Result<()> {
        match (self.exercise, &self.total) {
            (Exercise::Deteriorate, Total::PointsLost(_)) => Ok(()),
            (Exercise::Deteriorate, Total::Elapsed(_)) => Err(Error::CorruptedState(format!(
                "{} entry at UTC {} has no points lost in its Total",
                self.exercise, self.utc
            ))),
            (_, Total::PointsLost(_)) => Err(Error::CorruptedState(format!(
                "{} entry at UTC {} has points lost instead of an elapsed time",
                self.exercise, self.utc
            ))),
            (_, Total::Elapsed(_)) => Ok(()),
        }
    }

    fn to_object(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Other("log entry did not encode to an object".into())),
        }
    }
}

/// Point totals gathered from one pass over the log
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogTotals {
    /// `Points` of every entry, in file order
    pub points: Vec<u64>,
    /// `Total` of every deterioration entry, in file order
    pub losses: Vec<u64>,
}

impl LogTotals {
    /// Net XP the log accounts for
    pub fn net(&self) -> i64 {
        let gained: i64 = self.points.iter().map(|p| *p as i64).sum();
        let lost: i64 = self.losses.iter().map(|l| *l as i64).sum();
        gained - lost
    }
}

/// Manages the log file
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Serialize the entry and append it as one line; never truncates
    pub fn append_entry(&self, entry: &LogEntry) -> Result<()> {
        entry.check_total()?;
        let object = entry.to_object()?;
        verify_keys(&object)?;
        let line = serde_json::to_string(&object)?;

        self.ensure_parent_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);
        file.unlock()?;

        tracing::debug!(
            "Appended {} entry ({} points) to {:?}",
            entry.exercise,
            entry.points,
            self.path
        );
        Ok(())
    }

    /// The most recently written entry, or `None` if there are no entries
    pub fn load_last_entry(&self) -> Result<Option<LogEntry>> {
        let mut last = None;
        self.for_each_entry(|entry| last = Some(entry))?;
        Ok(last)
    }

    /// The entry with the latest `UTC`, wherever it sits in the file
    ///
    /// Workouts may be logged for past days, so file order is not time order.
    /// On a tie the entry written later wins.
    pub fn latest_entry(&self) -> Result<Option<LogEntry>> {
        let mut latest: Option<LogEntry> = None;
        self.for_each_entry(|entry| {
            if latest.as_ref().map_or(true, |l| entry.utc >= l.utc) {
                latest = Some(entry);
            }
        })?;
        Ok(latest)
    }

    /// Gather every entry's points and every deterioration loss
    ///
    /// Returns `None` if the log is missing or empty.
    pub fn check_log(&self) -> Result<Option<LogTotals>> {
        let mut totals = LogTotals::default();
        let mut seen = 0usize;
        self.for_each_entry(|entry| {
            seen += 1;
            totals.points.push(entry.points);
            if let Some(lost) = entry.points_lost() {
                totals.losses.push(lost);
            }
        })?;

        if seen == 0 {
            Ok(None)
        } else {
            tracing::debug!(
                "Checked {} log entries ({} deterioration ticks)",
                seen,
                totals.losses.len()
            );
            Ok(Some(totals))
        }
    }

    /// Every entry in file order
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();
        self.for_each_entry(|entry| entries.push(entry))?;
        Ok(entries)
    }

    fn for_each_entry<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(LogEntry),
    {
        if !self.path.exists() {
            return Ok(());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = parse_line(&line).map_err(|e| {
                tracing::error!("Bad log entry at line {}: {}", line_num + 1, e);
                e
            })?;
            f(entry);
        }

        file.unlock()?;
        Ok(())
    }
}

fn parse_line(line: &str) -> Result<LogEntry> {
    let object: Map<String, Value> = serde_json::from_str(line)?;
    verify_keys(&object)?;
    let entry: LogEntry = serde_json::from_value(Value::Object(object))?;
    entry.check_total()?;
    Ok(entry)
}

fn verify_keys(object: &Map<String, Value>) -> Result<()> {
    match diff_keys(LOG_KEYS, object) {
        None => Ok(()),
        Some(mismatch) => Err(Error::ImproperlyPopulated {
            missing: mismatch.missing,
            extra: mismatch.extra,
        }),
    }
}
