//! Weekly XP decay after a stretch without any logged activity.
//!
//! Every full week between the latest log entry and now costs 20% of the
//! current XP, as long as the decayed XP would still be above the floor.
//! Each tick is logged as its own `DETERIORATE` entry stamped one week after
//! the previous one, so running the check twice never decays a week twice.

use crate::log::{LogEntry, LogStore};
use crate::settings::SettingsStore;
use crate::{Exercise, Result, Total};
use chrono::{DateTime, Duration, Utc};

/// Share of XP lost to one week of decay
pub const DECAY_RATE: f64 = 0.2;

/// Share of XP kept after one week of decay
pub const DECAY_KEEP: f64 = 0.8;

/// Decay stops once XP x 0.8 would no longer exceed this
pub const XP_FLOOR: f64 = 250.0;

/// Full weeks elapsed since `last_utc`
pub fn pending_weeks(last_utc: i64, now: DateTime<Utc>) -> u32 {
    let elapsed = now.timestamp() - last_utc;
    if elapsed <= 0 {
        return 0;
    }
    (elapsed / Duration::weeks(1).num_seconds()) as u32
}

/// Full weeks since the latest logged activity, 0 for an empty log
pub fn weeks_since_last_entry(logs: &LogStore, now: DateTime<Utc>) -> Result<u32> {
    Ok(logs
        .latest_entry()?
        .map(|entry| pending_weeks(entry.utc, now))
        .unwrap_or(0))
}

/// Whether another week of decay applies at this XP
pub fn should_decay(xp: i64) -> bool {
    xp as f64 * DECAY_KEEP > XP_FLOOR
}

/// Points one week of decay removes
pub fn decay_amount(xp: i64) -> u64 {
    (xp as f64 * DECAY_RATE).round().max(0.0) as u64
}

/// Apply every pending week of decay, logging and committing each tick
///
/// Returns the entries appended, oldest first.
pub fn apply_deterioration(
    settings: &mut SettingsStore,
    logs: &LogStore,
    now: DateTime<Utc>,
) -> Result<Vec<LogEntry>> {
    let last = match logs.latest_entry()? {
        Some(entry) => entry,
        None => return Ok(Vec::new()),
    };

    let weeks = pending_weeks(last.utc, now);
    let mut xp = settings.profile()?.xp;
    let mut ticks = Vec::new();

    for week in 1..=i64::from(weeks) {
        if !should_decay(xp) {
            tracing::debug!("XP {} is at the deterioration floor", xp);
            break;
        }

        let lost = decay_amount(xp);
        xp -= lost as i64;

        let utc = last.utc + week * Duration::weeks(1).num_seconds();
        let date = DateTime::<Utc>::from_timestamp(utc, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or(last.date);

        let entry = LogEntry {
            average: "00:00".into(),
            date,
            distance: 0.0,
            exercise: Exercise::Deteriorate,
            measuring: last.measuring,
            points: 0,
            total: Total::PointsLost(lost),
            utc,
        };
        logs.append_entry(&entry)?;
        settings.set_xp(xp);
        settings.commit()?;

        tracing::info!("Deteriorated {} points (week {}), XP now {}", lost, week, xp);
        ticks.push(entry);
    }

    Ok(ticks)
}
