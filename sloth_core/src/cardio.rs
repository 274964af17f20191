//! Cardio scoring engine.
//!
//! Turns a reported distance and elapsed time into a pace, a Run/Jog/Walk
//! band and an XP award:
//! - Pace is always judged per mile, whatever unit the user reports in
//! - Paces faster than 3:43/mi are rejected outright and never logged
//! - Whole minutes of pace pick the band and a per-minute multiplier
//! - Leftover seconds add a small bonus multiplier
//! - Paces slower than 28 minutes are logged as a WALK worth 0 points

use crate::log::{LogEntry, LogStore};
use crate::settings::SettingsStore;
use crate::{ClockTime, Error, Exercise, MeasuringSystem, Result, Total};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Kilometers in a mile, for converting metric distances into pace per mile
pub const KM_PER_MILE: f64 = 1.609344;

/// Miles in a kilometer, for converting metric distances into scored miles
pub const MILES_PER_KM: f64 = 0.62137;

/// 3:43 per mile; anything faster isn't a real run
pub const FASTEST_PACE_SECONDS: u64 = 3 * 60 + 43;

/// Longest workout that can be logged (23:59:59)
pub const MAX_ELAPSED_SECONDS: u64 = 86_399;

/// Exclusive upper bound on an imperial distance
pub const MAX_MILES: f64 = 50.0;

/// Exclusive upper bound on a metric distance (50 miles)
pub const MAX_KILOMETERS: f64 = 80.467354394322222;

/// Workout intensity derived from pace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Run,
    Jog,
    Walk,
}

impl Band {
    /// Band for a whole-minute pace per mile, `None` outside 3-28 minutes
    pub fn from_minute(minute: u64) -> Option<Band> {
        match minute {
            3..=9 => Some(Band::Run),
            10..=18 => Some(Band::Jog),
            19..=28 => Some(Band::Walk),
            _ => None,
        }
    }

    pub fn base_points(self) -> f64 {
        match self {
            Band::Run => 400.0,
            Band::Jog => 300.0,
            Band::Walk => 100.0,
        }
    }

    pub fn exercise(self) -> Exercise {
        match self {
            Band::Run => Exercise::Run,
            Band::Jog => Exercise::Jog,
            Band::Walk => Exercise::Walk,
        }
    }
}

/// Per-minute multipliers, keyed by band and whole minutes of pace
static MINUTE_MULTIPLIERS: Lazy<HashMap<(Band, u64), f64>> = Lazy::new(|| {
    let run = [(3, 1.7), (4, 1.5), (5, 1.3), (6, 1.1), (7, 0.9), (8, 0.7), (9, 0.5)];
    let jog = [
        (10, 0.95),
        (11, 0.8),
        (12, 0.6),
        (13, 0.4),
        (14, 0.2),
        (15, 0.35),
        (16, 0.3),
        (17, 0.25),
        (18, 0.2),
    ];
    let walk = [
        (19, 0.5),
        (20, 0.45),
        (21, 0.4),
        (22, 0.35),
        (23, 0.3),
        (24, 0.25),
        (25, 0.2),
        (26, 0.15),
        (27, 0.1),
        (28, 0.05),
    ];

    let mut table = HashMap::new();
    for (band, rows) in [
        (Band::Run, &run[..]),
        (Band::Jog, &jog[..]),
        (Band::Walk, &walk[..]),
    ] {
        for &(minute, multiplier) in rows {
            table.insert((band, minute), multiplier);
        }
    }
    table
});

const SECOND_BREAKPOINTS: [u64; 4] = [15, 30, 45, 60];
const SECOND_MULTIPLIERS: [f64; 4] = [0.20, 0.15, 0.10, 0.05];

/// Multiplier for a whole-minute pace within its band
pub fn minute_multiplier(band: Band, minute: u64) -> Option<f64> {
    MINUTE_MULTIPLIERS.get(&(band, minute)).copied()
}

/// Bonus multiplier for the seconds part of the pace
///
/// Uses the first breakpoint not less than `seconds`: 0-15 earns 0.20,
/// 16-30 earns 0.15, 31-45 earns 0.10 and 46-60 earns 0.05.
pub fn second_multiplier(seconds: u64) -> f64 {
    let i = SECOND_BREAKPOINTS.partition_point(|&b| b < seconds);
    SECOND_MULTIPLIERS
        .get(i)
        .copied()
        .unwrap_or(SECOND_MULTIPLIERS[SECOND_MULTIPLIERS.len() - 1])
}

/// A cardio workout as reported by the user
#[derive(Clone, Debug, PartialEq)]
pub struct CardioWorkout {
    /// Distance in the user's unit (miles or kilometers)
    pub distance: f64,
    pub elapsed_seconds: u64,
    pub measuring: MeasuringSystem,
    /// Day the workout happened, as entered
    pub date: NaiveDate,
    pub finished_at: DateTime<Utc>,
}

impl CardioWorkout {
    /// Reject distances and durations that can't be scored
    pub fn validate(&self) -> Result<()> {
        let max = match self.measuring {
            MeasuringSystem::Imperial => MAX_MILES,
            MeasuringSystem::Metric => MAX_KILOMETERS,
        };
        if !self.distance.is_finite() || self.distance <= 0.0 || self.distance >= max {
            return Err(Error::Validation(format!(
                "distance {} is out of range for {}",
                self.distance, self.measuring
            )));
        }
        if self.elapsed_seconds == 0 || self.elapsed_seconds > MAX_ELAPSED_SECONDS {
            return Err(Error::Validation(format!(
                "elapsed time {}s is out of range",
                self.elapsed_seconds
            )));
        }
        Ok(())
    }

    /// Distance in miles
    pub fn miles(&self) -> f64 {
        match self.measuring {
            MeasuringSystem::Imperial => self.distance,
            MeasuringSystem::Metric => self.distance / KM_PER_MILE,
        }
    }

    /// Miles used when multiplying out points
    fn scored_miles(&self) -> f64 {
        match self.measuring {
            MeasuringSystem::Imperial => self.distance,
            MeasuringSystem::Metric => self.distance * MILES_PER_KM,
        }
    }

    /// Average pace per mile, plus per kilometer for metric users
    pub fn pace(&self) -> Pace {
        let elapsed = self.elapsed_seconds as f64;
        let per_mile = ClockTime((elapsed / self.miles()).round() as u64);
        let per_km = match self.measuring {
            MeasuringSystem::Metric => Some(ClockTime((elapsed / self.distance).round() as u64)),
            MeasuringSystem::Imperial => None,
        };
        Pace { per_mile, per_km }
    }
}

/// Average pace of a workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pace {
    pub per_mile: ClockTime,
    pub per_km: Option<ClockTime>,
}

impl Pace {
    /// The pace in the user's own unit
    pub fn display(&self) -> ClockTime {
        self.per_km.unwrap_or(self.per_mile)
    }
}

/// Result of scoring a workout, before anything is persisted
#[derive(Clone, Debug, PartialEq)]
pub enum Score {
    /// Faster than 3:43/mi
    TooFast { pace: Pace },
    /// Outside every band; logged as a 0-point walk
    Disqualified { pace: Pace },
    Scored {
        pace: Pace,
        band: Band,
        minute_multiplier: f64,
        second_multiplier: f64,
        points: u64,
    },
}

/// Score a workout without touching any files
pub fn score(workout: &CardioWorkout) -> Result<Score> {
    workout.validate()?;
    let pace = workout.pace();

    if pace.per_mile.0 < FASTEST_PACE_SECONDS {
        tracing::info!("Rejected pace {} per mile as too fast", pace.per_mile);
        return Ok(Score::TooFast { pace });
    }

    let minute = pace.per_mile.total_minutes();
    let band = match Band::from_minute(minute) {
        Some(band) => band,
        None => return Ok(Score::Disqualified { pace }),
    };
    let m_xplier = match minute_multiplier(band, minute) {
        Some(m) => m,
        None => return Ok(Score::Disqualified { pace }),
    };
    let s_xplier = second_multiplier(pace.per_mile.seconds());

    let points = (band.base_points() * workout.scored_miles() * (m_xplier + s_xplier)).round();
    let points = points.max(0.0) as u64;

    tracing::debug!(
        "Scored {:?} at {} per mile: {} x {:.3} mi x ({} + {}) = {}",
        band,
        pace.per_mile,
        band.base_points(),
        workout.scored_miles(),
        m_xplier,
        s_xplier,
        points
    );

    Ok(Score::Scored {
        pace,
        band,
        minute_multiplier: m_xplier,
        second_multiplier: s_xplier,
        points,
    })
}

/// What happened when a workout was recorded
#[derive(Clone, Debug, PartialEq)]
pub enum CardioOutcome {
    /// Finish time is after `now`; nothing logged
    FutureDated,
    /// Faster than 3:43/mi; nothing logged
    TooFast { pace: Pace },
    /// Entry appended; `points` is 0 for a disqualified workout
    Logged { entry: LogEntry, points: u64, xp: i64 },
}

/// Score a workout, append it to the log and add its points to XP
///
/// A disqualified workout is still logged but leaves XP alone.
pub fn record_cardio(
    settings: &mut SettingsStore,
    logs: &LogStore,
    workout: &CardioWorkout,
    now: DateTime<Utc>,
) -> Result<CardioOutcome> {
    if workout.finished_at > now {
        return Ok(CardioOutcome::FutureDated);
    }

    let (pace, exercise, points) = match score(workout)? {
        Score::TooFast { pace } => return Ok(CardioOutcome::TooFast { pace }),
        Score::Disqualified { pace } => (pace, Exercise::Walk, 0),
        Score::Scored {
            pace, band, points, ..
        } => (pace, band.exercise(), points),
    };

    let entry = LogEntry {
        average: pace.display().to_string(),
        date: workout.date,
        distance: workout.distance,
        exercise,
        measuring: workout.measuring,
        points,
        total: Total::Elapsed(ClockTime(workout.elapsed_seconds).to_string()),
        utc: workout.finished_at.timestamp(),
    };
    logs.append_entry(&entry)?;

    let mut xp = settings.profile()?.xp;
    if points > 0 {
        xp += points as i64;
        settings.set_xp(xp);
        settings.commit()?;
        tracing::info!("Awarded {} points, XP now {}", points, xp);
    } else {
        tracing::info!("Workout logged without points");
    }

    Ok(CardioOutcome::Logged { entry, points, xp })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn workout(distance: f64, elapsed_seconds: u64, measuring: MeasuringSystem) -> CardioWorkout {
        CardioWorkout {
            distance,
            elapsed_seconds,
            measuring,
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2026, 10, 17, 18, 30, 0).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_ten_mile_run_scores_4400() {
        let w = workout(10.0, 70 * 60, MeasuringSystem::Imperial);
        match score(&w).unwrap() {
            Score::Scored {
                pace,
                band,
                minute_multiplier,
                second_multiplier,
                points,
            } => {
                assert_eq!(pace.per_mile.to_string(), "07:00");
                assert_eq!(band, Band::Run);
                assert_eq!(minute_multiplier, 0.9);
                assert_eq!(second_multiplier, 0.2);
                assert_eq!(points, 4400);
            }
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[test]
    fn test_too_fast_is_rejected() {
        let w = workout(5.0, 18 * 60, MeasuringSystem::Imperial);
        assert!(matches!(score(&w).unwrap(), Score::TooFast { .. }));

        // 3:43 exactly is allowed
        let w = workout(1.0, FASTEST_PACE_SECONDS, MeasuringSystem::Imperial);
        assert!(matches!(
            score(&w).unwrap(),
            Score::Scored { band: Band::Run, .. }
        ));
    }

    #[test]
    fn test_slow_walk_is_disqualified() {
        let w = workout(1.0, 29 * 60, MeasuringSystem::Imperial);
        assert!(matches!(score(&w).unwrap(), Score::Disqualified { .. }));

        let w = workout(1.0, 2 * 3600, MeasuringSystem::Imperial);
        assert!(matches!(score(&w).unwrap(), Score::Disqualified { .. }));
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(Band::from_minute(2), None);
        assert_eq!(Band::from_minute(3), Some(Band::Run));
        assert_eq!(Band::from_minute(9), Some(Band::Run));
        assert_eq!(Band::from_minute(10), Some(Band::Jog));
        assert_eq!(Band::from_minute(18), Some(Band::Jog));
        assert_eq!(Band::from_minute(19), Some(Band::Walk));
        assert_eq!(Band::from_minute(28), Some(Band::Walk));
        assert_eq!(Band::from_minute(29), None);
    }

    #[test]
    fn test_second_multiplier_breakpoints() {
        assert_eq!(second_multiplier(0), 0.20);
        assert_eq!(second_multiplier(15), 0.20);
        assert_eq!(second_multiplier(16), 0.15);
        assert_eq!(second_multiplier(30), 0.15);
        assert_eq!(second_multiplier(45), 0.10);
        assert_eq!(second_multiplier(46), 0.05);
        assert_eq!(second_multiplier(59), 0.05);
    }

    #[test]
    fn test_every_band_minute_has_a_multiplier() {
        for minute in 3..=28 {
            let band = Band::from_minute(minute).unwrap();
            assert!(minute_multiplier(band, minute).is_some(), "minute {}", minute);
        }
        assert_eq!(minute_multiplier(Band::Run, 10), None);
    }

    #[test]
    fn test_jog_multipliers_dip_at_fourteen_minutes() {
        let jog: Vec<f64> = (10..=18)
            .map(|m| minute_multiplier(Band::Jog, m).unwrap())
            .collect();
        assert_eq!(jog, vec![0.95, 0.8, 0.6, 0.4, 0.2, 0.35, 0.3, 0.25, 0.2]);
        assert_eq!(minute_multiplier(Band::Run, 3), Some(1.7));
        assert_eq!(minute_multiplier(Band::Run, 9), Some(0.5));
        assert_eq!(minute_multiplier(Band::Walk, 19), Some(0.5));
        assert_eq!(minute_multiplier(Band::Walk, 28), Some(0.05));
    }

    #[test]
    fn test_metric_distance() {
        // 10 km in 50:00 is 5:00/km, 8:03/mi
        let w = workout(10.0, 50 * 60, MeasuringSystem::Metric);
        let pace = w.pace();
        assert_eq!(pace.per_km, Some(ClockTime(300)));
        assert_eq!(pace.per_mile, ClockTime(483));
        assert_eq!(pace.display().to_string(), "05:00");

        match score(&w).unwrap() {
            Score::Scored { band, points, .. } => {
                assert_eq!(band, Band::Run);
                // 400 x 6.2137 x (0.7 + 0.2)
                assert_eq!(points, 2237);
            }
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_bounds() {
        assert!(workout(0.0, 600, MeasuringSystem::Imperial).validate().is_err());
        assert!(workout(50.0, 600, MeasuringSystem::Imperial).validate().is_err());
        assert!(workout(49.9, 36_000, MeasuringSystem::Imperial).validate().is_ok());
        assert!(workout(80.0, 36_000, MeasuringSystem::Metric).validate().is_ok());
        assert!(workout(81.0, 36_000, MeasuringSystem::Metric).validate().is_err());
        assert!(workout(1.0, 86_400, MeasuringSystem::Imperial).validate().is_err());
        assert!(workout(1.0, 0, MeasuringSystem::Imperial).validate().is_err());
    }

    fn stores(dir: &std::path::Path) -> (SettingsStore, LogStore) {
        let mut settings = SettingsStore::new(dir.join("settings.json"));
        crate::settings::tests::populate(&mut settings);
        settings.set_xp(100);
        settings.commit().unwrap();
        (settings, LogStore::new(dir.join("log.jsonl")))
    }

    #[test]
    fn test_record_cardio_logs_and_awards_xp() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path());

        let w = workout(10.0, 70 * 60, MeasuringSystem::Imperial);
        let outcome = record_cardio(&mut settings, &logs, &w, now()).unwrap();

        match outcome {
            CardioOutcome::Logged { entry, points, xp } => {
                assert_eq!(points, 4400);
                assert_eq!(xp, 4500);
                assert_eq!(entry.exercise, Exercise::Run);
                assert_eq!(entry.average, "07:00");
                assert_eq!(entry.total, Total::Elapsed("01:10:00".into()));
                assert_eq!(entry.utc, w.finished_at.timestamp());
                assert_eq!(logs.load_last_entry().unwrap(), Some(entry));
            }
            other => panic!("expected Logged, got {:?}", other),
        }

        let mut reloaded = SettingsStore::new(settings.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.xp(), Some(4500));
    }

    #[test]
    fn test_record_cardio_too_fast_changes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path());

        let w = workout(5.0, 18 * 60, MeasuringSystem::Imperial);
        let outcome = record_cardio(&mut settings, &logs, &w, now()).unwrap();

        assert!(matches!(outcome, CardioOutcome::TooFast { .. }));
        assert_eq!(logs.load_last_entry().unwrap(), None);
        assert_eq!(settings.xp(), Some(100));
    }

    #[test]
    fn test_record_cardio_disqualified_logs_zero_points() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path());

        let w = workout(1.0, 40 * 60, MeasuringSystem::Imperial);
        let outcome = record_cardio(&mut settings, &logs, &w, now()).unwrap();

        match outcome {
            CardioOutcome::Logged { entry, points, xp } => {
                assert_eq!(points, 0);
                assert_eq!(xp, 100);
                assert_eq!(entry.exercise, Exercise::Walk);
            }
            other => panic!("expected Logged, got {:?}", other),
        }
        assert_eq!(logs.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_record_cardio_refuses_future() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path());

        let mut w = workout(3.0, 30 * 60, MeasuringSystem::Imperial);
        w.finished_at = now() + chrono::Duration::hours(1);
        let outcome = record_cardio(&mut settings, &logs, &w, now()).unwrap();

        assert_eq!(outcome, CardioOutcome::FutureDated);
        assert_eq!(logs.load_last_entry().unwrap(), None);
    }
}
