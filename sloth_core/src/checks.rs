//! Start-up consistency checks.
//!
//! The settings file stores XP for convenience, but the log is authoritative:
//! at every start the XP is recomputed from the log and written back if the
//! two disagree.

use crate::level::{level_for, MAX_SUPPORTED_XP};
use crate::log::LogStore;
use crate::settings::{Profile, SettingsStore};
use crate::{Error, Result};

/// Level and XP shown after the checks pass
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    pub profile: Profile,
    pub xp: i64,
    pub level: u32,
}

impl Standing {
    /// `Name/Sex` then `Lvl N/XP X`
    pub fn greeting(&self) -> String {
        format!(
            "{}/{}\nLvl {}/XP {}",
            self.profile.name,
            self.profile.sex.code(),
            self.level,
            self.xp
        )
    }
}

/// Replace the stored XP with what the log accounts for
///
/// An empty or missing log means 0 XP. Returns the reconciled XP.
pub fn reconcile_xp(settings: &mut SettingsStore, logs: &LogStore) -> Result<i64> {
    let log_xp = match logs.check_log()? {
        Some(totals) => totals.net(),
        None => 0,
    };

    if log_xp < 0 {
        return Err(Error::CorruptedState(format!(
            "log at {:?} accounts for negative XP ({})",
            logs.path(),
            log_xp
        )));
    }

    if settings.xp() != Some(log_xp) {
        tracing::warn!(
            "Settings XP {:?} disagrees with log XP {}; using the log",
            settings.xp(),
            log_xp
        );
        settings.set_xp(log_xp);
        settings.commit()?;
    }

    Ok(log_xp)
}

/// Validate the profile, reconcile XP against the log and compute the level
pub fn personal_checks(settings: &mut SettingsStore, logs: &LogStore) -> Result<Standing> {
    let profile = settings.profile()?;
    if !profile.stats.is_valid() {
        return Err(Error::CorruptedState(format!(
            "stats must each be 0-10 and total 26, found {:?}",
            profile.stats
        )));
    }

    let xp = reconcile_xp(settings, logs)?;
    if xp > MAX_SUPPORTED_XP {
        return Err(Error::UnsupportedXp(xp));
    }
    let level = level_for(xp)?;

    Ok(Standing {
        profile: settings.profile()?,
        xp,
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::tests::{deterioration, workout};
    use crate::Stats;

    fn stores(dir: &std::path::Path, xp: i64) -> (SettingsStore, LogStore) {
        let mut settings = SettingsStore::new(dir.join("settings.json"));
        crate::settings::tests::populate(&mut settings);
        settings.set_xp(xp);
        settings.commit().unwrap();
        (settings, LogStore::new(dir.join("log.jsonl")))
    }

    #[test]
    fn test_empty_log_resets_xp() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path(), 500);

        assert_eq!(reconcile_xp(&mut settings, &logs).unwrap(), 0);

        let mut reloaded = SettingsStore::new(settings.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.xp(), Some(0));
    }

    #[test]
    fn test_log_overrides_tampered_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path(), 99_999);
        logs.append_entry(&workout(4400, 1)).unwrap();
        logs.append_entry(&deterioration(880, 2)).unwrap();

        let standing = personal_checks(&mut settings, &logs).unwrap();
        assert_eq!(standing.xp, 3520);
        assert_eq!(standing.level, 4);
        assert_eq!(settings.xp(), Some(3520));
        assert_eq!(standing.greeting(), "Scott/M\nLvl 4/XP 3520");
    }

    #[test]
    fn test_negative_log_is_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path(), 0);
        logs.append_entry(&workout(100, 1)).unwrap();
        logs.append_entry(&deterioration(500, 2)).unwrap();

        assert!(matches!(
            reconcile_xp(&mut settings, &logs),
            Err(Error::CorruptedState(_))
        ));
    }

    #[test]
    fn test_xp_beyond_table_is_unsupported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path(), 0);
        logs.append_entry(&workout(90_751, 1)).unwrap();

        assert!(matches!(
            personal_checks(&mut settings, &logs),
            Err(Error::UnsupportedXp(90_751))
        ));
    }

    #[test]
    fn test_bad_stats_are_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut settings, logs) = stores(temp_dir.path(), 0);
        settings.set_stats(Stats {
            agility: 10,
            ..Stats::default()
        });

        assert!(matches!(
            personal_checks(&mut settings, &logs),
            Err(Error::CorruptedState(_))
        ));
    }
}
