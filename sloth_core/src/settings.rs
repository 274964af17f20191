//! Settings store: the user's profile, body measurements, stats and XP.
//!
//! The settings live in a single JSON object with exactly fourteen keys.
//! Fields are held in memory until `commit()`, which is the only write path.

use crate::schema::diff_keys;
use crate::{Error, Goal, MeasuringSystem, Result, Sex, Stats};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Every key a settings file must contain, and nothing else
pub const SETTINGS_KEYS: &[&str] = &[
    "Age",
    "Agility",
    "Charisma",
    "Defense",
    "Endurance",
    "Goal",
    "Height",
    "Intelligence",
    "Name",
    "Sex",
    "Strength",
    "Type",
    "Weight",
    "XP",
];

/// On-disk settings record; a field is `None` until it has been populated
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
struct SettingsRecord {
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    birth_date: Option<NaiveDate>,
    #[serde(rename = "Agility", skip_serializing_if = "Option::is_none")]
    agility: Option<u8>,
    #[serde(rename = "Charisma", skip_serializing_if = "Option::is_none")]
    charisma: Option<u8>,
    #[serde(rename = "Defense", skip_serializing_if = "Option::is_none")]
    defense: Option<u8>,
    #[serde(rename = "Endurance", skip_serializing_if = "Option::is_none")]
    endurance: Option<u8>,
    #[serde(rename = "Goal", skip_serializing_if = "Option::is_none")]
    goal: Option<Goal>,
    #[serde(rename = "Height", skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(rename = "Intelligence", skip_serializing_if = "Option::is_none")]
    intelligence: Option<u8>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Sex", skip_serializing_if = "Option::is_none")]
    sex: Option<Sex>,
    #[serde(rename = "Strength", skip_serializing_if = "Option::is_none")]
    strength: Option<u8>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    measuring: Option<MeasuringSystem>,
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(rename = "XP", skip_serializing_if = "Option::is_none")]
    xp: Option<i64>,
}

/// A fully populated settings record
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub measuring: MeasuringSystem,
    pub height: f64,
    pub weight: f64,
    pub goal: Goal,
    pub stats: Stats,
    pub xp: i64,
}

/// Manages the settings file
///
/// Load with [`SettingsStore::load`], read and change fields through the
/// accessors, then persist with [`SettingsStore::commit`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    record: SettingsRecord,
}

macro_rules! settings_field {
    ($get:ident, $set:ident, $field:ident, $ty:ty) => {
        pub fn $get(&self) -> Option<$ty> {
            self.record.$field.clone()
        }

        pub fn $set(&mut self, value: $ty) {
            self.record.$field = Some(value);
        }
    };
}

impl SettingsStore {
    /// Create an empty store bound to `path`; nothing is read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            record: SettingsRecord::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the settings file and verify its keys against the schema
    pub fn load(&mut self) -> Result<()> {
        let contents = std::fs::read_to_string(&self.path)?;
        let object: Map<String, Value> = serde_json::from_str(&contents)?;
        self.verify_keys(&object)?;
        self.record = serde_json::from_value(Value::Object(object))?;
        tracing::debug!("Loaded settings from {:?}", self.path);
        Ok(())
    }

    /// Save the settings if every schema key is populated
    ///
    /// The record is serialized before the file is touched, then written to a
    /// temp file in the same directory and renamed over the original.
    pub fn commit(&self) -> Result<()> {
        let object = match serde_json::to_value(&self.record)? {
            Value::Object(map) => map,
            _ => return Err(Error::Other("settings did not encode to an object".into())),
        };
        self.verify_keys(&object)?;
        // serde_json's Map is ordered by key, so the output is sorted
        let contents = serde_json::to_string(&object)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let temp = NamedTempFile::new_in(&parent)?;
        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Committed settings to {:?}", self.path);
        Ok(())
    }

    fn verify_keys(&self, object: &Map<String, Value>) -> Result<()> {
        match diff_keys(SETTINGS_KEYS, object) {
            None => Ok(()),
            Some(mismatch) => Err(Error::ImproperlyConfigured {
                path: self.path.clone(),
                missing: mismatch.missing,
                extra: mismatch.extra,
            }),
        }
    }

    settings_field!(name, set_name, name, String);
    settings_field!(birth_date, set_birth_date, birth_date, NaiveDate);
    settings_field!(sex, set_sex, sex, Sex);
    settings_field!(measuring, set_measuring, measuring, MeasuringSystem);
    settings_field!(height, set_height, height, f64);
    settings_field!(weight, set_weight, weight, f64);
    settings_field!(goal, set_goal, goal, Goal);
    settings_field!(agility, set_agility, agility, u8);
    settings_field!(charisma, set_charisma, charisma, u8);
    settings_field!(defense, set_defense, defense, u8);
    settings_field!(endurance, set_endurance, endurance, u8);
    settings_field!(intelligence, set_intelligence, intelligence, u8);
    settings_field!(strength, set_strength, strength, u8);
    settings_field!(xp, set_xp, xp, i64);

    /// Set all six stats at once
    pub fn set_stats(&mut self, stats: Stats) {
        self.set_agility(stats.agility);
        self.set_charisma(stats.charisma);
        self.set_defense(stats.defense);
        self.set_endurance(stats.endurance);
        self.set_intelligence(stats.intelligence);
        self.set_strength(stats.strength);
    }

    /// A typed snapshot of the settings, failing if any field is unpopulated
    pub fn profile(&self) -> Result<Profile> {
        let r = &self.record;
        let missing = |key: &str| Error::ImproperlyConfigured {
            path: self.path.clone(),
            missing: std::iter::once(key.to_string()).collect(),
            extra: Default::default(),
        };

        Ok(Profile {
            name: r.name.clone().ok_or_else(|| missing("Name"))?,
            birth_date: r.birth_date.ok_or_else(|| missing("Age"))?,
            sex: r.sex.ok_or_else(|| missing("Sex"))?,
            measuring: r.measuring.ok_or_else(|| missing("Type"))?,
            height: r.height.ok_or_else(|| missing("Height"))?,
            weight: r.weight.ok_or_else(|| missing("Weight"))?,
            goal: r.goal.ok_or_else(|| missing("Goal"))?,
            stats: Stats {
                agility: r.agility.ok_or_else(|| missing("Agility"))?,
                charisma: r.charisma.ok_or_else(|| missing("Charisma"))?,
                defense: r.defense.ok_or_else(|| missing("Defense"))?,
                endurance: r.endurance.ok_or_else(|| missing("Endurance"))?,
                intelligence: r.intelligence.ok_or_else(|| missing("Intelligence"))?,
                strength: r.strength.ok_or_else(|| missing("Strength"))?,
            },
            xp: r.xp.ok_or_else(|| missing("XP"))?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn populate(store: &mut SettingsStore) {
        store.set_name("Scott".into());
        store.set_birth_date(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());
        store.set_sex(Sex::Male);
        store.set_measuring(MeasuringSystem::Imperial);
        store.set_height(70.0);
        store.set_weight(180.0);
        store.set_goal(Goal::Cardio);
        store.set_stats(Stats {
            agility: 5,
            charisma: 4,
            defense: 4,
            endurance: 5,
            intelligence: 4,
            strength: 4,
        });
        store.set_xp(0);
    }

    #[test]
    fn test_commit_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.set_xp(1234);
        store.commit().unwrap();

        let mut loaded = SettingsStore::new(&path);
        loaded.load().unwrap();
        assert_eq!(loaded.name(), Some("Scott".to_string()));
        assert_eq!(loaded.xp(), Some(1234));
        assert_eq!(loaded.profile().unwrap(), store.profile().unwrap());
    }

    #[test]
    fn test_load_commit_is_byte_stable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.set_height(1.78);
        store.set_weight(81.5);
        store.commit().unwrap();
        let first = std::fs::read(&path).unwrap();

        let mut reloaded = SettingsStore::new(&path);
        reloaded.load().unwrap();
        reloaded.commit().unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_are_sorted_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.commit().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let positions: Vec<usize> = SETTINGS_KEYS
            .iter()
            .map(|key| contents.find(&format!("\"{}\":", key)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_commit_missing_xp_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.record.xp = None;

        match store.commit() {
            Err(Error::ImproperlyConfigured { missing, extra, .. }) => {
                assert_eq!(missing, std::iter::once("XP".to_string()).collect());
                assert!(extra.is_empty());
            }
            other => panic!("expected ImproperlyConfigured, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_load_rejects_extra_and_missing_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.commit().unwrap();

        let mut object: Map<String, Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        object.remove("Goal");
        object.insert("UnexpectedKey".into(), Value::String("Unexpected".into()));
        std::fs::write(&path, serde_json::to_string(&object).unwrap()).unwrap();

        let mut loaded = SettingsStore::new(&path);
        match loaded.load() {
            Err(Error::ImproperlyConfigured { missing, extra, .. }) => {
                assert_eq!(missing, std::iter::once("Goal".to_string()).collect());
                assert_eq!(
                    extra,
                    std::iter::once("UnexpectedKey".to_string()).collect()
                );
            }
            other => panic!("expected ImproperlyConfigured, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_commit_keeps_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = SettingsStore::new(&path);
        populate(&mut store);
        store.commit().unwrap();
        let before = std::fs::read(&path).unwrap();

        store.record.name = None;
        assert!(store.commit().is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_profile_requires_every_field() {
        let mut store = SettingsStore::new("unused.json");
        store.set_name("Scott".into());
        assert!(matches!(
            store.profile(),
            Err(Error::ImproperlyConfigured { .. })
        ));
    }
}
