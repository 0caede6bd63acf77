use crate::config::Settings;
use crate::model::TaskBook;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HOME_ENV: &str = "PATRO_HOME";
pub const SETTINGS_SLOT: &str = "settings.yml";
pub const TASKS_SLOT: &str = "tasks.yml";

/// Directory holding one YAML file per storage slot.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// `$PATRO_HOME` when set, otherwise the platform data directory.
    pub fn locate() -> Result<Self> {
        if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Store::at(home));
        }
        let dirs = ProjectDirs::from("", "", "patro").context("locating data directory")?;
        Ok(Store::at(dirs.data_dir()))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Store { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(slot)
    }

    /// Reads the settings slot without validating it, so a broken file can
    /// still be repaired through `settings set`.
    pub fn read_settings(&self) -> Result<Settings> {
        self.load_slot(SETTINGS_SLOT)
    }

    pub fn check_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate().with_context(|| {
            format!(
                "validating {:?} (repair with `patro settings set`)",
                self.slot_path(SETTINGS_SLOT)
            )
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save_slot(SETTINGS_SLOT, settings)
    }

    pub fn load_tasks(&self) -> Result<TaskBook> {
        self.load_slot(TASKS_SLOT)
    }

    pub fn save_tasks(&self, book: &TaskBook) -> Result<()> {
        self.save_slot(TASKS_SLOT, book)
    }

    fn load_slot<T: DeserializeOwned + Default>(&self, slot: &str) -> Result<T> {
        let path = self.slot_path(slot);
        if !path.exists() {
            debug!(path = %path.display(), "slot missing, using defaults");
            return Ok(T::default());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        if data.trim().is_empty() {
            return Ok(T::default());
        }
        let value = serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))?;
        debug!(path = %path.display(), "slot loaded");
        Ok(value)
    }

    fn save_slot<T: Serialize>(&self, slot: &str, value: &T) -> Result<()> {
        let path = self.slot_path(slot);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        let serialized = serde_yaml::to_string(value).context("serializing slot")?;
        fs::write(&path, serialized).with_context(|| format!("writing {:?}", path))?;
        debug!(path = %path.display(), "slot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use patro::bs_date_key;

    #[test]
    fn missing_slots_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("nested"));
        assert_eq!(store.read_settings().unwrap(), Settings::default());
        assert!(store.load_tasks().unwrap().tasks.is_empty());
    }

    #[test]
    fn tasks_round_trip_through_their_own_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("nested"));
        let date = bs_date_key(2082, 3, 26);
        let mut book = TaskBook::default();
        book.add_task(date.clone(), Task::new("abc123".into(), "write report".into()))
            .unwrap();
        store.save_tasks(&book).unwrap();

        assert!(store.slot_path(TASKS_SLOT).exists());
        assert!(!store.slot_path(SETTINGS_SLOT).exists());

        let raw = fs::read_to_string(store.slot_path(TASKS_SLOT)).unwrap();
        assert!(raw.contains("2082-04-26-BS"));

        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded.tasks_on(&date), book.tasks_on(&date));
    }

    #[test]
    fn invalid_settings_are_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        fs::write(store.slot_path(SETTINGS_SLOT), "focus_minutes: 0\n").unwrap();
        let settings = store.read_settings().unwrap();
        assert_eq!(settings.focus_minutes, 0);
        let err = store.check_settings(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("focus_minutes"));
    }

    #[test]
    fn saved_settings_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        let settings = Settings {
            focus_minutes: 50,
            log_level: "debug".into(),
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();
        let loaded = store.read_settings().unwrap();
        assert_eq!(loaded, settings);
        assert!(store.check_settings(&loaded).is_ok());
    }
}
