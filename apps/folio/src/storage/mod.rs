//! Durable key-value preferences, persisted as a JSON file.
//!
//! The process-local stand-in for browser local storage: two string keys,
//! no schema versioning. Reads of a missing file are `None`, not errors;
//! everything else surfaces as [`AppError::Storage`] for the caller to
//! absorb (the coordinators continue with in-memory state only).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Key the active theme id is persisted under.
pub const THEME_KEY: &str = "theme";
/// Key the preferred language code is persisted under.
pub const LANGUAGE_KEY: &str = "language";

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(storage_dir: &Path) -> Self {
        Self {
            path: storage_dir.join("preferences.json"),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "read {}: {err}",
                    self.path.display()
                )))
            }
        };
        let map: HashMap<String, String> = serde_json::from_str(&contents).map_err(|err| {
            AppError::Storage(format!("parse {}: {err}", self.path.display()))
        })?;
        Ok(map.get(key).cloned())
    }

    /// Writes `key` = `value`, creating the storage directory on first use.
    /// A corrupt preferences file is replaced rather than kept broken.
    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut map: HashMap<String, String> = fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Storage(format!("create {}: {err}", parent.display()))
            })?;
        }
        let contents = serde_json::to_string_pretty(&map)
            .map_err(|err| AppError::Storage(format!("serialize preferences: {err}")))?;
        fs::write(&self.path, contents).map_err(|err| {
            AppError::Storage(format!("write {}: {err}", self.path.display()))
        })
    }
}
