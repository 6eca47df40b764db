//! JSON export loader.
//!
//! Reads `<data_dir>/Actors.json`, ..., `<data_dir>/System.json` and every `MapNNN.json`.
//! A missing file is an empty collection, unparsable files and records are logged and skipped.

use super::{DataKind, ProjectData, ProjectDataSource};
use crate::error::{MigrationError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

static MAP_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Map(\d+)\.json$").expect("map file pattern is valid"));

pub struct JsonDataSource {
    data_dir: PathBuf,
}

impl JsonDataSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn collection_path(&self, kind: DataKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.file_stem()))
    }

    /// Reads a JSON file, returning `None` when it is absent or not valid JSON.
    fn read_value(path: &Path) -> Result<Option<Value>> {
        if !path.is_file() {
            debug!("No data file at {}", path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Skipping unreadable data file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn load_collection<T: DeserializeOwned>(&self, kind: DataKind) -> Result<Vec<Option<T>>> {
        let path = self.collection_path(kind);
        let Some(value) = Self::read_value(&path)? else {
            return Ok(Vec::new());
        };
        let Value::Array(entries) = value else {
            warn!("Expected an array in {}, skipping", path.display());
            return Ok(Vec::new());
        };

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| decode_record(kind, index, entry))
            .collect())
    }

    fn load_object<T: DeserializeOwned>(&self, kind: DataKind, path: &Path) -> Result<Option<T>> {
        match Self::read_value(path)? {
            Some(value) => Ok(decode_record(kind, 0, value)),
            None => Ok(None),
        }
    }

    /// `MapNNN.json` files directly under the data directory, ordered by map id.
    pub fn map_files(&self) -> Vec<(u32, PathBuf)> {
        if !self.data_dir.is_dir() {
            return Vec::new();
        }

        let mut maps: Vec<(u32, PathBuf)> = WalkDir::new(&self.data_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?;
                let id = MAP_FILE.captures(name)?.get(1)?.as_str().parse().ok()?;
                Some((id, e.path().to_path_buf()))
            })
            .collect();

        maps.sort_by_key(|(id, _)| *id);
        maps
    }

    fn load_maps(&self) -> Result<Vec<Option<crate::model::Map>>> {
        self.map_files()
            .into_iter()
            .map(|(_, path)| self.load_object(DataKind::Maps, &path))
            .collect()
    }
}

impl ProjectDataSource for JsonDataSource {
    fn load(&self) -> Result<ProjectData> {
        if !self.data_dir.is_dir() {
            warn!(
                "Data directory {} does not exist, scanning an empty project",
                self.data_dir.display()
            );
        }

        let data = ProjectData {
            actors: self.load_collection(DataKind::Actors)?,
            classes: self.load_collection(DataKind::Classes)?,
            skills: self.load_collection(DataKind::Skills)?,
            items: self.load_collection(DataKind::Items)?,
            weapons: self.load_collection(DataKind::Weapons)?,
            armors: self.load_collection(DataKind::Armors)?,
            enemies: self.load_collection(DataKind::Enemies)?,
            animations: self.load_collection(DataKind::Animations)?,
            tilesets: self.load_collection(DataKind::Tilesets)?,
            common_events: self.load_collection(DataKind::CommonEvents)?,
            troops: self.load_collection(DataKind::Troops)?,
            system: self.load_object(DataKind::System, &self.collection_path(DataKind::System))?,
            maps: self.load_maps()?,
        };

        info!(
            "Loaded project data from {} ({} maps)",
            self.data_dir.display(),
            data.maps.len()
        );
        Ok(data)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// `null` slots stay empty; records that do not match their shape are dropped with a warning.
fn decode_record<T: DeserializeOwned>(kind: DataKind, index: usize, value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            let err = MigrationError::MalformedRecord {
                kind: kind.to_string(),
                index,
                reason: e.to_string(),
            };
            warn!("Skipping record: {}", err);
            None
        }
    }
}
