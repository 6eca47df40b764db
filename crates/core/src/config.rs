use crate::asset::catalog::{AUDIO_EXTENSIONS, AssetType, GRAPHIC_EXTENSIONS};
use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the optional per-project config file.
pub const CONFIG_FILE_NAME: &str = "rtpsync.json";

/// System graphics every game needs whether or not the data mentions them.
pub const STANDARD_SYSTEM_FILES: &[&str] = &[
    "Balloon",
    "BattleStart",
    "GameOver",
    "IconSet",
    "Shadow",
    "Window",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Project-relative directory holding the exported database
    pub data_dir: PathBuf,
    pub runtime_path: Option<PathBuf>,
    pub graphic_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub standard_system_files: Vec<String>,
    pub folders: BTreeMap<AssetType, PathBuf>,
    pub dry_run: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            runtime_path: None,
            graphic_extensions: GRAPHIC_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            audio_extensions: AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            standard_system_files: STANDARD_SYSTEM_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            folders: BTreeMap::new(),
            dry_run: false,
        }
    }
}

impl MigrationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| MigrationError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Reads `rtpsync.json` from the project root, falling back to defaults when absent.
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}
