//! Asset type table: where each kind of asset lives and which file extensions it accepts.

use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const GRAPHIC_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];
pub const AUDIO_EXTENSIONS: &[&str] = &[".ogg", ".wav", ".mp3", ".mid"];

/// Asset category referenced by project data.
///
/// Declaration order is the iteration order of collected references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Animation,
    Battleback1,
    Battleback2,
    Battler,
    Character,
    Face,
    Parallax,
    Picture,
    System,
    Tileset,
    Title1,
    Title2,
    Bgm,
    Bgs,
    Me,
    Se,
}

impl AssetType {
    pub const ALL: [AssetType; 16] = [
        AssetType::Animation,
        AssetType::Battleback1,
        AssetType::Battleback2,
        AssetType::Battler,
        AssetType::Character,
        AssetType::Face,
        AssetType::Parallax,
        AssetType::Picture,
        AssetType::System,
        AssetType::Tileset,
        AssetType::Title1,
        AssetType::Title2,
        AssetType::Bgm,
        AssetType::Bgs,
        AssetType::Me,
        AssetType::Se,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Animation => "animation",
            AssetType::Battleback1 => "battleback1",
            AssetType::Battleback2 => "battleback2",
            AssetType::Battler => "battler",
            AssetType::Character => "character",
            AssetType::Face => "face",
            AssetType::Parallax => "parallax",
            AssetType::Picture => "picture",
            AssetType::System => "system",
            AssetType::Tileset => "tileset",
            AssetType::Title1 => "title1",
            AssetType::Title2 => "title2",
            AssetType::Bgm => "bgm",
            AssetType::Bgs => "bgs",
            AssetType::Me => "me",
            AssetType::Se => "se",
        }
    }

    pub fn default_folder(&self) -> &'static str {
        match self {
            AssetType::Animation => "Graphics/Animations",
            AssetType::Battleback1 => "Graphics/Battlebacks1",
            AssetType::Battleback2 => "Graphics/Battlebacks2",
            AssetType::Battler => "Graphics/Battlers",
            AssetType::Character => "Graphics/Characters",
            AssetType::Face => "Graphics/Faces",
            AssetType::Parallax => "Graphics/Parallaxes",
            AssetType::Picture => "Graphics/Pictures",
            AssetType::System => "Graphics/System",
            AssetType::Tileset => "Graphics/Tilesets",
            AssetType::Title1 => "Graphics/Titles1",
            AssetType::Title2 => "Graphics/Titles2",
            AssetType::Bgm => "Audio/BGM",
            AssetType::Bgs => "Audio/BGS",
            AssetType::Me => "Audio/ME",
            AssetType::Se => "Audio/SE",
        }
    }

    pub fn extension_class(&self) -> ExtensionClass {
        match self {
            AssetType::Bgm | AssetType::Bgs | AssetType::Me | AssetType::Se => {
                ExtensionClass::Audio
            }
            _ => ExtensionClass::Graphic,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MigrationError::UnknownAssetType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionClass {
    Graphic,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTypeDescriptor {
    pub asset_type: AssetType,
    /// Project-relative directory
    pub folder: PathBuf,
    pub class: ExtensionClass,
}

/// Immutable lookup table built once per run.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    descriptors: BTreeMap<AssetType, AssetTypeDescriptor>,
    graphic_extensions: Vec<String>,
    audio_extensions: Vec<String>,
}

impl AssetCatalog {
    /// Build a catalog from explicit parts. Call [`AssetCatalog::validate`] before use.
    pub fn from_parts(
        descriptors: impl IntoIterator<Item = AssetTypeDescriptor>,
        graphic_extensions: Vec<String>,
        audio_extensions: Vec<String>,
    ) -> Self {
        Self {
            descriptors: descriptors
                .into_iter()
                .map(|d| (d.asset_type, d))
                .collect(),
            graphic_extensions,
            audio_extensions,
        }
    }

    /// Default table with folder and extension overrides applied.
    pub fn from_config(config: &MigrationConfig) -> Result<Self> {
        let descriptors = AssetType::ALL.into_iter().map(|asset_type| AssetTypeDescriptor {
            asset_type,
            folder: config
                .folders
                .get(&asset_type)
                .cloned()
                .unwrap_or_else(|| PathBuf::from(asset_type.default_folder())),
            class: asset_type.extension_class(),
        });

        let catalog = Self::from_parts(
            descriptors,
            normalize_extensions(&config.graphic_extensions),
            normalize_extensions(&config.audio_extensions),
        );
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every known asset type must have a descriptor and both extension lists must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if let Some(missing) = AssetType::ALL
            .iter()
            .find(|t| !self.descriptors.contains_key(t))
        {
            return Err(MigrationError::UnknownAssetType(missing.to_string()));
        }
        if self.graphic_extensions.is_empty() {
            return Err(MigrationError::Config(
                "graphic extension list is empty".to_string(),
            ));
        }
        if self.audio_extensions.is_empty() {
            return Err(MigrationError::Config(
                "audio extension list is empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn descriptor(&self, asset_type: AssetType) -> Result<&AssetTypeDescriptor> {
        self.descriptors
            .get(&asset_type)
            .ok_or_else(|| MigrationError::UnknownAssetType(asset_type.to_string()))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AssetTypeDescriptor> {
        self.descriptors.values()
    }

    pub fn folder_for(&self, asset_type: AssetType) -> Result<&Path> {
        self.descriptor(asset_type).map(|d| d.folder.as_path())
    }

    /// Candidate extensions in precedence order.
    pub fn extensions_for(&self, asset_type: AssetType) -> Result<&[String]> {
        let descriptor = self.descriptor(asset_type)?;
        Ok(match descriptor.class {
            ExtensionClass::Graphic => &self.graphic_extensions,
            ExtensionClass::Audio => &self.audio_extensions,
        })
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::from_parts(
            AssetType::ALL.into_iter().map(|asset_type| AssetTypeDescriptor {
                asset_type,
                folder: PathBuf::from(asset_type.default_folder()),
                class: asset_type.extension_class(),
            }),
            GRAPHIC_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// Accept both "png" and ".png" in configuration.
fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| {
            if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{}", e)
            }
        })
        .collect()
}
