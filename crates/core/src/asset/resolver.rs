//! Per-reference resolution against the project tree and the runtime library.

use super::catalog::AssetCatalog;
use super::collector::AssetReference;
use crate::error::{MigrationError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TEMP_SUFFIX: &str = ".rtpsync-tmp";

/// Where a reference stands before anything is copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The project already has a file under one of the accepted extensions
    Present(PathBuf),
    /// First runtime library match in extension precedence order
    Source {
        source: PathBuf,
        destination: PathBuf,
        extension: String,
    },
    Missing,
}

/// Final disposition of one reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    AlreadyPresent {
        path: PathBuf,
    },
    Copied {
        source: PathBuf,
        destination: PathBuf,
        extension: String,
    },
    /// Dry run: would have been copied
    Planned {
        source: PathBuf,
        destination: PathBuf,
        extension: String,
    },
    Missing,
    Failed {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },
}

impl MigrationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            MigrationOutcome::AlreadyPresent { .. } => "present",
            MigrationOutcome::Copied { .. } => "copied",
            MigrationOutcome::Planned { .. } => "planned",
            MigrationOutcome::Missing => "missing",
            MigrationOutcome::Failed { .. } => "failed",
        }
    }
}

pub struct AssetResolver<'a> {
    catalog: &'a AssetCatalog,
    project_root: PathBuf,
    runtime_root: PathBuf,
}

impl<'a> AssetResolver<'a> {
    pub fn new(
        catalog: &'a AssetCatalog,
        project_root: impl Into<PathBuf>,
        runtime_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            project_root: project_root.into(),
            runtime_root: runtime_root.into(),
        }
    }

    /// Decide without touching the filesystem beyond existence checks.
    ///
    /// The runtime library is only consulted when no accepted extension exists in the project.
    pub fn locate(&self, reference: &AssetReference) -> Result<Resolution> {
        let folder = self.catalog.folder_for(reference.asset_type)?;
        let extensions = self.catalog.extensions_for(reference.asset_type)?;
        let project_dir = self.project_root.join(folder);

        for ext in extensions {
            let existing = project_dir.join(file_name(&reference.name, ext));
            if existing.exists() {
                return Ok(Resolution::Present(existing));
            }
        }

        let library_dir = self.runtime_root.join(folder);
        for ext in extensions {
            let candidate = library_dir.join(file_name(&reference.name, ext));
            if candidate.is_file() {
                return Ok(Resolution::Source {
                    source: candidate,
                    destination: project_dir.join(file_name(&reference.name, ext)),
                    extension: ext.clone(),
                });
            }
        }

        Ok(Resolution::Missing)
    }

    /// Locate and copy. Copy failures are captured in the outcome; only catalog errors return `Err`.
    pub fn resolve(&self, reference: &AssetReference) -> Result<MigrationOutcome> {
        Ok(match self.locate(reference)? {
            Resolution::Present(path) => {
                debug!("Already present: {}", path.display());
                MigrationOutcome::AlreadyPresent { path }
            }
            Resolution::Source {
                source,
                destination,
                extension,
            } => {
                info!("Copying: {}{}", reference.name, extension);
                match copy_asset(&source, &destination) {
                    Ok(()) => MigrationOutcome::Copied {
                        source,
                        destination,
                        extension,
                    },
                    Err(e) => {
                        warn!("Error copying: {}", e);
                        MigrationOutcome::Failed {
                            source,
                            destination,
                            error: e.to_string(),
                        }
                    }
                }
            }
            Resolution::Missing => {
                info!("Not found: {} ({})", reference.name, reference.asset_type);
                MigrationOutcome::Missing
            }
        })
    }

    /// Like [`AssetResolver::resolve`] but never writes.
    pub fn plan(&self, reference: &AssetReference) -> Result<MigrationOutcome> {
        Ok(match self.locate(reference)? {
            Resolution::Present(path) => MigrationOutcome::AlreadyPresent { path },
            Resolution::Source {
                source,
                destination,
                extension,
            } => MigrationOutcome::Planned {
                source,
                destination,
                extension,
            },
            Resolution::Missing => MigrationOutcome::Missing,
        })
    }
}

fn file_name(name: &str, ext: &str) -> String {
    format!("{}{}", name, ext)
}

/// Copy to a temporary sibling, then rename, so no partial destination is ever visible.
pub fn copy_asset(source: &Path, destination: &Path) -> Result<()> {
    let wrap = |cause: std::io::Error| MigrationError::CopyFailed {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        cause,
    };

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut temp_name = destination.as_os_str().to_os_string();
    temp_name.push(TEMP_SUFFIX);
    let temp_path = PathBuf::from(temp_name);

    let copied = std::fs::copy(source, &temp_path)
        .and_then(|_| std::fs::rename(&temp_path, destination));
    if let Err(cause) = copied {
        let _ = std::fs::remove_file(&temp_path);
        return Err(wrap(cause));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::catalog::AssetType;
    use std::fs;

    struct Fixture {
        _temp: tempfile::TempDir,
        project: PathBuf,
        rtp: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().join("project");
        let rtp = temp.path().join("rtp");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(&rtp).unwrap();
        Fixture {
            _temp: temp,
            project,
            rtp,
        }
    }

    fn put(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_copies_from_runtime_library() {
        let fx = fixture();
        put(&fx.rtp, "Graphics/Characters/Hero.png", b"hero-bytes");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::Character, "Hero"))
            .unwrap();

        let dest = fx.project.join("Graphics/Characters/Hero.png");
        assert_eq!(
            outcome,
            MigrationOutcome::Copied {
                source: fx.rtp.join("Graphics/Characters/Hero.png"),
                destination: dest.clone(),
                extension: ".png".to_string(),
            }
        );
        assert_eq!(fs::read(&dest).unwrap(), b"hero-bytes");
        assert!(!fx.project.join("Graphics/Characters/Hero.png.rtpsync-tmp").exists());
    }

    #[test]
    fn test_extension_precedence() {
        let fx = fixture();
        put(&fx.rtp, "Graphics/Faces/Foo.jpg", b"jpg");
        put(&fx.rtp, "Graphics/Faces/Foo.png", b"png");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let resolution = resolver
            .locate(&AssetReference::new(AssetType::Face, "Foo"))
            .unwrap();

        assert!(matches!(
            resolution,
            Resolution::Source { ref extension, .. } if extension == ".png"
        ));
    }

    #[test]
    fn test_present_in_project_skips_library() {
        let fx = fixture();
        put(&fx.project, "Graphics/Faces/Foo.jpg", b"project");
        put(&fx.rtp, "Graphics/Faces/Foo.png", b"library");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::Face, "Foo"))
            .unwrap();

        assert_eq!(
            outcome,
            MigrationOutcome::AlreadyPresent {
                path: fx.project.join("Graphics/Faces/Foo.jpg")
            }
        );
        assert!(!fx.project.join("Graphics/Faces/Foo.png").exists());
    }

    #[test]
    fn test_missing_everywhere() {
        let fx = fixture();
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::Bgm, "Nothing"))
            .unwrap();
        assert_eq!(outcome, MigrationOutcome::Missing);
        assert!(!fx.project.join("Audio/BGM").exists());
    }

    #[test]
    fn test_audio_uses_audio_extensions() {
        let fx = fixture();
        put(&fx.rtp, "Audio/SE/Bell.png", b"wrong class");
        put(&fx.rtp, "Audio/SE/Bell.mid", b"mid");
        put(&fx.rtp, "Audio/SE/Bell.wav", b"wav");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::Se, "Bell"))
            .unwrap();

        assert!(matches!(outcome, MigrationOutcome::Copied { ref extension, .. } if extension == ".wav"));
        assert_eq!(fs::read(fx.project.join("Audio/SE/Bell.wav")).unwrap(), b"wav");
    }

    #[test]
    fn test_plan_does_not_write() {
        let fx = fixture();
        put(&fx.rtp, "Graphics/Pictures/Map.png", b"map");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .plan(&AssetReference::new(AssetType::Picture, "Map"))
            .unwrap();

        assert_eq!(outcome.label(), "planned");
        assert!(!fx.project.join("Graphics/Pictures").exists());
    }

    #[test]
    fn test_copy_failure_is_captured() {
        let fx = fixture();
        put(&fx.rtp, "Graphics/System/Window.png", b"window");
        // A regular file where the destination directory should be
        put(&fx.project, "Graphics/System", b"not a directory");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::System, "Window"))
            .unwrap();

        match outcome {
            MigrationOutcome::Failed { error, .. } => assert!(error.contains("failed to copy")),
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_byte_library_file_is_copied() {
        let fx = fixture();
        put(&fx.rtp, "Graphics/Battlers/Empty.png", b"");
        let catalog = AssetCatalog::default();
        let resolver = AssetResolver::new(&catalog, &fx.project, &fx.rtp);

        let outcome = resolver
            .resolve(&AssetReference::new(AssetType::Battler, "Empty"))
            .unwrap();

        assert_eq!(outcome.label(), "copied");
        assert_eq!(
            fs::metadata(fx.project.join("Graphics/Battlers/Empty.png"))
                .unwrap()
                .len(),
            0
        );
    }
}
