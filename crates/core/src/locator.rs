//! Runtime library locators.
//!
//! Finds the installed RTP root from:
//! - An explicit path (CLI flag or config)
//! - The `RTPSYNC_RTP_PATH` environment variable
//! - Common installation paths (Enterbrain common files, Wine prefixes)

use std::path::{Path, PathBuf};
use tracing::debug;

pub const RTP_PATH_ENV: &str = "RTPSYNC_RTP_PATH";

/// Name of the VX Ace RTP directory under the Enterbrain install root.
const RTP_DIR_NAME: &str = "RPGVXAce";

pub trait RuntimeLocator {
    /// Candidate runtime library root. The caller checks that it is a directory.
    fn locate(&self) -> Option<PathBuf>;

    /// Locator name (for logging/debugging)
    fn name(&self) -> &str;
}

pub struct ExplicitLocator {
    path: PathBuf,
}

impl ExplicitLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RuntimeLocator for ExplicitLocator {
    fn locate(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }

    fn name(&self) -> &str {
        "explicit"
    }
}

pub struct EnvLocator {
    var: String,
}

impl EnvLocator {
    pub fn new() -> Self {
        Self::with_var(RTP_PATH_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeLocator for EnvLocator {
    fn locate(&self) -> Option<PathBuf> {
        let value = std::env::var(&self.var).ok()?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(PathBuf::from(value))
    }

    fn name(&self) -> &str {
        "environment"
    }
}

/// Searches well-known install directories
pub struct InstallDirLocator {
    candidates: Vec<PathBuf>,
}

impl InstallDirLocator {
    pub fn new() -> Self {
        Self {
            candidates: default_install_dirs(),
        }
    }

    /// Create with custom candidates (for testing)
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl Default for InstallDirLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeLocator for InstallDirLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|p| p.is_dir()).cloned()
    }

    fn name(&self) -> &str {
        "install-dirs"
    }
}

fn default_install_dirs() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "windows")]
    {
        for var in ["CommonProgramFiles(x86)", "CommonProgramFiles"] {
            if let Ok(dir) = std::env::var(var) {
                roots.push(PathBuf::from(dir));
            }
        }
        roots.push(PathBuf::from("C:\\Program Files (x86)\\Common Files"));
        roots.push(PathBuf::from("C:\\Program Files\\Common Files"));
    }

    // Wine prefix
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".wine/drive_c/Program Files (x86)/Common Files"));
        roots.push(home.join(".wine/drive_c/Program Files/Common Files"));
    }

    roots
        .into_iter()
        .map(|root| rtp_dir_under(&root))
        .collect()
}

fn rtp_dir_under(common_files: &Path) -> PathBuf {
    common_files
        .join("Enterbrain")
        .join("RGSS3")
        .join(RTP_DIR_NAME)
}

/// Tries locators in order.
///
/// The first hit that is a directory wins. If none is, the first hit is returned anyway so
/// the caller can report what was searched.
pub struct LocatorChain {
    locators: Vec<Box<dyn RuntimeLocator>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self {
            locators: Vec::new(),
        }
    }

    pub fn add_locator(mut self, locator: Box<dyn RuntimeLocator>) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl Default for LocatorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeLocator for LocatorChain {
    fn locate(&self) -> Option<PathBuf> {
        let mut first_hit = None;
        for locator in &self.locators {
            let Some(path) = locator.locate() else {
                debug!("Locator {} found nothing", locator.name());
                continue;
            };
            if path.is_dir() {
                debug!("Locator {} found {}", locator.name(), path.display());
                return Some(path);
            }
            debug!(
                "Locator {} returned {}, which is not a directory",
                locator.name(),
                path.display()
            );
            first_hit.get_or_insert(path);
        }
        first_hit
    }

    fn name(&self) -> &str {
        "chain"
    }
}
