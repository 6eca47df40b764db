use rtpsync_core::asset::AssetCatalog;
use rtpsync_core::config::MigrationConfig;
use rtpsync_core::locator::{EnvLocator, ExplicitLocator, InstallDirLocator, LocatorChain};
use rtpsync_core::migration::MigrationDriver;
use rtpsync_core::project::JsonDataSource;
use std::path::{Path, PathBuf};

/// Command-line overrides applied on top of the project config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub runtime_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
}

/// Reads `--config` if given, otherwise the project's `rtpsync.json`, then applies overrides.
pub fn load_config(
    project_root: &Path,
    overrides: &Overrides,
) -> rtpsync_core::Result<MigrationConfig> {
    let mut config = match &overrides.config_path {
        Some(path) => MigrationConfig::from_file(path)?,
        None => MigrationConfig::for_project(project_root)?,
    };
    if let Some(rtp) = &overrides.runtime_path {
        config.runtime_path = Some(rtp.clone());
    }
    config.dry_run |= overrides.dry_run;
    Ok(config)
}

/// Explicit path first, then `RTPSYNC_RTP_PATH`, then well-known install directories.
pub fn build_default_locator(config: &MigrationConfig) -> LocatorChain {
    let mut chain = LocatorChain::new();
    if let Some(path) = &config.runtime_path {
        chain = chain.add_locator(Box::new(ExplicitLocator::new(path)));
    }
    chain
        .add_locator(Box::new(EnvLocator::new()))
        .add_locator(Box::new(InstallDirLocator::new()))
}

/// Bootstraps a migration driver for a project directory.
///
/// Assembles the catalog, the locator chain and the JSON data source from the config.
pub fn build_default_driver(
    project_root: PathBuf,
    config: MigrationConfig,
) -> rtpsync_core::Result<MigrationDriver> {
    let catalog = AssetCatalog::from_config(&config)?;
    let locator = build_default_locator(&config);
    let data_source = JsonDataSource::new(project_root.join(&config.data_dir));
    tracing::debug!(
        "Built driver for {} with {} locators",
        project_root.display(),
        locator.len()
    );

    Ok(MigrationDriver::new(
        project_root,
        catalog,
        config,
        Box::new(locator),
        Box::new(data_source),
    ))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module; with `to_stderr` off, progress only goes to the log file.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(rtpsync_core::logging::init_logging(component, to_stderr))
}
