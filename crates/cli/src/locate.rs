use rtpsync_core::MigrationError;
use rtpsync_core::config::MigrationConfig;
use rtpsync_core::locator::RuntimeLocator;
use std::path::PathBuf;

pub fn run(rtp: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = MigrationConfig {
        runtime_path: rtp,
        ..MigrationConfig::default()
    };
    let locator = rtpsync_runtime::build_default_locator(&config);

    match locator.locate() {
        Some(path) if path.is_dir() => {
            println!("{}", path.display());
            Ok(())
        }
        searched => Err(MigrationError::RuntimeLibraryNotFound { searched }.into()),
    }
}
