use rtpsync_runtime::Overrides;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct ReferenceRow {
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Name")]
    name: String,
}

pub fn run(path: PathBuf, config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = Overrides {
        config_path,
        ..Overrides::default()
    };
    let config = rtpsync_runtime::load_config(&path, &overrides)?;
    let driver = rtpsync_runtime::build_default_driver(path.clone(), config)?;

    info!("Scanning project data at: {}...", path.display());
    let (collector, scan) = driver.collect()?;

    let catalog = driver.catalog();
    let mut rows = Vec::with_capacity(collector.len());
    for reference in collector.all_references() {
        rows.push(ReferenceRow {
            asset_type: reference.asset_type.to_string(),
            folder: catalog
                .folder_for(reference.asset_type)?
                .display()
                .to_string(),
            name: reference.name,
        });
    }

    if rows.is_empty() {
        println!("No asset references found.");
    } else {
        println!("{}", Table::new(rows));
    }

    println!(
        "\n{} references from {} records ({} skipped, {} malformed commands)",
        collector.len(),
        scan.records_visited,
        scan.records_skipped,
        scan.malformed_commands
    );
    for (asset_type, count) in collector.count_by_type() {
        println!("  {}: {}", asset_type, count);
    }

    Ok(())
}
