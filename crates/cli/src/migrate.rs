use nu_ansi_term::Color;
use rtpsync_core::asset::MigrationOutcome;
use rtpsync_core::migration::{MigrationReport, ReportEntry};
use rtpsync_runtime::Overrides;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&ReportEntry> for OutcomeRow {
    fn from(entry: &ReportEntry) -> Self {
        let detail = match &entry.outcome {
            MigrationOutcome::AlreadyPresent { path } => path.display().to_string(),
            MigrationOutcome::Copied { destination, .. }
            | MigrationOutcome::Planned { destination, .. } => destination.display().to_string(),
            MigrationOutcome::Missing => "not in runtime library".to_string(),
            MigrationOutcome::Failed { error, .. } => error.clone(),
        };
        Self {
            status: entry.outcome.label().to_string(),
            asset_type: entry.reference.asset_type.to_string(),
            name: entry.reference.name.clone(),
            detail,
        }
    }
}

pub fn run(
    path: PathBuf,
    rtp: Option<PathBuf>,
    config_path: Option<PathBuf>,
    dry_run: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = Overrides {
        runtime_path: rtp,
        config_path,
        dry_run,
    };
    let config = rtpsync_runtime::load_config(&path, &overrides)?;
    let mut driver = rtpsync_runtime::build_default_driver(path.clone(), config)?;

    let report = driver.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    info!("Migration of {} finished.", path.display());
    Ok(())
}

fn print_report(report: &MigrationReport) {
    let summary = report.summary();

    println!("Runtime library: {}", report.runtime_root.display());
    if report.dry_run {
        println!("{}", Color::Yellow.paint("Dry run: no files were written."));
    }
    println!("References:      {}", summary.total);
    println!("Already present: {}", summary.already_present);
    println!("Copied:          {}", Color::Green.paint(summary.copied.to_string()));
    if report.dry_run {
        println!("Would copy:      {}", summary.planned);
    }
    println!("Missing:         {}", Color::Yellow.paint(summary.missing.to_string()));
    println!("Failed:          {}", Color::Red.paint(summary.failed.to_string()));

    // Present assets need no attention
    let rows: Vec<OutcomeRow> = report
        .entries
        .iter()
        .filter(|e| !matches!(e.outcome, MigrationOutcome::AlreadyPresent { .. }))
        .map(OutcomeRow::from)
        .collect();

    if rows.is_empty() {
        println!("\nNothing to do: every referenced asset is already in the project.");
    } else {
        println!("\n{}", Table::new(rows));
    }
}
