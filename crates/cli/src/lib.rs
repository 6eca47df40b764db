mod locate;
mod migrate;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rtpsync",
    version,
    about = "Copies runtime library (RTP) assets referenced by a game project into the project",
    long_about = "rtpsync scans a project's exported database for every graphic and audio file it \
                  references and copies the ones the project lacks from the installed runtime \
                  library, so the game can ship without the RTP."
)]
pub struct Cli {
    /// Only write progress to the log file, not to stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy missing referenced assets from the runtime library into the project
    #[command(
        long_about = "Locates the runtime library, scans the project data and copies every \
                            referenced asset that the project does not already contain. \
                            Existing project files are never overwritten."
    )]
    Migrate {
        /// Path to the project root. Defaults to current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,

        /// Runtime library root (overrides config and environment)
        #[arg(long, value_name = "DIR")]
        rtp: Option<PathBuf>,

        /// Config file to use instead of <PROJECT_PATH>/rtpsync.json
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Report what would be copied without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the assets referenced by the project data
    Scan {
        /// Path to the project root. Defaults to current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,

        /// Config file to use instead of <PROJECT_PATH>/rtpsync.json
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the runtime library root that would be used
    Locate {
        /// Runtime library root to check instead of searching
        #[arg(long, value_name = "DIR")]
        rtp: Option<PathBuf>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Migrate { .. } => "migrate",
        Commands::Scan { .. } => "scan",
        Commands::Locate { .. } => "locate",
    };
    let _guard = rtpsync_runtime::init_logging(component, !cli.quiet);

    match cli.command {
        Commands::Migrate {
            path,
            rtp,
            config,
            dry_run,
            json,
        } => migrate::run(project_path(path), rtp, config, dry_run, json),
        Commands::Scan { path, config } => scan::run(project_path(path), config),
        Commands::Locate { rtp } => locate::run(rtp),
    }
}

fn project_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
