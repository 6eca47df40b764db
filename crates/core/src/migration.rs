//! Migration driver.
//!
//! Runs `Start -> LocatingRuntime -> Scanning -> Resolving -> Done`. A missing runtime
//! library moves to `Aborted` before any project data is read; every other problem is
//! recorded per asset in the report.

use crate::asset::{
    AssetCatalog, AssetReference, AssetResolver, MigrationOutcome, ReferenceCollector,
};
use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use crate::locator::RuntimeLocator;
use crate::project::ProjectDataSource;
use crate::scanner::{DataScanner, ScanResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Start,
    LocatingRuntime,
    Scanning,
    Resolving,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub reference: AssetReference,
    pub outcome: MigrationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub already_present: usize,
    pub copied: usize,
    pub planned: usize,
    pub missing: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub runtime_root: PathBuf,
    pub dry_run: bool,
    pub scan: ScanResult,
    pub entries: Vec<ReportEntry>,
}

impl MigrationReport {
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.entries.len(),
            ..ReportSummary::default()
        };
        for entry in &self.entries {
            match entry.outcome {
                MigrationOutcome::AlreadyPresent { .. } => summary.already_present += 1,
                MigrationOutcome::Copied { .. } => summary.copied += 1,
                MigrationOutcome::Planned { .. } => summary.planned += 1,
                MigrationOutcome::Missing => summary.missing += 1,
                MigrationOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn entries_with(&self, label: &str) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(move |e| e.outcome.label() == label)
    }
}

pub struct MigrationDriver {
    project_root: PathBuf,
    catalog: AssetCatalog,
    config: MigrationConfig,
    locator: Box<dyn RuntimeLocator>,
    data_source: Box<dyn ProjectDataSource>,
    state: MigrationState,
}

impl MigrationDriver {
    pub fn new(
        project_root: impl Into<PathBuf>,
        catalog: AssetCatalog,
        config: MigrationConfig,
        locator: Box<dyn RuntimeLocator>,
        data_source: Box<dyn ProjectDataSource>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            catalog,
            config,
            locator,
            data_source,
            state: MigrationState::Start,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    fn transition(&mut self, next: MigrationState) {
        tracing::debug!("Migration state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Ask the locator for the runtime library root and check that it is a directory.
    pub fn locate_runtime(&self) -> Result<PathBuf> {
        match self.locator.locate() {
            Some(path) if path.is_dir() => Ok(path),
            searched => Err(MigrationError::RuntimeLibraryNotFound { searched }),
        }
    }

    /// Load and scan project data without consulting the runtime library.
    pub fn collect(&self) -> Result<(ReferenceCollector, ScanResult)> {
        let data = self.data_source.load()?;
        let mut collector = ReferenceCollector::new();
        let scan = DataScanner::new()
            .with_standard_system_files(self.config.standard_system_files.iter().cloned())
            .scan(&data, &mut collector);
        Ok((collector, scan))
    }

    /// Resolve every collected reference in collector order.
    fn resolve_all(
        &self,
        collector: &ReferenceCollector,
        runtime_root: &Path,
    ) -> Result<Vec<ReportEntry>> {
        let resolver = AssetResolver::new(&self.catalog, &self.project_root, runtime_root);
        collector
            .all_references()
            .into_iter()
            .map(|reference| -> Result<ReportEntry> {
                let outcome = if self.config.dry_run {
                    resolver.plan(&reference)?
                } else {
                    resolver.resolve(&reference)?
                };
                Ok(ReportEntry { reference, outcome })
            })
            .collect()
    }

    pub fn run(&mut self) -> Result<MigrationReport> {
        info!("Starting RTP migration for {}...", self.project_root.display());

        self.transition(MigrationState::LocatingRuntime);
        let runtime_root = match self.locate_runtime() {
            Ok(root) => root,
            Err(e) => {
                error!("Error: could not find a valid RTP path: {}", e);
                self.transition(MigrationState::Aborted);
                return Err(e);
            }
        };
        info!("RTP path found: {}", runtime_root.display());

        self.transition(MigrationState::Scanning);
        info!("Scanning project data from {} source", self.data_source.name());
        let (collector, scan) = match self.collect() {
            Ok(collected) => collected,
            Err(e) => {
                self.transition(MigrationState::Aborted);
                return Err(e);
            }
        };

        self.transition(MigrationState::Resolving);
        let entries = match self.resolve_all(&collector, &runtime_root) {
            Ok(entries) => entries,
            Err(e) => {
                self.transition(MigrationState::Aborted);
                return Err(e);
            }
        };

        let report = MigrationReport {
            runtime_root,
            dry_run: self.config.dry_run,
            scan,
            entries,
        };
        self.transition(MigrationState::Done);

        let summary = report.summary();
        info!(
            "RTP migration completed: {} references, {} present, {} copied, {} planned, {} missing, {} failed",
            summary.total,
            summary.already_present,
            summary.copied,
            summary.planned,
            summary.missing,
            summary.failed
        );
        Ok(report)
    }
}
