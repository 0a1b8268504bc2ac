use data_pipeline::Pipeline;
use journal::ChartOfAccounts;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::reports::{FileReportStore, ReportStore};

/// Shared application state. Holds no per-request data, so concurrent
/// calculations never see each other's uploads.
pub struct AppState {
    pub pipeline: Pipeline,
    pub reports: Arc<dyn ReportStore>,
}

impl AppState {
    pub fn new(chart: ChartOfAccounts, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            reports: Arc::new(FileReportStore::new(&output_dir)),
            pipeline: Pipeline::new(chart, output_dir),
        }
    }

    pub fn from_settings(settings_path: Option<&PathBuf>, output_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let pipeline = Pipeline::from_settings(settings_path, output_dir)?;
        let reports = Arc::new(FileReportStore::new(pipeline.output_dir()));
        Ok(Self { pipeline, reports })
    }

    pub fn output_dir(&self) -> &Path {
        self.reports.output_dir()
    }
}

pub type SharedState = Arc<AppState>;
