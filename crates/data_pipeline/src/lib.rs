use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use journal::ChartOfAccounts;
use models::{AssetRecord, RunParameters, RunSummary, ValuationResult, VoucherSet};

pub struct Config {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub settings_file: Option<PathBuf>,
    pub params: RunParameters,
}

/// Pure calculation boundary: asset records in, valuation results and vouchers out.
pub fn calculate(
    assets: &[AssetRecord],
    params: &RunParameters,
    chart: &ChartOfAccounts,
) -> (Vec<ValuationResult>, VoucherSet) {
    let results = valuation::value_assets(assets, params);
    let vouchers = journal::build_vouchers(&results, chart);
    (results, vouchers)
}

/// Main pipeline function: reads the register, values it and writes the report
pub fn run(cfg: Config) -> Result<RunSummary> {
    let pipeline = Pipeline::from_settings(cfg.settings_file.as_ref(), cfg.output_dir)?;
    pipeline.process_file(&cfg.input_file, &cfg.params)
}

/// Reusable pipeline holding the chart of accounts and the output directory.
/// Holds no per-run state, so one instance can serve any number of runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    chart: ChartOfAccounts,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(chart: ChartOfAccounts, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            chart,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_settings(settings_file: Option<&PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let chart = settings_loader::load_chart_of_accounts(settings_file)?;
        Ok(Self::new(chart, output_dir))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reads `input`, values every asset and writes the report workbook into
    /// the output directory. Nothing is written unless the whole report
    /// rendered successfully.
    pub fn process_file(&self, input: &Path, params: &RunParameters) -> Result<RunSummary> {
        let assets = asset_reader::read_assets(input)
            .with_context(|| format!("Reading fixed assets from {}", input.display()))?;

        let (results, vouchers) = calculate(&assets, params, &self.chart);

        let bytes = report_writer::render_report(&results, &vouchers, params, &self.chart)?;
        let file_name = report_writer::report_file_name(params, Local::now().naive_local(), &bytes);
        write_artifact(&self.output_dir, &file_name, &bytes)?;

        tracing::info!(
            assets = results.len(),
            revaluation_vouchers = vouchers.revaluation.len(),
            depreciation_vouchers = vouchers.depreciation.len(),
            total_vouchers = vouchers.voucher_count(),
            output = %file_name,
            "revaluation run complete"
        );

        Ok(RunSummary {
            asset_count: results.len(),
            revaluation_voucher_count: vouchers.revaluation.len(),
            depreciation_voucher_count: vouchers.depreciation.len(),
            output_file: file_name,
        })
    }
}

/// Writes the blank input template to `path`.
pub fn write_template(path: &Path) -> Result<PathBuf> {
    let bytes = report_writer::render_template()?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(report_writer::TEMPLATE_FILE_NAME);
    write_artifact(dir, name, &bytes)
}

/// Writes through a temporary sibling file and renames it into place, so a
/// failed write never leaves a truncated artifact under the final name.
pub fn write_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Creating output dir: {}", dir.display()))?;

    let final_path = dir.join(file_name);
    let partial_path = dir.join(format!(".{}.partial", file_name));

    if let Err(e) = fs::write(&partial_path, bytes) {
        let _ = fs::remove_file(&partial_path);
        return Err(e).with_context(|| format!("Writing output file: {}", partial_path.display()));
    }
    if let Err(e) = fs::rename(&partial_path, &final_path) {
        let _ = fs::remove_file(&partial_path);
        return Err(e).with_context(|| format!("Moving output file into place: {}", final_path.display()));
    }

    Ok(final_path)
}
