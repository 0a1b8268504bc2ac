use anyhow::{Context, Result};
use clap::Parser;
use data_pipeline::{Config, run, write_template};
use models::RunParameters;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "revalue",
    about = "Revalue a fixed-asset register, compute period depreciation and write the journal vouchers."
)]
struct Args {
    /// Fixed-asset register (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, required_unless_present = "write_template")]
    input: Option<PathBuf>,

    /// Transaction year (e.g. 2024)
    #[arg(short, long, required_unless_present = "write_template")]
    year: Option<String>,

    /// Period: 1 = 1st quarter, 2 = half year, 3 = 9 months, 4 = annual
    #[arg(short, long, required_unless_present = "write_template")]
    period: Option<String>,

    /// Revaluation rate in percent; "15,5" and "15.5" are both accepted
    #[arg(short, long, required_unless_present = "write_template")]
    rate: Option<String>,

    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Optional settings.json overriding the chart of accounts
    #[arg(short, long, env = "SETTINGS_PATH")]
    settings: Option<PathBuf>,

    /// Write the blank input template to this path and exit
    #[arg(long, conflicts_with = "input")]
    write_template: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Some(path) = &args.write_template {
        let written = write_template(path)?;
        println!("Template written to {}", written.display());
        return Ok(());
    }

    let params = RunParameters::parse(
        args.year.as_deref().unwrap_or_default(),
        args.period.as_deref().unwrap_or_default(),
        args.rate.as_deref().unwrap_or_default(),
    )
    .context("Invalid run parameters")?;

    let input_file = args.input.context("--input is required")?;
    let output_dir = args.output_dir;

    let summary = run(Config {
        input_file,
        output_dir: output_dir.clone(),
        settings_file: args.settings,
        params,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Assets processed:      {}", summary.asset_count);
        println!("Revaluation vouchers:  {}", summary.revaluation_voucher_count);
        println!("Depreciation vouchers: {}", summary.depreciation_voucher_count);
        println!("Report: {}", output_dir.join(&summary.output_file).display());
    }
    Ok(())
}
