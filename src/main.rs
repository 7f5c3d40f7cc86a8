use tradeflow::{load_dataset, report, report::AnalysisConfig};

use anyhow::Context;
use std::env;
use std::path::Path;

const DEFAULT_CSV_PATH: &str = "data/synergy_logistics_database.csv";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (csv_path, output_root) = parse_args();
    validate_csv_file(&csv_path);
    run_analysis(&csv_path, output_root).await
}

fn parse_args() -> (String, Option<String>) {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => (DEFAULT_CSV_PATH.to_string(), None),
        2 => (args[1].clone(), None),
        3 => (args[1].clone(), Some(args[2].clone())),
        _ => {
            eprintln!("Usage: {} [csv_file] [output_dir]", args[0]);
            eprintln!("  csv_file:   Path to CSV file (default: {DEFAULT_CSV_PATH})");
            eprintln!("  output_dir: Where results are written (default: exploration)");
            std::process::exit(1);
        }
    }
}

fn validate_csv_file(path: &str) {
    if !Path::new(path).exists() {
        eprintln!("Error: File '{}' does not exist", path);
        std::process::exit(1);
    }

    if !path.to_lowercase().ends_with(".csv") {
        eprintln!("Error: File '{}' is not a CSV file", path);
        std::process::exit(1);
    }
}

async fn run_analysis(csv_path: &str, output_root: Option<String>) -> anyhow::Result<()> {
    log::info!("Analysing transactions from: {}", csv_path);
    let dataset = load_dataset(csv_path).with_context(|| format!("loading {csv_path}"))?;

    let mut config = AnalysisConfig::default();
    if let Some(root) = output_root {
        config = config.with_output_root(root);
    }

    let (summary, stats) = report::run(&dataset, &config).await?;
    log::info!(
        "Computed {} cells ({} failed), wrote {} of {} tables under {}",
        summary.cells,
        summary.failed_cells,
        stats.written,
        summary.artifacts,
        config.output_root.display()
    );

    if stats.failed > 0 {
        anyhow::bail!("{} tables could not be written", stats.failed);
    }
    Ok(())
}
