use clap::Parser;
use finance_decoder::tidy::batch::TIDY_CSV_NAME;
use finance_decoder::tidy::{run_batch, write_csv, WorksheetLayout};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "tidy-batch")]
#[command(about = "Reshape every downloaded workbook into one tidy CSV table", long_about = None)]
struct Cli {
    /// Directory searched recursively for .xls* workbooks
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloaded_xls")]
    input_dir: PathBuf,

    /// Output CSV (default: <input-dir>/financials_tidy.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Worksheet to read in every workbook
    #[arg(long, default_value = "Input")]
    sheet: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let layout = WorksheetLayout {
        sheet_name: cli.sheet,
        ..Default::default()
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    let report = run_batch(&cli.input_dir, &layout, &pb);
    pb.finish_and_clear();
    let report = report?;

    let output = cli
        .output
        .unwrap_or_else(|| cli.input_dir.join(TIDY_CSV_NAME));
    let rows = write_csv(&report.observations, &output)?;

    println!(
        "Wrote {} rows from {} workbook(s) to {}",
        rows,
        report.contributing,
        output.display()
    );
    info!("Batch finished in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}
