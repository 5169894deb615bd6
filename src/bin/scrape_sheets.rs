use clap::Parser;
use finance_decoder::scrape::downloader::DEFAULT_TIMEOUT_SECS;
use finance_decoder::scrape::links::{DEFAULT_EXPORT_BASE_URL, DEFAULT_KML_BASE_URL};
use finance_decoder::scrape::{harvest, SheetDownloader};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "scrape-sheets")]
#[command(about = "Download every Google Sheet linked from a Google My Maps map as .xlsx", long_about = None)]
struct Cli {
    /// Map id or a My Maps URL carrying `mid=`
    map: String,

    /// Directory the workbooks are written to
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloaded_xls")]
    out_dir: PathBuf,

    /// KML endpoint
    #[arg(long, env = "MAPS_KML_URL", default_value = DEFAULT_KML_BASE_URL)]
    kml_url: String,

    /// Sheets export base (`<base>/<id>/export?format=xlsx`)
    #[arg(long, env = "SHEETS_EXPORT_URL", default_value = DEFAULT_EXPORT_BASE_URL)]
    export_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Number of parallel downloads
    #[arg(long, default_value = "4")]
    parallel: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let downloader = SheetDownloader::with_base_urls(
        Duration::from_secs(cli.timeout_secs),
        cli.kml_url,
        cli.export_url,
    )?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Harvesting sheets into {}...", cli.out_dir.display()));

    let report = harvest(&downloader, &cli.map, &cli.out_dir, cli.parallel).await;
    pb.finish_and_clear();
    let report = report?;

    println!("Map {}: {} sheet link(s)", report.map_id, report.links_found);
    for saved in &report.saved {
        println!("  ✔ {} → {}", saved.place_name, saved.path.display());
    }
    for failed in &report.failed {
        println!("  ✖ {}: {}", failed.place_name, failed.reason);
    }

    println!(
        "\n✅ Saved {} workbook(s), {} failed",
        report.saved.len(),
        report.failed.len()
    );
    info!("Harvest finished in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}
