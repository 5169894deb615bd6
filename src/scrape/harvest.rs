use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::scrape::downloader::{DownloadError, SheetDownloader};
use crate::scrape::filename::safe_filename;
use crate::scrape::kml::{extract_sheet_links, SheetLink};
use crate::scrape::links::map_id_from_arg;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to fetch KML: {0}")]
    Kml(#[from] DownloadError),

    #[error("Cannot prepare output directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct SavedSheet {
    pub place_name: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct FailedSheet {
    pub place_name: String,
    pub sheet_url: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct HarvestReport {
    pub map_id: String,
    pub links_found: usize,
    pub saved: Vec<SavedSheet>,
    pub failed: Vec<FailedSheet>,
}

/// Download every sheet linked from a map into `out_dir`.
///
/// A failed link is recorded in the report and never stops the others.
#[instrument(skip(downloader, out_dir), fields(dir = %out_dir.display()))]
pub async fn harvest(
    downloader: &SheetDownloader,
    map_arg: &str,
    out_dir: &Path,
    parallel: usize,
) -> Result<HarvestReport, HarvestError> {
    let map_id = map_id_from_arg(map_arg)?;
    info!("Fetching KML for map-ID: {}", map_id);

    let kml = downloader.fetch_kml(&map_id).await?;
    info!("KML size: {} bytes", kml.len());

    let links = extract_sheet_links(&kml)?;
    info!("Sheets found: {}", links.len());

    let mut report = HarvestReport {
        map_id,
        links_found: links.len(),
        ..Default::default()
    };
    if links.is_empty() {
        warn!("No Google Sheets links found");
        return Ok(report);
    }

    tokio::fs::create_dir_all(out_dir).await?;

    let (targets, duplicates) = resolve_targets(links, out_dir);
    for failed in duplicates {
        warn!("Skipping {} ({}): {}", failed.place_name, failed.sheet_url, failed.reason);
        report.failed.push(failed);
    }

    let results: Vec<Result<SavedSheet, FailedSheet>> = stream::iter(targets)
        .map(|(link, path)| save_sheet(downloader, link, path))
        .buffer_unordered(parallel.max(1))
        .collect()
        .await;

    for result in results {
        match result {
            Ok(saved) => {
                info!("Saved {} ({} bytes)", saved.path.display(), saved.bytes);
                report.saved.push(saved);
            }
            Err(failed) => {
                warn!(
                    "Failed {} ({}): {}",
                    failed.place_name, failed.sheet_url, failed.reason
                );
                report.failed.push(failed);
            }
        }
    }

    Ok(report)
}

/// Pair each link with its output file. The first link claiming a file name
/// keeps it; later ones are reported as failures and never downloaded.
fn resolve_targets(
    links: Vec<SheetLink>,
    out_dir: &Path,
) -> (Vec<(SheetLink, PathBuf)>, Vec<FailedSheet>) {
    let mut claimed = HashSet::new();
    let mut targets = Vec::with_capacity(links.len());
    let mut duplicates = Vec::new();

    for link in links {
        let file_name = safe_filename(&link.place_name);
        if claimed.insert(file_name.clone()) {
            targets.push((link, out_dir.join(file_name)));
        } else {
            duplicates.push(FailedSheet {
                place_name: link.place_name,
                sheet_url: link.sheet_url,
                reason: format!("duplicate file name {file_name}"),
            });
        }
    }

    (targets, duplicates)
}

async fn save_sheet(
    downloader: &SheetDownloader,
    link: SheetLink,
    path: PathBuf,
) -> Result<SavedSheet, FailedSheet> {
    let fail = |reason: String| FailedSheet {
        place_name: link.place_name.clone(),
        sheet_url: link.sheet_url.clone(),
        reason,
    };

    let bytes = downloader
        .download_sheet(&link.sheet_url)
        .await
        .map_err(|e| fail(e.to_string()))?;

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| fail(format!("cannot write {}: {e}", path.display())))?;

    Ok(SavedSheet {
        place_name: link.place_name,
        path,
        bytes: bytes.len(),
    })
}
