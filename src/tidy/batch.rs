use glob::Pattern;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::tidy::extractor::{Observation, WorksheetLayout};
use crate::tidy::workbook::WorkbookImporter;

/// Name of the combined table written next to the downloaded workbooks
pub const TIDY_CSV_NAME: &str = "financials_tidy.csv";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No Excel files found beneath: {0}")]
    NoWorkbooks(PathBuf),

    #[error("No usable data extracted from any workbook")]
    NoData,

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A workbook the batch could not use
#[derive(Debug, Clone)]
pub struct SkippedWorkbook {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub observations: Vec<Observation>,
    /// Workbooks that contributed at least one observation
    pub contributing: usize,
    pub processed: usize,
    pub skipped: Vec<SkippedWorkbook>,
}

/// Every `.xls*` file beneath `root`, recursively, without Office lock files (`~$...`)
pub fn find_workbooks(root: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let pattern = format!(
        "{}/**/*.xls*",
        Pattern::escape(&root.to_string_lossy())
    );
    debug!("Searching for workbooks with pattern {}", pattern);

    let mut workbooks: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Unreadable path during workbook search: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            !path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();

    workbooks.sort();
    Ok(workbooks)
}

/// Extract every workbook, skipping (and recording) the ones that fail
pub fn tidy_workbooks(
    workbooks: &[PathBuf],
    layout: &WorksheetLayout,
    progress: &ProgressBar,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in workbooks {
        progress.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let importer = WorkbookImporter::with_layout(path, layout.clone());
        match importer.extract() {
            Ok(mut observations) => {
                report.processed += 1;
                if !observations.is_empty() {
                    report.contributing += 1;
                    report.observations.append(&mut observations);
                }
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push(SkippedWorkbook {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }

    report
}

/// Find and extract all workbooks beneath `root`.
///
/// `progress` is sized to the number of workbooks found; pass
/// `ProgressBar::hidden()` when nothing should be drawn.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn run_batch(
    root: &Path,
    layout: &WorksheetLayout,
    progress: &ProgressBar,
) -> Result<BatchReport, BatchError> {
    let workbooks = find_workbooks(root)?;
    if workbooks.is_empty() {
        return Err(BatchError::NoWorkbooks(root.to_path_buf()));
    }
    info!("Found {} workbooks", workbooks.len());

    progress.set_length(workbooks.len() as u64);
    let report = tidy_workbooks(&workbooks, layout, progress);
    if report.observations.is_empty() {
        return Err(BatchError::NoData);
    }

    info!(
        "Extracted {} observations from {} workbooks ({} skipped)",
        report.observations.len(),
        report.contributing,
        report.skipped.len()
    );
    Ok(report)
}

/// Write the combined table (`state,city,variable,year,value`); returns rows written
pub fn write_csv(observations: &[Observation], path: &Path) -> Result<usize, BatchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for observation in observations {
        writer.serialize(observation)?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", observations.len(), path.display());
    Ok(observations.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_workbooks_missing_root_is_empty() {
        let result = find_workbooks(Path::new("/nonexistent/finance/root"));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_run_batch_without_workbooks() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_batch(dir.path(), &WorksheetLayout::default(), &ProgressBar::hidden());
        assert!(matches!(result, Err(BatchError::NoWorkbooks(_))));
    }
}
