use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::tidy::extractor::{extract, ExtractError, Observation, WorksheetLayout};
use crate::tidy::label::SourceLabel;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Failed to read sheet {sheet}: {msg}")]
    SheetRead { sheet: String, msg: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Reads the finance worksheet of one municipality workbook (.xlsx, .xlsm, .xls, .ods)
pub struct WorkbookImporter {
    workbook_path: PathBuf,
    layout: WorksheetLayout,
}

impl WorkbookImporter {
    pub fn new(workbook_path: impl Into<PathBuf>) -> Self {
        Self::with_layout(workbook_path, WorksheetLayout::default())
    }

    pub fn with_layout(workbook_path: impl Into<PathBuf>, layout: WorksheetLayout) -> Self {
        Self {
            workbook_path: workbook_path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.workbook_path
    }

    /// Label derived from the workbook's file name
    pub fn source_label(&self) -> SourceLabel {
        SourceLabel::from_path(&self.workbook_path)
    }

    /// Load the configured sheet as stored values.
    ///
    /// Synchronous; async callers should use `spawn_blocking`.
    pub fn read_sheet(&self) -> Result<Range<Data>, WorkbookError> {
        let sheet_name = &self.layout.sheet_name;

        let mut workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| WorkbookError::WorkbookOpen(e.to_string()))?;

        if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(WorkbookError::SheetNotFound(sheet_name.clone()));
        }

        workbook
            .worksheet_range(sheet_name)
            .map_err(|e| WorkbookError::SheetRead {
                sheet: sheet_name.clone(),
                msg: e.to_string(),
            })
    }

    /// Tidy observations for this workbook
    #[instrument(skip(self), fields(path = %self.workbook_path.display()))]
    pub fn extract(&self) -> Result<Vec<Observation>, WorkbookError> {
        let range = self.read_sheet()?;
        debug!("Sheet dimensions: {:?}", range.get_size());

        let source = self.source_label();
        let observations = extract(&range, &source, &self.layout)?;

        info!("Extracted {} observations for {}", observations.len(), source);
        Ok(observations)
    }
}
