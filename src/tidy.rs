// Worksheet to tidy table reshaping.
//
// Each municipality workbook carries an "Input" sheet laid out wide
// (one column per year). This module turns it into long format rows of
// (state, city, variable, year, value) and batches that over a directory.

pub mod batch;
pub mod extractor;
pub mod label;
pub mod workbook;

pub use batch::{find_workbooks, run_batch, tidy_workbooks, write_csv, BatchError, BatchReport};
pub use extractor::{
    extract, extract_observations, ExtractError, Observation, VariableRow, WorksheetLayout,
    YearColumn,
};
pub use label::SourceLabel;
pub use workbook::{WorkbookError, WorkbookImporter};
