use calamine::{Data, Range};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::tidy::label::SourceLabel;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Malformed worksheet: no year between {year_min} and {year_max} in column index {column}")]
    MalformedWorksheet {
        column: u32,
        year_min: i32,
        year_max: i32,
    },
}

/// One tidy (long format) row: a single indicator value for one place and year.
///
/// Field names double as the column names of the combined CSV table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    pub state: Option<String>,
    pub city: String,
    pub variable: String,
    pub year: i32,
    pub value: f64,
}

/// Fixed positions of the municipal finance worksheet.
///
/// All rows and columns are absolute, 0-based worksheet coordinates
/// (row index 27 is worksheet row 28).
#[derive(Debug, Clone)]
pub struct WorksheetLayout {
    pub sheet_name: String,
    /// Column holding the variable labels (A)
    pub label_column: u32,
    /// Column scanned for the header year, and first candidate year column (E)
    pub year_column: u32,
    pub year_min: i32,
    pub year_max: i32,
    /// Last row inspected when deciding whether a year column holds data
    pub segment_last_row: u32,
    /// Rows at or below this index drop values that are exactly zero
    pub zero_placeholder_row: u32,
    /// Consecutive blank labels that end the variable table
    pub blank_run_limit: usize,
}

impl Default for WorksheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Input".to_string(),
            label_column: 0,
            year_column: 4,
            year_min: 1900,
            year_max: 2100,
            segment_last_row: 27,
            zero_placeholder_row: 28,
            blank_run_limit: 5,
        }
    }
}

/// A retained year and the worksheet column its values live in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearColumn {
    pub year: i32,
    pub column: u32,
}

/// A labelled data row below the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRow {
    pub label: String,
    pub row: u32,
}

/// Cell content as the extractor sees it
#[derive(Debug, Clone, Copy, PartialEq)]
enum CellValue<'a> {
    Blank,
    Number(f64),
    Text(&'a str),
    Other,
}

impl CellValue<'_> {
    /// Non-blank and not numerically zero
    fn has_data(&self) -> bool {
        match self {
            CellValue::Blank => false,
            CellValue::Number(n) => *n != 0.0,
            CellValue::Text(_) | CellValue::Other => true,
        }
    }
}

fn classify(cell: Option<&Data>) -> CellValue<'_> {
    match cell {
        None | Some(Data::Empty) => CellValue::Blank,
        Some(Data::Int(i)) => CellValue::Number(*i as f64),
        Some(Data::Float(f)) if f.is_nan() => CellValue::Blank,
        Some(Data::Float(f)) => CellValue::Number(*f),
        Some(Data::DateTime(dt)) => CellValue::Number(dt.as_f64()),
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Blank
            } else if let Ok(n) = trimmed.parse::<f64>() {
                // "NaN" and "inf" parse as floats but are not values
                if n.is_nan() {
                    CellValue::Blank
                } else if n.is_infinite() {
                    CellValue::Text(trimmed)
                } else {
                    CellValue::Number(n)
                }
            } else {
                CellValue::Text(trimmed)
            }
        }
        Some(_) => CellValue::Other,
    }
}

/// Find the header row: the first row whose year column holds a number in
/// `[year_min, year_max]`.
pub fn detect_header_row(
    range: &Range<Data>,
    layout: &WorksheetLayout,
) -> Result<u32, ExtractError> {
    let malformed = || ExtractError::MalformedWorksheet {
        column: layout.year_column,
        year_min: layout.year_min,
        year_max: layout.year_max,
    };

    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Err(malformed());
    };

    let min = f64::from(layout.year_min);
    let max = f64::from(layout.year_max);

    (first_row..=last_row)
        .find(|&row| {
            let value = match range.get_value((row, layout.year_column)) {
                Some(Data::Int(i)) => *i as f64,
                Some(Data::Float(f)) => *f,
                _ => return false,
            };
            (min..=max).contains(&value)
        })
        .ok_or_else(malformed)
}

/// Year columns that carry data for this worksheet.
///
/// A column whose segment (two rows below the header down to
/// `segment_last_row`) holds only blanks and zeros is dropped entirely.
pub fn year_columns(
    range: &Range<Data>,
    header_row: u32,
    layout: &WorksheetLayout,
) -> Vec<YearColumn> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };

    let segment_start = header_row + 2;
    let segment_end = layout.segment_last_row.min(last_row);
    if segment_start > segment_end {
        debug!(
            "Header row {} leaves no data segment above row {}",
            header_row, segment_end
        );
        return Vec::new();
    }

    let mut columns = Vec::new();
    let mut seen_years = HashSet::new();

    for column in layout.year_column..=last_col {
        let year = match classify(range.get_value((header_row, column))) {
            CellValue::Blank => continue,
            CellValue::Number(n) => n.trunc() as i32,
            other => {
                warn!(
                    "Ignoring non-numeric year header {:?} at row {}, col {}",
                    other, header_row, column
                );
                continue;
            }
        };

        let has_data = (segment_start..=segment_end)
            .any(|row| classify(range.get_value((row, column))).has_data());
        if !has_data {
            debug!("Dropping year {} (col {}): no non-zero values", year, column);
            continue;
        }

        if !seen_years.insert(year) {
            warn!("Year {} repeated at col {}, keeping the first column", year, column);
            continue;
        }

        columns.push(YearColumn { year, column });
    }

    columns
}

/// Labelled rows from two rows below the header until a run of
/// `blank_run_limit` blank labels.
pub fn variable_rows(
    range: &Range<Data>,
    header_row: u32,
    layout: &WorksheetLayout,
) -> Vec<VariableRow> {
    let Some((last_row, _)) = range.end() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut seen_labels = HashSet::new();
    let mut blank_run = 0;

    for row in (header_row + 2)..=last_row {
        let cell = range.get_value((row, layout.label_column));
        if classify(cell) == CellValue::Blank {
            blank_run += 1;
            if blank_run >= layout.blank_run_limit {
                debug!("Table ended after {} blank labels at row {}", blank_run, row);
                break;
            }
            continue;
        }
        blank_run = 0;

        let label = cell.map(|c| c.to_string()).unwrap_or_default().trim().to_string();
        if !seen_labels.insert(label.clone()) {
            warn!("Duplicate variable '{}' at row {}, keeping the first", label, row);
            continue;
        }
        rows.push(VariableRow { label, row });
    }

    rows
}

/// Reshape one worksheet into tidy observations.
///
/// Values are read as stored (cached formula results). Blank cells never
/// produce a row, and neither do exact zeros at or below
/// `zero_placeholder_row`.
pub fn extract(
    range: &Range<Data>,
    source: &SourceLabel,
    layout: &WorksheetLayout,
) -> Result<Vec<Observation>, ExtractError> {
    let header_row = detect_header_row(range, layout)?;
    let years = year_columns(range, header_row, layout);
    let variables = variable_rows(range, header_row, layout);

    debug!(
        "Header row {}, {} year columns, {} variable rows for {}",
        header_row,
        years.len(),
        variables.len(),
        source
    );

    let mut observations = Vec::with_capacity(years.len() * variables.len());

    for variable in &variables {
        for year in &years {
            let value = match classify(range.get_value((variable.row, year.column))) {
                CellValue::Number(n) => n,
                CellValue::Blank => continue,
                other => {
                    debug!(
                        "Skipping non-numeric value {:?} for '{}' {}",
                        other, variable.label, year.year
                    );
                    continue;
                }
            };

            if variable.row >= layout.zero_placeholder_row && value == 0.0 {
                continue;
            }

            observations.push(Observation {
                state: source.region.clone(),
                city: source.locality.clone(),
                variable: variable.label.clone(),
                year: year.year,
                value,
            });
        }
    }

    Ok(observations)
}

/// [`extract`] with the standard worksheet layout
pub fn extract_observations(
    range: &Range<Data>,
    source: &SourceLabel,
) -> Result<Vec<Observation>, ExtractError> {
    extract(range, source, &WorksheetLayout::default())
}
