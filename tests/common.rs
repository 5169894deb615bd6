// Shared worksheet fixtures for the extractor, importer and batch tests
#![allow(dead_code)]

use calamine::{Data, Range};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Sparse worksheet description, turned into either an in-memory range
/// or a real .xlsx file
#[derive(Debug, Clone, Default)]
pub struct SheetFixture {
    cells: Vec<(u32, u32, Data)>,
}

impl SheetFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, row: u32, col: u32, value: f64) -> Self {
        self.cells.push((row, col, Data::Float(value)));
        self
    }

    pub fn text(mut self, row: u32, col: u32, value: &str) -> Self {
        self.cells.push((row, col, Data::String(value.to_string())));
        self
    }

    /// Range spanning the used cells, addressed absolutely like a sheet read from disk
    pub fn to_range(&self) -> Range<Data> {
        if self.cells.is_empty() {
            return Range::empty();
        }
        let min_row = self.cells.iter().map(|c| c.0).min().unwrap();
        let min_col = self.cells.iter().map(|c| c.1).min().unwrap();
        let max_row = self.cells.iter().map(|c| c.0).max().unwrap();
        let max_col = self.cells.iter().map(|c| c.1).max().unwrap();

        let mut range = Range::new((min_row, min_col), (max_row, max_col));
        for (row, col, value) in &self.cells {
            range.set_value((*row, *col), value.clone());
        }
        range
    }

    /// Write the fixture as a single-sheet workbook
    pub fn write_xlsx(&self, path: &Path, sheet_name: &str) -> PathBuf {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).unwrap();

        for (row, col, value) in &self.cells {
            let col = u16::try_from(*col).unwrap();
            match value {
                Data::Float(n) => {
                    worksheet.write_number(*row, col, *n).unwrap();
                }
                Data::String(s) => {
                    worksheet.write_string(*row, col, s).unwrap();
                }
                other => panic!("unsupported fixture cell {other:?}"),
            }
        }

        workbook.save(path).unwrap();
        path.to_path_buf()
    }
}

pub const HEADER_ROW: u32 = 5;
pub const FIRST_VARIABLE_ROW: u32 = 7;
pub const LAST_VARIABLE_ROW: u32 = 33;
pub const FIRST_YEAR: i32 = 2020;
pub const LAST_YEAR: i32 = 2024;

pub fn year_col(year: i32) -> u32 {
    4 + (year - FIRST_YEAR) as u32
}

pub fn variable_label(row: u32) -> String {
    format!("Variable {row:02}")
}

/// The standard municipality sheet used across the tests.
///
/// Header at row index 5 with years 2020..=2024 from column E, labelled rows
/// 7..=33. 2020-2023 hold non-zero values except two zeros for 2021 (rows 19
/// and 29); 2024 holds only zeros and blanks inside rows 7..=27 and one
/// stray value at row 30.
pub fn finance_sheet() -> SheetFixture {
    let mut sheet = SheetFixture::new()
        .text(0, 0, "Financial Indicator Worksheet")
        .text(2, 4, "Fiscal year")
        .text(HEADER_ROW, 0, "Indicator");

    for year in FIRST_YEAR..=LAST_YEAR {
        sheet = sheet.number(HEADER_ROW, year_col(year), f64::from(year));
    }

    for row in FIRST_VARIABLE_ROW..=LAST_VARIABLE_ROW {
        sheet = sheet.text(row, 0, &variable_label(row));

        for year in FIRST_YEAR..LAST_YEAR {
            let value = if year == 2021 && (row == 19 || row == 29) {
                0.0
            } else {
                f64::from(row) * 10.0 + f64::from(year - FIRST_YEAR) + 0.5
            };
            sheet = sheet.number(row, year_col(year), value);
        }

        if row <= 27 && row % 2 == 0 {
            sheet = sheet.number(row, year_col(LAST_YEAR), 0.0);
        }
    }

    sheet.number(30, year_col(LAST_YEAR), 42.0)
}

/// Observations the standard sheet yields: 27 rows x 4 years, minus the
/// zero at row 29
pub const FINANCE_SHEET_OBSERVATIONS: usize = 27 * 4 - 1;

/// A sheet without any year in the detection column
pub fn headerless_sheet() -> SheetFixture {
    SheetFixture::new()
        .text(0, 0, "Notes")
        .text(1, 0, "Revenue")
        .number(1, 4, 1250.0)
        .number(3, 6, 2021.0)
}
