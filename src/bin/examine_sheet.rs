use calamine::{open_workbook_auto, Data, DataType, Reader};
use finance_decoder::tidy::extractor::{detect_header_row, year_columns, variable_rows};
use finance_decoder::tidy::WorksheetLayout;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let Some(file_path) = args.get(1) else {
        eprintln!("Usage: examine-sheet <workbook> [sheet]");
        std::process::exit(2);
    };

    println!("Opening workbook: {file_path}");
    let mut workbook = open_workbook_auto(file_path)?;

    println!("\nSheet names:");
    for (i, name) in workbook.sheet_names().iter().enumerate() {
        println!("  {i}: {name}");
    }

    let layout = WorksheetLayout {
        sheet_name: args.get(2).cloned().unwrap_or_else(|| "Input".to_string()),
        ..Default::default()
    };

    println!("\n\nExamining sheet: {}", layout.sheet_name);
    println!("{}", "=".repeat(100));

    let range = workbook.worksheet_range(&layout.sheet_name)?;

    println!("Dimensions: {:?}", range.get_size());
    if let (Some(start), Some(end)) = (range.start(), range.end()) {
        println!("Used cells: {start:?} .. {end:?} (row, col; 0-based)");
    }
    println!("\nFirst 40 non-empty rows (showing first 10 columns):");
    println!("{}", "=".repeat(100));

    let first_row = range.start().map(|(r, _)| r).unwrap_or(0);
    let shown = range
        .rows()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
        .take(40);
    for (offset, row) in shown {
        print!("Row {:3}: ", first_row as usize + offset + 1);
        for cell in row.iter().take(10) {
            print_cell(cell);
        }
        println!();
    }

    println!("\n{}", "=".repeat(100));
    match detect_header_row(&range, &layout) {
        Ok(header_row) => {
            println!("Header row: {} (worksheet row {})", header_row, header_row + 1);
            let years = year_columns(&range, header_row, &layout);
            println!("Year columns kept: {}", years.len());
            for year in &years {
                println!("  {} -> column index {}", year.year, year.column);
            }
            println!("Variable rows: {}", variable_rows(&range, header_row, &layout).len());
        }
        Err(e) => println!("No header detected: {e}"),
    }

    Ok(())
}

fn print_cell(cell: &Data) {
    if cell.is_empty() {
        print!("[empty] ");
    } else {
        print!("[{cell}] ");
    }
}
