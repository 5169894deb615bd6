// Worksheet reshaping rules exercised on literal in-memory sheets

mod common;

use common::*;
use finance_decoder::tidy::extractor::{detect_header_row, variable_rows, year_columns};
use finance_decoder::tidy::{
    extract, extract_observations, ExtractError, Observation, SourceLabel, WorksheetLayout,
};
use std::collections::HashSet;

fn bullhead_city() -> SourceLabel {
    SourceLabel::from_file_name("AZ_Bullhead_City.xlsx")
}

fn find<'a>(observations: &'a [Observation], row: u32, year: i32) -> Option<&'a Observation> {
    let label = variable_label(row);
    observations
        .iter()
        .find(|o| o.variable == label && o.year == year)
}

#[test]
fn test_header_row_detected_at_index_five() {
    let range = finance_sheet().to_range();
    let header = detect_header_row(&range, &WorksheetLayout::default()).unwrap();
    assert_eq!(header, HEADER_ROW);
}

#[test]
fn test_blank_year_column_excluded_for_all_variables() {
    let range = finance_sheet().to_range();
    let layout = WorksheetLayout::default();

    let years: Vec<i32> = year_columns(&range, HEADER_ROW, &layout)
        .iter()
        .map(|y| y.year)
        .collect();
    assert_eq!(years, vec![2020, 2021, 2022, 2023]);

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    assert!(observations.iter().all(|o| o.year != 2024));
    assert_eq!(observations.len(), FINANCE_SHEET_OBSERVATIONS);
}

#[test]
fn test_zero_below_row_29_is_dropped() {
    let range = finance_sheet().to_range();
    let observations = extract_observations(&range, &bullhead_city()).unwrap();

    assert!(find(&observations, 29, 2021).is_none());
    // Same row, other years still present
    assert!(find(&observations, 29, 2020).is_some());
}

#[test]
fn test_zero_above_row_29_is_kept() {
    let range = finance_sheet().to_range();
    let observations = extract_observations(&range, &bullhead_city()).unwrap();

    let kept = find(&observations, 19, 2021).expect("row 20 zero should be kept");
    assert_eq!(kept.value, 0.0);
}

#[test]
fn test_observations_carry_source_label() {
    let range = finance_sheet().to_range();
    let observations = extract_observations(&range, &bullhead_city()).unwrap();

    let first = find(&observations, 7, 2020).unwrap();
    assert_eq!(first.state.as_deref(), Some("AZ"));
    assert_eq!(first.city, "Bullhead_City");
    assert_eq!(first.value, 70.5);

    let unlabelled = extract_observations(&range, &SourceLabel::from_file_name("UnknownPlace.xlsx"))
        .unwrap();
    assert!(unlabelled.iter().all(|o| o.state.is_none() && o.city == "UnknownPlace"));
}

#[test]
fn test_emitted_values_respect_zero_rule() {
    let range = finance_sheet().to_range();
    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    let late_rows: HashSet<String> = (28..=LAST_VARIABLE_ROW).map(variable_label).collect();

    for observation in &observations {
        assert!(observation.value.is_finite());
        if late_rows.contains(&observation.variable) {
            assert_ne!(observation.value, 0.0, "{observation:?}");
        }
    }
}

#[test]
fn test_missing_header_is_malformed() {
    let range = headerless_sheet().to_range();
    let result = extract_observations(&range, &bullhead_city());

    assert_eq!(
        result,
        Err(ExtractError::MalformedWorksheet {
            column: 4,
            year_min: 1900,
            year_max: 2100
        })
    );
}

#[test]
fn test_year_outside_window_is_malformed() {
    let range = SheetFixture::new()
        .number(3, 4, 1899.0)
        .number(4, 4, 2101.0)
        .text(5, 0, "Revenue")
        .number(5, 4, 12.0)
        .to_range();

    assert!(matches!(
        extract_observations(&range, &bullhead_city()),
        Err(ExtractError::MalformedWorksheet { .. })
    ));
}

#[test]
fn test_header_year_as_text_is_not_detected() {
    let range = SheetFixture::new()
        .text(2, 4, "2020")
        .text(4, 0, "Revenue")
        .number(4, 4, 10.0)
        .to_range();

    assert!(detect_header_row(&range, &WorksheetLayout::default()).is_err());
}

#[test]
fn test_scan_stops_after_five_blank_labels() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .text(2, 0, "Revenue")
        .number(2, 4, 1.0)
        .text(3, 0, "Expenses")
        .number(3, 4, 2.0)
        // rows 4..=8 unlabelled, then one more labelled row
        .number(6, 4, 99.0)
        .text(9, 0, "Orphan")
        .number(9, 4, 3.0)
        .to_range();

    let rows = variable_rows(&range, 0, &WorksheetLayout::default());
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Revenue", "Expenses"]);

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    assert_eq!(observations.len(), 2);
    assert!(observations.iter().all(|o| o.variable != "Orphan"));
}

#[test]
fn test_four_blank_labels_do_not_stop_scan() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .text(2, 0, "Revenue")
        .number(2, 4, 1.0)
        .text(7, 0, "Debt")
        .number(7, 4, 4.0)
        .to_range();

    let labels: Vec<String> = variable_rows(&range, 0, &WorksheetLayout::default())
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, vec!["Revenue", "Debt"]);
}

#[test]
fn test_blank_and_text_values_are_not_emitted() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .number(0, 5, 2021.0)
        .text(2, 0, "Revenue")
        .number(2, 4, 5.0)
        .text(2, 5, "n/a")
        .text(3, 0, "Expenses")
        .text(3, 4, "   ")
        .number(3, 5, 7.0)
        .to_range();

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    let pairs: Vec<(&str, i32, f64)> = observations
        .iter()
        .map(|o| (o.variable.as_str(), o.year, o.value))
        .collect();
    assert_eq!(pairs, vec![("Revenue", 2020, 5.0), ("Expenses", 2021, 7.0)]);
}

#[test]
fn test_nan_text_is_blank() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .number(0, 5, 2021.0)
        .text(2, 0, "Revenue")
        .text(2, 4, "NaN")
        .text(2, 5, "nan")
        .text(3, 0, "Debt")
        .number(3, 4, 1.0)
        .to_range();

    let layout = WorksheetLayout::default();
    let years: Vec<i32> = year_columns(&range, 0, &layout).iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2020]);

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    assert!(observations.iter().all(|o| o.value.is_finite()));
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].variable, "Debt");
}

#[test]
fn test_infinite_text_is_not_emitted() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .text(2, 0, "Revenue")
        .text(2, 4, "inf")
        .text(3, 0, "Debt")
        .number(3, 4, 2.0)
        .to_range();

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    let variables: Vec<&str> = observations.iter().map(|o| o.variable.as_str()).collect();
    assert_eq!(variables, vec!["Debt"]);
}

#[test]
fn test_header_directly_above_ceiling_leaves_no_years() {
    // Segment would start at row 28, past the inspected rows
    let range = SheetFixture::new()
        .number(26, 4, 2020.0)
        .text(28, 0, "Revenue")
        .number(28, 4, 10.0)
        .to_range();

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    assert!(observations.is_empty());
}

#[test]
fn test_duplicate_labels_keep_first_row() {
    let range = SheetFixture::new()
        .number(0, 4, 2020.0)
        .text(2, 0, "Revenue")
        .number(2, 4, 1.0)
        .text(3, 0, "Revenue")
        .number(3, 4, 2.0)
        .to_range();

    let observations = extract_observations(&range, &bullhead_city()).unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].value, 1.0);
}

#[test]
fn test_custom_layout_year_column() {
    let layout = WorksheetLayout {
        year_column: 2,
        ..Default::default()
    };
    let range = SheetFixture::new()
        .number(1, 2, 2019.0)
        .number(1, 3, 2020.0)
        .text(3, 0, "Revenue")
        .number(3, 2, 8.0)
        .number(3, 3, 9.0)
        .to_range();

    let observations = extract(&range, &bullhead_city(), &layout).unwrap();
    let years: Vec<i32> = observations.iter().map(|o| o.year).collect();
    assert_eq!(years, vec![2019, 2020]);
}

#[test]
fn test_keys_unique_across_worksheets() {
    let range = finance_sheet().to_range();
    let mut all = Vec::new();
    for file_name in ["AZ_Bullhead_City.xlsx", "AZ_Kingman.xlsx", "MB_Steinbach.xlsx"] {
        let source = SourceLabel::from_file_name(file_name);
        all.extend(extract_observations(&range, &source).unwrap());
    }

    let keys: HashSet<_> = all
        .iter()
        .map(|o| (o.state.clone(), o.city.clone(), o.variable.clone(), o.year))
        .collect();
    assert_eq!(keys.len(), all.len());
    assert_eq!(all.len(), 3 * FINANCE_SHEET_OBSERVATIONS);
}
