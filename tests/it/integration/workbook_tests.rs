//! Spreadsheet sources: sheet listing and selection on real workbooks.

use viztools::error::ParseFailure;
use viztools::{classify, list_sheets, load, VizError};

const TWO_SHEETS: &[u8] = include_bytes!("../../fixtures/two_sheets.xlsx");
const ONE_SHEET: &[u8] = include_bytes!("../../fixtures/one_sheet.xlsx");

#[test]
fn test_list_sheets_keeps_workbook_order() {
    assert_eq!(list_sheets(TWO_SHEETS).unwrap(), vec!["One", "Two"]);
    assert_eq!(list_sheets(ONE_SHEET).unwrap(), vec!["Data"]);
}

#[test]
fn test_multi_sheet_workbook_needs_a_sheet_name() {
    let err = load(TWO_SHEETS, "book.xlsx", None).unwrap_err();
    match err {
        VizError::AmbiguousSheet { sheets } => assert_eq!(sheets, vec!["One", "Two"]),
        other => panic!("expected AmbiguousSheet, got {other:?}"),
    }
}

#[test]
fn test_named_sheet_is_loaded() {
    let table = load(TWO_SHEETS, "book.xlsx", Some("Two")).unwrap();
    assert_eq!(table.row_count(), 1);
    let names: Vec<&str> = table.column_names().collect();
    assert_eq!(names, vec!["x", "y", "label"]);

    let roles = classify(&table);
    assert_eq!(roles.numeric, vec!["x", "y"]);
    assert_eq!(roles.other, vec!["label"]);

    let first = load(TWO_SHEETS, "book.xlsx", Some("One")).unwrap();
    assert_eq!(first.row_count(), 2);
}

#[test]
fn test_unknown_sheet_is_a_parse_error() {
    let err = load(TWO_SHEETS, "book.xlsx", Some("Zzz")).unwrap_err();
    match err {
        VizError::Parse {
            source: ParseFailure::SheetNotFound { name, available },
            ..
        } => {
            assert_eq!(name, "Zzz");
            assert_eq!(available, vec!["One", "Two"]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn test_single_sheet_is_selected_automatically() {
    let table = load(ONE_SHEET, "b.XLSX", None).unwrap();
    assert_eq!(table.row_count(), 1);
    assert!(table.has_column("x"));
}
