//! Unit tests for chart spec construction.

use viztools::data::{CellValue, Table};
use viztools::{build, Role, RoleSelection, VizError};

fn ab_table() -> Table {
    Table::from_columns(vec![
        ("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
        ("b", vec![CellValue::String("x".into()), CellValue::String("y".into())]),
    ])
    .unwrap()
}

#[test]
fn test_text_y_column_is_invalid_encoding() {
    let err = build(&ab_table(), &RoleSelection::new("a", "b")).unwrap_err();
    match err {
        VizError::InvalidEncoding { role, reason } => {
            assert_eq!(role, Role::Y);
            assert!(reason.contains("'b'"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_tooltip_dropped() {
    let table = Table::from_columns(vec![
        ("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
        ("b", vec![CellValue::Float(1.0), CellValue::Float(2.0)]),
    ])
    .unwrap();
    let spec = build(&table, &RoleSelection::new("a", "b").tooltip(["a", "z"])).unwrap();
    assert_eq!(spec.tooltip(), ["a"]);
}

#[test]
fn test_optional_roles_default_to_unset() {
    let table = Table::from_columns(vec![
        ("a", vec![CellValue::Integer(1)]),
        ("c", vec![CellValue::Integer(2)]),
    ])
    .unwrap();
    let spec = build(&table, &RoleSelection::new("a", "c")).unwrap();
    assert_eq!(spec.color(), None);
    assert_eq!(spec.symbol(), None);
    assert_eq!(spec.size(), None);
}
