//! Unit tests for deterministic sampling.

use std::borrow::Cow;

use viztools::data::sample;
use viztools::VizError;

use crate::helpers::numeric_table;

#[test]
fn test_within_bound_returns_table_unchanged() {
    let table = numeric_table(300);
    let out = sample(&table, 300).unwrap();
    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(*out, table);
}

#[test]
fn test_over_bound_returns_exactly_bound_rows() {
    let table = numeric_table(5_000);
    let out = sample(&table, 250).unwrap();
    assert_eq!(out.row_count(), 250);
    for column in out.columns() {
        assert_eq!(column.len(), 250);
    }
}

#[test]
fn test_repeated_samples_identical_content_and_order() {
    let table = numeric_table(10_000);
    let a = sample(&table, 1_000).unwrap();
    let b = sample(&table, 1_000).unwrap();
    assert_eq!(a.column("col1").unwrap().values, b.column("col1").unwrap().values);
}

#[test]
fn test_rows_stay_aligned_across_columns() {
    let table = numeric_table(2_000);
    let out = sample(&table, 200).unwrap();
    let col1 = &out.column("col1").unwrap().values;
    let col2 = &out.column("col2").unwrap().values;
    for (a, b) in col1.iter().zip(col2) {
        assert_eq!(a.as_f64().unwrap() * 0.5, b.as_f64().unwrap());
    }
}

#[test]
fn test_zero_bound_is_invalid() {
    assert!(matches!(
        sample(&numeric_table(5), 0),
        Err(VizError::InvalidBound { .. })
    ));
}
