//! Unit tests for column classification.

use std::collections::HashSet;

use viztools::data::{classify, load};

use crate::helpers::{numeric_table, IRIS_CSV};

#[test]
fn test_partition_has_no_overlap_and_no_omission() {
    let table = load(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    let roles = classify(&table);

    let numeric: HashSet<&str> = roles.numeric.iter().map(String::as_str).collect();
    let other: HashSet<&str> = roles.other.iter().map(String::as_str).collect();
    let all: HashSet<&str> = table.column_names().collect();

    assert!(numeric.is_disjoint(&other));
    assert_eq!(&numeric | &other, all);
    assert_eq!(roles.numeric, vec!["sepal_length", "sepal_width", "petal_length"]);
    assert_eq!(roles.other, vec!["species", "site"]);
}

#[test]
fn test_classification_is_deterministic() {
    let table = numeric_table(20);
    assert_eq!(classify(&table), classify(&table));
    assert_eq!(classify(&table).numeric.len(), 3);
}

#[test]
fn test_numeric_looking_text_column_stays_other() {
    let csv = "a,b,code\n1,2,007\n3,4,A12\n";
    let table = load(csv.as_bytes(), "codes.csv", None).unwrap();
    assert_eq!(classify(&table).other, vec!["code"]);
}
