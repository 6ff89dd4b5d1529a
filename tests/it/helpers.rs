//! Shared fixtures.

use viztools::data::{CellValue, Table};

/// Three numeric columns of `rows` rows: col1 = i, col2 = i * 0.5, col3 = i % 7.
pub fn numeric_table(rows: usize) -> Table {
    let col1 = (0..rows).map(|i| CellValue::Integer(i as i64)).collect();
    let col2 = (0..rows).map(|i| CellValue::Float(i as f64 * 0.5)).collect();
    let col3 = (0..rows).map(|i| CellValue::Integer((i % 7) as i64)).collect();
    Table::from_columns(vec![("col1", col1), ("col2", col2), ("col3", col3)])
        .expect("columns have equal length")
}

/// A small mixed table as CSV text.
pub const IRIS_CSV: &str = "\
sepal_length,sepal_width,petal_length,species,site
5.1,3.5,1.4,setosa,north
4.9,3.0,1.4,setosa,south
7.0,3.2,4.7,versicolor,north
6.4,3.2,4.5,versicolor,south
6.3,3.3,6.0,virginica,north
5.8,2.7,5.1,virginica,south
";
