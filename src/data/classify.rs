use super::model::Table;

// ---------------------------------------------------------------------------
// Column roles: which columns can drive numeric encodings
// ---------------------------------------------------------------------------

/// Partition of a table's columns into numeric and non-numeric names,
/// each in table order. Derived from a [`Table`]; recompute it whenever
/// the table changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoleSet {
    pub numeric: Vec<String>,
    pub other: Vec<String>,
}

impl ColumnRoleSet {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    /// Every column name, numeric first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.numeric.iter().chain(&self.other).map(String::as_str)
    }

    /// X and Y both need a numeric column.
    pub fn can_plot(&self) -> bool {
        self.numeric.len() >= 2
    }
}

/// Split columns by their resolved dtype. Cells are not re-inspected:
/// a text column whose values happen to look numeric stays "other".
pub fn classify(table: &Table) -> ColumnRoleSet {
    let (numeric, other): (Vec<_>, Vec<_>) = table
        .columns()
        .iter()
        .partition(|c| c.dtype.is_numeric());

    ColumnRoleSet {
        numeric: numeric.into_iter().map(|c| c.name.clone()).collect(),
        other: other.into_iter().map(|c| c.name.clone()).collect(),
    }
}
