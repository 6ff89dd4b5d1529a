use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseFailure;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Grouping keys on cells (`HashMap`, `BTreeSet`), so `CellValue` is `Eq + Ord + Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Spreadsheet date/time kept as its display text.
    Date(String),
}

// Equality, ordering and hashing all follow `total_cmp`, so NaN equals NaN.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    /// Null < Bool < Integer < Float < String < Date; floats by `total_cmp`.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::String(a), CellValue::String(b))
            | (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for positional / size / colour scales.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Integer(_) => 2,
            CellValue::Float(_) => 3,
            CellValue::String(_) => 4,
            CellValue::Date(_) => 5,
        }
    }
}

// ---------------------------------------------------------------------------
// DType – the resolved type of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Integer,
    Float,
    Boolean,
    DateTime,
    Text,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Integer | DType::Float)
    }

    /// Resolve a column dtype from its cells.
    ///
    /// * all integers                  → `Integer` (`Float` if any cell is missing)
    /// * all integers / floats         → `Float`
    /// * all booleans                  → `Boolean`
    /// * all dates                     → `DateTime`
    /// * nothing but missing cells     → `Float`
    /// * anything else                 → `Text`
    pub fn infer(values: &[CellValue]) -> DType {
        let mut has_null = false;
        let (mut ints, mut floats, mut bools, mut dates, mut other) = (0, 0, 0, 0, 0);
        for v in values {
            match v {
                CellValue::Null => has_null = true,
                CellValue::Integer(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::Date(_) => dates += 1,
                CellValue::String(_) => other += 1,
            }
        }
        let present = ints + floats + bools + dates + other;
        if present == 0 {
            DType::Float
        } else if ints == present {
            if has_null {
                DType::Float
            } else {
                DType::Integer
            }
        } else if ints + floats == present {
            DType::Float
        } else if bools == present {
            DType::Boolean
        } else if dates == present {
            DType::DateTime
        } else {
            DType::Text
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column and resolve its dtype from the cells. Integer
    /// columns with gaps are promoted to floats.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = DType::infer(&values);
        let values = if dtype == DType::Float {
            values
                .into_iter()
                .map(|v| match v {
                    CellValue::Integer(i) => CellValue::Float(i as f64),
                    other => other,
                })
                .collect()
        } else {
            values
        };
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An in-memory dataset: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl Table {
    /// Assemble a table from raw `(header, cells)` pairs.
    ///
    /// Headers are normalised (blank → `Unnamed: {i}`, repeats → `name.1`,
    /// `name.2`, …) and each column's dtype is inferred.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<CellValue>)>,
    ) -> Result<Self, ParseFailure> {
        let (headers, cells): (Vec<String>, Vec<Vec<CellValue>>) =
            columns.into_iter().map(|(h, v)| (h.into(), v)).unzip();
        let names = normalize_headers(&headers);

        let row_count = cells.first().map(Vec::len).unwrap_or(0);
        let mut built = Vec::with_capacity(names.len());
        for (name, values) in names.into_iter().zip(cells) {
            if values.len() != row_count {
                return Err(ParseFailure::Ragged {
                    column: name,
                    expected: row_count,
                    found: values.len(),
                });
            }
            built.push(Column::new(name, values));
        }
        Ok(Self::from_resolved(built, row_count))
    }

    /// Columns whose names and lengths are already known to be valid.
    fn from_resolved(columns: Vec<Column>, row_count: usize) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Table {
            columns,
            index,
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// A new table holding the given rows, in the given order.
    /// Dtypes are carried over unchanged.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Table::from_resolved(columns, rows.len())
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..n.min(self.row_count)).collect();
        self.take_rows(&rows)
    }
}

/// Make headers non-empty and unique, renaming repeats with a numeric suffix.
fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(headers.len());

    for (i, raw) in headers.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            raw.clone()
        };
        let mut name = base.clone();
        while taken.contains(&name) {
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }
        taken.insert(name.clone());
        out.push(name);
    }
    out
}
