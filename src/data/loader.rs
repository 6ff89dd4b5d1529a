use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Xls, Xlsx};
use log::info;

use super::model::{CellValue, Table};
use crate::error::{ParseFailure, VizError, VizResult};

/// Text markers read as missing values.
const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// Source format
// ---------------------------------------------------------------------------

/// Tabular formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated text (`.csv`)
    Csv,
    /// Tab-separated text (`.tsv`)
    Tsv,
    /// Legacy binary workbook (`.xls`)
    Xls,
    /// Zipped XML workbook (`.xlsx`)
    Xlsx,
}

impl SourceFormat {
    /// Dispatch by extension (case-insensitive).
    pub fn from_source_name(source_name: &str) -> VizResult<Self> {
        let ext = Path::new(source_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "tsv" => Ok(SourceFormat::Tsv),
            "xls" => Ok(SourceFormat::Xls),
            "xlsx" => Ok(SourceFormat::Xlsx),
            _ => Err(VizError::UnsupportedFormat {
                source_name: source_name.to_string(),
            }),
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, SourceFormat::Xls | SourceFormat::Xlsx)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse uploaded bytes into a [`Table`]. Dispatch by the extension of
/// `source_name`.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row followed by data rows
/// * `.xls` / `.xlsx` – first row of the chosen sheet is the header
///
/// `sheet_name` is required for workbooks with more than one sheet and
/// ignored for delimited text.
pub fn load(bytes: &[u8], source_name: &str, sheet_name: Option<&str>) -> VizResult<Table> {
    let format = SourceFormat::from_source_name(source_name)?;
    let table = match format {
        SourceFormat::Csv => load_delimited(bytes, b','),
        SourceFormat::Tsv => load_delimited(bytes, b'\t'),
        SourceFormat::Xls => load_workbook::<Xls<_>>(bytes, sheet_name),
        SourceFormat::Xlsx => load_workbook::<Xlsx<_>>(bytes, sheet_name),
    }
    .map_err(|e| match e {
        LoadError::Ambiguous(sheets) => VizError::AmbiguousSheet { sheets },
        LoadError::Parse(failure) => VizError::parse(source_name, failure),
    })?;

    info!(
        "Loaded '{source_name}': {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Sheet names of a workbook, in workbook order. The workbook flavour is
/// sniffed from the content.
pub fn list_sheets(bytes: &[u8]) -> VizResult<Vec<String>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| VizError::parse("<workbook>", e))?;
    Ok(workbook.sheet_names())
}

enum LoadError {
    Ambiguous(Vec<String>),
    Parse(ParseFailure),
}

impl From<ParseFailure> for LoadError {
    fn from(e: ParseFailure) -> Self {
        LoadError::Parse(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Parse(e.into())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(e: calamine::Error) -> Self {
        LoadError::Parse(e.into())
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(bytes: &[u8], delimiter: u8) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(ParseFailure::Empty.into());
    }

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(guess_cell_type(value));
        }
    }

    Ok(Table::from_columns(headers.into_iter().zip(cells))?)
}

/// Type a raw text cell. Column dtypes are resolved from these afterwards.
fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if NA_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // "NAN", "Nan", ... slip past the marker list
        return if f.is_nan() { CellValue::Null } else { CellValue::Float(f) };
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook<'a, R>(bytes: &'a [u8], sheet_name: Option<&str>) -> Result<Table, LoadError>
where
    R: Reader<Cursor<&'a [u8]>>,
    calamine::Error: From<R::Error>,
{
    let mut workbook = R::new(Cursor::new(bytes)).map_err(calamine::Error::from)?;
    let sheets = workbook.sheet_names();

    let sheet = match sheet_name {
        Some(name) if sheets.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(ParseFailure::SheetNotFound {
                name: name.to_string(),
                available: sheets,
            }
            .into())
        }
        None => match sheets.as_slice() {
            [only] => only.clone(),
            [] => return Err(ParseFailure::Empty.into()),
            _ => return Err(LoadError::Ambiguous(sheets)),
        },
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(calamine::Error::from)?;
    Ok(table_from_range(&range)?)
}

/// First row is the header; the remaining rows are data.
fn table_from_range(range: &Range<Data>) -> Result<Table, ParseFailure> {
    let mut rows = range.rows();
    let header = rows.next().ok_or(ParseFailure::Empty)?;
    let headers: Vec<String> = header.iter().map(header_text).collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col, cell) in cells.iter_mut().zip(row.iter()) {
            col.push(spreadsheet_cell(cell));
        }
    }

    Table::from_columns(headers.into_iter().zip(cells))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if NA_MARKERS.contains(&s.trim()) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            CellValue::Date(cell.to_string())
        }
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}
