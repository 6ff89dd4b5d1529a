use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Roles – which encoding slot an error refers to
// ---------------------------------------------------------------------------

/// An encoding slot of the scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    X,
    Y,
    Color,
    Symbol,
    Size,
    Opacity,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::X => "x",
            Role::Y => "y",
            Role::Color => "color",
            Role::Symbol => "symbol",
            Role::Size => "size",
            Role::Opacity => "opacity",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Parse failures – the cause carried by `VizError::Parse`
// ---------------------------------------------------------------------------

/// Why a source file could not be turned into a table.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("sheet '{name}' not found (available: {available:?})")]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    Ragged {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("no header row")]
    Empty,
}

// ---------------------------------------------------------------------------
// VizError
// ---------------------------------------------------------------------------

/// Every failure the core can report. Each one is scoped to the operation
/// that raised it.
#[derive(Error, Debug)]
pub enum VizError {
    #[error("unsupported file type '{source_name}' (expected .csv, .tsv, .xls or .xlsx)")]
    UnsupportedFormat { source_name: String },

    #[error("workbook has {} sheets, pick one of {sheets:?}", .sheets.len())]
    AmbiguousSheet { sheets: Vec<String> },

    #[error("could not read '{source_name}': {source}")]
    Parse {
        source_name: String,
        #[source]
        source: ParseFailure,
    },

    #[error("row bound must be positive, got {max_rows}")]
    InvalidBound { max_rows: usize },

    #[error("invalid {role} encoding: {reason}")]
    InvalidEncoding { role: Role, reason: String },

    #[error("export failed: {0}")]
    Export(String),

    #[error("raster rendering engine unavailable: {0}")]
    RenderEngineUnavailable(String),
}

/// Result type alias for core operations.
pub type VizResult<T> = Result<T, VizError>;

impl VizError {
    pub(crate) fn parse(source_name: &str, source: impl Into<ParseFailure>) -> Self {
        VizError::Parse {
            source_name: source_name.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn encoding(role: Role, reason: impl Into<String>) -> Self {
        VizError::InvalidEncoding {
            role,
            reason: reason.into(),
        }
    }

    /// Whether the caller can carry on with other work after this error.
    /// Only a missing raster engine qualifies; everything else means the
    /// input has to be corrected.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VizError::RenderEngineUnavailable(_))
    }
}
