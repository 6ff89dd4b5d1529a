/// Data layer: table model, loading, classification and sampling.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .xls / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  loader   │ ◄──  │ TableCache │  fingerprint + name + sheet
///   └──────────┘      └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named, typed columns of equal length
///   └──────────┘
///     │      │
///     ▼      ▼
///  classify  sample  → ColumnRoleSet / plot-ready Table
/// ```

pub mod cache;
pub mod classify;
pub mod loader;
pub mod model;
pub mod sample;

pub use cache::TableCache;
pub use classify::{classify, ColumnRoleSet};
pub use loader::{list_sheets, load, SourceFormat};
pub use model::{CellValue, Column, DType, Table};
pub use sample::{sample, SAMPLE_SEED};
