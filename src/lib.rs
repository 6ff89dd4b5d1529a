//! Upload a table, map its columns to a scatter encoding, export the chart.
//!
//! ```text
//!  bytes ──► data::load ──► Table ──► data::classify ──► ColumnRoleSet
//!                             │
//!                             ├──► data::sample ──► plot-ready Table
//!                             │                          │
//!  RoleSelection ──► chart::build ──► ChartSpec ──► Figure::render
//!                                                         │
//!                                  export::Exporter ◄─────┘
//!                                   ├── .html (interactive)
//!                                   └── .png  (raster, may be unavailable)
//! ```

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod session;

pub use chart::{build, ChartSpec, Figure, RoleSelection};
pub use config::Settings;
pub use data::{classify, list_sheets, load, sample, ColumnRoleSet, Table, TableCache};
pub use error::{Role, VizError, VizResult};
pub use export::{ExportArtifact, ExportBundle, ExportFormat, Exporter};
pub use session::Session;
