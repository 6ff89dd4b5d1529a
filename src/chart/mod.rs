//! Chart layer: validated encodings and the rendered scatter figure.

pub mod encoding;
pub mod figure;

pub use encoding::{build, ChartSpec, RoleSelection};
pub use figure::{Figure, MarkerSymbol, Point, Trace, TraceColor};
