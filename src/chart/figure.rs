use std::collections::{BTreeSet, HashMap};

use crate::chart::encoding::ChartSpec;
use crate::color::{ColorMap, ColorScale, Rgb};
use crate::config::FigureSettings;
use crate::data::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Marker symbols
// ---------------------------------------------------------------------------

/// Marker shapes cycled through for the distinct values of a symbol column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerSymbol {
    Circle,
    Diamond,
    Square,
    X,
    TriangleUp,
}

impl MarkerSymbol {
    pub const SEQUENCE: [MarkerSymbol; 5] = [
        MarkerSymbol::Circle,
        MarkerSymbol::Diamond,
        MarkerSymbol::Square,
        MarkerSymbol::X,
        MarkerSymbol::TriangleUp,
    ];

    /// Symbol name understood by the chart runtime.
    pub fn name(self) -> &'static str {
        match self {
            MarkerSymbol::Circle => "circle",
            MarkerSymbol::Diamond => "diamond",
            MarkerSymbol::Square => "square",
            MarkerSymbol::X => "x",
            MarkerSymbol::TriangleUp => "triangle-up",
        }
    }
}

// ---------------------------------------------------------------------------
// Figure – a rendered chart, independent of output format
// ---------------------------------------------------------------------------

/// How a trace's markers are coloured.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceColor {
    Fixed(Rgb),
    /// Per-point values mapped through [`Figure::color_scale`].
    Scaled,
}

/// One drawable point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color_value: Option<f64>,
    pub size_value: Option<f64>,
    /// Tooltip cells, in [`ChartSpec::tooltip`] order.
    pub hover: Vec<CellValue>,
}

/// Markers sharing one colour group and one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Legend label; `None` for the single unnamed series.
    pub name: Option<String>,
    pub symbol: MarkerSymbol,
    pub color: TraceColor,
    pub points: Vec<Point>,
}

/// Scatter chart ready for export: traces plus layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub spec: ChartSpec,
    pub traces: Vec<Trace>,
    pub row_count: usize,
    pub width: u32,
    pub height: u32,
    pub marker_size: f64,
    /// Set when the colour column is numeric.
    pub color_scale: Option<ColorScale>,
    /// Area scaling for the size column: diameter = sqrt(value / size_ref).
    pub size_ref: Option<f64>,
}

impl Figure {
    /// Lay out `table` according to `spec`.
    ///
    /// Categorical colour and symbol columns split rows into one trace per
    /// distinct (colour, symbol) pair, in order of first appearance. A
    /// numeric colour column instead drives a continuous colour scale.
    pub fn render(spec: &ChartSpec, table: &Table, settings: &FigureSettings) -> Figure {
        let x = table.column(spec.x());
        let y = table.column(spec.y());
        let color = spec.color().and_then(|c| table.column(c));
        let symbol = spec.symbol().and_then(|c| table.column(c));
        let size = spec.size().and_then(|c| table.column(c));
        let tooltip: Vec<&Column> = spec
            .tooltip()
            .iter()
            .filter_map(|c| table.column(c))
            .collect();

        let continuous = color.filter(|c| c.dtype.is_numeric());
        let categorical = color.filter(|c| !c.dtype.is_numeric());

        let color_map = categorical.map(|c| ColorMap::new(&first_appearance(c)));
        let symbols: Vec<CellValue> = symbol.map(first_appearance).unwrap_or_default();

        let mut groups: HashMap<(Option<CellValue>, Option<CellValue>), usize> = HashMap::new();
        let mut traces: Vec<Trace> = Vec::new();

        for row in 0..table.row_count() {
            let color_key = categorical.map(|c| c.values[row].clone());
            let symbol_key = symbol.map(|c| c.values[row].clone());
            let key = (color_key, symbol_key);

            let slot = match groups.get(&key) {
                Some(&i) => i,
                None => {
                    traces.push(new_trace(&key, &color_map, continuous.is_some(), &symbols));
                    groups.insert(key, traces.len() - 1);
                    traces.len() - 1
                }
            };

            traces[slot].points.push(Point {
                x: numeric_at(x, row),
                y: numeric_at(y, row),
                color_value: continuous.and_then(|c| c.values[row].as_f64()),
                size_value: size.and_then(|c| c.values[row].as_f64()),
                hover: tooltip.iter().map(|c| c.values[row].clone()).collect(),
            });
        }

        Figure {
            spec: spec.clone(),
            traces,
            row_count: table.row_count(),
            width: settings.width,
            height: settings.height,
            marker_size: settings.marker_size,
            color_scale: continuous
                .and_then(value_range)
                .map(|(min, max)| ColorScale { min, max }),
            size_ref: size
                .and_then(value_range)
                .map(|(_, max)| max)
                .filter(|max| *max > 0.0)
                .map(|max| 2.0 * max / settings.size_max.powi(2)),
        }
    }

    /// Marker diameter in px for one point at nominal resolution.
    pub fn marker_diameter(&self, point: &Point) -> f64 {
        match self.size_ref {
            Some(size_ref) => point
                .size_value
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| (v / size_ref).sqrt())
                .unwrap_or(0.0),
            None => self.marker_size,
        }
    }

    /// Marker colour for one point of `trace`.
    pub fn point_color(&self, trace: &Trace, point: &Point) -> Rgb {
        match (&trace.color, &self.color_scale) {
            (TraceColor::Fixed(rgb), _) => *rgb,
            (TraceColor::Scaled, Some(scale)) => scale.color_for(point.color_value),
            (TraceColor::Scaled, None) => Rgb::GRAY,
        }
    }

    /// Bounds of all finite x/y values, or `None` when nothing is plottable.
    pub fn data_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let finite = self
            .traces
            .iter()
            .flat_map(|t| &t.points)
            .filter(|p| p.x.is_finite() && p.y.is_finite());

        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for p in finite {
            let ((x0, x1), (y0, y1)) = bounds.unwrap_or(((p.x, p.x), (p.y, p.y)));
            bounds = Some(((x0.min(p.x), x1.max(p.x)), (y0.min(p.y), y1.max(p.y))));
        }
        bounds
    }
}

fn new_trace(
    key: &(Option<CellValue>, Option<CellValue>),
    color_map: &Option<ColorMap>,
    continuous: bool,
    symbols: &[CellValue],
) -> Trace {
    let (color_key, symbol_key) = key;

    let color = match (color_key, color_map) {
        (Some(value), Some(map)) => TraceColor::Fixed(map.color_for(value)),
        _ if continuous => TraceColor::Scaled,
        _ => TraceColor::Fixed(Rgb::DEFAULT),
    };

    let symbol = symbol_key
        .as_ref()
        .and_then(|value| symbols.iter().position(|s| s == value))
        .map(|i| MarkerSymbol::SEQUENCE[i % MarkerSymbol::SEQUENCE.len()])
        .unwrap_or(MarkerSymbol::Circle);

    let labels: Vec<String> = [color_key, symbol_key]
        .into_iter()
        .flatten()
        .map(|v| v.to_string())
        .collect();
    let name = (!labels.is_empty()).then(|| labels.join(", "));

    Trace {
        name,
        symbol,
        color,
        points: Vec::new(),
    }
}

/// Distinct values of a column in the order they first occur.
fn first_appearance(column: &Column) -> Vec<CellValue> {
    let mut seen = BTreeSet::new();
    column
        .values
        .iter()
        .filter(|v| seen.insert((*v).clone()))
        .cloned()
        .collect()
}

fn numeric_at(column: Option<&Column>, row: usize) -> f64 {
    column
        .and_then(|c| c.values[row].as_f64())
        .unwrap_or(f64::NAN)
}

fn value_range(column: &Column) -> Option<(f64, f64)> {
    column
        .values
        .iter()
        .filter_map(CellValue::as_f64)
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
