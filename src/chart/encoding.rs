use log::debug;

use crate::config::DEFAULT_OPACITY;
use crate::data::model::Table;
use crate::error::{Role, VizError, VizResult};

// ---------------------------------------------------------------------------
// RoleSelection – raw user choices
// ---------------------------------------------------------------------------

/// What the user picked for each encoding slot. Optional slots are `None`
/// when nothing is mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSelection {
    pub x: String,
    pub y: String,
    pub color: Option<String>,
    pub symbol: Option<String>,
    pub size: Option<String>,
    pub tooltip: Vec<String>,
    pub opacity: f64,
}

impl RoleSelection {
    /// X/Y only, with the tooltip showing both and the default opacity.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        RoleSelection {
            tooltip: vec![x.clone(), y.clone()],
            x,
            y,
            color: None,
            symbol: None,
            size: None,
            opacity: DEFAULT_OPACITY,
        }
    }

    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    pub fn symbol(mut self, column: impl Into<String>) -> Self {
        self.symbol = Some(column.into());
        self
    }

    pub fn size(mut self, column: impl Into<String>) -> Self {
        self.size = Some(column.into());
        self
    }

    pub fn tooltip<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.tooltip = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

// ---------------------------------------------------------------------------
// ChartSpec – validated encoding
// ---------------------------------------------------------------------------

/// A scatter encoding checked against one table. Only [`build`] creates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    x: String,
    y: String,
    color: Option<String>,
    symbol: Option<String>,
    size: Option<String>,
    tooltip: Vec<String>,
    opacity: f64,
}

impl ChartSpec {
    pub fn x(&self) -> &str {
        &self.x
    }

    pub fn y(&self) -> &str {
        &self.y
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn tooltip(&self) -> &[String] {
        &self.tooltip
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Validate `selection` against `table` and freeze it into a [`ChartSpec`].
///
/// Checks run in order: x/y numeric, color/symbol present, size numeric,
/// opacity in [0, 1]. Unknown tooltip names are dropped, not rejected.
pub fn build(table: &Table, selection: &RoleSelection) -> VizResult<ChartSpec> {
    require_numeric(table, Role::X, &selection.x)?;
    require_numeric(table, Role::Y, &selection.y)?;

    for (role, column) in [(Role::Color, &selection.color), (Role::Symbol, &selection.symbol)] {
        if let Some(name) = column {
            if !table.has_column(name) {
                return Err(VizError::encoding(role, format!("column '{name}' not found")));
            }
        }
    }

    if let Some(name) = &selection.size {
        require_numeric(table, Role::Size, name)?;
    }

    if !(0.0..=1.0).contains(&selection.opacity) {
        return Err(VizError::encoding(
            Role::Opacity,
            format!("{} is outside [0, 1]", selection.opacity),
        ));
    }

    let mut tooltip: Vec<String> = Vec::with_capacity(selection.tooltip.len());
    for name in &selection.tooltip {
        if !table.has_column(name) {
            debug!("Dropping unknown tooltip column '{name}'");
        } else if !tooltip.contains(name) {
            tooltip.push(name.clone());
        }
    }

    Ok(ChartSpec {
        x: selection.x.clone(),
        y: selection.y.clone(),
        color: selection.color.clone(),
        symbol: selection.symbol.clone(),
        size: selection.size.clone(),
        tooltip,
        opacity: selection.opacity,
    })
}

fn require_numeric(table: &Table, role: Role, name: &str) -> VizResult<()> {
    match table.column(name) {
        Some(col) if col.dtype.is_numeric() => Ok(()),
        Some(col) => Err(VizError::encoding(
            role,
            format!("column '{name}' is {:?}, not numeric", col.dtype),
        )),
        None => Err(VizError::encoding(role, format!("column '{name}' not found"))),
    }
}
