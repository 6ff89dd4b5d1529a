use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Role, VizError, VizResult};

pub const DEFAULT_MAX_ROWS: usize = 50_000;
pub const MIN_MAX_ROWS: usize = 200;
pub const MAX_MAX_ROWS: usize = 2_000_000;
pub const DEFAULT_OPACITY: f64 = 0.85;
pub const DEFAULT_RASTER_SCALE: u32 = 2;
pub const MAX_RASTER_SCALE: u32 = 8;

/// Chart runtime referenced (not bundled) by interactive exports.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Caller-side knobs. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Plot at most this many rows; larger tables are sampled.
    pub max_rows: usize,
    /// Initial point opacity.
    pub opacity: f64,
    /// Pixel density multiplier for PNG export.
    pub raster_scale: u32,
    /// Number of parsed tables kept by the session cache.
    pub cache_capacity: usize,
    pub figure: FigureSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_rows: DEFAULT_MAX_ROWS,
            opacity: DEFAULT_OPACITY,
            raster_scale: DEFAULT_RASTER_SCALE,
            cache_capacity: 8,
            figure: FigureSettings::default(),
        }
    }
}

/// Nominal geometry and marker defaults of a rendered figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
    /// Marker diameter in px when no size column is mapped.
    pub marker_size: f64,
    /// Largest marker diameter in px when a size column is mapped.
    pub size_max: f64,
    pub plotly_src: String,
}

impl Default for FigureSettings {
    fn default() -> Self {
        FigureSettings {
            width: 700,
            height: 500,
            marker_size: 6.0,
            size_max: 20.0,
            plotly_src: PLOTLY_CDN.to_string(),
        }
    }
}

impl Settings {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json_str(&text).context("parsing settings JSON")
    }

    /// Check the ranges the core components leave to the caller.
    pub fn validate(&self) -> VizResult<()> {
        if !(MIN_MAX_ROWS..=MAX_MAX_ROWS).contains(&self.max_rows) {
            return Err(VizError::InvalidBound {
                max_rows: self.max_rows,
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(VizError::encoding(
                Role::Opacity,
                format!("{} is outside [0, 1]", self.opacity),
            ));
        }
        if !(1..=MAX_RASTER_SCALE).contains(&self.raster_scale) {
            return Err(VizError::Export(format!(
                "raster scale {} is outside [1, {MAX_RASTER_SCALE}]",
                self.raster_scale
            )));
        }
        if self.figure.width == 0 || self.figure.height == 0 {
            return Err(VizError::Export(format!(
                "figure size {}x{} must be non-zero",
                self.figure.width, self.figure.height
            )));
        }
        Ok(())
    }
}
