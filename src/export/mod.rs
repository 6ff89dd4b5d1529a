//! Export layer: interactive HTML document and PNG image.
//!
//! The two paths share nothing but the read-only [`Figure`]; a failure in
//! one never prevents the other from completing.

pub mod html;
pub mod raster;

use log::{info, warn};

use crate::chart::figure::Figure;
use crate::config::{Settings, DEFAULT_RASTER_SCALE, PLOTLY_CDN};
use crate::error::{VizError, VizResult};

pub use html::{read_embedded_figure, EmbeddedFigure};
pub use raster::{BitmapRenderer, RasterRenderer, UnavailableRenderer};

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    InteractiveDocument,
    RasterImage,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::InteractiveDocument => "text/html",
            ExportFormat::RasterImage => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::InteractiveDocument => "html",
            ExportFormat::RasterImage => "png",
        }
    }
}

/// Finished export payload, ready to hand to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    format: ExportFormat,
    file_name: String,
    bytes: Vec<u8>,
}

impl ExportArtifact {
    fn new(format: ExportFormat, base_name: &str, bytes: Vec<u8>) -> Self {
        ExportArtifact {
            format,
            file_name: format!("{base_name}.{}", format.extension()),
            bytes,
        }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Outcome of exporting both formats. The results are independent.
#[derive(Debug)]
pub struct ExportBundle {
    pub html: VizResult<ExportArtifact>,
    pub png: VizResult<ExportArtifact>,
    /// Non-fatal problems worth showing to the user.
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Produces export artifacts from a rendered [`Figure`].
pub struct Exporter {
    renderer: Box<dyn RasterRenderer>,
    plotly_src: String,
    raster_scale: u32,
}

impl Default for Exporter {
    fn default() -> Self {
        Exporter::new(Box::new(BitmapRenderer))
    }
}

impl Exporter {
    pub fn new(renderer: Box<dyn RasterRenderer>) -> Self {
        Exporter {
            renderer,
            plotly_src: PLOTLY_CDN.to_string(),
            raster_scale: DEFAULT_RASTER_SCALE,
        }
    }

    pub fn with_settings(renderer: Box<dyn RasterRenderer>, settings: &Settings) -> Self {
        Exporter {
            renderer,
            plotly_src: settings.figure.plotly_src.clone(),
            raster_scale: settings.raster_scale,
        }
    }

    /// Standalone HTML page embedding the figure data.
    pub fn to_interactive_document(&self, figure: &Figure) -> VizResult<Vec<u8>> {
        html::render_document(figure, &self.plotly_src)
    }

    /// PNG at `scale` times the figure's nominal size.
    pub fn to_raster_image(&self, figure: &Figure, scale: u32) -> VizResult<Vec<u8>> {
        self.renderer.render_png(figure, scale)
    }

    /// Export both formats as `{base_name}.html` and `{base_name}.png`.
    ///
    /// A missing raster engine is reported as a warning; the HTML result is
    /// unaffected by anything that happens on the raster path.
    pub fn export_all(&self, figure: &Figure, base_name: &str) -> ExportBundle {
        if base_name.trim().is_empty() {
            let empty = || Err(VizError::Export("base file name must not be empty".into()));
            return ExportBundle {
                html: empty(),
                png: empty(),
                warnings: Vec::new(),
            };
        }

        let html = self
            .to_interactive_document(figure)
            .map(|bytes| ExportArtifact::new(ExportFormat::InteractiveDocument, base_name, bytes));
        if let Ok(artifact) = &html {
            info!("Exported {} ({} bytes)", artifact.file_name(), artifact.bytes().len());
        }

        let png = self
            .to_raster_image(figure, self.raster_scale)
            .map(|bytes| ExportArtifact::new(ExportFormat::RasterImage, base_name, bytes));

        let mut warnings = Vec::new();
        match &png {
            Ok(artifact) => {
                info!("Exported {} ({} bytes)", artifact.file_name(), artifact.bytes().len())
            }
            Err(e) if e.is_recoverable() => {
                warn!("PNG export skipped: {e}");
                warnings.push(format!(
                    "PNG export is not available here; \
                     use the chart toolbar's download button instead. ({e})"
                ));
            }
            Err(_) => {}
        }

        ExportBundle {
            html,
            png,
            warnings,
        }
    }
}
