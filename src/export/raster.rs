use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;

use crate::chart::figure::{Figure, MarkerSymbol};
use crate::color::Rgb;
use crate::error::{VizError, VizResult};

/// Plot-area inset from the image edge, in nominal px.
const FRAME_MARGIN: u32 = 20;

/// Largest image the bitmap renderer will allocate (about 190 MB of RGB).
pub const MAX_RASTER_PIXELS: u64 = 64_000_000;

// ---------------------------------------------------------------------------
// Raster rendering capability
// ---------------------------------------------------------------------------

/// Turns a figure into PNG bytes at `scale` times its nominal size.
///
/// Environments without a usable rendering engine plug in an
/// implementation that fails with [`VizError::RenderEngineUnavailable`].
pub trait RasterRenderer {
    fn render_png(&self, figure: &Figure, scale: u32) -> VizResult<Vec<u8>>;
}

/// Software renderer on the plotters bitmap backend.
///
/// Draws the plot frame and every marker (shape, colour, size, opacity).
/// Axis text is not drawn: the crate is built without a font backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRenderer;

impl RasterRenderer for BitmapRenderer {
    fn render_png(&self, figure: &Figure, scale: u32) -> VizResult<Vec<u8>> {
        if scale == 0 {
            return Err(VizError::Export("raster scale must be at least 1".into()));
        }
        let (width, height) = match (
            figure.width.checked_mul(scale),
            figure.height.checked_mul(scale),
        ) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(VizError::Export(format!(
                    "cannot render a {}x{} figure at scale {scale}",
                    figure.width, figure.height
                )))
            }
        };
        let pixel_count = u64::from(width) * u64::from(height);
        if pixel_count > MAX_RASTER_PIXELS {
            return Err(VizError::Export(format!(
                "{width}x{height} image exceeds the {MAX_RASTER_PIXELS} pixel limit"
            )));
        }

        let mut pixels = vec![0u8; pixel_count as usize * 3];
        draw(figure, scale, &mut pixels, (width, height))
            .map_err(|e| VizError::Export(format!("drawing figure: {e}")))?;

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .map_err(|e| VizError::Export(format!("encoding PNG: {e}")))?;
        Ok(png)
    }
}

/// Stand-in for environments where raster export is not possible.
#[derive(Debug, Clone)]
pub struct UnavailableRenderer {
    reason: String,
}

impl UnavailableRenderer {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableRenderer {
            reason: reason.into(),
        }
    }
}

impl RasterRenderer for UnavailableRenderer {
    fn render_png(&self, _figure: &Figure, _scale: u32) -> VizResult<Vec<u8>> {
        Err(VizError::RenderEngineUnavailable(self.reason.clone()))
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw(
    figure: &Figure,
    scale: u32,
    pixels: &mut [u8],
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, size).into_drawing_area();
    root.fill(&WHITE)?;

    let ((x0, x1), (y0, y1)) = figure
        .data_bounds()
        .map(|(x, y)| (padded(x), padded(y)))
        .unwrap_or(((0.0, 1.0), (0.0, 1.0)));

    let mut chart = ChartBuilder::on(&root)
        .margin(FRAME_MARGIN * scale)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let frame = ShapeStyle::from(&RGBColor(204, 204, 204)).stroke_width(scale);
    chart.plotting_area().draw(&Rectangle::new([(x0, y0), (x1, y1)], frame))?;

    let area = chart.plotting_area();
    let opacity = figure.spec.opacity();
    for trace in &figure.traces {
        for point in &trace.points {
            if !(point.x.is_finite() && point.y.is_finite()) {
                continue;
            }
            let radius = (figure.marker_diameter(point) * scale as f64 / 2.0).round() as i32;
            if radius <= 0 {
                continue;
            }
            let Rgb(r, g, b) = figure.point_color(trace, point);
            let style = RGBColor(r, g, b).mix(opacity).filled();
            let at = (point.x, point.y);

            match trace.symbol {
                MarkerSymbol::Circle => area.draw(&Circle::new(at, radius, style))?,
                MarkerSymbol::Square => area.draw(
                    &(EmptyElement::at(at)
                        + Rectangle::new([(-radius, -radius), (radius, radius)], style)),
                )?,
                MarkerSymbol::Diamond => area.draw(
                    &(EmptyElement::at(at)
                        + Polygon::new(
                            vec![(0, -radius), (radius, 0), (0, radius), (-radius, 0)],
                            style,
                        )),
                )?,
                MarkerSymbol::TriangleUp => area.draw(&TriangleMarker::new(at, radius, style))?,
                MarkerSymbol::X => {
                    let stroke = RGBColor(r, g, b).mix(opacity).stroke_width(scale.max(1) * 2);
                    area.draw(&Cross::new(at, radius, stroke))?
                }
            }
        }
    }

    root.present()?;
    Ok(())
}

/// Widen a data range by 5% per side; degenerate ranges get a unit span.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - span * 0.05, hi + span * 0.05)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}
