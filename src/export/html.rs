use serde::{Deserialize, Serialize};

use crate::chart::figure::{Figure, Trace, TraceColor};
use crate::color::COLORSCALE_NAME;
use crate::data::model::CellValue;
use crate::error::{VizError, VizResult};

/// `id` of the `<script>` element holding the figure JSON.
pub const FIGURE_ELEMENT_ID: &str = "viztools-figure";

// ---------------------------------------------------------------------------
// Embedded figure – the JSON the chart runtime consumes
// ---------------------------------------------------------------------------

/// Everything embedded in an interactive document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedFigure {
    pub data: Vec<PlotlyTrace>,
    pub layout: PlotlyLayout,
    pub config: PlotlyConfig,
    pub meta: FigureMeta,
}

impl EmbeddedFigure {
    /// Points across all traces.
    pub fn point_count(&self) -> usize {
        self.data.iter().map(|t| t.x.len()).sum()
    }
}

/// Role assignment and size of the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureMeta {
    pub row_count: usize,
    pub x: String,
    pub y: String,
    pub color: Option<String>,
    pub symbol: Option<String>,
    pub size: Option<String>,
    pub tooltip: Vec<String>,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub showlegend: bool,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customdata: Vec<Vec<CellValue>>,
    pub hovertemplate: String,
    pub marker: PlotlyMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyMarker {
    pub color: MarkerColor,
    pub symbol: String,
    pub opacity: f64,
    pub size: MarkerSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizemode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizeref: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Css(String),
    Values(Vec<Option<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerSize {
    Fixed(f64),
    PerPoint(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyLayout {
    pub margin: Margin,
    pub legend: Legend,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyConfig {
    #[serde(rename = "displaylogo")]
    pub display_logo: bool,
    pub responsive: bool,
}

// ---------------------------------------------------------------------------
// Figure → embedded JSON
// ---------------------------------------------------------------------------

impl EmbeddedFigure {
    pub fn from_figure(figure: &Figure) -> Self {
        let spec = &figure.spec;
        let data = figure.traces.iter().map(|t| plotly_trace(figure, t)).collect();

        EmbeddedFigure {
            data,
            layout: PlotlyLayout {
                margin: Margin {
                    l: 20,
                    r: 20,
                    t: 30,
                    b: 20,
                },
                legend: Legend {
                    title: Title {
                        text: String::new(),
                    },
                },
                xaxis: Axis {
                    title: Title {
                        text: spec.x().to_string(),
                    },
                },
                yaxis: Axis {
                    title: Title {
                        text: spec.y().to_string(),
                    },
                },
            },
            config: PlotlyConfig {
                display_logo: false,
                responsive: true,
            },
            meta: FigureMeta {
                row_count: figure.row_count,
                x: spec.x().to_string(),
                y: spec.y().to_string(),
                color: spec.color().map(str::to_string),
                symbol: spec.symbol().map(str::to_string),
                size: spec.size().map(str::to_string),
                tooltip: spec.tooltip().to_vec(),
                opacity: spec.opacity(),
            },
        }
    }
}

fn plotly_trace(figure: &Figure, trace: &Trace) -> PlotlyTrace {
    let finite = |v: f64| v.is_finite().then_some(v);
    let scaled = matches!(trace.color, TraceColor::Scaled);

    let color = match &trace.color {
        TraceColor::Fixed(rgb) => MarkerColor::Css(rgb.to_string()),
        TraceColor::Scaled => {
            MarkerColor::Values(trace.points.iter().map(|p| p.color_value).collect())
        }
    };

    let size = match figure.size_ref {
        Some(_) => MarkerSize::PerPoint(
            trace
                .points
                .iter()
                .map(|p| p.size_value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0))
                .collect(),
        ),
        None => MarkerSize::Fixed(figure.marker_size),
    };

    let customdata = if figure.spec.tooltip().is_empty() {
        Vec::new()
    } else {
        trace.points.iter().map(|p| p.hover.clone()).collect()
    };

    PlotlyTrace {
        kind: "scatter".to_string(),
        mode: "markers".to_string(),
        showlegend: trace.name.is_some() && !scaled,
        name: trace.name.clone(),
        x: trace.points.iter().map(|p| finite(p.x)).collect(),
        y: trace.points.iter().map(|p| finite(p.y)).collect(),
        customdata,
        hovertemplate: hover_template(figure),
        marker: PlotlyMarker {
            color,
            symbol: trace.symbol.name().to_string(),
            opacity: figure.spec.opacity(),
            size,
            sizemode: figure.size_ref.map(|_| "area".to_string()),
            sizeref: figure.size_ref,
            colorscale: scaled.then(|| COLORSCALE_NAME.to_string()),
            cmin: figure.color_scale.filter(|_| scaled).map(|s| s.min),
            cmax: figure.color_scale.filter(|_| scaled).map(|s| s.max),
            showscale: scaled.then_some(true),
        },
    }
}

/// `x=…<br>y=…<br>field=…` followed by the other tooltip fields.
fn hover_template(figure: &Figure) -> String {
    let spec = &figure.spec;
    let mut lines = vec![format!("{}=%{{x}}", spec.x()), format!("{}=%{{y}}", spec.y())];
    for (i, name) in spec.tooltip().iter().enumerate() {
        if name != spec.x() && name != spec.y() {
            lines.push(format!("{name}=%{{customdata[{i}]}}"));
        }
    }
    format!("{}<extra></extra>", lines.join("<br>"))
}

// ---------------------------------------------------------------------------
// HTML document
// ---------------------------------------------------------------------------

/// A standalone page that loads the chart runtime from `plotly_src` and
/// draws the embedded figure.
pub fn render_document(figure: &Figure, plotly_src: &str) -> VizResult<Vec<u8>> {
    let embedded = EmbeddedFigure::from_figure(figure);
    let json = serde_json::to_string(&embedded)
        .map_err(|e| VizError::Export(format!("serializing figure: {e}")))?;
    // `<` only occurs inside JSON strings, where the escape is equivalent;
    // this keeps `</script>` in cell values from closing the element.
    let json = json.replace('<', "\\u003c");

    let title = escape_html(&format!("{} vs {}", figure.spec.y(), figure.spec.x()));
    let src = escape_html(plotly_src);

    let page = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{src}" charset="utf-8"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100vh;"></div>
<script type="application/json" id="{FIGURE_ELEMENT_ID}">{json}</script>
<script>
  const figure = JSON.parse(document.getElementById("{FIGURE_ELEMENT_ID}").textContent);
  Plotly.newPlot("chart", figure.data, figure.layout, figure.config);
</script>
</body>
</html>
"#
    );
    Ok(page.into_bytes())
}

/// Parse the figure back out of a document written by [`render_document`].
pub fn read_embedded_figure(document: &[u8]) -> VizResult<EmbeddedFigure> {
    let text = std::str::from_utf8(document)
        .map_err(|e| VizError::Export(format!("document is not UTF-8: {e}")))?;

    let open = format!(r#"<script type="application/json" id="{FIGURE_ELEMENT_ID}">"#);
    let start = text
        .find(&open)
        .map(|i| i + open.len())
        .ok_or_else(|| VizError::Export("no embedded figure found".into()))?;
    let len = text[start..]
        .find("</script>")
        .ok_or_else(|| VizError::Export("unterminated figure element".into()))?;

    serde_json::from_str(&text[start..start + len])
        .map_err(|e| VizError::Export(format!("parsing embedded figure: {e}")))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::encoding::{build, RoleSelection};
    use crate::config::{FigureSettings, PLOTLY_CDN};
    use crate::data::model::Table;

    fn figure(sel: RoleSelection) -> Figure {
        let s = |v: &str| CellValue::String(v.into());
        let table = Table::from_columns(vec![
            ("a", vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Null]),
            ("b", vec![CellValue::Float(0.5), CellValue::Float(1.5), CellValue::Float(2.5)]),
            ("note", vec![s("</script><b>"), s("ok"), s("ok")]),
        ])
        .unwrap();
        let spec = build(&table, &sel).unwrap();
        Figure::render(&spec, &table, &FigureSettings::default())
    }

    #[test]
    fn test_document_references_runtime_without_bundling() {
        let html = render_document(&figure(RoleSelection::new("a", "b")), PLOTLY_CDN).unwrap();
        let text = String::from_utf8(html).unwrap();
        assert!(text.contains(&format!(r#"<script src="{PLOTLY_CDN}""#)));
        assert!(text.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_cell_text_cannot_close_script_element() {
        let fig = figure(RoleSelection::new("a", "b").color("note").tooltip(["note"]));
        let html = render_document(&fig, PLOTLY_CDN).unwrap();
        let parsed = read_embedded_figure(&html).unwrap();
        assert_eq!(parsed.point_count(), 3);
        assert_eq!(parsed.data[0].name.as_deref(), Some("</script><b>"));
    }

    #[test]
    fn test_missing_values_become_null() {
        let html = render_document(&figure(RoleSelection::new("a", "b")), PLOTLY_CDN).unwrap();
        let parsed = read_embedded_figure(&html).unwrap();
        assert_eq!(parsed.data[0].x, vec![Some(1.0), Some(2.0), None]);
    }

    #[test]
    fn test_hover_template_lists_extra_fields() {
        let fig = figure(RoleSelection::new("a", "b").tooltip(["a", "note"]));
        assert_eq!(
            hover_template(&fig),
            "a=%{x}<br>b=%{y}<br>note=%{customdata[1]}<extra></extra>"
        );
    }

    #[test]
    fn test_not_a_document() {
        assert!(matches!(
            read_embedded_figure(b"<html></html>"),
            Err(VizError::Export(_))
        ));
    }
}
