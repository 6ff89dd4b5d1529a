//! End-to-end: load, sample, build, render, export.

use viztools::data::{classify, load, sample};
use viztools::export::{read_embedded_figure, BitmapRenderer, UnavailableRenderer};
use viztools::{build, Exporter, Figure, RoleSelection, Settings, VizError};

use crate::helpers::{numeric_table, IRIS_CSV};

#[test]
fn test_million_row_scenario() {
    let table = numeric_table(1_000_000);
    assert_eq!(classify(&table).numeric, vec!["col1", "col2", "col3"]);

    let first = sample(&table, 1_000).unwrap();
    let second = sample(&table, 1_000).unwrap();
    assert_eq!(first.row_count(), 1_000);
    assert_eq!(*first, *second);

    let spec = build(&first, &RoleSelection::new("col1", "col2").opacity(0.85)).unwrap();
    let figure = Figure::render(&spec, &first, &Settings::default().figure);

    let exporter = Exporter::new(Box::new(UnavailableRenderer::new("simulated")));
    let bundle = exporter.export_all(&figure, "scenario");

    assert!(matches!(bundle.png, Err(VizError::RenderEngineUnavailable(_))));
    let html = bundle.html.unwrap();
    assert_eq!(html.file_name(), "scenario.html");
    let embedded = read_embedded_figure(html.bytes()).unwrap();
    assert_eq!(embedded.point_count(), 1_000);
}

#[test]
fn test_interactive_document_round_trip() {
    let table = load(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    let selection = RoleSelection::new("sepal_length", "sepal_width")
        .color("species")
        .symbol("site")
        .size("petal_length")
        .tooltip(["species", "petal_length", "missing"])
        .opacity(0.5);
    let spec = build(&table, &selection).unwrap();
    let figure = Figure::render(&spec, &table, &Settings::default().figure);

    let document = Exporter::default().to_interactive_document(&figure).unwrap();
    let embedded = read_embedded_figure(&document).unwrap();

    assert_eq!(embedded.meta.row_count, table.row_count());
    assert_eq!(embedded.point_count(), table.row_count());
    assert_eq!(embedded.meta.x, "sepal_length");
    assert_eq!(embedded.meta.y, "sepal_width");
    assert_eq!(embedded.meta.color.as_deref(), Some("species"));
    assert_eq!(embedded.meta.symbol.as_deref(), Some("site"));
    assert_eq!(embedded.meta.size.as_deref(), Some("petal_length"));
    assert_eq!(embedded.meta.tooltip, vec!["species", "petal_length"]);
    assert_eq!(embedded.meta.opacity, 0.5);
    // 3 species x 2 sites, every pair present once
    assert_eq!(embedded.data.len(), 6);
    assert!(embedded.data.iter().all(|t| t.marker.opacity == 0.5));
}

#[test]
fn test_raster_export_is_png() {
    let table = load(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    let selection = RoleSelection::new("sepal_length", "petal_length").color("sepal_width");
    let spec = build(&table, &selection).unwrap();
    let figure = Figure::render(&spec, &table, &Settings::default().figure);

    let png = Exporter::new(Box::new(BitmapRenderer)).to_raster_image(&figure, 1).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (700, 500));
}

#[test]
fn test_unsupported_extension() {
    assert!(matches!(
        load(b"a,b\n1,2\n", "data.json", None),
        Err(VizError::UnsupportedFormat { .. })
    ));
}
