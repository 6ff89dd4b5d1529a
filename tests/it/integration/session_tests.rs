//! Session-level behaviour: caching, state preservation, degraded export.

use viztools::export::{BitmapRenderer, UnavailableRenderer};
use viztools::{RoleSelection, Session, Settings};

use crate::helpers::IRIS_CSV;

#[test]
fn test_full_session_exports_both_formats() {
    let mut session = Session::new(Settings::default(), Box::new(BitmapRenderer)).unwrap();
    session.upload(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    assert!(session.can_plot());

    session
        .select(&RoleSelection::new("sepal_length", "sepal_width").color("species"))
        .unwrap();
    let bundle = session.export("iris").unwrap().unwrap();

    assert_eq!(bundle.html.unwrap().file_name(), "iris.html");
    assert_eq!(bundle.png.unwrap().mime(), "image/png");
    assert!(bundle.warnings.is_empty());
}

#[test]
fn test_reupload_of_same_bytes_yields_same_table() {
    let mut session = Session::new(Settings::default(), Box::new(BitmapRenderer)).unwrap();
    session.upload(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    let first = session.table().unwrap().clone();
    session.upload(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    assert_eq!(session.table().unwrap(), &first);
}

#[test]
fn test_html_export_unaffected_by_raster_failure() {
    let mut session = Session::new(
        Settings::default(),
        Box::new(UnavailableRenderer::new("kaleido missing")),
    )
    .unwrap();
    session.upload(IRIS_CSV.as_bytes(), "iris.csv", None).unwrap();
    session
        .select(&RoleSelection::new("sepal_length", "sepal_width"))
        .unwrap();

    let bundle = session.export("iris").unwrap().unwrap();
    assert!(bundle.html.is_ok());
    assert!(bundle.png.as_ref().unwrap_err().is_recoverable());
    assert_eq!(bundle.warnings.len(), 1);
    // the table and spec survive the failed raster export
    assert!(session.spec().is_some());
    assert_eq!(session.table().unwrap().row_count(), 6);
}

#[test]
fn test_text_only_table_cannot_plot() {
    let mut session = Session::new(Settings::default(), Box::new(BitmapRenderer)).unwrap();
    session.upload(b"name,city\na,b\n", "people.csv", None).unwrap();
    assert!(!session.can_plot());
    assert!(session.status_message.is_some());
}
