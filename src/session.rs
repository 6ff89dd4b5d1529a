use std::borrow::Cow;
use std::sync::Arc;

use log::{info, warn};

use crate::chart::encoding::{self, ChartSpec, RoleSelection};
use crate::chart::figure::Figure;
use crate::config::{Settings, MAX_MAX_ROWS, MIN_MAX_ROWS};
use crate::data::{classify, list_sheets, sample, ColumnRoleSet, SourceFormat, Table, TableCache};
use crate::error::{VizError, VizResult};
use crate::export::{ExportBundle, Exporter, RasterRenderer};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything the presentation layer drives, independent of rendering.
///
/// Each operation either succeeds and updates the state, or fails and
/// leaves the loaded table and current chart spec exactly as they were.
pub struct Session {
    settings: Settings,
    cache: TableCache,
    exporter: Exporter,

    /// Loaded table (None until the user uploads a file).
    table: Option<Arc<Table>>,

    /// Numeric / other split of the loaded table's columns.
    roles: ColumnRoleSet,

    /// Current validated encoding.
    spec: Option<ChartSpec>,

    /// Last error or warning, for display.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(settings: Settings, renderer: Box<dyn RasterRenderer>) -> VizResult<Self> {
        settings.validate()?;
        Ok(Session {
            cache: TableCache::new(settings.cache_capacity),
            exporter: Exporter::with_settings(renderer, &settings),
            settings,
            table: None,
            roles: ColumnRoleSet::default(),
            spec: None,
            status_message: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn roles(&self) -> &ColumnRoleSet {
        &self.roles
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    /// X and Y need two numeric columns.
    pub fn can_plot(&self) -> bool {
        self.roles.can_plot()
    }

    /// Sheet names to offer for selection; empty for delimited text.
    pub fn sheets(bytes: &[u8], source_name: &str) -> VizResult<Vec<String>> {
        if SourceFormat::from_source_name(source_name)?.is_spreadsheet() {
            list_sheets(bytes)
        } else {
            Ok(Vec::new())
        }
    }

    /// Ingest an uploaded file. A new table resets the chart spec.
    pub fn upload(
        &mut self,
        bytes: &[u8],
        source_name: &str,
        sheet_name: Option<&str>,
    ) -> VizResult<&ColumnRoleSet> {
        let table = self
            .cache
            .load(bytes, source_name, sheet_name)
            .inspect_err(|e| self.status_message = Some(format!("Could not read file: {e}")))?;

        self.roles = classify(&table);
        if !self.roles.can_plot() {
            warn!("'{source_name}' has fewer than two numeric columns");
            self.status_message = Some("Need at least two numeric columns for X and Y.".into());
        } else {
            self.status_message = None;
        }
        info!(
            "Session table: {} rows, numeric columns {:?}",
            table.row_count(),
            self.roles.numeric
        );

        self.table = Some(table);
        self.spec = None;
        Ok(&self.roles)
    }

    /// Change the plotted-row bound, within [200, 2,000,000].
    pub fn set_max_rows(&mut self, max_rows: usize) -> VizResult<()> {
        if !(MIN_MAX_ROWS..=MAX_MAX_ROWS).contains(&max_rows) {
            return Err(VizError::InvalidBound { max_rows });
        }
        self.settings.max_rows = max_rows;
        Ok(())
    }

    /// The loaded table reduced to the configured row bound.
    pub fn plot_table(&self) -> VizResult<Option<Cow<'_, Table>>> {
        self.table
            .as_deref()
            .map(|t| sample(t, self.settings.max_rows))
            .transpose()
    }

    /// Validate a role selection against the loaded table. `None` until a
    /// table is loaded.
    pub fn select(&mut self, selection: &RoleSelection) -> VizResult<Option<&ChartSpec>> {
        let Some(table) = self.table.as_deref() else {
            return Ok(None);
        };
        let spec = encoding::build(table, selection)
            .inspect_err(|e| self.status_message = Some(e.to_string()))?;
        Ok(Some(self.spec.insert(spec)))
    }

    /// Render the current spec over the sampled table.
    pub fn figure(&self) -> VizResult<Option<Figure>> {
        let (Some(spec), Some(plot_table)) = (&self.spec, self.plot_table()?) else {
            return Ok(None);
        };
        Ok(Some(Figure::render(spec, &plot_table, &self.settings.figure)))
    }

    /// Export the current chart as `{base_name}.html` and `{base_name}.png`.
    pub fn export(&mut self, base_name: &str) -> VizResult<Option<ExportBundle>> {
        let Some(figure) = self.figure()? else {
            return Ok(None);
        };
        let bundle = self.exporter.export_all(&figure, base_name);
        if let Some(warning) = bundle.warnings.first() {
            self.status_message = Some(warning.clone());
        }
        Ok(Some(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{BitmapRenderer, UnavailableRenderer};

    const CSV: &[u8] = b"a,b,label\n1,2.5,x\n2,3.5,y\n3,4.5,x\n";

    fn session() -> Session {
        Session::new(Settings::default(), Box::new(BitmapRenderer)).unwrap()
    }

    #[test]
    fn test_upload_classifies_columns() {
        let mut s = session();
        let roles = s.upload(CSV, "data.csv", None).unwrap();
        assert_eq!(roles.numeric, vec!["a", "b"]);
        assert!(s.can_plot());
    }

    #[test]
    fn test_failed_upload_keeps_previous_state() {
        let mut s = session();
        s.upload(CSV, "data.csv", None).unwrap();
        s.select(&RoleSelection::new("a", "b")).unwrap();

        assert!(s.upload(b"whatever", "data.pdf", None).is_err());
        assert_eq!(s.table().unwrap().row_count(), 3);
        assert!(s.spec().is_some());
        assert!(s.status_message.is_some());
    }

    #[test]
    fn test_failed_select_keeps_previous_spec() {
        let mut s = session();
        s.upload(CSV, "data.csv", None).unwrap();
        s.select(&RoleSelection::new("a", "b")).unwrap();
        assert!(s.select(&RoleSelection::new("a", "label")).is_err());
        assert_eq!(s.spec().unwrap().y(), "b");
    }

    #[test]
    fn test_select_before_upload_is_none() {
        let mut s = session();
        assert!(s.select(&RoleSelection::new("a", "b")).unwrap().is_none());
        assert!(s.spec().is_none());
        assert!(s.status_message.is_none());
    }

    #[test]
    fn test_max_rows_bounds() {
        let mut s = session();
        assert!(s.set_max_rows(199).is_err());
        assert!(s.set_max_rows(200).is_ok());
        assert!(s.set_max_rows(2_000_001).is_err());
    }

    #[test]
    fn test_export_without_spec_is_none() {
        let mut s = session();
        s.upload(CSV, "data.csv", None).unwrap();
        assert!(s.export("chart").unwrap().is_none());
    }

    #[test]
    fn test_export_reports_missing_raster_engine() {
        let mut s = Session::new(
            Settings::default(),
            Box::new(UnavailableRenderer::new("no engine")),
        )
        .unwrap();
        s.upload(CSV, "data.csv", None).unwrap();
        s.select(&RoleSelection::new("a", "b").color("label")).unwrap();

        let bundle = s.export("chart").unwrap().unwrap();
        assert!(bundle.html.is_ok());
        assert!(bundle.png.is_err());
        assert!(s.status_message.is_some());
    }

    #[test]
    fn test_sheets_empty_for_text() {
        assert!(Session::sheets(CSV, "data.csv").unwrap().is_empty());
        assert!(Session::sheets(CSV, "data.json").is_err());
    }
}
