use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};

use viztools::export::{BitmapRenderer, RasterRenderer, UnavailableRenderer};
use viztools::{RoleSelection, Session, Settings, Table};

/// Map CSV/Excel columns to a scatter plot and export it as HTML and PNG
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (.csv, .tsv, .xls, .xlsx)
    file: PathBuf,

    /// Workbook sheet; required when the workbook has several
    #[arg(long)]
    sheet: Option<String>,

    /// Print the sheet names of a workbook and exit
    #[arg(long)]
    list_sheets: bool,

    /// X axis column (numeric); defaults to the first numeric column
    #[arg(short, long)]
    x: Option<String>,

    /// Y axis column (numeric); defaults to the second numeric column
    #[arg(short, long)]
    y: Option<String>,

    /// Color column
    #[arg(long)]
    color: Option<String>,

    /// Shape / symbol column
    #[arg(long)]
    symbol: Option<String>,

    /// Size column (numeric)
    #[arg(long)]
    size: Option<String>,

    /// Tooltip fields (repeatable); defaults to x and y
    #[arg(long = "tooltip")]
    tooltip: Vec<String>,

    /// Point opacity in [0, 1]
    #[arg(long)]
    opacity: Option<f64>,

    /// Max rows to plot (samples if larger)
    #[arg(long)]
    max_rows: Option<usize>,

    /// Rows of the table to print before plotting
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Base file name of the exported chart
    #[arg(short, long, default_value = "chart")]
    output: String,

    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip PNG export, as on hosts without a raster engine
    #[arg(long)]
    no_raster: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    if let Some(max_rows) = cli.max_rows {
        settings.max_rows = max_rows;
    }

    let renderer: Box<dyn RasterRenderer> = if cli.no_raster {
        Box::new(UnavailableRenderer::new("disabled with --no-raster"))
    } else {
        Box::new(BitmapRenderer)
    };
    let mut session = Session::new(settings, renderer).context("invalid settings")?;

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let source_name = cli
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("input path has no file name")?
        .to_string();

    if cli.list_sheets {
        for sheet in Session::sheets(&bytes, &source_name)? {
            println!("{sheet}");
        }
        return Ok(());
    }

    let roles = session
        .upload(&bytes, &source_name, cli.sheet.as_deref())
        .context("could not read file")?
        .clone();
    if let Some(table) = session.table() {
        println!(
            "Rows: {} | Columns: {}",
            table.row_count(),
            table.column_count()
        );
        print_preview(&table.head(cli.preview));
    }
    println!("Numeric columns: {}", roles.numeric.join(", "));
    println!("Other columns:   {}", roles.other.join(", "));

    if !roles.can_plot() {
        bail!("need at least two numeric columns for X and Y");
    }

    let x = cli.x.clone().unwrap_or_else(|| roles.numeric[0].clone());
    let y = cli.y.clone().unwrap_or_else(|| roles.numeric[1].clone());
    let opacity = cli.opacity.unwrap_or(session.settings().opacity);
    let mut selection = RoleSelection::new(x, y).opacity(opacity);
    selection.color = cli.color.clone();
    selection.symbol = cli.symbol.clone();
    selection.size = cli.size.clone();
    if !cli.tooltip.is_empty() {
        selection.tooltip = cli.tooltip.clone();
    }
    session.select(&selection).context("invalid column mapping")?;

    let Some(bundle) = session.export(&cli.output)? else {
        bail!("nothing to export");
    };

    let html = bundle.html.context("HTML export failed")?;
    std::fs::write(html.file_name(), html.bytes())
        .with_context(|| format!("writing {}", html.file_name()))?;
    info!("Wrote {}", html.file_name());
    println!("Wrote {} ({})", html.file_name(), html.mime());

    match bundle.png {
        Ok(png) => {
            std::fs::write(png.file_name(), png.bytes())
                .with_context(|| format!("writing {}", png.file_name()))?;
            println!("Wrote {} ({})", png.file_name(), png.mime());
        }
        Err(e) if e.is_recoverable() => {
            for warning in &bundle.warnings {
                warn!("{warning}");
            }
            eprintln!("PNG export unavailable: {e}");
        }
        Err(e) => {
            error!("PNG export failed: {e}");
            eprintln!("PNG export failed: {e}");
        }
    }

    Ok(())
}

/// Tab-separated dump of the first rows; missing cells print empty.
fn print_preview(table: &Table) {
    if table.row_count() == 0 {
        return;
    }
    let header: Vec<&str> = table.column_names().collect();
    println!("{}", header.join("\t"));
    for row in 0..table.row_count() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| match &c.values[row] {
                v if v.is_null() => String::new(),
                v => v.to_string(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
    println!();
}
