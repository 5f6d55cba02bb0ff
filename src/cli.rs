//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_source_adapter::CsvRowSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::adapters::xlsx_report_adapter::XlsxReportAdapter;
use crate::adapters::xlsx_source_adapter::XlsxRowSource;
use crate::domain::error::EtlError;
use crate::domain::export::order_rows;
use crate::domain::import::{ImportSummary, import_rows};
use crate::domain::settings::{AppSettings, ExportSettings, ImportSettings, StoreConfig};
use crate::ports::report_port::ReportPort;
use crate::ports::source_port::RowSourcePort;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(name = "indexetl", about = "Market index spreadsheet importer and exporter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import the configured spreadsheet, then offer exports interactively
    Run {
        #[arg(short, long, default_value = "indexetl.ini")]
        config: PathBuf,
    },
    /// Import a spreadsheet or CSV file into the store
    Import {
        #[arg(short, long, default_value = "indexetl.ini")]
        config: PathBuf,
        /// Overrides [import] path
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Export all stored records
    Export {
        #[arg(short, long, default_value = "indexetl.ini")]
        config: PathBuf,
        #[arg(short, long, value_enum)]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create the store tables if they do not exist
    InitDb {
        #[arg(short, long, default_value = "indexetl.ini")]
        config: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// .xlsx workbook
    Spreadsheet,
    /// Typst source (.typ); a paginated PDF is produced only when
    /// [export] typst_binary is configured
    Document,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run { config } => run_interactive(&config),
        Command::Import { config, input } => run_import(&config, input.as_deref()),
        Command::Export {
            config,
            format,
            output,
        } => run_export(&config, format, output.as_deref()),
        Command::InitDb { config } => run_init_db(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_settings(path: &Path) -> Result<AppSettings, EtlError> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| EtlError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    AppSettings::from_config(&adapter)
}

/// Open the configured store. The handle is released when dropped.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn StorePort>, EtlError> {
    match config {
        #[cfg(feature = "sqlite")]
        StoreConfig::Sqlite { path } => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;
            tracing::info!(path = %path.display(), "opening sqlite store");
            Ok(Box::new(SqliteAdapter::open(path)?))
        }
        #[cfg(feature = "postgres")]
        StoreConfig::Postgres(pg) => {
            use crate::adapters::postgres_adapter::PostgresAdapter;
            tracing::info!(host = %pg.host, port = pg.port, dbname = %pg.dbname, "connecting to postgres");
            Ok(Box::new(PostgresAdapter::connect(pg)?))
        }
        #[allow(unreachable_patterns)]
        other => Err(EtlError::ConfigInvalid {
            section: "database".into(),
            key: "backend".into(),
            reason: format!("{} support is not compiled in", backend_name(other)),
        }),
    }
}

fn backend_name(config: &StoreConfig) -> &'static str {
    match config {
        StoreConfig::Sqlite { .. } => "sqlite",
        StoreConfig::Postgres(_) => "postgres",
    }
}

/// Pick a row source by file extension: `.csv` is read as CSV, anything
/// else as a workbook.
pub fn open_row_source(settings: &ImportSettings, input: Option<&Path>) -> Box<dyn RowSourcePort> {
    let path = input.unwrap_or(settings.path.as_path());
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Box::new(CsvRowSource::new(path).with_skip_header(settings.skip_header))
    } else {
        Box::new(
            XlsxRowSource::new(path)
                .with_sheet(settings.sheet.clone())
                .with_skip_header(settings.skip_header),
        )
    }
}

pub fn run_import_pipeline(
    store: &dyn StorePort,
    source: &dyn RowSourcePort,
    batch_size: usize,
) -> Result<ImportSummary, EtlError> {
    store.initialize_schema()?;
    let rows = source.read_rows()?;
    eprintln!("Importing {} rows...", rows.len());

    let summary = import_rows(store, rows, batch_size)?;

    eprintln!(
        "Imported {} records in {} batches ({} tickers, {} new)",
        summary.records_inserted,
        summary.batches_flushed,
        summary.tickers_resolved,
        summary.tickers_created
    );
    if summary.rows_skipped > 0 {
        eprintln!("  Skipped rows:        {}", summary.rows_skipped);
    }
    if summary.conversion_failures > 0 {
        eprintln!("  Values stored as 0:  {}", summary.conversion_failures);
    }
    if summary.volume_defaults > 0 {
        eprintln!("  Volumes stored as 0: {}", summary.volume_defaults);
    }
    Ok(summary)
}

pub fn report_adapter(format: ExportFormat, settings: &ExportSettings) -> Box<dyn ReportPort> {
    match format {
        ExportFormat::Spreadsheet => Box::new(XlsxReportAdapter::new()),
        ExportFormat::Document => Box::new(
            TypstReportAdapter::new(settings.paper.clone())
                .with_typst_binary(settings.typst_binary.clone()),
        ),
    }
}

pub fn export_records(
    store: &dyn StorePort,
    settings: &ExportSettings,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<PathBuf, EtlError> {
    let path = output.map(Path::to_path_buf).unwrap_or_else(|| match format {
        ExportFormat::Spreadsheet => settings.spreadsheet_path.clone(),
        ExportFormat::Document => settings.document_path.clone(),
    });

    let mut rows = store.fetch_export_rows()?;
    order_rows(&mut rows, settings.order);

    report_adapter(format, settings).write(&rows, &path)?;
    tracing::info!(rows = rows.len(), path = %path.display(), "export written");
    Ok(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Export(ExportFormat),
    Stop,
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Export(ExportFormat::Spreadsheet)),
        "2" => Some(MenuChoice::Export(ExportFormat::Document)),
        "3" => Some(MenuChoice::Stop),
        _ => None,
    }
}

/// Prompt until the user picks "stop" or input ends. Each export choice is
/// handed to `on_export`; report failures are printed and the loop goes on,
/// store failures end it.
pub fn run_menu<R, W, F>(mut input: R, mut out: W, mut on_export: F) -> Result<(), EtlError>
where
    R: BufRead,
    W: Write,
    F: FnMut(ExportFormat) -> Result<PathBuf, EtlError>,
{
    let mut line = String::new();
    loop {
        writeln!(out, "Export the stored records?")?;
        writeln!(out, "1. Spreadsheet")?;
        writeln!(out, "2. Document")?;
        writeln!(out, "3. Stop")?;
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match parse_menu_choice(&line) {
            Some(MenuChoice::Stop) => {
                writeln!(out, "No export selected.")?;
                return Ok(());
            }
            Some(MenuChoice::Export(format)) => match on_export(format) {
                Ok(path) => writeln!(out, "Exported to {}", path.display())?,
                Err(e @ (EtlError::Database { .. } | EtlError::DatabaseQuery { .. })) => {
                    return Err(e);
                }
                Err(e) => writeln!(out, "error: {e}")?,
            },
            None => writeln!(out, "Invalid option. Please select 1, 2, or 3.")?,
        }
    }
}

fn run_interactive(config_path: &Path) -> Result<(), EtlError> {
    eprintln!("Loading config from {}", config_path.display());
    let settings = load_settings(config_path)?;
    let store = open_store(&settings.store)?;

    let source = open_row_source(&settings.import, None);
    run_import_pipeline(store.as_ref(), source.as_ref(), settings.import.batch_size)?;

    let stdin = io::stdin();
    run_menu(stdin.lock(), io::stdout(), |format| {
        export_records(store.as_ref(), &settings.export, format, None)
    })
}

fn run_import(config_path: &Path, input: Option<&Path>) -> Result<(), EtlError> {
    let settings = load_settings(config_path)?;
    let store = open_store(&settings.store)?;
    let source = open_row_source(&settings.import, input);
    run_import_pipeline(store.as_ref(), source.as_ref(), settings.import.batch_size)?;
    Ok(())
}

fn run_export(
    config_path: &Path,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), EtlError> {
    let settings = load_settings(config_path)?;
    let store = open_store(&settings.store)?;
    store.initialize_schema()?;
    let path = export_records(store.as_ref(), &settings.export, format, output)?;
    eprintln!("Exported to {}", path.display());
    Ok(())
}

fn run_init_db(config_path: &Path) -> Result<(), EtlError> {
    let settings = load_settings(config_path)?;
    let store = open_store(&settings.store)?;
    store.initialize_schema()?;
    eprintln!("Schema ready ({})", backend_name(&settings.store));
    Ok(())
}
