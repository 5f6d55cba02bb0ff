//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Settings loading from INI files on disk
//! - Row source selection and import via run_import_pipeline
//! - Spreadsheet and document exports through export_records
//! - Export ordering

mod common;

use common::*;
use indexetl::cli::{self, ExportFormat};
use indexetl::domain::error::EtlError;
use indexetl::domain::export::ExportOrder;
use indexetl::domain::settings::StoreConfig;
use std::fs;
use std::io::Write;
use std::path::Path;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn ini_for(dir: &Path, extra: &str) -> String {
    format!(
        "[database]\nbackend = sqlite\npath = {db}\n\n\
         [import]\npath = {input}\nbatch_size = 50\n\n\
         [export]\nspreadsheet_path = {xlsx}\ndocument_path = {typ}\n{extra}\n",
        db = dir.join("etl.db").display(),
        input = dir.join("prices.csv").display(),
        xlsx = dir.join("out.xlsx").display(),
        typ = dir.join("out.typ").display(),
    )
}

fn write_prices_csv(dir: &Path, rows: &[Vec<String>]) {
    let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume,Ticker\n");
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    fs::write(dir.join("prices.csv"), content).unwrap();
}

mod settings_loading {
    use super::*;

    #[test]
    fn load_settings_reads_ini_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&ini_for(dir.path(), "order = date"));

        let settings = cli::load_settings(file.path()).unwrap();

        assert_eq!(
            settings.store,
            StoreConfig::Sqlite {
                path: dir.path().join("etl.db")
            }
        );
        assert_eq!(settings.import.path, dir.path().join("prices.csv"));
        assert_eq!(settings.export.order, ExportOrder::DateSymbol);
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let result = cli::load_settings(Path::new("/nonexistent/indexetl.ini"));
        assert!(matches!(result, Err(EtlError::ConfigParse { .. })));
    }

    #[test]
    fn invalid_order_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&ini_for(dir.path(), "order = random"));

        match cli::load_settings(file.path()) {
            Err(EtlError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, "export");
                assert_eq!(key, "order");
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }
}

#[cfg(feature = "sqlite")]
mod pipeline {
    use super::*;

    fn import_fixture(dir: &Path, rows: &[Vec<String>], extra: &str) -> indexetl::domain::settings::AppSettings {
        write_prices_csv(dir, rows);
        let file = write_temp_ini(&ini_for(dir, extra));
        let settings = cli::load_settings(file.path()).unwrap();

        let store = cli::open_store(&settings.store).unwrap();
        let source = cli::open_row_source(&settings.import, None);
        let summary =
            cli::run_import_pipeline(store.as_ref(), source.as_ref(), settings.import.batch_size)
                .unwrap();
        assert_eq!(summary.records_inserted, rows.len());
        settings
    }

    #[test]
    fn import_from_csv_then_export_spreadsheet() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = import_fixture(dir.path(), &generate_rows("^GSPC", 61), "");

        let store = cli::open_store(&settings.store).unwrap();
        let path =
            cli::export_records(store.as_ref(), &settings.export, ExportFormat::Spreadsheet, None)
                .unwrap();

        assert_eq!(path, dir.path().join("out.xlsx"));
        assert!(path.exists());
    }

    #[test]
    fn export_document_to_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = import_fixture(
            dir.path(),
            &[make_row("2024-01-02", "1.50", "10", "SPY")],
            "",
        );
        let target = dir.path().join("custom.typ");

        let store = cli::open_store(&settings.store).unwrap();
        let path = cli::export_records(
            store.as_ref(),
            &settings.export,
            ExportFormat::Document,
            Some(&target),
        )
        .unwrap();

        assert_eq!(path, target);
        let content = fs::read_to_string(&target).unwrap();
        assert!(content.contains("columns: 13,"));
        assert!(content.contains("[150], [2]"));
        assert!(content.contains("[SPY]"));
    }

    #[test]
    fn date_order_sorts_exported_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = vec![
            make_row("2024-01-03", "1", "1", "B"),
            make_row("2024-01-01", "1", "1", "Z"),
            make_row("2024-01-01", "1", "1", "A"),
        ];
        let settings = import_fixture(dir.path(), &rows, "order = date");

        let store = cli::open_store(&settings.store).unwrap();
        cli::export_records(store.as_ref(), &settings.export, ExportFormat::Document, None)
            .unwrap();

        let content = fs::read_to_string(dir.path().join("out.typ")).unwrap();
        let a = content.find("[A]").unwrap();
        let z = content.find("[Z]").unwrap();
        let b = content.find("[B]").unwrap();
        assert!(a < z && z < b);
    }

    #[test]
    fn missing_input_file_fails_before_writing() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(&ini_for(dir.path(), ""));
        let settings = cli::load_settings(file.path()).unwrap();

        let store = cli::open_store(&settings.store).unwrap();
        let source = cli::open_row_source(&settings.import, Some(Path::new("/nonexistent/x.xlsx")));
        let result = cli::run_import_pipeline(store.as_ref(), source.as_ref(), 50);

        assert!(matches!(result, Err(EtlError::Spreadsheet { .. })));
        assert!(store.fetch_export_rows().unwrap().is_empty());
    }
}
