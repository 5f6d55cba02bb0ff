//! Concrete adapter implementations for ports.

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
#[cfg(feature = "postgres")]
pub mod postgres_adapter;
pub mod csv_source_adapter;
pub mod file_config_adapter;
pub mod typst_report;
pub mod xlsx_report_adapter;
pub mod xlsx_source_adapter;
