//! Report generation port trait.

use std::path::Path;

use crate::domain::error::EtlError;
use crate::domain::record::ExportRow;

/// Port for writing exported records to a file.
pub trait ReportPort {
    fn write(&self, rows: &[ExportRow], output_path: &Path) -> Result<(), EtlError>;
}
