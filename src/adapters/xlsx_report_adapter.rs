//! Spreadsheet export implementing ReportPort.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::error::EtlError;
use crate::domain::export::{EXPORT_HEADERS, ExportCell, export_cells};
use crate::domain::record::ExportRow;
use crate::ports::report_port::ReportPort;

pub const SHEET_NAME: &str = "Sheet1";

/// Largest integer a spreadsheet number cell holds exactly (2^53). Larger
/// values are written as text so no digits are lost.
const MAX_EXACT_NUMBER: u64 = 1 << 53;

#[derive(Debug, Default)]
pub struct XlsxReportAdapter;

impl XlsxReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, rows: &[ExportRow]) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        let bold = Format::new().set_bold();
        for (col, header) in EXPORT_HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            for (col, cell) in export_cells(row).iter().enumerate() {
                match cell {
                    ExportCell::Text(s) => sheet.write_string(r, col as u16, s)?,
                    ExportCell::Integer(n) if n.unsigned_abs() <= MAX_EXACT_NUMBER => {
                        sheet.write_number(r, col as u16, *n as f64)?
                    }
                    ExportCell::Integer(n) => sheet.write_string(r, col as u16, n.to_string())?,
                };
            }
        }

        Ok(workbook)
    }
}

impl ReportPort for XlsxReportAdapter {
    fn write(&self, rows: &[ExportRow], output_path: &Path) -> Result<(), EtlError> {
        let to_error = |e: XlsxError| EtlError::Report {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        };

        let mut workbook = self.build(rows).map_err(to_error)?;
        workbook.save(output_path).map_err(to_error)?;
        Ok(())
    }
}
