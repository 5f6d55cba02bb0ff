//! Spreadsheet row source (.xlsx, .xls, .ods).

use crate::domain::error::EtlError;
use crate::ports::source_port::RowSourcePort;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate};
use std::path::{Path, PathBuf};

pub struct XlsxRowSource {
    path: PathBuf,
    sheet: Option<String>,
    skip_header: bool,
}

impl XlsxRowSource {
    /// Reads the first worksheet and skips its header row.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: None,
            skip_header: true,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    fn error(&self, reason: impl ToString) -> EtlError {
        EtlError::Spreadsheet {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl RowSourcePort for XlsxRowSource {
    fn read_rows(&self) -> Result<Vec<Vec<String>>, EtlError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.error(e))?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| self.error("workbook has no worksheets"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| self.error(format!("sheet '{sheet_name}': {e}")))?;

        let skip = usize::from(self.skip_header);
        let rows = range
            .rows()
            .skip(skip)
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(rows)
    }
}

/// Render a cell the way it would be typed: numbers in shortest form,
/// dates as `YYYY-MM-DD`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
        Data::Error(e) => e.to_string(),
    }
}

/// Excel serial day number (1900 system) to a date or date-time string.
fn excel_serial_to_text(serial: f64) -> String {
    // Day 0 is 1899-12-30 once the fictitious 1900-02-29 is accounted for.
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return serial.to_string();
    };
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;

    let Some(date) = epoch.checked_add_signed(Duration::days(days as i64)) else {
        return serial.to_string();
    };
    if seconds == 0 {
        return date.format("%Y-%m-%d").to_string();
    }
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => (midnight + Duration::seconds(seconds))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => date.format("%Y-%m-%d").to_string(),
    }
}
