//! CSV row source.

use crate::domain::error::EtlError;
use crate::ports::source_port::RowSourcePort;
use std::path::{Path, PathBuf};

pub struct CsvRowSource {
    path: PathBuf,
    skip_header: bool,
}

impl CsvRowSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            skip_header: true,
        }
    }

    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }
}

impl RowSourcePort for CsvRowSource {
    fn read_rows(&self) -> Result<Vec<Vec<String>>, EtlError> {
        let to_error = |e: csv::Error| EtlError::Spreadsheet {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.skip_header)
            .flexible(true)
            .from_path(&self.path)
            .map_err(to_error)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(to_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}
