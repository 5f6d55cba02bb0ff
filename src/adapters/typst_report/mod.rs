//! Typst document export implementing ReportPort.
//!
//! Resolves the `{{PLACEHOLDER}}` markers of the built-in template, writes
//! the `.typ` file and, when a Typst binary is configured, compiles it to
//! a PDF next to it.

pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::error::EtlError;
use crate::domain::record::ExportRow;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TEMPLATE: &str = r#"#set page(paper: "{{PAPER}}", flipped: true, margin: 1cm, numbering: "1 / 1")
#set text(size: 7pt)

= Index Records

{{RECORD_COUNT}}

{{RECORDS_TABLE}}
"#;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub rows: &'a [ExportRow],
    pub paper: &'a str,
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let count = match ctx.rows.len() {
        1 => "1 record.".to_string(),
        n => format!("{n} records."),
    };

    template
        .replace("{{PAPER}}", &ctx.paper.replace('"', ""))
        .replace("{{RECORD_COUNT}}", &count)
        .replace("{{RECORDS_TABLE}}", &tables::format_records_table(ctx.rows))
}

pub struct TypstReportAdapter {
    paper: String,
    typst_binary: Option<PathBuf>,
}

impl TypstReportAdapter {
    pub fn new(paper: impl Into<String>) -> Self {
        Self {
            paper: paper.into(),
            typst_binary: None,
        }
    }

    pub fn with_typst_binary(mut self, binary: Option<PathBuf>) -> Self {
        self.typst_binary = binary;
        self
    }

    fn compile(&self, binary: &Path, source: &Path) -> Result<PathBuf, EtlError> {
        let pdf = source.with_extension("pdf");
        let report_error = |reason: String| EtlError::Report {
            path: pdf.display().to_string(),
            reason,
        };

        let output = Command::new(binary)
            .arg("compile")
            .arg(source)
            .arg(&pdf)
            .output()
            .map_err(|e| report_error(format!("failed to run {}: {e}", binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(report_error(format!(
                "typst exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(pdf)
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, rows: &[ExportRow], output_path: &Path) -> Result<(), EtlError> {
        let ctx = ReportContext {
            rows,
            paper: &self.paper,
        };
        let content = resolve(DEFAULT_TEMPLATE, &ctx);

        fs::write(output_path, content).map_err(|e| EtlError::Report {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(binary) = &self.typst_binary {
            let pdf = self.compile(binary, output_path)?;
            tracing::info!(pdf = %pdf.display(), "document compiled");
        }
        Ok(())
    }
}
