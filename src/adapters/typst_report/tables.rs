//! Typst table markup for exported records.

use crate::domain::export::{EXPORT_HEADERS, export_cells};
use crate::domain::record::ExportRow;

/// Escape text so Typst markup shows it literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '#' | '[' | ']' | '*' | '_' | '$' | '<' | '>' | '@' | '`' | '~' | '=' | '-'
                | '+' | '/' | '"' | '\''
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A bordered, centered grid with a header row that repeats on every page.
pub fn format_records_table(rows: &[ExportRow]) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str(&format!("  columns: {},\n", EXPORT_HEADERS.len()));
    output.push_str("  align: center + horizon,\n");
    output.push_str("  stroke: 0.5pt,\n");

    let header: Vec<String> = EXPORT_HEADERS
        .iter()
        .map(|h| format!("[*{}*]", escape(h)))
        .collect();
    output.push_str(&format!("  table.header({}),\n", header.join(", ")));

    for row in rows {
        let cells: Vec<String> = export_cells(row)
            .iter()
            .map(|cell| format!("[{}]", escape(&cell.render())))
            .collect();
        output.push_str(&format!("  {},\n", cells.join(", ")));
    }

    output.push_str(")\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixed_point::ScaledDecimal;

    fn row(symbol: &str, volume: i64) -> ExportRow {
        ExportRow {
            date: "2024-01-02".into(),
            open: ScaledDecimal::new(150, 2),
            high: ScaledDecimal::new(16, 1),
            low: ScaledDecimal::new(14, 0),
            close: ScaledDecimal::new(-5, 1),
            adj_close: ScaledDecimal::new(-5, 1),
            volume,
            symbol: symbol.into(),
        }
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape("^GSPC"), "^GSPC");
        assert_eq!(escape("#1 [x]"), "\\#1 \\[x\\]");
        assert_eq!(escape("2024-01-02"), "2024\\-01\\-02");
        assert_eq!(escape("Adj_Close"), "Adj\\_Close");
    }

    #[test]
    fn table_has_thirteen_columns_and_repeating_header() {
        let output = format_records_table(&[]);
        assert!(output.starts_with("#table("));
        assert!(output.contains("columns: 13,"));
        assert!(output.contains("table.header([*Date*], [*Open*], [*Open Precision*]"));
        assert!(output.contains("[*AdjClose Precision*], [*Volume*], [*Ticker*])"));
        assert!(output.contains("stroke: 0.5pt"));
        assert!(output.contains("align: center + horizon"));
    }

    #[test]
    fn one_line_per_record_with_raw_integers() {
        let output = format_records_table(&[row("^GSPC", 900), row("SPY", 0)]);
        assert!(output.contains(
            "  [2024\\-01\\-02], [150], [2], [16], [1], [14], [0], [\\-5], [1], [\\-5], [1], [900], [^GSPC],\n"
        ));
        assert!(output.contains("[0], [SPY],\n"));
        assert_eq!(output.lines().filter(|l| l.starts_with("  [2024")).count(), 2);
    }
}
