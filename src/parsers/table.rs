use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{element_text, parse_cell_date};
use crate::models::{NO_DATA_SENTINEL, NO_DATA_VALUE};

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Invalid table selector"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Invalid cell selector"));

/// The cells of one output line. For data rows the first three cells are
/// year, month and day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow(pub Vec<String>);

impl NormalizedRow {
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

/// Converts the station map's data table into CSV lines.
#[derive(Debug, Clone)]
pub struct TableNormalizer {
    separator: String,
    start_line: usize,
}

impl TableNormalizer {
    /// Rows with an index below `start_line` are skipped.
    pub fn new(separator: impl Into<String>, start_line: usize) -> Self {
        Self {
            separator: separator.into(),
            start_line,
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Rows of the first `<table>` in `html`; no table gives no rows.
    pub fn normalize_rows(&self, html: &str) -> Vec<NormalizedRow> {
        let fragment = Html::parse_fragment(html);
        let Some(table) = fragment.select(&TABLE_SELECTOR).next() else {
            return Vec::new();
        };

        table
            .select(&ROW_SELECTOR)
            .enumerate()
            .filter(|(row_index, _)| *row_index >= self.start_line)
            .filter_map(|(row_index, row)| self.process_row(&row, row_index))
            .collect()
    }

    /// CSV body: cells joined by the separator, rows by `\n`, no trailing
    /// newline.
    pub fn to_csv(&self, html: &str) -> String {
        self.normalize_rows(html)
            .iter()
            .map(|row| row.join(&self.separator))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn process_row(&self, row: &ElementRef<'_>, row_index: usize) -> Option<NormalizedRow> {
        let mut cells = Vec::new();

        for (cell_index, cell) in row.select(&CELL_SELECTOR).enumerate() {
            let mut text = element_text(&cell);
            // Embedded quotes are not escaped.
            if text.contains(self.separator.as_str()) {
                text = format!("\"{}\"", text);
            }

            if row_index > 0 && cell_index == 0 {
                let Some(date) = parse_cell_date(&text) else {
                    warn!(
                        "First cell of row {} is not a valid date: '{}'",
                        row_index + 1,
                        text
                    );
                    return None;
                };
                cells.extend(date.to_cells());
            } else if text == NO_DATA_SENTINEL {
                cells.push(NO_DATA_VALUE.to_string());
            } else {
                cells.push(text);
            }
        }

        if cells.iter().any(|cell| !cell.trim().is_empty()) {
            Some(NormalizedRow(cells))
        } else {
            None
        }
    }
}

/// Shorthand for a one-off conversion.
pub fn html_table_to_csv(html: &str, separator: &str, start_line: usize) -> String {
    TableNormalizer::new(separator, start_line).to_csv(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONVENTIONAL_TABLE: &str = r#"
        <table id="dataTable">
          <tr><th>AÑO / MES / DÍA</th><th colspan="2">TEMPERATURA (°C)</th><th>HUMEDAD RELATIVA (%)</th><th>PRECIPITACIÓN (mm/día)</th></tr>
          <tr><th>MAX</th><th>MIN</th><th>TOTAL</th></tr>
          <tr><td>2024-09-15</td><td>21.4</td><td> 8.2 </td><td>S/D</td><td>0.0</td></tr>
          <tr><td>2024/09/16</td><td>22</td><td>7.9</td><td>64.1</td><td>S/D</td></tr>
          <tr><td>2024-13-40</td><td>1</td><td>2</td><td>3</td><td>4</td></tr>
          <tr><td>2024-09-17</td><td>23.1</td><td>9.0</td><td>60.0</td><td>1.2</td></tr>
        </table>"#;

    #[test]
    fn splits_dates_and_substitutes_sentinel() {
        let csv = html_table_to_csv(CONVENTIONAL_TABLE, ";", 2);
        assert_eq!(
            csv,
            "2024;09;15;21.4;8.2;0.0;0.0\n\
             2024;09;16;22;7.9;64.1;0.0\n\
             2024;09;17;23.1;9.0;60.0;1.2"
        );
    }

    #[test]
    fn first_row_is_not_date_checked() {
        let html = "<table><tr><th>Fecha</th><th>S/D</th></tr><tr><td>2024-01-02</td><td>5</td></tr></table>";
        let rows = TableNormalizer::new(";", 0).normalize_rows(html);
        assert_eq!(
            rows,
            vec![
                NormalizedRow(vec!["Fecha".into(), "0.0".into()]),
                NormalizedRow(vec!["2024".into(), "01".into(), "02".into(), "5".into()]),
            ]
        );
    }

    #[test]
    fn quotes_cells_containing_separator() {
        let html = r#"<table><tr><td>a</td></tr><tr><td>2024-01-02</td><td>x;y</td><td>say "hi"</td></tr></table>"#;
        let csv = html_table_to_csv(html, ";", 1);
        assert_eq!(csv, "2024;01;02;\"x;y\";say \"hi\"");
    }

    #[test]
    fn collapses_whitespace_inside_cells() {
        let html = "<table><tr><td>x</td></tr><tr><td>2024-01-02</td><td>  12.5 \n  mm </td></tr></table>";
        assert_eq!(html_table_to_csv(html, ";", 1), "2024;01;02;12.5 mm");
    }

    #[test]
    fn drops_blank_rows_silently() {
        let html = "<table><tr><td> </td><td></td></tr><tr></tr><tr><td>2024-01-02</td></tr></table>";
        assert_eq!(html_table_to_csv(html, ";", 0), "2024;01;02");
    }

    #[test]
    fn no_table_gives_empty_output() {
        assert_eq!(html_table_to_csv("<div>nothing</div>", ";", 0), "");
        assert_eq!(html_table_to_csv("<table></table>", ";", 0), "");
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let normalizer = TableNormalizer::new(";", 2);
        assert_eq!(
            normalizer.to_csv(CONVENTIONAL_TABLE),
            normalizer.to_csv(CONVENTIONAL_TABLE)
        );
    }
}
