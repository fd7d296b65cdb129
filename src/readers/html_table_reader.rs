use crate::error::{ProcessingError, Result};
use crate::models::WideTable;
use crate::utils::constants::MIN_TABLE_COLUMNS;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

static TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table\s*>").unwrap());
static ROW_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<tr\b[^>]*>").unwrap());
static CELL_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<t[hd]\b[^>]*>").unwrap());
static CELL_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:td|th|tr|thead|tbody|tfoot)\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

/// Pulls the first `<table>` of a page into text cells.
///
/// Tolerant rather than strict: tags inside cells are dropped, entities are
/// decoded and unclosed `<tr>`/`<td>` are accepted.
pub struct HtmlTableReader {
    min_columns: usize,
}

impl HtmlTableReader {
    pub fn new() -> Self {
        Self {
            min_columns: MIN_TABLE_COLUMNS,
        }
    }

    /// Read the first table; the first row with cells becomes the header
    pub fn read_str(&self, html: &str) -> Result<WideTable> {
        let body = TABLE
            .captures(html)
            .and_then(|c| c.get(1))
            .ok_or_else(|| ProcessingError::InvalidSnapshot("no <table> found in page".to_string()))?
            .as_str();

        // Split on opening tags so unclosed rows and cells still parse
        let mut rows = ROW_START
            .split(body)
            .skip(1)
            .map(|row| self.parse_cells(row))
            .filter(|cells| !cells.is_empty());

        let headers = rows
            .next()
            .ok_or_else(|| ProcessingError::InvalidSnapshot("table has no rows".to_string()))?;

        if headers.len() < self.min_columns {
            return Err(ProcessingError::InvalidSnapshot(format!(
                "table has {} columns, expected at least {}",
                headers.len(),
                self.min_columns
            )));
        }

        let width = headers.len();
        let rows: Vec<Vec<String>> = rows
            .map(|mut cells| {
                if cells.len() != width {
                    debug!("Row has {} cells, header has {}", cells.len(), width);
                    cells.resize(width, String::new());
                }
                cells
            })
            .collect();

        debug!("Extracted table with {} columns and {} rows", width, rows.len());
        Ok(WideTable::new(headers, rows))
    }

    fn parse_cells(&self, row: &str) -> Vec<String> {
        CELL_START
            .split(row)
            .skip(1)
            .map(|cell| {
                let end = CELL_END.find(cell).map_or(cell.len(), |m| m.start());
                cell_text(&cell[..end])
            })
            .collect()
    }
}

impl Default for HtmlTableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible text of a cell fragment with whitespace collapsed
fn cell_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = decode_entities(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "nbsp" => Some(' '),
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "ndash" => Some('\u{2013}'),
                    "mdash" => Some('\u{2014}'),
                    "deg" => Some('\u{00b0}'),
                    _ => None,
                }
            };

            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r##"
        <html><body>
        <table class="fd-c-table1">
          <thead>
            <tr><th>Postaja</th><th>07</th><th>14</th></tr>
          </thead>
          <tbody>
            <tr><td><a href="#">Sv.&nbsp;Ana</a></td><td>18.2</td><td>-</td></tr>
            <tr><td>Poreč</td><td>19,1</td><td>20.4</td></tr>
            <tr><td>Split A</td><td>21.0</td></tr>
          </tbody>
        </table>
        <table><tr><td>ignored</td></tr></table>
        </body></html>"##;

    #[test]
    fn test_read_first_table() -> Result<()> {
        let table = HtmlTableReader::new().read_str(PAGE)?;

        assert_eq!(table.headers, vec!["Postaja", "07", "14"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Sv. Ana", "18.2", "-"]);
        assert_eq!(table.rows[1], vec!["Poreč", "19,1", "20.4"]);
        // Short rows are padded to the header width
        assert_eq!(table.rows[2], vec!["Split A", "21.0", ""]);

        Ok(())
    }

    #[test]
    fn test_unclosed_cells() -> Result<()> {
        let html = "<table><tr><th>Station<th>7<tr><td>Rovinj<td>17.9</table>";
        let table = HtmlTableReader::new().read_str(html)?;

        assert_eq!(table.headers, vec!["Station", "7"]);
        assert_eq!(table.rows, vec![vec!["Rovinj".to_string(), "17.9".to_string()]]);

        Ok(())
    }

    #[test]
    fn test_missing_table_is_error() {
        let result = HtmlTableReader::new().read_str("<html><p>maintenance</p></html>");
        assert!(matches!(result, Err(ProcessingError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_too_narrow_table_is_error() {
        let result = HtmlTableReader::new().read_str("<table><tr><td>only</td></tr></table>");
        assert!(matches!(result, Err(ProcessingError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&amp;b &#268;iovo &#x17D;&unknown;"), "a&b Čiovo Ž&unknown;");
    }
}
