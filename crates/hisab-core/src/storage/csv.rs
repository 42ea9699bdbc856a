//! CSV import/export functionality

use crate::error::{HisabError, Result};
use hisab_engine::engine::{CellRef, CellStore, CellValue, format_number};
use std::path::Path;

/// Shape of an exported CSV file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvLayout {
    /// Cell values only, starting at A1.
    #[default]
    Plain,
    /// A header row of column letters and a leading column of row numbers.
    Labeled,
}

/// Parse a CSV file into cells.
pub fn parse_csv(path: &Path) -> Result<Vec<(CellRef, CellValue)>> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_str(&content)
}

/// Parse CSV text into cells. A labeled export (column letters across the
/// top, row numbers down the side) has its labels stripped.
pub fn parse_csv_str(content: &str) -> Result<Vec<(CellRef, CellValue)>> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let fields = parse_csv_line(line).map_err(|message| HisabError::Parse {
            line: idx + 1,
            message,
        })?;
        rows.push(fields);
    }

    let labeled = rows.first().is_some_and(|header| is_label_header(header));
    let (skip_rows, skip_cols) = if labeled { (1, 1) } else { (0, 0) };

    let mut cells = Vec::new();
    for (row_idx, fields) in rows.iter().enumerate().skip(skip_rows) {
        for (col_idx, field) in fields.iter().enumerate().skip(skip_cols) {
            if field.is_empty() {
                continue;
            }
            let cell_ref = CellRef::new(col_idx - skip_cols, row_idx - skip_rows);
            cells.push((cell_ref, parse_csv_field(field)));
        }
    }

    Ok(cells)
}

/// `,A,B,C` - an empty corner followed by consecutive column letters.
fn is_label_header(fields: &[String]) -> bool {
    fields.len() > 1
        && fields[0].is_empty()
        && fields[1..]
            .iter()
            .enumerate()
            .all(|(i, f)| *f == CellRef::col_to_letters(i))
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(std::mem::take(&mut current));
                    } else {
                        fields.push(current.trim().to_string());
                        current.clear();
                    }
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    Ok(fields)
}

/// Parse a CSV field into a cell value
/// - Valid number -> Number (unless it has leading zeros like "007")
/// - Otherwise -> Text
pub(crate) fn parse_csv_field(field: &str) -> CellValue {
    // Keep explicit surrounding whitespace (typically from quoted CSV fields).
    let trimmed = field.trim();
    if field != trimmed {
        return CellValue::Text(field.to_string());
    }

    // Preserve strings that look like numbers but have leading zeros (e.g., "007")
    // unless they're just "0" or start with "0."
    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return CellValue::Text(trimmed.to_string());
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

/// Render the populated area of the store (from A1) as CSV text.
/// An empty store renders as an empty string.
pub fn render_csv(store: &CellStore, layout: CsvLayout) -> String {
    let Some((max_row, max_col)) = store.extent() else {
        return String::new();
    };

    let mut out = String::new();
    if layout == CsvLayout::Labeled {
        let header: Vec<String> = std::iter::once(String::new())
            .chain((0..=max_col).map(CellRef::col_to_letters))
            .collect();
        out.push_str(&header.join(","));
        out.push('\n');
    }

    for row in 0..=max_row {
        let mut row_fields = Vec::with_capacity(max_col + 2);
        if layout == CsvLayout::Labeled {
            row_fields.push((row + 1).to_string());
        }
        for col in 0..=max_col {
            let field = match store.get(&CellRef::new(col, row)) {
                None => String::new(),
                Some(CellValue::Number(n)) => format_number(*n),
                Some(CellValue::Text(s)) => escape_csv_field(s),
            };
            row_fields.push(field);
        }
        out.push_str(&row_fields.join(","));
        out.push('\n');
    }
    out
}

/// Export the store to a CSV file.
pub fn write_csv(path: &Path, store: &CellStore, layout: CsvLayout) -> Result<()> {
    std::fs::write(path, render_csv(store, layout))?;
    Ok(())
}

/// Escape a text field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_parse_csv_line_simple() {
        assert_eq!(parse_csv_line("a,b,c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            parse_csv_line(r#"a,"hello, world",c"#).unwrap(),
            vec!["a", "hello, world", "c"]
        );
    }

    #[test]
    fn test_parse_csv_line_escaped_quotes() {
        assert_eq!(
            parse_csv_line(r#"a,"say ""hello""",c"#).unwrap(),
            vec!["a", r#"say "hello""#, "c"]
        );
    }

    #[test]
    fn test_parse_csv_line_unterminated_quote() {
        assert!(parse_csv_line(r#"a,"open"#).is_err());
    }

    #[test]
    fn test_parse_csv_str_reports_line() {
        let err = parse_csv_str("1,2\n3,\"4\n").unwrap_err();
        assert!(matches!(err, HisabError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field(" =1+1"), "' =1+1");
        assert_eq!(escape_csv_field("@cmd"), "'@cmd");
    }

    #[test]
    fn test_parse_csv_field() {
        assert_eq!(parse_csv_field("42"), CellValue::Number(42.0));
        assert_eq!(parse_csv_field("0"), CellValue::Number(0.0));
        assert_eq!(parse_csv_field("007"), CellValue::Text("007".into()));
        assert_eq!(parse_csv_field("  keep me  "), CellValue::Text("  keep me  ".into()));
        assert_eq!(parse_csv_field("rent"), CellValue::Text("rent".into()));
    }

    #[test]
    fn test_parse_plain_csv_skips_empty_fields() {
        let cells = parse_csv_str("10,5\n,8\n").unwrap();
        assert_eq!(
            cells,
            vec![
                (a1("A1"), CellValue::Number(10.0)),
                (a1("B1"), CellValue::Number(5.0)),
                (a1("B2"), CellValue::Number(8.0)),
            ]
        );
    }

    #[test]
    fn test_parse_labeled_csv_strips_labels() {
        let cells = parse_csv_str(",A,B,C\n1,10,5,50\n2,20,8,160\n").unwrap();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], (a1("A1"), CellValue::Number(10.0)));
        assert_eq!(cells[5], (a1("C2"), CellValue::Number(160.0)));
    }

    #[test]
    fn test_render_labeled_matches_share_layout() {
        let mut store = CellStore::new();
        store.insert(a1("A1"), 10.0);
        store.insert(a1("B1"), 5.0);
        store.insert(a1("A2"), 20.0);
        store.insert(a1("B2"), 8.0);
        store.insert(a1("C1"), 50.0);
        store.insert(a1("C2"), 160.0);

        let csv = render_csv(&store, CsvLayout::Labeled);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![",A,B,C", "1,10,5,50", "2,20,8,160"]);
    }

    #[test]
    fn test_render_plain_pads_gaps_and_guards_text() {
        let mut store = CellStore::new();
        store.insert(a1("B2"), -2.5);
        store.insert(a1("A3"), "=SUM(A1)");

        let csv = render_csv(&store, CsvLayout::Plain);
        assert_eq!(csv, ",\n,-2.5\n'=SUM(A1),\n");
    }

    #[test]
    fn test_render_empty_store() {
        assert_eq!(render_csv(&CellStore::new(), CsvLayout::Labeled), "");
    }

    #[test]
    fn test_write_then_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");

        let mut store = CellStore::new();
        store.insert(a1("A1"), "Item, large");
        store.insert(a1("B1"), 12.0);
        write_csv(&path, &store, CsvLayout::Labeled).unwrap();

        let cells = parse_csv(&path).unwrap();
        assert_eq!(
            cells,
            vec![
                (a1("A1"), CellValue::Text("Item, large".into())),
                (a1("B1"), CellValue::Number(12.0)),
            ]
        );
    }
}
