use super::cell::CellValue;

/// Format a cell value for display.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
    }
}

/// Format a number for display and messages.
///
/// Whole numbers print without a fractional part; other values use the
/// shortest representation that round-trips. Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
