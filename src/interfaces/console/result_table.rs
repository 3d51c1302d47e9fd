//! Plain-text rendering of query result sets for the console.
//!
//! Floats are printed with at most [`FLOAT_MAX_DECIMALS`] decimals and
//! trailing zeros trimmed, so averages read `3.75` rather than
//! `3.7499999999999996`.

use crate::domain::query_run::QueryResult;

pub const FLOAT_MAX_DECIMALS: usize = 6;

const NULL_TEXT: &str = "None";

/// Render every row and column, with a leading 0-based row index
pub fn render_result(result: &QueryResult) -> String {
    if result.rows.is_empty() {
        return format!(
            "Empty result set\nColumns: [{}]",
            result.columns.join(", ")
        );
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(format_value).collect())
        .collect();

    let index_width = (result.rows.len() - 1).to_string().len();
    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|v| v.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (name, width) in result.columns.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", name, width = width));
    }

    for (row_idx, row) in cells.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{:<width$}", row_idx, width = index_width));
        for (value, width) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", value, width = width));
        }
    }

    out
}

pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => NULL_TEXT.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format_compact_float(f, FLOAT_MAX_DECIMALS),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn format_compact_float(value: f64, max_decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let prec = max_decimals.min(15);
    let mut s = format!("{value:.prec$}", prec = prec);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }

    if s == "-0" {
        s = "0".to_string();
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_float() {
        assert_eq!(format_compact_float(3.7499999999999996, 6), "3.75");
        assert_eq!(format_compact_float(2.0, 6), "2");
        assert_eq!(format_compact_float(-0.0000001, 6), "0");
    }

    #[test]
    fn test_render_aligns_columns() {
        let result = QueryResult {
            columns: vec!["gender".to_string(), "revenue".to_string()],
            rows: vec![
                vec![json!("Male"), json!(157890)],
                vec![json!("Female"), json!(75191.5)],
            ],
            row_count: 2,
        };

        let rendered = render_result(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   gender  revenue");
        assert_eq!(lines[1], "0    Male   157890");
        assert_eq!(lines[2], "1  Female  75191.5");
    }

    #[test]
    fn test_render_empty_lists_columns() {
        let result = QueryResult {
            columns: vec!["age_group".to_string()],
            rows: Vec::new(),
            row_count: 0,
        };
        assert_eq!(render_result(&result), "Empty result set\nColumns: [age_group]");
    }

    #[test]
    fn test_null_renders_as_none() {
        assert_eq!(format_value(&serde_json::Value::Null), "None");
    }
}
