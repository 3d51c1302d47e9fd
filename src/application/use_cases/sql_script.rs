// ============================================================
// SQL SCRIPT SPLITTER
// ============================================================
// Turn a script file into individual statements
//
// Deliberately textual: the cast token is removed and comments are cut
// without looking at quotes, so both also hit inside string literals.
// Scripts relying on `--` or `::numeric` inside a literal are not supported.

use std::path::Path;

use crate::application::use_cases::data_loader::ensure_input_exists;
use crate::domain::error::{AppError, Result};
use crate::domain::script_options::ScriptOptions;

/// Read a script file with `\r\n` line endings folded to `\n`.
/// A missing file is `AppError::MissingInput`.
pub fn read_script(path: &Path) -> Result<String> {
    ensure_input_exists(path)?;
    let script = std::fs::read_to_string(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(script.replace("\r\n", "\n"))
}

/// Split a script into trimmed, non-empty statements in file order
pub fn prepare_statements(script: &str, options: &ScriptOptions) -> Vec<String> {
    let stripped = if options.cast_token.is_empty() {
        script.to_string()
    } else {
        script.replace(&options.cast_token, "")
    };

    let without_comments = stripped
        .lines()
        .map(|line| match line.find(&options.comment_marker) {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(options.terminator)
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

/// First `width` characters of a statement on one line
pub fn preview(statement: &str, width: usize) -> String {
    statement
        .chars()
        .take(width)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
