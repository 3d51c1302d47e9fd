use serde::{Deserialize, Serialize};

/// How a SQL script is cut into statements and previewed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    /// Literal removed everywhere in the script before splitting.
    /// Empty disables the removal.
    pub cast_token: String,

    /// Starts a comment running to the end of the line
    pub comment_marker: String,

    pub terminator: char,

    /// Characters of statement text echoed before execution
    pub preview_chars: usize,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            cast_token: "::numeric".to_string(),
            comment_marker: "--".to_string(),
            terminator: ';',
            preview_chars: 100,
        }
    }
}

impl ScriptOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.comment_marker.is_empty() {
            return Err("comment_marker must not be empty".to_string());
        }
        if self.terminator.is_whitespace() {
            return Err("terminator must not be whitespace".to_string());
        }
        if self.preview_chars == 0 {
            return Err("preview_chars must be > 0".to_string());
        }
        Ok(())
    }
}
