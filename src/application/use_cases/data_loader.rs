// ============================================================
// DATA LOADER USE CASE
// ============================================================
// Read the shopping dataset from disk

use std::path::Path;

use tracing::info;

use crate::domain::dataset::RecordTable;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::csv::CsvParser;

pub struct DataLoader {
    parser: CsvParser,
}

impl DataLoader {
    pub fn new(parser: CsvParser) -> Self {
        Self { parser }
    }

    /// Loader using the configured delimiter and trimming
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter).map_err(|_| {
            AppError::ConfigError(format!("delimiter {:?} is not ASCII", config.delimiter))
        })?;
        Ok(Self::new(
            CsvParser::new()
                .with_delimiter(delimiter)
                .with_trim(config.trim_values),
        ))
    }

    /// Load the CSV at `path`. A missing file is reported as
    /// `AppError::MissingInput` so the caller can halt the run.
    pub fn load(&self, path: &Path) -> Result<RecordTable> {
        ensure_input_exists(path)?;

        let table = self.parser.parse_file(path)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns.len(),
            "Loaded dataset"
        );
        Ok(table)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(CsvParser::default())
    }
}

/// Fail with `MissingInput` naming the file when `path` does not exist
pub fn ensure_input_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Err(AppError::MissingInput(format!("{} not found.", name)))
}
