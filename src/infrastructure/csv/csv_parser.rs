// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into a typed record table

use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use crate::domain::dataset::{Cell, ColumnKind, RecordTable};
use crate::domain::error::AppError;

/// Values read as missing, matching the usual dataframe defaults
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// CSV parser with encoding fallback and column type inference
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file into a record table
    pub fn parse_file(&self, path: &Path) -> Result<RecordTable, AppError> {
        let content = self.read_with_encoding_fallback(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<RecordTable, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(AppError::ParseError("CSV file has no header row".to_string()));
        }

        // Raw values per row; None marks a missing value
        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            raw_rows.push(self.parse_row(index, &headers, &record)?);
        }

        let kinds: Vec<ColumnKind> = (0..headers.len())
            .map(|col| ColumnKind::infer_raw(raw_rows.iter().map(|row| row[col].as_deref())))
            .collect();

        let columns = unique_headers(&headers);
        for (name, kind) in columns.iter().zip(&kinds) {
            debug!(column = %name, kind = %kind, "Inferred column type");
        }

        let mut table = RecordTable::new(columns);
        for raw in raw_rows {
            let row: Vec<Cell> = raw
                .iter()
                .zip(&kinds)
                .map(|(value, kind)| kind.parse_cell(value.as_deref()))
                .collect();
            table.push_row(row);
        }

        Ok(table)
    }

    /// Read file as UTF-8, falling back to Windows-1252
    fn read_with_encoding_fallback(&self, path: &Path) -> Result<String, AppError> {
        let buffer = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let (content, _, had_errors) = UTF_8.decode(&buffer);
        if !had_errors {
            return Ok(content.into_owned());
        }

        warn!(path = %path.display(), "CSV is not valid UTF-8, decoding as Windows-1252");
        let (content, _, _) = WINDOWS_1252.decode(&buffer);
        Ok(content.into_owned())
    }

    /// Parse a single CSV row; short rows are padded with missing values
    fn parse_row(
        &self,
        index: usize,
        headers: &StringRecord,
        record: &StringRecord,
    ) -> Result<Vec<Option<String>>, AppError> {
        if record.len() > headers.len() {
            return Err(AppError::ParseError(format!(
                "Expected {} fields in row {}, saw {}",
                headers.len(),
                index + 1,
                record.len()
            )));
        }

        Ok((0..headers.len())
            .map(|idx| {
                record
                    .get(idx)
                    .filter(|value| !Self::is_missing_marker(value))
                    .map(str::to_string)
            })
            .collect())
    }

    fn is_missing_marker(value: &str) -> bool {
        MISSING_MARKERS.contains(&value)
    }
}

/// Suffix repeated header names with `.1`, `.2`, ... skipping names already taken
fn unique_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());
    for name in headers.iter() {
        let mut unique = name.to_string();
        let mut suffix = 1;
        while seen.contains(&unique) {
            unique = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        if unique != name {
            warn!(column = %name, renamed = %unique, "Duplicate CSV header renamed");
        }
        seen.insert(unique.clone());
        columns.push(unique);
    }
    columns
}
