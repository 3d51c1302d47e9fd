// ============================================================
// DATA CLEANER USE CASE
// ============================================================
// Imputation, column normalization, age binning, column removal

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::domain::dataset::{median, Cell, CleaningConfig, QuantileBins, RecordTable};
use crate::domain::error::{AppError, Result};

/// What a cleaning pass changed
#[derive(Debug, Clone, Default)]
pub struct CleaningSummary {
    /// Ratings filled with their group median
    pub imputed: usize,

    /// Edges of the age bins, empty when no age was present
    pub age_edges: Vec<f64>,

    /// Whether the configured column was dropped
    pub dropped_column: bool,
}

pub struct DataCleaner {
    config: CleaningConfig,
}

impl DataCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Run every step in order. Imputation works on source column names;
    /// the steps after normalization use the normalized names.
    pub fn clean(&self, table: &mut RecordTable) -> Result<CleaningSummary> {
        let imputed = self.impute_group_median(table)?;
        self.normalize_columns(table);
        let bins = self.add_age_group(table)?;
        let dropped_column = self.drop_configured_column(table);

        let summary = CleaningSummary {
            imputed,
            age_edges: bins.map(|b| b.edges).unwrap_or_default(),
            dropped_column,
        };
        info!(
            imputed = summary.imputed,
            dropped_column = summary.dropped_column,
            columns = table.columns.len(),
            "Cleaned dataset"
        );
        Ok(summary)
    }

    /// Fill missing ratings with the median rating of the row's group.
    /// Groups without any rating stay missing, as do rows without a group.
    pub fn impute_group_median(&self, table: &mut RecordTable) -> Result<usize> {
        let Some(rating_idx) = table.column_index(&self.config.rating_column) else {
            debug!(column = %self.config.rating_column, "Rating column absent, skipping imputation");
            return Ok(0);
        };
        let group_idx = table.column_index(&self.config.group_column).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Group column '{}' not found for imputing '{}'",
                self.config.group_column, self.config.rating_column
            ))
        })?;

        let mut ratings_by_group: HashMap<String, Vec<f64>> = HashMap::new();
        for row in &table.rows {
            if let (Some(key), Some(rating)) = (row[group_idx].group_key(), row[rating_idx].as_f64())
            {
                ratings_by_group.entry(key).or_default().push(rating);
            }
        }

        let medians: BTreeMap<String, f64> = ratings_by_group
            .into_iter()
            .filter_map(|(key, values)| median(&values).map(|m| (key, m)))
            .collect();

        let mut imputed = 0;
        for row in &mut table.rows {
            if !row[rating_idx].is_missing() {
                continue;
            }
            let Some(key) = row[group_idx].group_key() else {
                continue;
            };
            if let Some(m) = medians.get(&key) {
                row[rating_idx] = Cell::Real(*m);
                imputed += 1;
            }
        }

        debug!(groups = medians.len(), imputed, "Imputed group medians");
        Ok(imputed)
    }

    /// Lower-case names, spaces to underscores, then apply renames
    pub fn normalize_columns(&self, table: &mut RecordTable) {
        table.rename_columns(|name| normalize_column_name(name, &self.config.renames));
    }

    /// Bin ages into the configured labels by quantile edges of this table
    pub fn add_age_group(&self, table: &mut RecordTable) -> Result<Option<QuantileBins>> {
        let age_idx = table.column_index(&self.config.age_column).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Age column '{}' not found",
                self.config.age_column
            ))
        })?;

        if let Some(row) = table
            .column_cells(age_idx)
            .position(|cell| !cell.is_missing() && cell.as_f64().is_none())
        {
            return Err(AppError::ValidationError(format!(
                "Age column '{}' holds a non-numeric value in row {}",
                self.config.age_column,
                row + 1
            )));
        }

        let ages: Vec<f64> = table.column_cells(age_idx).filter_map(Cell::as_f64).collect();
        let bins = QuantileBins::from_values(&ages, &self.config.age_group_labels);

        let cells: Vec<Cell> = table
            .column_cells(age_idx)
            .map(|cell| {
                cell.as_f64()
                    .and_then(|age| bins.as_ref().and_then(|b| b.label_for(age)))
                    .map(|label| Cell::Text(label.to_string()))
                    .unwrap_or(Cell::Missing)
            })
            .collect();

        if let Some(bins) = &bins {
            debug!(edges = %bins.summary(), "Computed age group edges");
        }

        table.set_column(&self.config.age_group_column, cells);
        Ok(bins)
    }

    /// Drop the configured column; absent is fine
    pub fn drop_configured_column(&self, table: &mut RecordTable) -> bool {
        table.drop_column(&self.config.drop_column)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

pub fn normalize_column_name(name: &str, renames: &BTreeMap<String, String>) -> String {
    let normalized = name.to_lowercase().replace(' ', "_");
    renames.get(&normalized).cloned().unwrap_or(normalized)
}
