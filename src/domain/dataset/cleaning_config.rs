// ============================================================
// CLEANING CONFIGURATION
// ============================================================
// Column names and labels used by the cleaning steps

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for dataset cleaning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Rating column to impute, as named in the source file (default: "Review Rating")
    pub rating_column: String,

    /// Column whose values define the imputation groups, source name (default: "Category")
    pub group_column: String,

    /// Age column, normalized name (default: "age")
    pub age_column: String,

    /// Name of the derived age bin column (default: "age_group")
    pub age_group_column: String,

    /// Bin labels from youngest to oldest; one quantile cut per label
    pub age_group_labels: Vec<String>,

    /// Column dropped after normalization when present (default: "promo_code_used")
    pub drop_column: String,

    /// Renames applied after lower-casing and underscoring
    pub renames: BTreeMap<String, String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let mut renames = BTreeMap::new();
        renames.insert(
            "purchase_amount_(usd)".to_string(),
            "purchase_amount".to_string(),
        );

        Self {
            rating_column: "Review Rating".to_string(),
            group_column: "Category".to_string(),
            age_column: "age".to_string(),
            age_group_column: "age_group".to_string(),
            age_group_labels: vec![
                "Young Adult".to_string(),
                "Adult".to_string(),
                "Middle-aged".to_string(),
                "Senior".to_string(),
            ],
            drop_column: "promo_code_used".to_string(),
            renames,
        }
    }
}

impl CleaningConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.age_column.trim().is_empty() {
            return Err("age_column must not be empty".to_string());
        }
        if self.age_group_column.trim().is_empty() {
            return Err("age_group_column must not be empty".to_string());
        }
        if self.age_group_labels.len() != 4 {
            return Err(format!(
                "age_group_labels must contain exactly 4 labels, got {}",
                self.age_group_labels.len()
            ));
        }
        if self.rating_column.trim().is_empty() != self.group_column.trim().is_empty() {
            return Err("rating_column and group_column must be set together".to_string());
        }
        Ok(())
    }
}
