use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::dataset::CleaningConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::script_options::ScriptOptions;

/// Optional config file read from the working directory
pub const CONFIG_FILE: &str = "shopping_insights.toml";

/// Prefix for environment overrides, nested keys split on `__`
pub const ENV_PREFIX: &str = "SHOPPING_";

/// Everything one pipeline run needs to know. The defaults are the fixed
/// file names the job has always used, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_csv: PathBuf,
    pub query_script: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    /// CSV field delimiter, a single ASCII character
    pub delimiter: char,
    /// Trim whitespace around CSV values
    pub trim_values: bool,
    pub cleaning: CleaningConfig,
    pub script: ScriptOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("customer_shopping_behavior.csv"),
            query_script: PathBuf::from("customer_behavior_sql_queries.sql"),
            database_path: PathBuf::from("customer_behavior.db"),
            table_name: "customer".to_string(),
            delimiter: ',',
            trim_values: true,
            cleaning: CleaningConfig::default(),
            script: ScriptOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("input_csv", &self.input_csv),
            ("query_script", &self.query_script),
            ("database_path", &self.database_path),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(AppError::ConfigError(format!("{} must not be empty", key)));
            }
        }
        if self.table_name.trim().is_empty() {
            return Err(AppError::ConfigError("table_name must not be empty".to_string()));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '\n' | '\r' | '"') {
            return Err(AppError::ConfigError(format!(
                "delimiter {:?} must be one ASCII character other than a quote or newline",
                self.delimiter
            )));
        }

        self.cleaning
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid cleaning config: {}", e)))?;
        self.script
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid script config: {}", e)))?;
        Ok(())
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then `shopping_insights.toml`, then `SHOPPING_*` variables
    pub fn new() -> Self {
        Self::from_figment(
            Figment::from(Serialized::defaults(PipelineConfig::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load(&self) -> Result<PipelineConfig> {
        let config: PipelineConfig = self.figment.extract()?;
        config.validate()?;
        debug!(
            input_csv = %config.input_csv.display(),
            query_script = %config.query_script.display(),
            database_path = %config.database_path.display(),
            table = %config.table_name,
            "Loaded pipeline config"
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
