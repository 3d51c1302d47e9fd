// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// Core types and value objects for the shopping dataset
// No I/O, no async

mod cleaning_config;
mod column_kind;
mod column_stats;
mod record_table;

pub use cleaning_config::CleaningConfig;
pub use column_kind::ColumnKind;
pub use column_stats::{median, quantile_sorted, QuantileBins};
pub use record_table::{Cell, RecordTable};
