use tracing::info;

use crate::domain::dataset::RecordTable;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::sqlite::SqliteRepository;

/// Writes the cleaned table into the store with drop-and-recreate semantics
pub struct TablePersister<'a> {
    repository: &'a SqliteRepository,
}

impl<'a> TablePersister<'a> {
    pub fn new(repository: &'a SqliteRepository) -> Self {
        Self { repository }
    }

    /// Replace `table_name` with the rows of `table`, then read the row
    /// count back to confirm the write landed.
    pub async fn persist(&self, table_name: &str, table: &RecordTable) -> Result<u64> {
        let inserted = self.repository.replace_table(table_name, table).await?;

        let stored = self.repository.row_count(table_name).await?;
        if stored != table.len() as i64 {
            return Err(AppError::DatabaseError(format!(
                "Table '{}' holds {} rows after write, expected {}",
                table_name,
                stored,
                table.len()
            )));
        }

        info!(
            table = %table_name,
            rows = inserted,
            path = %self.repository.db_path().display(),
            "Persisted cleaned table"
        );
        Ok(inserted)
    }
}
