use crate::domain::dataset::{Cell, RecordTable};
use crate::domain::error::{AppError, Result};
use crate::domain::query_run::QueryResult;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Executor, Pool, Row, Sqlite, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
    db_path: PathBuf,
}

impl SqliteRepository {
    /// Open the database file, creating it when missing. The pool holds a
    /// single connection; the job never needs more.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to open {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        debug!(path = %db_path.display(), "Opened SQLite database");

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Drop `table_name` if it exists and recreate it from `table`, in one
    /// transaction. Safe to call repeatedly.
    pub async fn replace_table(&self, table_name: &str, table: &RecordTable) -> Result<u64> {
        let quoted_table = quote_ident(table_name);
        let column_defs = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{} {}", quote_ident(name), table.column_kind(idx).sql_type()))
            .collect::<Vec<_>>()
            .join(", ");

        let create_stmt = format!("CREATE TABLE {} ({})", quoted_table, column_defs);
        let insert_stmt = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted_table,
            table
                .columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            vec!["?"; table.columns.len()].join(", ")
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quoted_table))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to drop {}: {}", table_name, e)))?;

        sqlx::query(&create_stmt)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create {}: {}", table_name, e))
            })?;

        let mut affected: u64 = 0;
        for row in &table.rows {
            let mut query = sqlx::query(&insert_stmt);
            for cell in row {
                query = match cell {
                    Cell::Missing => query.bind(Option::<String>::None),
                    Cell::Integer(v) => query.bind(*v),
                    Cell::Real(v) if v.is_nan() => query.bind(Option::<f64>::None),
                    Cell::Real(v) => query.bind(*v),
                    Cell::Text(v) => query.bind(v.as_str()),
                };
            }
            let res = query.execute(&mut *tx).await.map_err(|e| {
                AppError::DatabaseError(format!("Failed to insert into {}: {}", table_name, e))
            })?;
            affected += res.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        info!(table = %table_name, rows = affected, "Replaced table");
        Ok(affected)
    }

    pub async fn row_count(&self, table_name: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table_name));
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count {}: {}", table_name, e)))
    }

    /// Column names of a table in declaration order
    pub async fn column_names(&self, table_name: &str) -> Result<Vec<String>> {
        let pragma_query = format!("PRAGMA table_info({})", quote_ident(table_name));
        let rows = sqlx::query(&pragma_query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to inspect {} schema: {}", table_name, e))
            })?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("name").map_err(|e| {
                    AppError::DatabaseError(format!("Failed to read {} schema: {}", table_name, e))
                })
            })
            .collect()
    }

    /// Check out the pool's connection. It goes back when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to acquire connection: {}", e)))
    }

    pub async fn close(&self) {
        debug!(path = %self.db_path.display(), "Closing SQLite database");
        self.pool.close().await;
    }
}

/// Run one statement and collect every row it returns
pub async fn fetch_query(conn: &mut SqliteConnection, sql: &str) -> Result<QueryResult> {
    let rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let columns: Vec<String> = match rows.first() {
        Some(first) => first
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        // No rows to read names from; ask the prepared statement instead
        None => match (&mut *conn).describe(sql).await {
            Ok(described) => described
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            Err(_) => Vec::new(),
        },
    };

    let values: Vec<Vec<serde_json::Value>> = rows
        .iter()
        .map(|row| {
            (0..row.columns().len())
                .map(|idx| extract_column_value(row, idx))
                .collect()
        })
        .collect();

    Ok(QueryResult {
        columns,
        row_count: values.len(),
        rows: values,
    })
}

/// Decode a value by its SQLite storage class
fn extract_column_value(row: &SqliteRow, index: usize) -> serde_json::Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return serde_json::Value::Null,
        Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
        Err(_) => return serde_json::Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" | "INT" | "BIGINT" | "INT8" => {
            if let Ok(v) = row.try_get::<i64, _>(index) {
                return serde_json::Value::Number(v.into());
            }
        }
        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
            if let Ok(v) = row.try_get::<f64, _>(index) {
                return serde_json::Number::from_f64(v)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null);
            }
        }
        "BOOLEAN" => {
            if let Ok(v) = row.try_get::<bool, _>(index) {
                return serde_json::Value::Bool(v);
            }
        }
        "BLOB" => {
            if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
                return serde_json::Value::String(format!("<{} bytes>", v.len()));
            }
        }
        _ => {}
    }

    if let Ok(v) = row.try_get::<String, _>(index) {
        return serde_json::Value::String(v);
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return serde_json::Value::Number(v.into());
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }

    serde_json::Value::Null
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RecordTable {
        let mut table = RecordTable::new(vec![
            "customer_id".to_string(),
            "purchase_amount".to_string(),
            "review_rating".to_string(),
            "age_group".to_string(),
        ]);
        table.push_row(vec![
            Cell::Integer(1),
            Cell::Integer(53),
            Cell::Real(3.1),
            Cell::Text("Senior".into()),
        ]);
        table.push_row(vec![
            Cell::Integer(2),
            Cell::Integer(64),
            Cell::Missing,
            Cell::Text("Young Adult".into()),
        ]);
        table
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("customer"), "\"customer\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[tokio::test]
    async fn test_replace_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(&dir.path().join("store.db")).await.unwrap();

        let table = sample_table();
        assert_eq!(repo.replace_table("customer", &table).await.unwrap(), 2);

        assert_eq!(repo.row_count("customer").await.unwrap(), 2);
        assert_eq!(repo.column_names("customer").await.unwrap(), table.columns);
        repo.close().await;
    }

    #[tokio::test]
    async fn test_replace_table_twice_keeps_one_copy() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(&dir.path().join("store.db")).await.unwrap();

        let table = sample_table();
        repo.replace_table("customer", &table).await.unwrap();
        repo.replace_table("customer", &table).await.unwrap();

        assert_eq!(repo.row_count("customer").await.unwrap(), 2);
        repo.close().await;
    }

    #[tokio::test]
    async fn test_fetch_query_decodes_storage_classes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(&dir.path().join("store.db")).await.unwrap();
        repo.replace_table("customer", &sample_table()).await.unwrap();

        let mut conn = repo.acquire().await.unwrap();
        let result = fetch_query(
            &mut conn,
            "SELECT customer_id, review_rating, age_group FROM customer ORDER BY customer_id",
        )
        .await
        .unwrap();

        assert_eq!(result.columns, vec!["customer_id", "review_rating", "age_group"]);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.rows[0][0], serde_json::json!(1));
        assert_eq!(result.rows[0][1], serde_json::json!(3.1));
        assert_eq!(result.rows[1][1], serde_json::Value::Null);
        assert_eq!(result.rows[1][2], serde_json::json!("Young Adult"));
    }

    #[tokio::test]
    async fn test_fetch_query_empty_result_keeps_columns() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(&dir.path().join("store.db")).await.unwrap();
        repo.replace_table("customer", &sample_table()).await.unwrap();

        let mut conn = repo.acquire().await.unwrap();
        let result = fetch_query(&mut conn, "SELECT age_group FROM customer WHERE 1 = 0")
            .await
            .unwrap();

        assert_eq!(result.row_count, 0);
        assert_eq!(result.columns, vec!["age_group"]);
    }
}
