// ============================================================
// QUERY RUNNER USE CASE
// ============================================================
// Execute script statements one by one against the store

use std::io::Write;

use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info, warn};

use crate::application::use_cases::sql_script::preview;
use crate::domain::error::Result;
use crate::domain::query_run::{RunReport, StatementOutcome};
use crate::infrastructure::db::sqlite::fetch_query;
use crate::interfaces::console::{render_result, ConsoleReporter};

pub struct QueryRunner {
    preview_chars: usize,
}

impl QueryRunner {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    /// Run every statement in order on `conn`. A failing statement is
    /// reported and recorded; the remaining statements still run.
    /// Only console write failures abort the loop.
    pub async fn run<W: Write>(
        &self,
        conn: &mut SqliteConnection,
        statements: &[String],
        console: &mut ConsoleReporter<W>,
    ) -> Result<RunReport> {
        let mut report = RunReport {
            outcomes: statements
                .iter()
                .enumerate()
                .map(|(idx, sql)| StatementOutcome::pending(idx + 1, sql.clone()))
                .collect(),
        };

        for outcome in &mut report.outcomes {
            console.line(&format!("\n--- Running Query {} ---", outcome.index))?;
            console.line(&format!("SQL: {}...", preview(&outcome.sql, self.preview_chars)))?;

            outcome.start();
            debug!(index = outcome.index, "Executing statement");

            match fetch_query(conn, &outcome.sql).await {
                Ok(result) => {
                    outcome.succeed(result.row_count);
                    console.line(&render_result(&result))?;
                }
                Err(e) => {
                    let description = e.to_string();
                    warn!(index = outcome.index, error = %description, "Statement failed");
                    console.line(&format!("Error running query: {}", description))?;
                    outcome.fail(description);
                }
            }
        }

        info!(
            statements = report.outcomes.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Query script completed"
        );
        Ok(report)
    }
}

impl Default for QueryRunner {
    fn default() -> Self {
        Self::new(100)
    }
}
