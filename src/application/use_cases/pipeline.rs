// ============================================================
// PIPELINE USE CASE
// ============================================================
// Load, clean, persist, then run the analysis script

use std::io::Write;
use std::time::Instant;

use tracing::{error, info};

use crate::application::use_cases::data_cleaner::{CleaningSummary, DataCleaner};
use crate::application::use_cases::data_loader::DataLoader;
use crate::application::use_cases::query_runner::QueryRunner;
use crate::application::use_cases::sql_script::{prepare_statements, read_script};
use crate::application::use_cases::table_persister::TablePersister;
use crate::domain::dataset::RecordTable;
use crate::domain::error::Result;
use crate::domain::query_run::RunReport;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::db::sqlite::SqliteRepository;
use crate::interfaces::console::ConsoleReporter;

#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub rows_loaded: usize,
    pub cleaning: CleaningSummary,
    pub rows_persisted: u64,
    pub report: RunReport,
    pub processing_time_ms: u64,
}

/// Run all four steps. Fatal errors (missing inputs, unreadable data,
/// store failures) are written to the console as `Error: ...` and halt
/// the run; statement failures inside the script do not.
pub async fn run_pipeline<W: Write>(
    config: &PipelineConfig,
    console: &mut ConsoleReporter<W>,
) -> Result<PipelineSummary> {
    match run_steps(config, console).await {
        Ok(summary) => Ok(summary),
        Err(e) => {
            error!(error = %e, "Pipeline halted");
            console.error(&e.to_string())?;
            Err(e)
        }
    }
}

async fn run_steps<W: Write>(
    config: &PipelineConfig,
    console: &mut ConsoleReporter<W>,
) -> Result<PipelineSummary> {
    let start = Instant::now();

    console.step(1, "Loading Data")?;
    let mut table = DataLoader::from_config(config)?.load(&config.input_csv)?;
    console.line(&format!("Loaded {} rows.", table.len()))?;

    console.step(2, "Data Cleaning")?;
    let rows_loaded = table.len();
    let cleaning = DataCleaner::new(config.cleaning.clone()).clean(&mut table)?;

    console.step(3, "Loading into Database (SQLite)")?;
    let repository = SqliteRepository::open(&config.database_path).await?;

    // The store is closed on every path out of the remaining steps
    let outcome = persist_and_query(config, &repository, &table, console).await;
    repository.close().await;
    let (rows_persisted, report) = outcome?;

    console.line("\nProject run completed successfully.")?;

    let summary = PipelineSummary {
        rows_loaded,
        cleaning,
        rows_persisted,
        report,
        processing_time_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        rows = summary.rows_loaded,
        statements = summary.report.outcomes.len(),
        failed = summary.report.failed(),
        elapsed_ms = summary.processing_time_ms,
        "Pipeline finished"
    );
    Ok(summary)
}

async fn persist_and_query<W: Write>(
    config: &PipelineConfig,
    repository: &SqliteRepository,
    table: &RecordTable,
    console: &mut ConsoleReporter<W>,
) -> Result<(u64, RunReport)> {
    let rows_persisted = TablePersister::new(repository)
        .persist(&config.table_name, table)
        .await?;
    console.line(&format!(
        "Data loaded into '{}' table in {}",
        config.table_name,
        config.database_path.display()
    ))?;

    console.step(4, "Executing SQL Analysis")?;
    let script = read_script(&config.query_script)?;
    let statements = prepare_statements(&script, &config.script);
    info!(statements = statements.len(), "Prepared query script");

    let mut conn = repository.acquire().await?;
    let report = QueryRunner::new(config.script.preview_chars)
        .run(&mut conn, &statements, console)
        .await?;

    Ok((rows_persisted, report))
}
