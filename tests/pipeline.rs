use std::path::Path;

use shopping_insights_lib::domain::query_run::StatementState;
use shopping_insights_lib::infrastructure::db::sqlite::SqliteRepository;
use shopping_insights_lib::interfaces::console::ConsoleReporter;
use shopping_insights_lib::{run_pipeline, AppError, PipelineConfig};

const SHOPPING_CSV: &str = "\
Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Review Rating,Promo Code Used
1,55,Male,Blouse,Clothing,53,3.0,Yes
2,19,Male,Sweater,Clothing,64,,Yes
3,50,Male,Jeans,Clothing,73,3.5,Yes
4,21,Female,Sandals,Footwear,90,4.0,No
5,45,Female,Boots,Footwear,49,,No
6,46,Female,Sneakers,Footwear,20,4.5,No
7,63,Male,Coat,Outerwear,85,,Yes
8,27,Female,Jacket,Outerwear,34,,No
";

const QUERIES_SQL: &str = "\
-- Revenue by gender
SELECT gender, SUM(purchase_amount) AS revenue
FROM customer
GROUP BY gender
ORDER BY gender;

-- Broken on purpose
SELEC nothing FROM customer;

-- Average rating per category
SELECT category, ROUND(AVG(review_rating::numeric), 2) AS avg_rating
FROM customer
GROUP BY category
ORDER BY category;
";

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input_csv: dir.join("customer_shopping_behavior.csv"),
        query_script: dir.join("customer_behavior_sql_queries.sql"),
        database_path: dir.join("customer_behavior.db"),
        ..PipelineConfig::default()
    }
}

fn write_inputs(config: &PipelineConfig) {
    std::fs::write(&config.input_csv, SHOPPING_CSV).unwrap();
    std::fs::write(&config.query_script, QUERIES_SQL).unwrap();
}

#[tokio::test]
async fn test_full_run_isolates_failing_statement() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_inputs(&config);

    let mut console = ConsoleReporter::new(Vec::new());
    let summary = run_pipeline(&config, &mut console).await.unwrap();

    assert_eq!(summary.rows_loaded, 8);
    assert_eq!(summary.rows_persisted, 8);
    assert_eq!(summary.cleaning.imputed, 2);
    assert!(summary.report.is_completed());

    let states: Vec<StatementState> = summary.report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        vec![
            StatementState::Succeeded,
            StatementState::Failed,
            StatementState::Succeeded
        ]
    );

    let output = String::from_utf8(console.into_inner()).unwrap();
    assert!(output.contains("Step 1: Loading Data..."));
    assert!(output.contains("Loaded 8 rows."));
    assert!(output.contains("Step 2: Data Cleaning..."));
    assert!(output.contains("Step 3: Loading into Database (SQLite)..."));
    assert!(output.contains("Data loaded into 'customer' table in"));
    assert!(output.contains("Step 4: Executing SQL Analysis..."));
    assert!(output.contains("Error running query:"));
    // Clothing ratings 3.0, 3.25 (imputed), 3.5 average to 3.25
    assert!(output.contains("3.25"));
    assert!(output.contains("Project run completed successfully."));
}

#[tokio::test]
async fn test_store_matches_cleaned_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_inputs(&config);

    let mut console = ConsoleReporter::new(Vec::new());
    run_pipeline(&config, &mut console).await.unwrap();

    let repo = SqliteRepository::open(&config.database_path).await.unwrap();
    assert_eq!(repo.row_count("customer").await.unwrap(), 8);
    assert_eq!(
        repo.column_names("customer").await.unwrap(),
        vec![
            "customer_id",
            "age",
            "gender",
            "item_purchased",
            "category",
            "purchase_amount",
            "review_rating",
            "age_group"
        ]
    );
    repo.close().await;
}

#[tokio::test]
async fn test_rerun_replaces_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_inputs(&config);

    for _ in 0..2 {
        let mut console = ConsoleReporter::new(Vec::new());
        run_pipeline(&config, &mut console).await.unwrap();
    }

    let repo = SqliteRepository::open(&config.database_path).await.unwrap();
    assert_eq!(repo.row_count("customer").await.unwrap(), 8);
    repo.close().await;
}

#[tokio::test]
async fn test_missing_csv_halts_before_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut console = ConsoleReporter::new(Vec::new());
    let err = run_pipeline(&config, &mut console).await.unwrap_err();
    assert!(matches!(err, AppError::MissingInput(_)));
    assert!(!config.database_path.exists());

    let output = String::from_utf8(console.into_inner()).unwrap();
    assert!(output.contains("Error: customer_shopping_behavior.csv not found."));
    assert!(!output.contains("Step 2"));
}

#[tokio::test]
async fn test_missing_script_halts_after_persist() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.input_csv, SHOPPING_CSV).unwrap();

    let mut console = ConsoleReporter::new(Vec::new());
    let err = run_pipeline(&config, &mut console).await.unwrap_err();
    assert!(err.is_missing_input());

    let output = String::from_utf8(console.into_inner()).unwrap();
    assert!(output.contains("Error: customer_behavior_sql_queries.sql not found."));
    assert!(!output.contains("Running Query"));
    assert!(!output.contains("completed successfully"));

    let repo = SqliteRepository::open(&config.database_path).await.unwrap();
    assert_eq!(repo.row_count("customer").await.unwrap(), 8);
    repo.close().await;
}
