pub mod use_cases;

pub use use_cases::data_cleaner::DataCleaner;
pub use use_cases::data_loader::DataLoader;
pub use use_cases::pipeline::{run_pipeline, PipelineSummary};
pub use use_cases::query_runner::QueryRunner;
pub use use_cases::table_persister::TablePersister;
