pub mod data_cleaner;
pub mod data_loader;
pub mod pipeline;
pub mod query_runner;
pub mod sql_script;
pub mod table_persister;
