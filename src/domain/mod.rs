pub mod dataset;
pub mod error;
pub mod query_run;
pub mod script_options;
