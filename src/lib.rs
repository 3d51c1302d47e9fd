mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{run_pipeline, PipelineSummary};
pub use domain::error::{AppError, Result};
pub use infrastructure::config::{ConfigService, PipelineConfig};
