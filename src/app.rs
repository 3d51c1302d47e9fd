use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::application::run_pipeline;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::console::ConsoleReporter;

pub fn run() -> ExitCode {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut console = ConsoleReporter::new(std::io::stdout().lock());

    let config = match ConfigService::new().load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            let _ = console.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    // Steps run strictly in sequence
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_pipeline(&config, &mut console)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
