//! Marketpulse runner
//!
//! Performs a single alert run and exits. Meant for an external scheduler
//! (cron, CI job). Exits non-zero on bad configuration or when the state
//! record could not be saved.

use dotenvy::dotenv;
use marketpulse::config::{get_environment, AppConfig};
use marketpulse::core::runtime::AlertRuntime;
use marketpulse::logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let config = AppConfig::from_env();
    let environment = match &config {
        Ok(config) => config.environment.clone(),
        Err(_) => get_environment(),
    };
    logging::init_logging(&environment);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };

    info!(
        environment = %config.environment,
        instruments = config.instruments.len(),
        state_file = %config.state_file.display(),
        dry_run = config.telegram.is_none(),
        "Starting Marketpulse run"
    );

    let runtime = match AlertRuntime::from_config(config) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to initialize runtime");
            return ExitCode::from(2);
        }
    };

    match runtime.run_once().await {
        Ok(summary) => {
            info!(
                notifications = summary.notifications_sent(),
                delivery_failures = summary.delivery_failures(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
