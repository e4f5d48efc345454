//! Marketpulse worker
//!
//! Long-running process that repeats the alert run on a cron schedule
//! (`RUN_SCHEDULE`, or `EVAL_INTERVAL_SECONDS` converted to cron). Ctrl-C lets
//! a run in progress finish and save its state before exiting.
//!
//! With `CHART_ENABLED`, the RSI chart is rendered as SVG and posted with
//! `sendDocument`, so Telegram shows it as a file without an inline preview.

use dotenvy::dotenv;
use marketpulse::config::AppConfig;
use marketpulse::core::runtime::AlertRuntime;
use marketpulse::core::scheduler::RunScheduler;
use marketpulse::logging;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let config = AppConfig::from_env()?;
    logging::init_logging(&config.environment);

    info!("Starting Marketpulse Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        concurrency = config.worker_concurrency,
        "Worker concurrency: {}", config.worker_concurrency
    );

    let run_schedule = config.run_schedule.clone();
    let eval_interval = config.eval_interval_seconds;
    let runtime = Arc::new(AlertRuntime::from_config(config)?);

    let scheduler = match (run_schedule, eval_interval) {
        (Some(expression), _) => RunScheduler::new(runtime, &expression)?,
        (None, Some(interval)) => RunScheduler::with_interval(runtime, interval)?,
        (None, None) => return Err("RUN_SCHEDULE or EVAL_INTERVAL_SECONDS must be set for worker".into()),
    };
    info!(cron = %scheduler.expression(), "Alert runs scheduled");
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
