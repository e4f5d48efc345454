//! Cron-based scheduler for recurring alert runs

use crate::core::runtime::AlertRuntime;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler disabled: interval_seconds is 0")]
    Disabled,
    #[error("invalid cron expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },
}

/// Convert a fixed interval into a six-field cron expression.
///
/// The interval must be a whole number of seconds, minutes or hours that
/// divides the next larger unit, up to one day. Anything else cannot be
/// written as a cron step and is rejected.
pub fn cron_expression_for_interval(interval_seconds: u64) -> Result<String, SchedulerError> {
    let expression = match interval_seconds {
        0 => return Err(SchedulerError::Disabled),
        86_400 => Some("0 0 0 * * *".to_string()),
        s if s % 3600 == 0 && 24 % (s / 3600) == 0 => Some(format!("0 0 */{} * * *", s / 3600)),
        s if s % 60 == 0 && s < 3600 && 60 % (s / 60) == 0 => Some(format!("0 */{} * * * *", s / 60)),
        s if s < 60 && 60 % s == 0 => Some(format!("*/{} * * * * *", s)),
        _ => None,
    };

    expression.ok_or_else(|| SchedulerError::InvalidExpression {
        expression: format!("every {}s", interval_seconds),
        message: "interval must divide a minute, an hour or a day".to_string(),
    })
}

/// Runs [`AlertRuntime::run_once`] on every cron tick.
///
/// Ticks never overlap: the next one is computed after the previous run
/// returns, so a slow run just delays the following one.
pub struct RunScheduler {
    runtime: Arc<AlertRuntime>,
    schedule: Schedule,
    expression: String,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
    shutdown: watch::Sender<bool>,
}

impl RunScheduler {
    pub fn new(runtime: Arc<AlertRuntime>, expression: &str) -> Result<Self, SchedulerError> {
        let schedule = Schedule::from_str(expression).map_err(|e| SchedulerError::InvalidExpression {
            expression: expression.to_string(),
            message: e.to_string(),
        })?;

        info!(cron = %expression, "RunScheduler: created with cron '{}'", expression);
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            runtime,
            schedule,
            expression: expression.to_string(),
            handle: Arc::new(RwLock::new(None)),
            shutdown,
        })
    }

    pub fn with_interval(runtime: Arc<AlertRuntime>, interval_seconds: u64) -> Result<Self, SchedulerError> {
        let expression = cron_expression_for_interval(interval_seconds)?;
        Self::new(runtime, &expression)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();
        self.shutdown.send_replace(false);
        let mut shutdown = self.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            info!("RunScheduler: started, waiting for cron schedule...");

            loop {
                let wait = match schedule.upcoming(chrono::Utc).next() {
                    Some(next_tick) => (next_tick - chrono::Utc::now()).to_std().unwrap_or_default(),
                    None => tokio::time::Duration::from_secs(60),
                };

                // only the wait is raced against shutdown; a started run always reaches its save
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = shutdown.changed() => break,
                }
                if *shutdown.borrow() {
                    break;
                }

                info!("RunScheduler: cron tick, starting alert run");
                if let Err(e) = runtime.run_once().await {
                    error!(error = %e, "RunScheduler: alert run failed");
                }
            }

            info!("RunScheduler: loop exited");
        });

        *self.handle.write().await = Some(handle);
        info!("RunScheduler: started successfully");
    }

    /// Signal shutdown and wait for the loop to exit.
    ///
    /// A run in progress is allowed to finish, so its state record is saved
    /// before this returns.
    pub async fn stop(&self) {
        let handle = self.handle.write().await.take();
        if let Some(h) = handle {
            self.shutdown.send_replace(true);
            if let Err(e) = h.await {
                warn!(error = %e, "RunScheduler: loop task ended abnormally");
            }
            info!("RunScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
