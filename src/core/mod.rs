//! Core application primitives (runtime, scheduler)

pub mod runtime;
pub mod scheduler;

pub use runtime::{AlertRuntime, RunSummary};
pub use scheduler::{cron_expression_for_interval, RunScheduler, SchedulerError};
