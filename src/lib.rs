//! Marketpulse: daily RSI/MACD watcher with stateful, transition-only alerts.
//!
//! One run fetches the configured instruments, classifies each one from its
//! latest RSI, notifies on state transitions and persists the per-instrument
//! state for the next run.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;
