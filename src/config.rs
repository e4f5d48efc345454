//! Environment-driven configuration.
//!
//! Everything is read once at startup into an immutable [`AppConfig`] that is
//! handed to the runtime. Tests build configs through [`AppConfig::from_lookup`]
//! instead of touching the process environment.

use crate::indicators::momentum::{RsiSmoothing, DEFAULT_RSI_PERIOD};
use crate::models::instrument::Instrument;
use crate::signals::classifier::RsiThresholds;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_INSTRUMENTS: &str = "^MERV:Merval,GC=F:Oro,GGAL.BA:Grupo Galicia,\
PAMP.BA:Pampa Energía,YPFD.BA:YPF,RIO:Rio Tinto,USDARS=X:Dólar";
pub const DEFAULT_CHART_SYMBOLS: &str = "GC=F,RIO,^MERV";
pub const DEFAULT_PRICE_API_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Messaging destination credentials.
#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_url: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// RSI chart artifact settings.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub enabled: bool,
    pub symbols: Vec<String>,
    pub path: PathBuf,
    pub caption: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    /// `None` runs in dry-run mode: notifications are logged, not sent.
    pub telegram: Option<TelegramConfig>,
    pub instruments: Vec<Instrument>,
    pub chart: ChartConfig,

    pub rsi_period: usize,
    pub thresholds: RsiThresholds,
    pub smoothing: RsiSmoothing,
    pub notify_on_return_to_neutral: bool,
    /// When delivery fails, still advance the stored state (no retry next run).
    pub update_state_on_delivery_failure: bool,

    pub lookback_days: i64,
    pub request_timeout: Duration,
    pub fetch_max_retries: usize,
    pub fetch_retry_delay: Duration,
    pub price_api_url: String,

    pub state_file: PathBuf,
    /// 1 evaluates instruments one by one; larger values bound the parallel pool.
    pub worker_concurrency: usize,

    /// Cron expression (with seconds) for the scheduled worker.
    pub run_schedule: Option<String>,
    pub eval_interval_seconds: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "sandbox".to_string());

        let telegram = match (get("TELEGRAM_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig {
                token,
                chat_id,
                api_url: get("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            }),
            _ => None,
        };

        let instruments = parse_instruments(
            &get("INSTRUMENTS").unwrap_or_else(|| DEFAULT_INSTRUMENTS.to_string()),
        )?;

        let chart_symbols: Vec<String> = get("CHART_SYMBOLS")
            .unwrap_or_else(|| DEFAULT_CHART_SYMBOLS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let caption = get("CHART_CAPTION").unwrap_or_else(|| default_caption(&instruments, &chart_symbols));
        let chart = ChartConfig {
            enabled: parse_bool(get("CHART_ENABLED"), "CHART_ENABLED", true)?,
            symbols: chart_symbols,
            path: PathBuf::from(get("CHART_PATH").unwrap_or_else(|| "rsi_diario.svg".to_string())),
            caption,
        };

        let rsi_period: usize = parse_var(get("RSI_PERIOD"), "RSI_PERIOD", DEFAULT_RSI_PERIOD)?;
        if rsi_period == 0 {
            return Err(ConfigError::invalid("RSI_PERIOD", "must be at least 1"));
        }
        let defaults = RsiThresholds::default();
        let overbought: f64 = parse_var(get("RSI_OVERBOUGHT"), "RSI_OVERBOUGHT", defaults.overbought)?;
        let oversold: f64 = parse_var(get("RSI_OVERSOLD"), "RSI_OVERSOLD", defaults.oversold)?;
        let thresholds = RsiThresholds::new(overbought, oversold)
            .map_err(|e| ConfigError::invalid("RSI_OVERSOLD", e))?;

        let smoothing = match get("RSI_SMOOTHING") {
            Some(raw) => RsiSmoothing::from_str(&raw).map_err(|e| ConfigError::invalid("RSI_SMOOTHING", e))?,
            None => RsiSmoothing::default(),
        };

        let lookback_days: i64 = parse_var(get("LOOKBACK_DAYS"), "LOOKBACK_DAYS", 365)?;
        if lookback_days <= 0 {
            return Err(ConfigError::invalid("LOOKBACK_DAYS", "must be positive"));
        }
        let timeout_secs: u64 = parse_var(get("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::invalid("REQUEST_TIMEOUT_SECONDS", "must be positive"));
        }
        let retry_delay_ms: u64 = parse_var(get("FETCH_RETRY_DELAY_MS"), "FETCH_RETRY_DELAY_MS", 500)?;
        let worker_concurrency: usize = parse_var(get("WORKER_CONCURRENCY"), "WORKER_CONCURRENCY", 1)?;

        let eval_interval_seconds = match get("EVAL_INTERVAL_SECONDS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                ConfigError::invalid("EVAL_INTERVAL_SECONDS", e.to_string())
            })?),
            None => None,
        };

        Ok(Self {
            environment,
            telegram,
            instruments,
            chart,
            rsi_period,
            thresholds,
            smoothing,
            notify_on_return_to_neutral: parse_bool(
                get("NOTIFY_ON_RETURN_TO_NEUTRAL"),
                "NOTIFY_ON_RETURN_TO_NEUTRAL",
                true,
            )?,
            update_state_on_delivery_failure: parse_bool(
                get("UPDATE_STATE_ON_DELIVERY_FAILURE"),
                "UPDATE_STATE_ON_DELIVERY_FAILURE",
                true,
            )?,
            lookback_days,
            request_timeout: Duration::from_secs(timeout_secs),
            fetch_max_retries: parse_var(get("FETCH_MAX_RETRIES"), "FETCH_MAX_RETRIES", 2)?,
            fetch_retry_delay: Duration::from_millis(retry_delay_ms),
            price_api_url: get("PRICE_API_URL").unwrap_or_else(|| DEFAULT_PRICE_API_URL.to_string()),
            state_file: PathBuf::from(get("STATE_FILE").unwrap_or_else(|| "rsi_state.json".to_string())),
            worker_concurrency: worker_concurrency.max(1),
            run_schedule: get("RUN_SCHEDULE"),
            eval_interval_seconds,
        })
    }

    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }
}

/// Deployment environment straight from the process, for logging set up
/// before (or without) a valid [`AppConfig`].
pub fn get_environment() -> String {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn is_production_environment(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Parse `SYMBOL:Display Name` pairs separated by commas. Symbols may contain
/// `=` (e.g. `GC=F`), so the name separator is the first `:`.
pub fn parse_instruments(raw: &str) -> Result<Vec<Instrument>, ConfigError> {
    let mut seen = HashSet::new();
    let mut instruments = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (symbol, name) = match entry.split_once(':') {
            Some((symbol, name)) => (symbol.trim(), name.trim()),
            None => (entry, entry),
        };
        if symbol.is_empty() {
            return Err(ConfigError::invalid("INSTRUMENTS", format!("empty symbol in '{}'", entry)));
        }
        if !seen.insert(symbol.to_string()) {
            return Err(ConfigError::invalid("INSTRUMENTS", format!("duplicate symbol '{}'", symbol)));
        }
        let name = if name.is_empty() { symbol } else { name };
        instruments.push(Instrument::new(symbol, name));
    }
    if instruments.is_empty() {
        return Err(ConfigError::invalid("INSTRUMENTS", "no instruments configured"));
    }
    Ok(instruments)
}

fn default_caption(instruments: &[Instrument], chart_symbols: &[String]) -> String {
    let names: Vec<&str> = chart_symbols
        .iter()
        .map(|symbol| {
            instruments
                .iter()
                .find(|i| &i.symbol == symbol)
                .map(|i| i.name.as_str())
                .unwrap_or(symbol.as_str())
        })
        .collect();
    format!("📈 Daily RSI: {}", names.join(", "))
}

fn parse_var<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(key, format!("'{}': {}", value, e))),
        None => Ok(default),
    }
}

fn parse_bool(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::invalid(key, format!("'{}' is not a boolean", other))),
    }
}
