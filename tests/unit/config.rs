//! Unit tests for environment configuration

use marketpulse::config::{is_production_environment, parse_instruments, AppConfig, ConfigError};
use marketpulse::indicators::momentum::RsiSmoothing;
use std::collections::HashMap;
use std::time::Duration;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.instruments.len(), 7);
    assert_eq!(config.instruments[1].symbol, "GC=F");
    assert_eq!(config.instruments[1].name, "Oro");
    assert!(config.telegram.is_none());
    assert_eq!(config.rsi_period, 14);
    assert_eq!(config.thresholds.overbought, 70.0);
    assert_eq!(config.thresholds.oversold, 30.0);
    assert_eq!(config.smoothing, RsiSmoothing::Exponential);
    assert!(config.notify_on_return_to_neutral);
    assert!(config.update_state_on_delivery_failure);
    assert_eq!(config.lookback_days, 365);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.worker_concurrency, 1);
    assert_eq!(config.state_file.to_str(), Some("rsi_state.json"));
    assert_eq!(config.chart.symbols, vec!["GC=F", "RIO", "^MERV"]);
    assert!(config.chart.caption.contains("Oro"));
    assert!(!config.is_production());
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("TELEGRAM_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "-100"),
        ("INSTRUMENTS", "AAPL:Apple, MSFT"),
        ("RSI_PERIOD", "10"),
        ("RSI_OVERBOUGHT", "80"),
        ("RSI_OVERSOLD", "20"),
        ("RSI_SMOOTHING", "simple"),
        ("NOTIFY_ON_RETURN_TO_NEUTRAL", "false"),
        ("UPDATE_STATE_ON_DELIVERY_FAILURE", "0"),
        ("WORKER_CONCURRENCY", "4"),
        ("ENVIRONMENT", "production"),
    ])
    .unwrap();
    let telegram = config.telegram.as_ref().unwrap();
    assert_eq!(telegram.chat_id, "-100");
    assert!(!format!("{:?}", telegram).contains("abc"));
    assert_eq!(config.instruments[1].name, "MSFT");
    assert_eq!(config.rsi_period, 10);
    assert_eq!(config.thresholds.overbought, 80.0);
    assert_eq!(config.smoothing, RsiSmoothing::Simple);
    assert!(!config.notify_on_return_to_neutral);
    assert!(!config.update_state_on_delivery_failure);
    assert_eq!(config.worker_concurrency, 4);
    assert!(config.is_production());
}

#[test]
fn test_zero_concurrency_is_clamped() {
    let config = config_from(&[("WORKER_CONCURRENCY", "0")]).unwrap();
    assert_eq!(config.worker_concurrency, 1);
}

#[test]
fn test_invalid_values_rejected() {
    assert!(config_from(&[("RSI_PERIOD", "abc")]).is_err());
    assert!(config_from(&[("RSI_PERIOD", "0")]).is_err());
    assert!(config_from(&[("RSI_OVERSOLD", "75")]).is_err());
    assert!(config_from(&[("RSI_SMOOTHING", "median")]).is_err());
    assert!(config_from(&[("NOTIFY_ON_RETURN_TO_NEUTRAL", "maybe")]).is_err());
}

#[test]
fn test_parse_instruments_keeps_symbols_with_special_chars() {
    let instruments = parse_instruments("GC=F:Oro,^MERV:Merval,USDARS=X:Dólar").unwrap();
    let symbols: Vec<&str> = instruments.iter().map(|i| i.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["GC=F", "^MERV", "USDARS=X"]);
    assert_eq!(instruments[2].name, "Dólar");
}

#[test]
fn test_parse_instruments_rejects_duplicates_and_empty() {
    assert!(parse_instruments("RIO:Rio,RIO:Rio Tinto").is_err());
    assert!(parse_instruments(" , ").is_err());
}

#[test]
fn test_production_aliases() {
    assert!(is_production_environment("production"));
    assert!(is_production_environment("prod"));
    assert!(!is_production_environment("sandbox"));
    assert!(!is_production_environment("Production"));
}
