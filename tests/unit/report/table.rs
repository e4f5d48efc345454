//! Unit tests for the summary table

use marketpulse::models::state::MarketState;
use marketpulse::report::{render_table, SummaryRow};

#[test]
fn test_empty_table_has_header_only() {
    let table = render_table(&[]);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Asset"));
    assert!(lines[0].contains("MACD"));
    assert!(lines[0].ends_with("State"));
}

#[test]
fn test_columns_are_aligned() {
    let rows = vec![
        SummaryRow {
            name: "Merval".to_string(),
            close: 1_234_567.891,
            rsi: Some(28.04),
            macd_histogram: Some(1520.5),
            state: Some(MarketState::Oversold),
        },
        SummaryRow {
            name: "Dólar".to_string(),
            close: 950.0,
            rsi: Some(50.0),
            macd_histogram: None,
            state: Some(MarketState::Neutral),
        },
    ];
    let table = render_table(&rows);
    let lines: Vec<&str> = table.lines().collect();
    assert!(lines[2].starts_with("Merval"));
    assert!(lines[2].contains("1234567.89"));
    assert!(lines[2].contains("28.0"));
    assert!(lines[2].ends_with("Oversold"));
    assert!(lines[3].contains("n/a"));
    assert!(lines[3].ends_with("Neutral"));
}
