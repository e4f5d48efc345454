//! Fixed-width run summary table

use crate::models::state::MarketState;

const SEPARATOR_WIDTH: usize = 60;

/// One line of the summary: latest readings for an evaluated instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub state: Option<MarketState>,
}

pub fn render_table(rows: &[SummaryRow]) -> String {
    let mut out = format!(
        "{:<15}{:>10}{:>7}{:>10}   {}\n",
        "Asset", "Price", "RSI", "MACD", "State"
    );
    out.push_str(&"-".repeat(SEPARATOR_WIDTH));
    out.push('\n');

    for row in rows {
        let rsi = row.rsi.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "n/a".to_string());
        let macd = row
            .macd_histogram
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string());
        let state = row.state.map(|s| s.label()).unwrap_or("n/a");
        out.push_str(&format!(
            "{:<15}{:>10.2}{:>7}{:>10}   {}\n",
            row.name, row.close, rsi, macd, state
        ));
    }
    out
}
