//! Run summary table and RSI chart.

pub mod chart;
pub mod table;

pub use chart::{ChartRenderer, ChartSeries, RsiChart, SvgChartRenderer};
pub use table::{render_table, SummaryRow};
