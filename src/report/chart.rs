//! RSI chart artifact

use crate::error::ChartError;
use crate::signals::classifier::RsiThresholds;
use chrono::{Datelike, NaiveDate};
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];
const DEFAULT_Y_MIN: f64 = 20.0;
const DEFAULT_Y_MAX: f64 = 95.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Data behind the daily RSI chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub thresholds: RsiThresholds,
    /// Monospace overlay, usually the run summary table.
    pub table: String,
}

impl RsiChart {
    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.points.is_empty())
    }
}

pub trait ChartRenderer: Send + Sync {
    /// Render `chart` to `path`, replacing any previous file.
    fn render(&self, chart: &RsiChart, path: &Path) -> Result<(), ChartError>;
}

/// Renders the chart as a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    pub width: f64,
    pub height: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 720.0,
        }
    }
}

struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_min: i64,
    x_span: i64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn x(&self, date: NaiveDate) -> f64 {
        if self.x_span == 0 {
            return (self.left + self.right) / 2.0;
        }
        let offset = (date.num_days_from_ce() as i64 - self.x_min) as f64;
        self.left + offset / self.x_span as f64 * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.y_min, self.y_max);
        self.bottom - (clamped - self.y_min) / (self.y_max - self.y_min) * (self.bottom - self.top)
    }
}

impl SvgChartRenderer {
    pub fn to_svg(&self, chart: &RsiChart) -> Result<String, ChartError> {
        if !chart.has_data() {
            return Err(ChartError::Empty);
        }
        let all_points = || chart.series.iter().flat_map(|s| s.points.iter());

        let day = |d: &NaiveDate| d.num_days_from_ce() as i64;
        let x_min = all_points().map(|(d, _)| day(d)).min().unwrap_or_default();
        let x_max = all_points().map(|(d, _)| day(d)).max().unwrap_or_default();

        let (lo, hi) = all_points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
        let frame = Frame {
            left: 60.0,
            right: self.width - 20.0,
            top: 50.0,
            bottom: self.height * 0.82 - 30.0,
            x_min,
            x_span: x_max - x_min,
            y_min: DEFAULT_Y_MIN.min(lo.floor()).max(0.0),
            y_max: DEFAULT_Y_MAX.max(hi.ceil()).min(100.0),
        };

        let mut svg = String::new();
        // fmt::Write into a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="30" font-size="18" text-anchor="middle">{}</text>"#,
            self.width / 2.0,
            escape(&chart.title)
        );

        self.write_grid(&mut svg, &frame, chart);

        for (i, series) in chart.series.iter().enumerate() {
            if series.points.is_empty() {
                continue;
            }
            let coords: Vec<String> = series
                .points
                .iter()
                .map(|(d, v)| format!("{:.1},{:.1}", frame.x(*d), frame.y(*v)))
                .collect();
            let _ = writeln!(
                svg,
                r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
                PALETTE[i % PALETTE.len()],
                coords.join(" ")
            );
        }

        self.write_legend(&mut svg, chart);
        self.write_table(&mut svg, &frame, &chart.table);

        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn write_grid(&self, svg: &mut String, frame: &Frame, chart: &RsiChart) {
        let _ = writeln!(
            svg,
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#999"/>"##,
            frame.left,
            frame.top,
            frame.right - frame.left,
            frame.bottom - frame.top
        );

        let mut tick = (frame.y_min / 10.0).ceil() * 10.0;
        while tick <= frame.y_max {
            let y = frame.y(tick);
            let _ = writeln!(
                svg,
                r##"<line x1="{l}" y1="{y:.1}" x2="{r}" y2="{y:.1}" stroke="#e0e0e0"/><text x="{tx}" y="{ty:.1}" font-size="11" text-anchor="end">{v}</text>"##,
                l = frame.left,
                r = frame.right,
                y = y,
                tx = frame.left - 6.0,
                ty = y + 4.0,
                v = tick
            );
            tick += 10.0;
        }

        let guides = [
            (chart.thresholds.overbought, "6,4"),
            (chart.thresholds.oversold, "6,4"),
            (50.0, "2,3"),
        ];
        for (level, dash) in guides {
            let y = frame.y(level);
            let _ = writeln!(
                svg,
                r##"<line x1="{}" y1="{y:.1}" x2="{}" y2="{y:.1}" stroke="#555" stroke-dasharray="{}"/>"##,
                frame.left,
                frame.right,
                dash,
                y = y
            );
        }

        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="12" text-anchor="middle">Date</text>"#,
            (frame.left + frame.right) / 2.0,
            frame.bottom + 22.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="18" y="{y}" font-size="12" transform="rotate(-90 18 {y})" text-anchor="middle">RSI</text>"#,
            y = (frame.top + frame.bottom) / 2.0
        );
    }

    fn write_legend(&self, svg: &mut String, chart: &RsiChart) {
        let entries: Vec<(usize, &ChartSeries)> = chart
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.points.is_empty())
            .collect();
        let slot = 160.0;
        let start = self.width / 2.0 - slot * entries.len() as f64 / 2.0;
        let y = self.height * 0.9;
        for (n, (i, series)) in entries.iter().enumerate() {
            let x = start + slot * n as f64;
            let _ = writeln!(
                svg,
                r#"<line x1="{x}" y1="{y}" x2="{x2}" y2="{y}" stroke="{c}" stroke-width="3"/><text x="{tx}" y="{ty}" font-size="14">{name}</text>"#,
                x = x,
                x2 = x + 24.0,
                y = y,
                c = PALETTE[i % PALETTE.len()],
                tx = x + 30.0,
                ty = y + 5.0,
                name = escape(&series.name)
            );
        }
    }

    fn write_table(&self, svg: &mut String, frame: &Frame, table: &str) {
        let lines: Vec<&str> = table.lines().collect();
        if lines.is_empty() {
            return;
        }
        let line_height = 13.0;
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64 * 6.6 + 16.0;
        let height = lines.len() as f64 * line_height + 12.0;
        let x = frame.left + 8.0;
        let y = frame.top + 8.0;
        let _ = writeln!(
            svg,
            r##"<rect x="{x}" y="{y}" width="{width:.1}" height="{height:.1}" rx="6" fill="#f2f2f2" fill-opacity="0.7" stroke="gray"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text font-family="monospace" font-size="11" xml:space="preserve">"#
        );
        for (i, line) in lines.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"<tspan x="{:.1}" y="{:.1}">{}</tspan>"#,
                x + 8.0,
                y + 16.0 + i as f64 * line_height,
                escape(line)
            );
        }
        svg.push_str("</text>\n");
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &RsiChart, path: &Path) -> Result<(), ChartError> {
        let svg = self.to_svg(chart)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            writer.write_all(svg.as_bytes())?;
            writer.flush()?;
        }
        tmp.persist(path)?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
