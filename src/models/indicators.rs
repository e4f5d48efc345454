use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An indicator reading; `None` marks an undefined value (insufficient
/// history or a zero denominator).
pub type IndicatorValue = Option<f64>;

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closes for one instrument, ascending by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points in any order. Non-finite closes are dropped
    /// and for a repeated date the last occurrence wins.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.close.is_finite())
            .collect();
        // stable sort keeps input order within a date, so the later one survives below
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Latest readings for one instrument, as shown in the run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: IndicatorValue,
    pub macd_histogram: IndicatorValue,
}

/// Full RSI sequence aligned with the series dates, kept for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiHistory {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<IndicatorValue>,
}

impl RsiHistory {
    pub fn defined_points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.values.iter())
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
    }
}
