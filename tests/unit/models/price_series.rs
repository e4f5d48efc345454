//! Unit tests for price series normalization

use chrono::NaiveDate;
use marketpulse::models::indicators::{PricePoint, PriceSeries, RsiHistory};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn test_points_are_sorted_by_date() {
    let series = PriceSeries::from_points([
        PricePoint::new(day(3), 3.0),
        PricePoint::new(day(1), 1.0),
        PricePoint::new(day(2), 2.0),
    ]);
    assert_eq!(series.dates(), vec![day(1), day(2), day(3)]);
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.last().unwrap().close, 3.0);
}

#[test]
fn test_duplicate_dates_keep_last_value() {
    let series = PriceSeries::from_points([
        PricePoint::new(day(1), 1.0),
        PricePoint::new(day(2), 2.0),
        PricePoint::new(day(2), 2.5),
    ]);
    assert_eq!(series.len(), 2);
    assert_eq!(series.closes(), vec![1.0, 2.5]);
}

#[test]
fn test_non_finite_closes_dropped() {
    let series = PriceSeries::from_points([
        PricePoint::new(day(1), f64::NAN),
        PricePoint::new(day(2), 2.0),
        PricePoint::new(day(3), f64::INFINITY),
    ]);
    assert_eq!(series.closes(), vec![2.0]);
}

#[test]
fn test_empty_series() {
    let series = PriceSeries::default();
    assert!(series.is_empty());
    assert!(series.last().is_none());
}

#[test]
fn test_rsi_history_skips_undefined_points() {
    let history = RsiHistory {
        dates: vec![day(1), day(2), day(3)],
        values: vec![None, Some(40.0), Some(45.5)],
    };
    let points: Vec<_> = history.defined_points().collect();
    assert_eq!(points, vec![(day(2), 40.0), (day(3), 45.5)]);
}
