//! Moving-average primitives shared by the indicators.

/// Smoothing factor for a span-based EMA: k = 2 / (span + 1).
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// One EMA step: k * value + (1 - k) * previous.
pub fn ema_from_previous(value: f64, previous: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// EMA over the whole input, seeded with the first value.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = ema_alpha(span);
    let mut out = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;
    for &value in values {
        let next = match previous {
            Some(prev) => ema_from_previous(value, prev, alpha),
            None => value,
        };
        out.push(next);
        previous = Some(next);
    }
    out
}

/// Exponential smoothing over a sequence with gaps.
///
/// The recurrence starts at the first defined sample and skips undefined ones;
/// outputs stay undefined until `min_periods` defined samples have been seen.
pub fn smoothed_series(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut average: Option<f64> = None;
    let mut seen = 0usize;
    for value in values {
        if let Some(v) = value {
            seen += 1;
            average = Some(match average {
                Some(prev) => ema_from_previous(*v, prev, alpha),
                None => *v,
            });
        }
        out.push(if seen >= min_periods { average } else { None });
    }
    out
}

/// Trailing mean over `window` samples; undefined while the window holds a gap
/// or is not yet full.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum: Option<f64> = slice.iter().copied().sum();
            sum.map(|s| s / window as f64)
        })
        .collect()
}
