//! Shared numeric helpers.
//!
//! Every rounded figure in a result goes through [`round_to`], which rounds
//! half away from zero.

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Percent change from `from` to `to`; zero when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// EMA series seeded with the SMA of the first `period` values.
///
/// Element 0 corresponds to input index `period - 1`. Empty when the input
/// is shorter than `period`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let mut current = mean(&values[..period]);
    ema.push(current);

    for value in &values[period..] {
        current = (value - current) * multiplier + current;
        ema.push(current);
    }

    ema
}

/// Wilder smoothing seeded with the simple average of the first `period` values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    let mut current = mean(&values[..period]);
    result.push(current);

    for value in &values[period..] {
        current = (current * (period - 1) as f64 + value) / period as f64;
        result.push(current);
    }

    result
}

/// The last `n` elements (or all of them when shorter).
pub fn tail<T: Clone>(values: &[T], n: usize) -> Vec<T> {
    values[values.len().saturating_sub(n)..].to_vec()
}
