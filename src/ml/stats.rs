//! Small numeric helpers shared by the calculators.

use rust_decimal::prelude::{Decimal, RoundingStrategy, ToPrimitive};

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, `0.0` for fewer than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let squared: Vec<f64> = values.iter().map(|v| (v - m).powi(2)).collect();
    mean(&squared).sqrt()
}

/// Rounds the exact binary value of `value` to `decimals` places, ties to even.
///
/// `10.125` becomes `10.12` while `2.675` (stored just below the tie) becomes
/// `2.67`. Values outside the decimal range are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Clamps to zero from below.
pub fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}
