#![forbid(unsafe_code)]

use tracing::warn;

/// Non-finite amounts never reach a sum; they are logged and counted as 0.
pub fn finite_or_zero(value: f64, input: &'static str) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(input, value = %value, "non-finite amount treated as 0");
        0.0
    }
}

pub fn sum_finite<I>(values: I, input: &'static str) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .map(|v| finite_or_zero(v, input))
        .sum()
}
