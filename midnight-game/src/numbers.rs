//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    usize_to_f64(numerator) / usize_to_f64(denominator)
}

/// Arithmetic mean of integer samples, or 0.0 for an empty iterator.
#[must_use]
pub fn mean_i64(values: impl IntoIterator<Item = i64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0_i64, 0_usize), |(sum, count), v| (sum.saturating_add(v), count + 1));
    if count == 0 {
        return 0.0;
    }
    i64_to_f64(sum) / usize_to_f64(count)
}
