//! Reductions that skip missing samples.
//!
//! Missing samples are stored as NaN. Every reduction here ignores them and
//! returns `None` when nothing is left, so callers decide explicitly what an
//! empty window means.

use num::Float;

/// Arithmetic mean of the non-NaN values.
///
/// Returns `None` if the input is empty or every value is NaN.
///
/// ```
/// use inletox_core::reductions::nanmean;
///
/// assert_eq!(nanmean([1.0, f64::NAN, 3.0]), Some(2.0));
/// assert_eq!(nanmean([f64::NAN, f64::NAN]), None);
/// ```
pub fn nanmean<T, I>(values: I) -> Option<T>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((T::zero(), 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        T::from(count).map(|n| sum / n)
    }
}

/// [`nanmean`] with the empty case mapped back to NaN.
///
/// Used at output boundaries where results are handed on as plain arrays.
pub fn nanmean_or_nan<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    nanmean(values).unwrap_or(f64::NAN)
}

/// Median of the non-NaN values, averaging the two central values for an
/// even count.
pub fn nanmedian<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut finite: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.total_cmp(b));

    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    } else {
        Some(finite[mid])
    }
}
