use optional::{none, some, Optioned};

/// Mean of the values, skipping anything that is NaN. Returns none if nothing was left to average.
pub(crate) fn nan_mean<I: IntoIterator<Item = f64>>(vals: I) -> Optioned<f64> {
    let (sum, count) = vals
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        none()
    } else {
        some(sum / count as f64)
    }
}
