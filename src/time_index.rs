//! Look up positions in a time axis.
use crate::error::{AnalysisError, Result};
use chrono::NaiveDateTime;
use std::ops::Range;

/// Find the index of the one entry in `times` equal to `target`.
///
/// It is an error if there is no such entry or if there is more than one.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use fino_profile_analysis::{find_time_index, AnalysisError};
///
/// let t0 = NaiveDate::from_ymd_opt(2015, 10, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let t1 = NaiveDate::from_ymd_opt(2015, 10, 1).unwrap().and_hms_opt(12, 10, 0).unwrap();
/// let t2 = NaiveDate::from_ymd_opt(2015, 10, 1).unwrap().and_hms_opt(12, 20, 0).unwrap();
///
/// assert_eq!(find_time_index(&[t0, t1], t1), Ok(1));
/// assert_eq!(find_time_index(&[t0, t1], t2), Err(AnalysisError::TimeNotFound(t2)));
/// ```
pub fn find_time_index(times: &[NaiveDateTime], target: NaiveDateTime) -> Result<usize> {
    let mut matches = times
        .iter()
        .enumerate()
        .filter(|&(_, t)| *t == target)
        .map(|(i, _)| i);

    let idx = matches.next().ok_or(AnalysisError::TimeNotFound(target))?;

    let extra = matches.count();
    if extra > 0 {
        return Err(AnalysisError::AmbiguousTime {
            time: target,
            count: extra + 1,
        });
    }

    Ok(idx)
}

/// A range of `steps` time indexes starting at `start`, clipped to the length of the time axis.
///
/// The range is empty if `start` is past the end of the axis.
#[inline]
pub fn time_window(start: usize, steps: usize, len: usize) -> Range<usize> {
    let end = start.saturating_add(steps).min(len);
    start.min(end)..end
}
