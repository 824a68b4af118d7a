//! Vertical wind shear over a profile of wind speeds.
//!
//! Both estimators take parallel height and speed slices ordered from the bottom of the profile
//! to the top. The profile is checked before anything is calculated: it needs at least two
//! levels and strictly increasing heights, otherwise the shear would be a division by zero.
use crate::error::{AnalysisError, Result};
use itertools::{izip, Itertools};
use metfor::{Meters, MetersPSec, Quantity};
use tracing::debug;

/// Check that a profile is usable for shear calculations.
///
/// The heights and speeds must be the same length, there must be at least two levels, and the
/// heights must be strictly increasing.
pub fn validate_profile(heights: &[Meters], speeds: &[MetersPSec]) -> Result<()> {
    if heights.len() != speeds.len() {
        return Err(AnalysisError::MismatchedLengths);
    }

    if heights.len() < 2 {
        return Err(AnalysisError::NotEnoughData);
    }

    heights
        .iter()
        .tuple_windows::<(_, _)>()
        // Negated so a NaN height fails too
        .position(|(&h0, &h1)| !(h1 > h0))
        .map_or(Ok(()), |i| {
            Err(AnalysisError::NonIncreasingHeights { index: i + 1 })
        })
}

/// The bulk shear, or mean change in wind speed with height, between the bottom and top of the
/// profile. Units are per second.
///
/// # Examples
///
/// ```rust
/// use fino_profile_analysis::bulk_shear;
/// use metfor::{Meters, MetersPSec};
///
/// let heights = [Meters(0.0), Meters(100.0)];
/// let speeds = [MetersPSec(5.0), MetersPSec(10.0)];
///
/// assert_eq!(bulk_shear(&heights, &speeds).unwrap(), 0.05);
/// ```
pub fn bulk_shear(heights: &[Meters], speeds: &[MetersPSec]) -> Result<f64> {
    validate_profile(heights, speeds)?;

    // Validation guarantees at least two levels.
    let (bottom_h, top_h) = (heights[0], heights[heights.len() - 1]);
    let (bottom_spd, top_spd) = (speeds[0], speeds[speeds.len() - 1]);

    let shear = (top_spd - bottom_spd).unpack() / (top_h - bottom_h).unpack();
    debug!(shear, levels = heights.len(), "bulk shear");

    Ok(shear)
}

/// The sum of the shear between each pair of adjacent levels, scaled by the depth of the profile.
///
/// `S = Σ (speed[k] - speed[k-1]) / (height[k] - height[k-1])`, and the result is
/// `S × (height[last] - height[first])`.
///
/// This is not an integral of the shear, it is not normalized by the number of layers, and it is
/// not the trapezoid rule. For two levels it is the same as the speed difference across them.
///
/// # Examples
///
/// ```rust
/// use fino_profile_analysis::integrated_shear;
/// use metfor::{Meters, MetersPSec, Quantity};
///
/// let heights = [Meters(0.0), Meters(50.0), Meters(100.0)];
/// let speeds = [MetersPSec(5.0), MetersPSec(8.0), MetersPSec(10.0)];
///
/// let shear = integrated_shear(&heights, &speeds).unwrap();
/// assert!((shear.unpack() - 10.0).abs() < 1.0e-12);
/// ```
pub fn integrated_shear(heights: &[Meters], speeds: &[MetersPSec]) -> Result<MetersPSec> {
    validate_profile(heights, speeds)?;

    let depth = heights[heights.len() - 1] - heights[0];

    let sum_of_shears: f64 = izip!(heights, speeds)
        // Look at adjacent levels
        .tuple_windows::<(_, _)>()
        // Local finite difference shear
        .map(|((&h0, &s0), (&h1, &s1))| (s1 - s0).unpack() / (h1 - h0).unpack())
        .sum();

    let shear = MetersPSec(sum_of_shears * depth.unpack());
    debug!(
        shear = shear.unpack(),
        levels = heights.len(),
        "integrated shear"
    );

    Ok(shear)
}
