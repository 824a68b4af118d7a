//! Vertical profiles of wind speed.
//!
//! There are two kinds of profiles:
//!   - `MeanProfile`s are what comes out of averaging model output or reading a row of tower
//!     observations. They are at the levels of the dataset they came from, and a level may be
//!     missing if there was no valid data to average there.
//!   - `VerticalProfile`s have been checked and are suitable for analysis: every level has a
//!     finite value, there are at least two levels, and heights are strictly increasing.
use crate::{
    error::{AnalysisError, Result},
    shear,
};
use itertools::izip;
use metfor::{Meters, MetersPSec, Quantity};
use optional::Optioned;

/// A validated profile of wind speed with height.
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalProfile {
    heights: Vec<Meters>,
    speeds: Vec<MetersPSec>,
}

impl VerticalProfile {
    /// Create a new profile from parallel vectors of heights and speeds.
    ///
    /// Unlike the free shear functions, NaN or infinite heights and speeds are rejected here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fino_profile_analysis::{AnalysisError, VerticalProfile};
    /// use metfor::{Meters, MetersPSec};
    ///
    /// let prof = VerticalProfile::new(
    ///     vec![Meters(33.0), Meters(60.0), Meters(101.0)],
    ///     vec![MetersPSec(7.1), MetersPSec(7.9), MetersPSec(8.4)],
    /// ).unwrap();
    /// assert_eq!(prof.len(), 3);
    ///
    /// let bad = VerticalProfile::new(vec![Meters(33.0)], vec![MetersPSec(7.1)]);
    /// assert_eq!(bad, Err(AnalysisError::NotEnoughData));
    /// ```
    pub fn new(heights: Vec<Meters>, speeds: Vec<MetersPSec>) -> Result<Self> {
        shear::validate_profile(&heights, &speeds)?;

        if let Some(index) = izip!(&heights, &speeds)
            .position(|(h, s)| !h.unpack().is_finite() || !s.unpack().is_finite())
        {
            return Err(AnalysisError::NonFiniteValue { index });
        }

        Ok(VerticalProfile { heights, speeds })
    }

    /// Create a profile from pairs of `(height, speed)`.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Meters, MetersPSec)>,
    {
        let (heights, speeds) = pairs.into_iter().unzip();
        Self::new(heights, speeds)
    }

    /// Heights of the levels, bottom to top.
    #[inline]
    pub fn heights(&self) -> &[Meters] {
        &self.heights
    }

    /// Wind speed at each level.
    #[inline]
    pub fn speeds(&self) -> &[MetersPSec] {
        &self.speeds
    }

    /// Number of levels in the profile, always at least 2.
    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false, a valid profile has at least two levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Iterate over the `(height, speed)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Meters, MetersPSec)> + '_ {
        izip!(&self.heights, &self.speeds).map(|(&h, &s)| (h, s))
    }

    /// Bulk shear across the whole profile, see [`bulk_shear`](crate::bulk_shear).
    pub fn bulk_shear(&self) -> Result<f64> {
        shear::bulk_shear(&self.heights, &self.speeds)
    }

    /// Integrated shear across the whole profile, see
    /// [`integrated_shear`](crate::integrated_shear).
    pub fn integrated_shear(&self) -> Result<MetersPSec> {
        shear::integrated_shear(&self.heights, &self.speeds)
    }
}

/// A profile of averaged wind speeds, some levels may be missing.
#[derive(Clone, Debug, PartialEq)]
pub struct MeanProfile {
    heights: Vec<Meters>,
    speeds: Vec<Optioned<MetersPSec>>,
}

impl MeanProfile {
    /// Create a new profile, the heights and speeds must be the same length.
    pub fn new(heights: Vec<Meters>, speeds: Vec<Optioned<MetersPSec>>) -> Result<Self> {
        if heights.len() != speeds.len() {
            return Err(AnalysisError::MismatchedLengths);
        }

        Ok(MeanProfile { heights, speeds })
    }

    /// Heights of the levels.
    #[inline]
    pub fn heights(&self) -> &[Meters] {
        &self.heights
    }

    /// Mean speed at each level, if there was any data there.
    #[inline]
    pub fn speeds(&self) -> &[Optioned<MetersPSec>] {
        &self.speeds
    }

    /// Number of levels, including missing ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if there are no levels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Only the levels that have data.
    pub fn valid_levels(&self) -> impl Iterator<Item = (Meters, MetersPSec)> + '_ {
        izip!(&self.heights, &self.speeds)
            .filter_map(|(&h, spd)| spd.into_option().map(|spd| (h, spd)))
    }

    /// Drop the missing levels and validate what is left for analysis.
    pub fn to_vertical_profile(&self) -> Result<VerticalProfile> {
        VerticalProfile::from_pairs(self.valid_levels())
    }
}
