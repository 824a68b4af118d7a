//! Error types for the fino-profile-analysis crate.
use chrono::NaiveDateTime;
use thiserror::Error;

/// Error type for the crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum AnalysisError {
    /// Not enough data available for analysis, e.g. a profile with fewer than two levels.
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// Parallel profiles (heights and speeds) have different lengths.
    #[error("height and speed profiles have different lengths")]
    MismatchedLengths,
    /// Heights must be strictly increasing, this is the first level where they are not.
    #[error("heights are not strictly increasing at level {index}")]
    NonIncreasingHeights {
        /// Index of the offending level.
        index: usize,
    },
    /// A height or speed in a validated profile is NaN or infinite.
    #[error("non-finite value at level {index}")]
    NonFiniteValue {
        /// Index of the offending level.
        index: usize,
    },
    /// Arrays that should be the same shape, or broadcast against each other, do not.
    #[error("incompatible shapes: {left} and {right}")]
    ShapeMismatch {
        /// Length of the left hand side.
        left: usize,
        /// Length of the right hand side.
        right: usize,
    },
    /// No timestamp matched the requested time.
    #[error("no data valid at {0}")]
    TimeNotFound(NaiveDateTime),
    /// More than one timestamp matched the requested time.
    #[error("{count} entries valid at {time}, expected exactly one")]
    AmbiguousTime {
        /// The requested time.
        time: NaiveDateTime,
        /// How many entries matched it.
        count: usize,
    },
    /// Two datasets that should share a time axis do not.
    #[error("datasets do not share the same times")]
    TimeMismatch,
    /// A horizontal averaging window extends past the edge of the grid.
    #[error("averaging window extends outside the grid")]
    WindowOutOfBounds,
    /// A level, time, or grid index is outside the dataset.
    #[error("index out of range")]
    IndexOutOfRange,
    /// Longitude and latitude were not provided for the model grid.
    #[error("grid longitude and latitude are not available")]
    MissingCoordinates,
    /// None of the optional datasets required for this analysis were provided.
    #[error("no dataset provided, need at least one")]
    MissingDataset,
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;
