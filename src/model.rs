//! Gridded wind speed output from a large eddy simulation.
//!
//! The field is stored as a flat vector in `[time][level][y][x]` order. Level heights vary with
//! time (terrain following coordinates), so they are stored per time step.
//!
//! Horizontal grid indexes follow the convention of the WRF output the FINO comparisons were run
//! on: `i` indexes the south-north (`y`) axis and `j` the west-east (`x`) axis.
use crate::{
    error::{AnalysisError, Result},
    geo::{nearest_point, GeoPoint},
    profile::MeanProfile,
    time_index::{find_time_index, time_window},
    utility::nan_mean,
};
use chrono::NaiveDateTime;
use itertools::{iproduct, izip};
use metfor::{Meters, MetersPSec, Quantity};
use optional::Optioned;
use std::ops::Range;
use tracing::debug;

/// A horizontal grid location, `i` on the `y` axis and `j` on the `x` axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    /// Index on the `y` (south-north) axis.
    pub i: usize,
    /// Index on the `x` (west-east) axis.
    pub j: usize,
}

impl GridPoint {
    /// Create a new grid point.
    #[inline]
    pub fn new(i: usize, j: usize) -> Self {
        GridPoint { i, j }
    }
}

/// A block of grid columns to average over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizontalWindow {
    /// Index range on the `y` axis.
    pub y: Range<usize>,
    /// Index range on the `x` axis.
    pub x: Range<usize>,
}

impl HorizontalWindow {
    /// Number of grid columns in the window.
    pub fn num_columns(&self) -> usize {
        self.y.len() * self.x.len()
    }
}

/// A gridded wind speed field, values in m/s with NaN marking missing data.
#[derive(Clone, Debug)]
pub struct ModelField {
    // Variable name, e.g. wspd
    name: String,

    times: Vec<NaiveDateTime>,
    // Level heights for each time, [t][z]
    level_heights: Vec<Vec<Meters>>,
    y: Vec<Meters>,
    x: Vec<Meters>,
    // Longitude and latitude of each column, [y][x]
    lon_lat: Option<Vec<GeoPoint>>,

    // [t][z][y][x]
    values: Vec<f64>,
    nz: usize,
}

impl ModelField {
    /// Create a new field.
    ///
    /// # Arguments
    /// name: The variable name, used for labeling.
    ///
    /// times: The valid time of each time step.
    ///
    /// level_heights: The height of each vertical level at each time step, `[time][level]`.
    ///
    /// y, x: Horizontal coordinates of the grid.
    ///
    /// values: Flattened data in `[time][level][y][x]` order.
    pub fn new<S: Into<String>>(
        name: S,
        times: Vec<NaiveDateTime>,
        level_heights: Vec<Vec<Meters>>,
        y: Vec<Meters>,
        x: Vec<Meters>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if level_heights.len() != times.len() {
            return Err(AnalysisError::ShapeMismatch {
                left: times.len(),
                right: level_heights.len(),
            });
        }

        let nz = level_heights.first().map(|lvls| lvls.len()).unwrap_or(0);
        if let Some(bad) = level_heights.iter().find(|lvls| lvls.len() != nz) {
            return Err(AnalysisError::ShapeMismatch {
                left: nz,
                right: bad.len(),
            });
        }

        let expected = times.len() * nz * y.len() * x.len();
        if values.len() != expected {
            return Err(AnalysisError::ShapeMismatch {
                left: expected,
                right: values.len(),
            });
        }

        Ok(ModelField {
            name: name.into(),
            times,
            level_heights,
            y,
            x,
            lon_lat: None,
            values,
            nz,
        })
    }

    /// Builder method to add the longitude and latitude of each grid column, in `[y][x]` order.
    pub fn with_coordinates(mut self, lon_lat: Vec<GeoPoint>) -> Result<Self> {
        let expected = self.y.len() * self.x.len();
        if lon_lat.len() != expected {
            return Err(AnalysisError::ShapeMismatch {
                left: expected,
                right: lon_lat.len(),
            });
        }

        self.lon_lat = Some(lon_lat);
        Ok(self)
    }

    /// The variable name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Valid times of each time step.
    #[inline]
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// `y` coordinates of the grid.
    #[inline]
    pub fn y(&self) -> &[Meters] {
        &self.y
    }

    /// `x` coordinates of the grid.
    #[inline]
    pub fn x(&self) -> &[Meters] {
        &self.x
    }

    /// The dimensions as `(times, levels, y, x)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.times.len(), self.nz, self.y.len(), self.x.len())
    }

    /// Heights of the vertical levels at a time step.
    pub fn level_heights(&self, time_index: usize) -> Result<&[Meters]> {
        self.level_heights
            .get(time_index)
            .map(|lvls| lvls.as_slice())
            .ok_or(AnalysisError::IndexOutOfRange)
    }

    /// Get a single value, `None` if any index is out of range.
    pub fn value(&self, t: usize, z: usize, i: usize, j: usize) -> Option<f64> {
        let (nt, nz, ny, nx) = self.shape();
        if t < nt && z < nz && i < ny && j < nx {
            Some(self.values[self.offset(t, z, i, j)])
        } else {
            None
        }
    }

    #[inline]
    fn offset(&self, t: usize, z: usize, i: usize, j: usize) -> usize {
        let (_, nz, ny, nx) = self.shape();
        ((t * nz + z) * ny + i) * nx + j
    }

    /// The block of columns averaged together to make a profile at `point`.
    ///
    /// The window covers `i - ncell_avg` up to, but not including, `i + ncell_avg` on the `y`
    /// axis, and likewise for `j` on the `x` axis. So it is `2 * ncell_avg` columns on a side and
    /// the point itself is not at the center. It is an error if the window does not fit on the
    /// grid.
    pub fn window(&self, point: GridPoint, ncell_avg: usize) -> Result<HorizontalWindow> {
        let make_range = |center: usize, len: usize| -> Result<Range<usize>> {
            let lower = center
                .checked_sub(ncell_avg)
                .ok_or(AnalysisError::WindowOutOfBounds)?;
            let upper = center
                .checked_add(ncell_avg)
                .filter(|&upper| upper <= len)
                .ok_or(AnalysisError::WindowOutOfBounds)?;
            Ok(lower..upper)
        };

        Ok(HorizontalWindow {
            y: make_range(point.i, self.y.len())?,
            x: make_range(point.j, self.x.len())?,
        })
    }

    /// Average the field over a range of time steps and a block of columns, level by level.
    ///
    /// Missing (NaN) values are skipped. A level with no valid data at all is missing in the
    /// output.
    pub fn mean_column(
        &self,
        time_range: Range<usize>,
        window: &HorizontalWindow,
    ) -> Result<Vec<Optioned<MetersPSec>>> {
        let (nt, nz, ny, nx) = self.shape();

        if time_range.end > nt || window.y.end > ny || window.x.end > nx {
            return Err(AnalysisError::IndexOutOfRange);
        }
        if time_range.is_empty() {
            return Err(AnalysisError::NotEnoughData);
        }

        let column = (0..nz)
            .map(|z| {
                let vals = iproduct!(time_range.clone(), window.y.clone(), window.x.clone())
                    .map(|(t, i, j)| self.values[self.offset(t, z, i, j)]);

                nan_mean(vals).map_t(MetersPSec)
            })
            .collect();

        Ok(column)
    }

    /// Level by level mean of the level heights over a range of time steps.
    pub fn mean_level_heights(&self, time_range: Range<usize>) -> Result<Vec<Meters>> {
        if time_range.end > self.times.len() {
            return Err(AnalysisError::IndexOutOfRange);
        }
        if time_range.is_empty() {
            return Err(AnalysisError::NotEnoughData);
        }

        let steps = &self.level_heights[time_range];
        let count = steps.len() as f64;

        let heights = (0..self.nz)
            .map(|z| Meters(steps.iter().map(|lvls| lvls[z].unpack()).sum::<f64>() / count))
            .collect();

        Ok(heights)
    }

    /// Horizontally averaged profile at a single time.
    ///
    /// The time must match exactly one time step in the field.
    pub fn profile_at(
        &self,
        time: NaiveDateTime,
        point: GridPoint,
        ncell_avg: usize,
    ) -> Result<MeanProfile> {
        let t = find_time_index(&self.times, time)?;
        self.window_profile(t, 1, point, ncell_avg)
    }

    /// Profile averaged horizontally and over up to `steps` time steps beginning at
    /// `start_index`. The time window is clipped to the end of the data, and heights are those
    /// of the first time step.
    pub fn window_profile(
        &self,
        start_index: usize,
        steps: usize,
        point: GridPoint,
        ncell_avg: usize,
    ) -> Result<MeanProfile> {
        let heights = self.level_heights(start_index)?.to_vec();
        let window = self.window(point, ncell_avg)?;
        let speeds = self.mean_column(time_window(start_index, steps, self.times.len()), &window)?;

        debug!(
            field = %self.name,
            start_index,
            steps,
            i = point.i,
            j = point.j,
            "extracted windowed model profile"
        );

        MeanProfile::new(heights, speeds)
    }

    /// Profile averaged horizontally and over every time step in `time_range`. Heights are
    /// averaged over the same time steps.
    pub fn profile_over(
        &self,
        time_range: Range<usize>,
        point: GridPoint,
        ncell_avg: usize,
    ) -> Result<MeanProfile> {
        let window = self.window(point, ncell_avg)?;
        let heights = self.mean_level_heights(time_range.clone())?;
        let speeds = self.mean_column(time_range, &window)?;

        MeanProfile::new(heights, speeds)
    }

    /// The difference `self - other` at every grid point.
    ///
    /// Both fields must have the same shape and times. Coordinates and level heights come from
    /// `self`.
    pub fn difference(&self, other: &ModelField) -> Result<ModelField> {
        if self.values.len() != other.values.len() || self.shape() != other.shape() {
            return Err(AnalysisError::ShapeMismatch {
                left: self.values.len(),
                right: other.values.len(),
            });
        }

        if self.times != other.times {
            return Err(AnalysisError::TimeMismatch);
        }

        let values = izip!(&self.values, &other.values)
            .map(|(a, b)| a - b)
            .collect();

        Ok(ModelField {
            name: format!("{} - {}", self.name, other.name),
            values,
            ..self.clone()
        })
    }

    /// A horizontal slice of the field at one level and time step.
    pub fn plan_view(&self, level: usize, time_index: usize) -> Result<PlanView> {
        let (nt, nz, _, _) = self.shape();
        if level >= nz || time_index >= nt {
            return Err(AnalysisError::IndexOutOfRange);
        }

        let start = self.offset(time_index, level, 0, 0);
        let end = start + self.y.len() * self.x.len();

        Ok(PlanView {
            time: self.times[time_index],
            height: self.level_heights[time_index][level],
            y: self.y.clone(),
            x: self.x.clone(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Find the grid column closest to a location, and the distance to it.
    ///
    /// Requires the longitude and latitude of the grid columns.
    pub fn nearest_column(&self, target: GeoPoint) -> Result<(GridPoint, Meters)> {
        let lon_lat = self
            .lon_lat
            .as_ref()
            .ok_or(AnalysisError::MissingCoordinates)?;

        let nx = self.x.len();
        let (idx, dist) = nearest_point(target, lon_lat).ok_or(AnalysisError::NotEnoughData)?;

        Ok((GridPoint::new(idx / nx, idx % nx), dist))
    }
}

/// A horizontal slice of a model field.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanView {
    /// Valid time of the slice.
    pub time: NaiveDateTime,
    /// Height of the model level at this time.
    pub height: Meters,
    /// `y` coordinates of the rows.
    pub y: Vec<Meters>,
    /// `x` coordinates of the columns.
    pub x: Vec<Meters>,
    /// Values in `[y][x]` order.
    pub values: Vec<f64>,
}

impl PlanView {
    /// Value at a grid point, `None` if it is outside the slice.
    pub fn value(&self, point: GridPoint) -> Option<f64> {
        if point.i < self.y.len() && point.j < self.x.len() {
            Some(self.values[point.i * self.x.len() + point.j])
        } else {
            None
        }
    }

    /// The `(x, y)` coordinates of a grid point.
    pub fn coordinates(&self, point: GridPoint) -> Result<(Meters, Meters)> {
        let x = self.x.get(point.j).ok_or(AnalysisError::IndexOutOfRange)?;
        let y = self.y.get(point.i).ok_or(AnalysisError::IndexOutOfRange)?;
        Ok((*x, *y))
    }
}
