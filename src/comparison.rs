//! Prepare model and observation profiles for comparison charts.
//!
//! Nothing here draws anything. Each function gathers the profiles for one kind of chart and
//! tags them with the labels and colormap positions a renderer needs:
//!   - a single time, model against observations,
//!   - a stack of profiles colored by time,
//!   - a stack of model minus model differences colored by time,
//!   - stacks of profiles (or differences) colored by location,
//!   - a plan view of one model level.
//!
//! Datasets that may be absent are passed as `Option`s and checked up front.
use crate::{
    error::{AnalysisError, Result},
    model::{GridPoint, ModelField, PlanView},
    observation::TowerObservations,
    profile::{MeanProfile, VerticalProfile},
    time_index::{find_time_index, time_window},
};
use chrono::NaiveDateTime;
use metfor::{Meters, MetersPSec, Quantity};
use std::ops::Range;
use tracing::{debug, warn};

/// Options shared by the comparison products.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    ncell_avg: usize,
    averaging_steps: usize,
    model_label: String,
    observation_label: String,
    color_limits: (f64, f64),
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            ncell_avg: 5,
            averaging_steps: 6,
            model_label: "WRF-LES".to_owned(),
            observation_label: "FINO 1 data".to_owned(),
            color_limits: (10.0, 18.0),
        }
    }
}

impl ComparisonConfig {
    /// Create a configuration with the default values. This is a proxy for default with a
    /// clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fino_profile_analysis::ComparisonConfig;
    ///
    /// let config = ComparisonConfig::new()
    ///     .with_ncell_avg(3)
    ///     .with_model_label("LES 50 m");
    ///
    /// assert_eq!(config.ncell_avg(), 3);
    /// assert_eq!(config.averaging_steps(), 6);
    /// assert_eq!(config.model_label(), "LES 50 m");
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the number of grid cells on each side of the point to average over.
    #[inline]
    pub fn with_ncell_avg(mut self, ncell_avg: usize) -> Self {
        self.ncell_avg = ncell_avg;
        self
    }

    /// Builder method for the number of model time steps averaged into each time colored profile.
    #[inline]
    pub fn with_averaging_steps(mut self, steps: usize) -> Self {
        self.averaging_steps = steps;
        self
    }

    /// Builder method for the legend entry or title of the model run.
    #[inline]
    pub fn with_model_label<S: Into<String>>(mut self, label: S) -> Self {
        self.model_label = label.into();
        self
    }

    /// Builder method for the legend entry of the observations.
    #[inline]
    pub fn with_observation_label<S: Into<String>>(mut self, label: S) -> Self {
        self.observation_label = label.into();
        self
    }

    /// Builder method for the lower and upper limits of the plan view color scale.
    #[inline]
    pub fn with_color_limits(mut self, vmin: f64, vmax: f64) -> Self {
        self.color_limits = (vmin, vmax);
        self
    }

    /// Number of grid cells on each side of the point to average over.
    #[inline]
    pub fn ncell_avg(&self) -> usize {
        self.ncell_avg
    }

    /// Number of model time steps averaged into each time colored profile.
    #[inline]
    pub fn averaging_steps(&self) -> usize {
        self.averaging_steps
    }

    /// Label for the model run.
    #[inline]
    pub fn model_label(&self) -> &str {
        &self.model_label
    }

    /// Label for the observations.
    #[inline]
    pub fn observation_label(&self) -> &str {
        &self.observation_label
    }

    /// Plan view color scale limits.
    #[inline]
    pub fn color_limits(&self) -> (f64, f64) {
        self.color_limits
    }
}

/// Position of entry `k` of `n` along a sequential colormap, evenly spaced from 0 to 1.
#[inline]
pub fn color_fraction(k: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        k as f64 / (n - 1) as f64
    }
}

/// Bulk and integrated shear of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShearSummary {
    /// Bulk shear in 1/s
    pub bulk: f64,
    /// Integrated shear
    pub integrated: MetersPSec,
}

impl ShearSummary {
    /// Calculate both shears for a profile.
    pub fn from_profile(prof: &VerticalProfile) -> Result<Self> {
        Ok(ShearSummary {
            bulk: prof.bulk_shear()?,
            integrated: prof.integrated_shear()?,
        })
    }

    /// Calculate both shears using the levels of a mean profile that have data.
    pub fn from_mean_profile(prof: &MeanProfile) -> Result<Self> {
        Self::from_profile(&prof.to_vertical_profile()?)
    }
}

/// Model and observed profiles at the same time.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleTimeComparison {
    /// Valid time of both profiles.
    pub time: NaiveDateTime,
    /// Legend entry for the model.
    pub model_label: String,
    /// Legend entry for the observations.
    pub observation_label: String,
    /// Horizontally averaged model profile.
    pub model: MeanProfile,
    /// Observed profile.
    pub observed: MeanProfile,
}

impl SingleTimeComparison {
    /// Shear of the model profile.
    pub fn model_shear(&self) -> Result<ShearSummary> {
        ShearSummary::from_mean_profile(&self.model)
    }

    /// Shear of the observed profile.
    pub fn observed_shear(&self) -> Result<ShearSummary> {
        ShearSummary::from_mean_profile(&self.observed)
    }
}

/// Compare the model and the observations at a single time.
///
/// The model profile is averaged over the neighborhood of `point` described by
/// `config.ncell_avg()`. The time must match exactly one time in each dataset.
pub fn single_time_comparison(
    model: &ModelField,
    obs: &TowerObservations,
    time: NaiveDateTime,
    point: GridPoint,
    config: &ComparisonConfig,
) -> Result<SingleTimeComparison> {
    let observed = obs.profile_at(time)?;
    let model_prof = model.profile_at(time, point, config.ncell_avg)?;

    debug!(%time, i = point.i, j = point.j, "single time comparison");

    Ok(SingleTimeComparison {
        time,
        model_label: config.model_label.clone(),
        observation_label: config.observation_label.clone(),
        model: model_prof,
        observed,
    })
}

/// Where the profile in a stack entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Averaged model output.
    Model,
    /// Mast observations.
    Observation,
    /// Difference of two model runs.
    Difference,
}

/// What distinguishes the entries in a stack, and so determines their color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKey {
    /// Colored by time.
    Time(NaiveDateTime),
    /// Colored by location.
    Point(GridPoint),
}

/// One profile in a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    /// The time or location of this entry.
    pub key: StackKey,
    /// Where the profile came from.
    pub source: ProfileSource,
    /// Position along the colormap, 0 to 1.
    pub color_fraction: f64,
    /// The profile.
    pub profile: MeanProfile,
}

/// A set of profiles drawn on the same axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStack {
    /// Chart title.
    pub title: String,
    /// Label for the speed axis.
    pub x_label: String,
    /// Label for the height axis.
    pub y_label: String,
    /// The profiles.
    pub entries: Vec<StackEntry>,
}

impl ProfileStack {
    fn new(title: &str, x_label: &str) -> Self {
        ProfileStack {
            title: title.to_owned(),
            x_label: x_label.to_owned(),
            y_label: "Height [m]".to_owned(),
            entries: vec![],
        }
    }

    /// Entries from one source only.
    pub fn entries_from(&self, source: ProfileSource) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter().filter(move |entry| entry.source == source)
    }
}

const DIFFERENCE_LABEL: &str = "Windspeed Difference [m/s]";

/// Profiles from the model, the observations, or both, colored by time.
///
/// The times come from the model if it is supplied, otherwise from the observations. Each model
/// profile is averaged over `config.averaging_steps()` time steps starting at the time, and over
/// the neighborhood of `point`. A time missing from the observations (or the model) is skipped
/// for that dataset.
///
/// At least one of the datasets must be supplied.
pub fn time_colored_stack(
    model: Option<&ModelField>,
    obs: Option<&TowerObservations>,
    point: GridPoint,
    config: &ComparisonConfig,
) -> Result<ProfileStack> {
    let times = match (model, obs) {
        (Some(model), _) => model.times(),
        (None, Some(obs)) => obs.times(),
        (None, None) => return Err(AnalysisError::MissingDataset),
    };

    let x_label = model.map(|m| m.name()).unwrap_or("wspd");
    let mut stack = ProfileStack::new(&config.model_label, x_label);

    // Check the window fits before doing any work.
    if let Some(model) = model {
        model.window(point, config.ncell_avg)?;
    }

    let n = times.len();
    for (k, &time) in times.iter().enumerate() {
        let fraction = color_fraction(k, n);

        if let Some(model) = model {
            match find_time_index(model.times(), time) {
                Ok(t) => {
                    let profile =
                        model.window_profile(t, config.averaging_steps, point, config.ncell_avg)?;
                    stack.entries.push(StackEntry {
                        key: StackKey::Time(time),
                        source: ProfileSource::Model,
                        color_fraction: fraction,
                        profile,
                    });
                }
                Err(err) => warn!(%time, %err, "model output missing this time"),
            }
        }

        if let Some(obs) = obs {
            match find_time_index(obs.times(), time) {
                Ok(t) => stack.entries.push(StackEntry {
                    key: StackKey::Time(time),
                    source: ProfileSource::Observation,
                    color_fraction: fraction,
                    profile: obs.profile_at_index(t)?,
                }),
                Err(err) => warn!(%time, %err, "observations missing this time"),
            }
        }
    }

    debug!(entries = stack.entries.len(), "time colored stack");

    Ok(stack)
}

/// Differences between two model runs, `model1 - model2`, colored by time.
///
/// Each profile is the difference at a single time step averaged over the neighborhood of
/// `point`. Heights come from `model1`.
pub fn time_colored_difference(
    model1: &ModelField,
    model2: &ModelField,
    point: GridPoint,
    config: &ComparisonConfig,
) -> Result<ProfileStack> {
    let diff = model1.difference(model2)?;
    let mut stack = ProfileStack::new(&config.model_label, DIFFERENCE_LABEL);

    let n = diff.times().len();
    for (k, &time) in diff.times().iter().enumerate() {
        stack.entries.push(StackEntry {
            key: StackKey::Time(time),
            source: ProfileSource::Difference,
            color_fraction: color_fraction(k, n),
            profile: diff.window_profile(k, 1, point, config.ncell_avg)?,
        });
    }

    Ok(stack)
}

/// Model profiles at several locations, colored by location.
///
/// Each profile is averaged over the time steps in `time_range` (clipped to the data) and the
/// neighborhood of the point.
pub fn space_colored_stack(
    model: &ModelField,
    points: &[GridPoint],
    time_range: Range<usize>,
    config: &ComparisonConfig,
) -> Result<ProfileStack> {
    let stack = ProfileStack::new(&config.model_label, model.name());
    fill_space_colored(stack, model, ProfileSource::Model, points, time_range, config)
}

/// Differences between two model runs, `model1 - model2`, at several locations, colored by
/// location.
///
/// Averaging is the same as for [`space_colored_stack`].
pub fn space_colored_difference(
    model1: &ModelField,
    model2: &ModelField,
    points: &[GridPoint],
    time_range: Range<usize>,
    config: &ComparisonConfig,
) -> Result<ProfileStack> {
    let diff = model1.difference(model2)?;
    let stack = ProfileStack::new(&config.model_label, DIFFERENCE_LABEL);
    fill_space_colored(
        stack,
        &diff,
        ProfileSource::Difference,
        points,
        time_range,
        config,
    )
}

fn fill_space_colored(
    mut stack: ProfileStack,
    model: &ModelField,
    source: ProfileSource,
    points: &[GridPoint],
    time_range: Range<usize>,
    config: &ComparisonConfig,
) -> Result<ProfileStack> {
    let steps = time_range.end.saturating_sub(time_range.start);
    let time_range = time_window(time_range.start, steps, model.times().len());

    let n = points.len();
    for (k, &point) in points.iter().enumerate() {
        stack.entries.push(StackEntry {
            key: StackKey::Point(point),
            source,
            color_fraction: color_fraction(k, n),
            profile: model.profile_over(time_range.clone(), point, config.ncell_avg)?,
        });
    }

    Ok(stack)
}

/// A plan view slice ready for a color plot, with marked locations.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanViewChart {
    /// The data.
    pub view: PlanView,
    /// Chart title, the height of the level.
    pub title: String,
    /// Label for the color bar.
    pub color_label: String,
    /// Color scale limits.
    pub color_limits: (f64, f64),
    /// `(x, y)` of general markers.
    pub markers: Vec<(Meters, Meters)>,
    /// `(x, y)` of highlighted markers, e.g. the location of the mast.
    pub highlights: Vec<(Meters, Meters)>,
}

/// A plan view of one model level at one time step, with grid points marked.
pub fn plan_view(
    model: &ModelField,
    level: usize,
    time_index: usize,
    markers: &[GridPoint],
    highlights: &[GridPoint],
    config: &ComparisonConfig,
) -> Result<PlanViewChart> {
    let view = model.plan_view(level, time_index)?;

    let to_coords = |pnts: &[GridPoint]| -> Result<Vec<(Meters, Meters)>> {
        pnts.iter().map(|&pnt| view.coordinates(pnt)).collect()
    };
    let markers = to_coords(markers)?;
    let highlights = to_coords(highlights)?;

    let title = format!("Z {:.1} m AGL", view.height.unpack());
    debug!(%title, level, time_index, "plan view");

    Ok(PlanViewChart {
        title,
        color_label: format!("{} [m/s]", model.name().to_uppercase()),
        color_limits: config.color_limits,
        markers,
        highlights,
        view,
    })
}

/// The model grid column closest to the mast, and the distance to it.
///
/// Both the mast location and the grid longitudes and latitudes must be known.
pub fn tower_column(model: &ModelField, obs: &TowerObservations) -> Result<(GridPoint, Meters)> {
    let location = obs.location().ok_or(AnalysisError::MissingCoordinates)?;
    model.nearest_column(location)
}
