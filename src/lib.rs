#![warn(missing_docs)]
/*!
Functions and data types for comparing vertical wind speed profiles from large eddy simulations
(LES) with observations from offshore met masts such as FINO 1.

The core is a small numeric kernel:
 - [`great_circle_distance`] between two points, elementwise over lists of points with
   [`great_circle_distances`],
 - [`bulk_shear`] and [`integrated_shear`] over a vertical profile.

Around that are helpers that pull horizontally and temporally averaged profiles out of gridded
model output ([`ModelField`]) and mast time series ([`TowerObservations`]), and gather them into
plot ready products in the [`comparison`] module. Reading datasets from files and drawing the
charts are left to the caller.

Physical quantities use the unit types from [metfor](https://crates.io/crates/metfor), and
missing values are represented with [optional](https://crates.io/crates/optional).
*/

//
// API
//
pub use crate::{
    comparison::{
        color_fraction, plan_view, single_time_comparison, space_colored_difference,
        space_colored_stack, time_colored_difference, time_colored_stack, tower_column,
        ComparisonConfig, PlanViewChart, ProfileSource, ProfileStack, ShearSummary,
        SingleTimeComparison, StackEntry, StackKey,
    },
    error::{AnalysisError, Result},
    geo::{
        distances_with, great_circle_distance, great_circle_distances, haversine_distance,
        nearest_point, DistanceFormula, GeoPoint, EARTH_RADIUS,
    },
    model::{GridPoint, HorizontalWindow, ModelField, PlanView},
    observation::TowerObservations,
    profile::{MeanProfile, VerticalProfile},
    shear::{bulk_shear, integrated_shear, validate_profile},
    time_index::{find_time_index, time_window},
};

pub mod comparison;

//
// Internal use only
//
mod error;
mod geo;
mod model;
mod observation;
mod profile;
mod shear;
mod time_index;
mod utility;
