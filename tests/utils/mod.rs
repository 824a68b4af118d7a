#![allow(dead_code)] // Not every test file uses every helper.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fino_profile_analysis::{GeoPoint, ModelField, TowerObservations};
use metfor::{Meters, MetersPSec};
use optional::{none, some, Optioned};

pub const NT: usize = 12;
pub const NY: usize = 30;
pub const NX: usize = 30;
pub const LEVELS: [f64; 6] = [20.0, 40.0, 60.0, 80.0, 100.0, 120.0];
pub const MAST_LEVELS: [f64; 5] = [33.0, 50.0, 70.0, 90.0, 101.0];

pub const FINO1: GeoPoint = GeoPoint {
    lon: 6.5875,
    lat: 54.0148,
};

pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);

    (val1 - val2).abs() < eps
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 10, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn model_times() -> Vec<NaiveDateTime> {
    (0..NT)
        .map(|t| start_time() + Duration::minutes(10 * t as i64))
        .collect()
}

/// Speed in the synthetic LES run, uniform in the horizontal.
pub fn model_speed(t: usize, height: f64) -> f64 {
    8.0 + 0.02 * height + 0.1 * t as f64
}

/// A horizontally uniform LES field with a linear profile that speeds up with time, plus an
/// offset so different runs can be told apart.
pub fn make_les_field(offset: f64) -> ModelField {
    let level_heights = (0..NT)
        .map(|_| LEVELS.iter().cloned().map(Meters).collect())
        .collect();
    let y = (0..NY).map(|i| Meters(50.0 * i as f64)).collect();
    let x = (0..NX).map(|j| Meters(50.0 * j as f64)).collect();

    let mut values = Vec::with_capacity(NT * LEVELS.len() * NY * NX);
    for t in 0..NT {
        for &h in LEVELS.iter() {
            for _ in 0..(NY * NX) {
                values.push(model_speed(t, h) + offset);
            }
        }
    }

    let lon_lat: Vec<GeoPoint> = (0..NY)
        .flat_map(|i| {
            (0..NX).map(move |j| GeoPoint::new(6.45 + 0.01 * j as f64, 53.9 + 0.01 * i as f64))
        })
        .collect();

    ModelField::new("wspd", model_times(), level_heights, y, x, values)
        .and_then(|fld| fld.with_coordinates(lon_lat))
        .expect("valid synthetic field")
}

/// Mast observations for the first 10 model times, the 101 m anemometer drops out at time index 3.
pub fn make_mast_obs() -> TowerObservations {
    let times: Vec<NaiveDateTime> = model_times().into_iter().take(10).collect();

    let speeds: Vec<Vec<Optioned<MetersPSec>>> = (0..times.len())
        .map(|t| {
            MAST_LEVELS
                .iter()
                .map(|&h| -> Optioned<MetersPSec> {
                    if t == 3 && h > 100.0 {
                        none()
                    } else {
                        some(MetersPSec(6.0 + 0.03 * h))
                    }
                })
                .collect()
        })
        .collect();

    TowerObservations::new(
        MAST_LEVELS.iter().cloned().map(Meters).collect(),
        times,
        speeds,
    )
    .expect("valid synthetic observations")
    .with_station_name("FINO 1".to_owned())
    .with_location(FINO1)
}
