//! Wind speed observations from an instrumented mast, such as FINO 1.
use crate::{
    error::{AnalysisError, Result},
    geo::GeoPoint,
    profile::MeanProfile,
    time_index::find_time_index,
};
use chrono::NaiveDateTime;
use metfor::{Meters, MetersPSec};
use optional::Optioned;

/// Time series of wind speed profiles measured at fixed heights on a mast.
///
/// Speeds are stored by time, then by level. Gaps in the record are stored as missing values.
#[derive(Clone, Debug, Default)]
pub struct TowerObservations {
    // Station description
    station: Option<String>,
    location: Option<GeoPoint>,

    // Heights of the anemometers, the same for every time
    levels: Vec<Meters>,
    times: Vec<NaiveDateTime>,
    // [t][level]
    speeds: Vec<Vec<Optioned<MetersPSec>>>,
}

impl TowerObservations {
    /// Create a new set of observations.
    ///
    /// There must be one row of speeds per time, each with one value per level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use fino_profile_analysis::TowerObservations;
    /// use metfor::{Meters, MetersPSec};
    /// use optional::{none, some};
    ///
    /// let t0 = NaiveDate::from_ymd_opt(2015, 10, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    ///
    /// let obs = TowerObservations::new(
    ///     vec![Meters(33.0), Meters(60.0), Meters(101.0)],
    ///     vec![t0],
    ///     vec![vec![some(MetersPSec(7.1)), none(), some(MetersPSec(8.4))]],
    /// )
    /// .unwrap()
    /// .with_station_name("FINO 1".to_owned());
    ///
    /// let prof = obs.profile_at(t0).unwrap();
    /// assert_eq!(prof.valid_levels().count(), 2);
    /// ```
    pub fn new(
        levels: Vec<Meters>,
        times: Vec<NaiveDateTime>,
        speeds: Vec<Vec<Optioned<MetersPSec>>>,
    ) -> Result<Self> {
        if speeds.len() != times.len() {
            return Err(AnalysisError::ShapeMismatch {
                left: times.len(),
                right: speeds.len(),
            });
        }

        if let Some(row) = speeds.iter().find(|row| row.len() != levels.len()) {
            return Err(AnalysisError::ShapeMismatch {
                left: levels.len(),
                right: row.len(),
            });
        }

        Ok(TowerObservations {
            station: None,
            location: None,
            levels,
            times,
            speeds,
        })
    }

    /// Builder method to add a station name.
    #[inline]
    pub fn with_station_name<S>(mut self, name: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.station = Option::from(name);
        self
    }

    /// Builder method to add the location of the mast.
    #[inline]
    pub fn with_location<T>(mut self, location: T) -> Self
    where
        Option<GeoPoint>: From<T>,
    {
        self.location = Option::from(location);
        self
    }

    /// The station name, if known.
    #[inline]
    pub fn station_name(&self) -> Option<&str> {
        self.station.as_ref().map(|s| s.as_ref())
    }

    /// Location of the mast, if known.
    #[inline]
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Heights of the measurements.
    #[inline]
    pub fn levels(&self) -> &[Meters] {
        &self.levels
    }

    /// Time of each observation.
    #[inline]
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// The observed profile at a time step.
    pub fn profile_at_index(&self, time_index: usize) -> Result<MeanProfile> {
        let row = self
            .speeds
            .get(time_index)
            .ok_or(AnalysisError::IndexOutOfRange)?;

        MeanProfile::new(self.levels.clone(), row.clone())
    }

    /// The observed profile at a time, which must match exactly one observation time.
    pub fn profile_at(&self, time: NaiveDateTime) -> Result<MeanProfile> {
        let t = find_time_index(&self.times, time)?;
        self.profile_at_index(t)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use optional::{none, some};

    fn make_test_obs() -> TowerObservations {
        let t0 = NaiveDate::from_ymd_opt(2015, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let times = vec![t0, t0 + Duration::minutes(10)];
        let levels = vec![Meters(33.0), Meters(50.0), Meters(101.0)];
        let speeds = vec![
            vec![some(MetersPSec(6.0)), some(MetersPSec(7.0)), some(MetersPSec(8.0))],
            vec![none(), some(MetersPSec(7.5)), some(MetersPSec(9.0))],
        ];

        TowerObservations::new(levels, times, speeds).unwrap()
    }

    #[test]
    fn test_profile_at() {
        let obs = make_test_obs();
        let t1 = obs.times()[1];

        let prof = obs.profile_at(t1).unwrap();
        assert_eq!(prof.len(), 3);
        assert!(prof.speeds()[0].is_none());

        let prof = prof.to_vertical_profile().unwrap();
        assert_eq!(prof.heights(), &[Meters(50.0), Meters(101.0)]);

        let missing = t1 + Duration::minutes(10);
        assert_eq!(
            obs.profile_at(missing),
            Err(AnalysisError::TimeNotFound(missing))
        );
        assert_eq!(obs.profile_at_index(2), Err(AnalysisError::IndexOutOfRange));
    }

    #[test]
    fn test_new_checks_shapes() {
        let obs = make_test_obs();

        let short_row = vec![vec![some(MetersPSec(6.0))], vec![none()]];
        assert_eq!(
            TowerObservations::new(obs.levels().to_vec(), obs.times().to_vec(), short_row)
                .unwrap_err(),
            AnalysisError::ShapeMismatch { left: 3, right: 1 }
        );

        assert_eq!(
            TowerObservations::new(obs.levels().to_vec(), obs.times().to_vec(), vec![])
                .unwrap_err(),
            AnalysisError::ShapeMismatch { left: 2, right: 0 }
        );
    }

    #[test]
    fn test_station_info() {
        let obs = make_test_obs()
            .with_station_name("FINO 1".to_owned())
            .with_location(GeoPoint::new(6.5875, 54.0148));

        assert_eq!(obs.station_name(), Some("FINO 1"));
        assert_eq!(obs.location(), Some(GeoPoint::new(6.5875, 54.0148)));

        let obs = obs.with_station_name(None).with_location(None);
        assert!(obs.station_name().is_none());
        assert!(obs.location().is_none());
    }
}
