//! Distances between points on the earth's surface.
//!
//! The default distance, [`great_circle_distance`], reproduces the formula the FINO comparison
//! studies were originally analyzed with. It skips the square root in the haversine formula, so
//! it is not the textbook great-circle distance. It is monotonic in the true distance, so it is
//! still suitable for finding the closest grid column to a station. The textbook form is
//! available as [`haversine_distance`], and [`DistanceFormula`] picks between the two at runtime.
use crate::error::{AnalysisError, Result};
use metfor::{Meters, Quantity};
use strum_macros::EnumIter;

/// Radius of the earth's curvature used for all distance calculations.
pub const EARTH_RADIUS: Meters = Meters(6.371e6);

/// A longitude and latitude pair in degrees.
///
/// Longitudes outside of -180 to 180 are accepted as is, wrapping them is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude in degrees.
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Convert from a `(lon, lat)` tuple.
    fn from((lon, lat): (f64, f64)) -> Self {
        GeoPoint { lon, lat }
    }
}

/// Which formula to use when calculating distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash)]
pub enum DistanceFormula {
    /// `2 R asin(a)`, see [`great_circle_distance`].
    AsImplemented,
    /// `2 R asin(sqrt(a))`, the textbook haversine formula.
    Haversine,
}

impl Default for DistanceFormula {
    fn default() -> Self {
        DistanceFormula::AsImplemented
    }
}

impl DistanceFormula {
    /// Distance between two points using this formula.
    #[inline]
    pub fn distance(self, pnt1: GeoPoint, pnt2: GeoPoint) -> Meters {
        match self {
            DistanceFormula::AsImplemented => great_circle_distance(pnt1, pnt2),
            DistanceFormula::Haversine => haversine_distance(pnt1, pnt2),
        }
    }
}

// The `a` term shared by both formulas.
#[inline]
fn haversine_term(pnt1: GeoPoint, pnt2: GeoPoint) -> f64 {
    let lon1 = pnt1.lon.to_radians();
    let lat1 = pnt1.lat.to_radians();
    let lon2 = pnt2.lon.to_radians();
    let lat2 = pnt2.lat.to_radians();

    ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2)
}

/// Distance between two points as calculated in the FINO comparison studies.
///
/// `d = 2 R asin( sin²(Δlat/2) + cos(lat1) cos(lat2) sin²(Δlon/2) )`
///
/// Note the missing square root compared to the haversine formula. There is no error path,
/// invalid input results in NaN.
///
/// # Examples
///
/// ```rust
/// use fino_profile_analysis::{great_circle_distance, GeoPoint};
/// use metfor::Quantity;
///
/// let fino1 = GeoPoint::new(6.5875, 54.0148);
/// assert_eq!(great_circle_distance(fino1, fino1).unpack(), 0.0);
/// ```
#[inline]
pub fn great_circle_distance(pnt1: GeoPoint, pnt2: GeoPoint) -> Meters {
    let a = haversine_term(pnt1, pnt2);
    Meters(2.0 * EARTH_RADIUS.unpack() * a.asin())
}

/// The textbook haversine great-circle distance between two points.
#[inline]
pub fn haversine_distance(pnt1: GeoPoint, pnt2: GeoPoint) -> Meters {
    let a = haversine_term(pnt1, pnt2);
    Meters(2.0 * EARTH_RADIUS.unpack() * a.sqrt().asin())
}

/// Elementwise [`great_circle_distance`] between two lists of points.
///
/// If one of the lists has a single point, it is broadcast against every point in the other.
/// Otherwise the lists must be the same length.
pub fn great_circle_distances(pnts1: &[GeoPoint], pnts2: &[GeoPoint]) -> Result<Vec<Meters>> {
    distances_with(DistanceFormula::AsImplemented, pnts1, pnts2)
}

/// Elementwise distances with the specified formula, broadcasting like
/// [`great_circle_distances`].
pub fn distances_with(
    formula: DistanceFormula,
    pnts1: &[GeoPoint],
    pnts2: &[GeoPoint],
) -> Result<Vec<Meters>> {
    let dist = |(&p1, &p2): (&GeoPoint, &GeoPoint)| formula.distance(p1, p2);

    match (pnts1.len(), pnts2.len()) {
        (n, m) if n == m => Ok(pnts1.iter().zip(pnts2).map(dist).collect()),
        (1, _) => Ok(pnts2
            .iter()
            .map(|&p2| formula.distance(pnts1[0], p2))
            .collect()),
        (_, 1) => Ok(pnts1
            .iter()
            .map(|&p1| formula.distance(p1, pnts2[0]))
            .collect()),
        (left, right) => Err(AnalysisError::ShapeMismatch { left, right }),
    }
}

/// Find the index of, and distance to, the candidate closest to the target.
///
/// Candidates with a NaN distance are ignored. Returns `None` if no candidate has a valid
/// distance.
pub fn nearest_point(target: GeoPoint, candidates: &[GeoPoint]) -> Option<(usize, Meters)> {
    candidates
        .iter()
        .map(|&pnt| great_circle_distance(target, pnt).unpack())
        .enumerate()
        .filter(|(_, d)| !d.is_nan())
        .fold(None, |closest: Option<(usize, f64)>, (i, d)| match closest {
            Some((_, best)) if best <= d => closest,
            _ => Some((i, d)),
        })
        .map(|(i, d)| (i, Meters(d)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;
    use strum::IntoEnumIterator;

    const FINO1: GeoPoint = GeoPoint {
        lon: 6.5875,
        lat: 54.0148,
    };

    #[test]
    fn test_distance_to_self_is_zero() {
        for formula in DistanceFormula::iter() {
            for &pnt in &[FINO1, GeoPoint::new(0.0, 0.0), GeoPoint::new(-120.0, -45.0)] {
                assert_eq!(formula.distance(pnt, pnt).unpack(), 0.0);
            }
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let other = GeoPoint::new(7.0, 54.0);
        for formula in DistanceFormula::iter() {
            assert_eq!(
                formula.distance(FINO1, other).unpack(),
                formula.distance(other, FINO1).unpack()
            );
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let origin = GeoPoint::new(0.0, 0.0);
        let north = GeoPoint::new(0.0, 1.0);

        // 2 R asin(sin²(0.5°)), no square root
        let expected = 2.0 * 6.371e6 * 0.5f64.to_radians().sin().powi(2).asin();
        let d = great_circle_distance(origin, north).unpack();
        assert!(approx_equal(d, expected, 1.0e-9));
        assert!(approx_equal(d, 970.334_159_569, 1.0e-6));

        let d = haversine_distance(origin, north).unpack();
        assert!(approx_equal(d, 111_194.926_644_558, 1.0e-6));
    }

    #[test]
    fn test_near_fino1() {
        let grid_col = GeoPoint::new(7.0, 54.0);
        let d = great_circle_distance(FINO1, grid_col).unpack();
        assert!(approx_equal(d, 57.237_022_674, 1.0e-6));

        let d = haversine_distance(FINO1, grid_col).unpack();
        assert!(approx_equal(d, 27_005.837_053_108, 1.0e-6));
    }

    #[test]
    fn test_unwrapped_longitude_is_accepted() {
        let east = GeoPoint::new(350.0, 10.0);
        let west = GeoPoint::new(-10.0, 10.0);
        assert!(approx_equal(
            great_circle_distance(east, west).unpack(),
            0.0,
            1.0e-6
        ));
    }

    #[test]
    fn test_nan_propagates() {
        let bad = GeoPoint::new(std::f64::NAN, 10.0);
        assert!(great_circle_distance(FINO1, bad).unpack().is_nan());
    }

    #[test]
    fn test_elementwise_matches_scalar() {
        let pnts1 = [FINO1, GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, -20.0)];
        let pnts2 = [
            GeoPoint::new(7.0, 54.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(11.0, -21.0),
        ];

        let dists = great_circle_distances(&pnts1, &pnts2).unwrap();
        assert_eq!(dists.len(), 3);
        for (d, (&p1, &p2)) in dists.iter().zip(pnts1.iter().zip(&pnts2)) {
            assert_eq!(d.unpack(), great_circle_distance(p1, p2).unpack());
        }
    }

    #[test]
    fn test_elementwise_broadcasts_single_point() {
        let pnts = [GeoPoint::new(7.0, 54.0), GeoPoint::new(6.0, 54.5)];

        let dists = great_circle_distances(&[FINO1], &pnts).unwrap();
        let flipped = great_circle_distances(&pnts, &[FINO1]).unwrap();
        for (i, &p) in pnts.iter().enumerate() {
            assert_eq!(dists[i].unpack(), great_circle_distance(FINO1, p).unpack());
            assert_eq!(flipped[i].unpack(), great_circle_distance(p, FINO1).unpack());
        }
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let pnts1 = [FINO1, FINO1];
        let pnts2 = [FINO1, FINO1, FINO1];
        assert_eq!(
            great_circle_distances(&pnts1, &pnts2),
            Err(AnalysisError::ShapeMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn test_nearest_point() {
        let candidates = [
            GeoPoint::new(8.0, 54.0),
            GeoPoint::new(std::f64::NAN, 54.0),
            GeoPoint::new(6.6, 54.0),
            GeoPoint::new(6.0, 55.0),
        ];

        let (idx, dist) = nearest_point(FINO1, &candidates).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(dist.unpack(), great_circle_distance(FINO1, candidates[2]).unpack());

        assert!(nearest_point(FINO1, &[]).is_none());
    }
}
