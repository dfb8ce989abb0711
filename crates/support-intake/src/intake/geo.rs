//! Surface distance on the WGS-84 ellipsoid.

use geo::{Distance, Geodesic, Point};

use super::domain::Coordinate;

const METERS_PER_MILE: f64 = 1_609.344;

/// Geodesic distance in miles between two valid coordinates.
///
/// Karney's algorithm converges for every pair, antipodes included.
pub fn distance_miles(from: Coordinate, to: Coordinate) -> f64 {
    Geodesic::distance(point(from), point(to)) / METERS_PER_MILE
}

// geo points are (x = longitude, y = latitude)
fn point(coordinate: Coordinate) -> Point<f64> {
    Point::new(coordinate.longitude, coordinate.latitude)
}
