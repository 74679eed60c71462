//! Spherical math for arc interpolation, measurements and render space.

use crate::models::{Coordinate, Point};
use std::f64::consts::PI;

/// Mean earth radius used for geodesic length and area.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Sphere radius of the Web-Mercator projection.
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Width of one world copy in render units.
pub const WORLD_WIDTH: f64 = 2.0 * PI * MERCATOR_RADIUS_M;

/// Latitude beyond which Web-Mercator is clipped.
const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    MEAN_EARTH_RADIUS_M * central_angle(lat1, lon1, lat2, lon2)
}

/// Angle subtended at the sphere's center by two points, in radians.
pub fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Point at fraction `f` along the great circle between `start` and `end`.
///
/// `angle` is the precomputed central angle between the endpoints and must
/// be neither zero nor π.
pub fn interpolate_great_circle(
    start: Coordinate,
    end: Coordinate,
    angle: f64,
    f: f64,
) -> Coordinate {
    let (lat0, lon0) = (start.lat.to_radians(), start.lon.to_radians());
    let (lat1, lon1) = (end.lat.to_radians(), end.lon.to_radians());

    let a = ((1.0 - f) * angle).sin() / angle.sin();
    let b = (f * angle).sin() / angle.sin();

    let x = a * lat0.cos() * lon0.cos() + b * lat1.cos() * lon1.cos();
    let y = a * lat0.cos() * lon0.sin() + b * lat1.cos() * lon1.sin();
    let z = a * lat0.sin() + b * lat1.sin();

    Coordinate {
        lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lon: y.atan2(x).to_degrees(),
    }
}

/// Project a geographic position into Web-Mercator render space.
pub fn to_web_mercator(coord: Coordinate) -> Point {
    let lat = coord.lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let x = MERCATOR_RADIUS_M * coord.lon.to_radians();
    let y = MERCATOR_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Point::new(x, y)
}

/// Index of the world copy that contains `center_x`.
pub fn world_wrap_offset(center_x: f64, world_width: f64) -> f64 {
    if !world_width.is_finite() || world_width <= 0.0 || !center_x.is_finite() {
        return 0.0;
    }
    (center_x / world_width).floor()
}

/// Geodesic length of a polyline in meters.
pub fn geodesic_length(coords: &[Coordinate]) -> f64 {
    coords
        .windows(2)
        .map(|w| haversine_distance(w[0].lat, w[0].lon, w[1].lat, w[1].lon))
        .fold(0.0, |total, d| total + d)
}

/// Area of a polygon ring on the sphere in square meters.
///
/// The ring may be open or closed; orientation does not matter.
pub fn geodesic_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut prev = ring[ring.len() - 1];
    for &curr in ring {
        area += (curr.lon - prev.lon).to_radians()
            * (2.0 + prev.lat.to_radians().sin() + curr.lat.to_radians().sin());
        prev = curr;
    }

    (area * MEAN_EARTH_RADIUS_M * MEAN_EARTH_RADIUS_M / 2.0).abs()
}

/// Mean of the ring's distinct vertices, used to place area labels.
pub fn ring_center(ring: &[Coordinate]) -> Option<Coordinate> {
    let vertices = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if vertices.is_empty() {
        return None;
    }

    let count = vertices.len() as f64;
    let (sum_lat, sum_lon) = vertices
        .iter()
        .fold((0.0, 0.0), |acc, c| (acc.0 + c.lat, acc.1 + c.lon));
    Some(Coordinate::new(sum_lat / count, sum_lon / count))
}
