//! Great-circle arc generation.
//!
//! The animation only needs "origin/destination in, render-space pieces
//! out", expressed by [`GreatCircleProvider`]. [`GreatCircle`] is the
//! spherical implementation: it interpolates the arc, splits it where it
//! crosses the antimeridian and projects each piece to Web-Mercator.

use std::f64::consts::PI;

use crate::error::ArcError;
use crate::models::{Coordinate, Point};
use crate::spatial::{central_angle, interpolate_great_circle, to_web_mercator};

const ANGLE_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcOptions {
    /// Degrees from the antimeridian within which a jump counts as a
    /// crossing and the arc is split
    pub offset: f64,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self { offset: 10.0 }
    }
}

/// Source of arc geometry already split into renderable pieces.
pub trait GreatCircleProvider {
    fn generate_arc(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        segments: usize,
        options: &ArcOptions,
    ) -> Result<Vec<Vec<Point>>, ArcError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl GreatCircle {
    /// Geographic arc pieces, before projection.
    pub fn geographic_arc(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        segments: usize,
        options: &ArcOptions,
    ) -> Result<Vec<Vec<Coordinate>>, ArcError> {
        let finite = [origin.lat, origin.lon, destination.lat, destination.lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ArcError::NonFinite);
        }

        let angle = central_angle(origin.lat, origin.lon, destination.lat, destination.lon);
        if angle < ANGLE_EPS {
            return Err(ArcError::Degenerate);
        }
        if (PI - angle).abs() < ANGLE_EPS {
            return Err(ArcError::Antipodal);
        }

        let points = if segments <= 2 {
            vec![origin, destination]
        } else {
            let step = 1.0 / (segments - 1) as f64;
            (0..segments)
                .map(|i| interpolate_great_circle(origin, destination, angle, step * i as f64))
                .collect()
        };

        Ok(split_at_dateline(points, options.offset))
    }
}

impl GreatCircleProvider for GreatCircle {
    fn generate_arc(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        segments: usize,
        options: &ArcOptions,
    ) -> Result<Vec<Vec<Point>>, ArcError> {
        let pieces = self.geographic_arc(origin, destination, segments, options)?;
        Ok(pieces
            .into_iter()
            .map(|piece| piece.into_iter().map(to_web_mercator).collect())
            .collect())
    }
}

/// Split a polyline where consecutive longitudes jump across ±180°.
///
/// Only splits when every other step is smaller than `offset`; a coarse
/// line is left whole since its jumps cannot be told apart from crossings.
fn split_at_dateline(points: Vec<Coordinate>, offset: f64) -> Vec<Vec<Coordinate>> {
    let left_border = 180.0 - offset;
    let right_border = -180.0 + offset;
    let diff_space = 360.0 - offset;

    let crosses = |prev: f64, next: f64| {
        (next - prev).abs() > diff_space
            && ((next > left_border && prev < right_border)
                || (prev > left_border && next < right_border))
    };

    let mut has_crossing = false;
    let mut max_small_diff: f64 = 0.0;
    for w in points.windows(2) {
        if crosses(w[0].lon, w[1].lon) {
            has_crossing = true;
        } else {
            max_small_diff = max_small_diff.max((w[1].lon - w[0].lon).abs());
        }
    }

    if !has_crossing || max_small_diff >= offset {
        return vec![points];
    }

    let mut pieces = Vec::new();
    let mut current = vec![points[0]];
    for w in points.windows(2) {
        let (prev, next) = (w[0], w[1]);
        if crosses(prev.lon, next.lon) {
            let edge = if prev.lon > 0.0 { 180.0 } else { -180.0 };
            let unwrapped = next.lon + 2.0 * edge;
            let t = (edge - prev.lon) / (unwrapped - prev.lon);
            let lat = prev.lat + t * (next.lat - prev.lat);

            current.push(Coordinate::new(lat, edge));
            pieces.push(std::mem::take(&mut current));
            current.push(Coordinate::new(lat, -edge));
        }
        current.push(next);
    }
    pieces.push(current);
    pieces
}
