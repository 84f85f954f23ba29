//! Sampling points along a great circle.

use geo::{Coord, Haversine, InterpolatePoint, coord};
use itertools::Itertools;

use crate::models::{GeoPoint, MapError, Result};

/// The great circle through two non-antipodal points.
#[derive(Clone, Copy, Debug)]
pub struct GreatCircle {
    start: GeoPoint,
    end: GeoPoint,
}

impl GreatCircle {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Result<Self> {
        if start.is_antipodal_to(&end) {
            return Err(MapError::AntipodalEndpoints(start, end));
        }

        Ok(Self { start, end })
    }

    /// Point at `ratio` of the way from start to end (x = longitude, y = latitude).
    ///
    /// Longitudes come back in `(-180, 180]`, except that the endpoints are
    /// returned exactly as given.
    pub fn interpolate(&self, ratio: f64) -> Coord {
        Haversine
            .point_at_ratio_between(self.start.into(), self.end.into(), ratio)
            .into()
    }

    /// `arc_points` evenly spaced points from start to end inclusive.
    ///
    /// Fewer than three points degenerates to the two endpoints. A positive
    /// `offset` enables the dateline cut described on [`cut_at_dateline`].
    pub fn sample(&self, arc_points: usize, offset: f64) -> Vec<Coord> {
        let points = if arc_points <= 2 {
            vec![
                geo::Point::from(self.start).into(),
                geo::Point::from(self.end).into(),
            ]
        } else {
            let last = (arc_points - 1) as f64;
            (0..arc_points)
                .map(|i| self.interpolate(i as f64 / last))
                .collect()
        };

        cut_at_dateline(points, offset)
    }
}

/// Cut a polyline at its first jump across the ±180° line, closing it on the
/// dateline.
///
/// `offset` is the distance in degrees from ±180 within which a jump counts.
/// The cut only happens when every other step is shorter than `offset`; zero
/// or negative offsets leave the polyline untouched.
pub fn cut_at_dateline(mut points: Vec<Coord>, offset: f64) -> Vec<Coord> {
    if offset <= 0.0 {
        return points;
    }

    let left_border = 180.0 - offset;
    let right_border = -180.0 + offset;
    let diff_space = 360.0 - offset;

    let is_jump = |prev: f64, x: f64| {
        (x - prev).abs() > diff_space
            && ((x > left_border && prev < right_border)
                || (prev > left_border && x < right_border))
    };

    let mut jump = None;
    let mut max_small_step = 0.0_f64;
    for (i, (a, b)) in points.iter().tuple_windows().enumerate() {
        if is_jump(a.x, b.x) {
            jump.get_or_insert(i);
        } else {
            max_small_step = max_small_step.max((b.x - a.x).abs());
        }
    }

    let Some(i) = jump else {
        return points;
    };
    if max_small_step >= offset {
        return points;
    }

    let (prev, next) = (points[i], points[i + 1]);
    let (mut x1, mut y1, mut x2, mut y2) = (prev.x, prev.y, next.x, next.y);
    if x1 < right_border && x2 > left_border {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
    }
    if x1 > left_border && x2 < right_border {
        x2 += 360.0;
    }

    points.truncate(i + 1);
    if x1 <= 180.0 && x2 >= 180.0 && x1 < x2 {
        let ratio = (180.0 - x1) / (x2 - x1);
        let y = ratio * y2 + (1.0 - ratio) * y1;
        let x = if prev.x > left_border { 180.0 } else { -180.0 };
        points.push(coord! { x: x, y: y });
    }

    points
}
