//! Splitting a polyline where it crosses the display seam.
//!
//! The map draws longitudes in `[0, 360)`, so its seam is the prime meridian:
//! a step from -1° to +1° becomes a jump from 359° to 1° once negative
//! longitudes are wrapped. Crossings of ±180° need no treatment in that space.

use geo::{Coord, coord};
use itertools::Itertools;
use serde::Serialize;

/// Direction in which a pair of consecutive points crosses longitude 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SeamCrossing {
    /// From `(-90, 0)` to `[0, 90)`
    WestToEast,
    /// From `[0, 90)` to `(-90, 0)`
    EastToWest,
}

impl SeamCrossing {
    pub fn classify(from_lon: f64, to_lon: f64) -> Option<Self> {
        let west = |lon: f64| lon > -90.0 && lon < 0.0;
        let east = |lon: f64| (0.0..90.0).contains(&lon);

        if west(from_lon) && east(to_lon) {
            Some(Self::WestToEast)
        } else if east(from_lon) && west(to_lon) {
            Some(Self::EastToWest)
        } else {
            None
        }
    }

    /// Longitudes of the seam point closing the first piece and opening the
    /// second, chosen so both pieces stay continuous after wrapping.
    fn seam_longitudes(self) -> (f64, f64) {
        match self {
            Self::WestToEast => (360.0, 0.0),
            Self::EastToWest => (0.0, 360.0),
        }
    }
}

/// First crossing scanning from the start: the index `i` of the pair
/// `(points[i], points[i + 1])` and its direction.
pub fn find_crossing(points: &[Coord]) -> Option<(usize, SeamCrossing)> {
    points
        .iter()
        .tuple_windows()
        .enumerate()
        .find_map(|(i, (a, b))| SeamCrossing::classify(a.x, b.x).map(|c| (i, c)))
}

/// Split `points` at the first seam crossing, if any.
///
/// The seam latitude is interpolated linearly between the two points either
/// side of longitude 0 and appended to the first piece and prepended to the
/// second.
pub fn split_at_seam(mut points: Vec<Coord>) -> (Vec<Vec<Coord>>, Option<SeamCrossing>) {
    let Some((i, crossing)) = find_crossing(&points) else {
        return (vec![points], None);
    };

    let (a, b) = (points[i], points[i + 1]);
    let t = a.x / (a.x - b.x);
    let lat = (1.0 - t) * a.y + t * b.y;
    let (tail_lon, head_lon) = crossing.seam_longitudes();

    let mut second = points.split_off(i + 1);
    points.push(coord! { x: tail_lon, y: lat });
    second.insert(0, coord! { x: head_lon, y: lat });

    (vec![points, second], Some(crossing))
}

/// Wrap negative longitudes into `[0, 360)`.
pub fn wrap_longitudes(points: &mut [Coord]) {
    for c in points.iter_mut().filter(|c| c.x < 0.0) {
        c.x += 360.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(y, x)| coord! { x: x, y: y }).collect()
    }

    #[test]
    fn test_classify() {
        assert_eq!(SeamCrossing::classify(-1.0, 0.0), Some(SeamCrossing::WestToEast));
        assert_eq!(SeamCrossing::classify(-89.9, 89.9), Some(SeamCrossing::WestToEast));
        assert_eq!(SeamCrossing::classify(0.0, -0.5), Some(SeamCrossing::EastToWest));
        assert_eq!(SeamCrossing::classify(45.0, -45.0), Some(SeamCrossing::EastToWest));

        // Band edges
        assert_eq!(SeamCrossing::classify(-90.0, 10.0), None);
        assert_eq!(SeamCrossing::classify(-10.0, 90.0), None);
        assert_eq!(SeamCrossing::classify(90.0, -10.0), None);

        // Antimeridian and same-side steps
        assert_eq!(SeamCrossing::classify(179.0, -179.0), None);
        assert_eq!(SeamCrossing::classify(-179.0, 179.0), None);
        assert_eq!(SeamCrossing::classify(0.0, 0.0), None);
        assert_eq!(SeamCrossing::classify(-5.0, -1.0), None);
    }

    #[test]
    fn test_find_first_crossing() {
        let points = line(&[(0.0, -3.0), (0.0, -1.0), (0.0, 1.0), (0.0, -1.0)]);
        assert_eq!(find_crossing(&points), Some((1, SeamCrossing::WestToEast)));

        let points = line(&[(0.0, 3.0), (0.0, 1.0), (0.0, -1.0), (0.0, 1.0)]);
        assert_eq!(find_crossing(&points), Some((1, SeamCrossing::EastToWest)));

        assert_eq!(find_crossing(&line(&[(0.0, 10.0), (0.0, 20.0)])), None);
        assert_eq!(find_crossing(&line(&[(0.0, 10.0)])), None);
        assert_eq!(find_crossing(&[]), None);
    }

    #[test]
    fn test_split_west_to_east() {
        let points = line(&[(0.0, -4.0), (2.0, -1.0), (4.0, 3.0), (6.0, 7.0)]);
        let (pieces, crossing) = split_at_seam(points);

        assert_eq!(crossing, Some(SeamCrossing::WestToEast));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 3);
        assert_eq!(pieces[1].len(), 3);

        // t = -1 / (-1 - 3) = 0.25 -> lat = 0.75 * 2 + 0.25 * 4
        let seam_lat = 2.5;
        assert_eq!(pieces[0][2].x, 360.0);
        assert_relative_eq!(pieces[0][2].y, seam_lat);
        assert_eq!(pieces[1][0].x, 0.0);
        assert_relative_eq!(pieces[1][0].y, seam_lat);
        assert_eq!(pieces[1][1], coord! { x: 3.0, y: 4.0 });
    }

    #[test]
    fn test_split_east_to_west() {
        let points = line(&[(10.0, 2.0), (10.0, -2.0)]);
        let (pieces, crossing) = split_at_seam(points);

        assert_eq!(crossing, Some(SeamCrossing::EastToWest));
        assert_eq!(pieces[0], line(&[(10.0, 2.0), (10.0, 0.0)]));
        assert_eq!(pieces[1], line(&[(10.0, 360.0), (10.0, -2.0)]));
    }

    #[test]
    fn test_split_without_crossing() {
        let points = line(&[(10.0, 170.0), (10.0, 180.0), (10.0, -170.0)]);
        let (pieces, crossing) = split_at_seam(points.clone());

        assert_eq!(crossing, None);
        assert_eq!(pieces, vec![points]);
    }

    #[test]
    fn test_wrap_longitudes() {
        let mut points = line(&[
            (0.0, -170.0),
            (0.0, -0.5),
            (0.0, 0.0),
            (0.0, 360.0),
            (0.0, 180.0),
        ]);
        wrap_longitudes(&mut points);

        let lons: Vec<f64> = points.iter().map(|c| c.x).collect();
        assert_eq!(lons, vec![190.0, 359.5, 0.0, 360.0, 180.0]);
    }
}
