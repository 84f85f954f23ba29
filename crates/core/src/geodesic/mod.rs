//! Great-circle arcs laid out for a map that repeats horizontally.
//!
//! [`GeodesicPathBuilder::build`] samples the great circle between two
//! points, splits it where it crosses the display seam, wraps longitudes into
//! `[0, 360)` and appends a copy of every piece shifted one world to the
//! west. Each returned [`PathSegment`] can be drawn as an independent
//! straight-line polyline.

pub mod sample;
pub mod seam;

use geo::{Coord, LineString, Translate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{GeoPoint, MapError, Result};

pub use sample::GreatCircle;
pub use seam::SeamCrossing;

/// Longitude span of one world copy
pub const WORLD_WIDTH: f64 = 360.0;

pub const DEFAULT_ARC_POINTS: usize = 50;
pub const DEFAULT_OFFSET: f64 = -1.0;

/// Tuning for arc generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcOptions {
    /// Number of points sampled along the great circle
    pub arc_points: usize,
    /// Dateline offset handed to the sampler; see
    /// [`sample::cut_at_dateline`]. Non-positive values keep the full arc.
    pub offset: f64,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self {
            arc_points: DEFAULT_ARC_POINTS,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ArcOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.offset.is_finite() {
            return Err(MapError::InvalidArcOptions(format!(
                "offset must be finite, got {}",
                self.offset
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

/// A polyline in display coordinates (x = longitude, y = latitude).
///
/// Longitudes may lie outside `[-180, 180]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathSegment(LineString<f64>);

impl PathSegment {
    pub fn new(coords: Vec<Coord>) -> Self {
        Self(LineString::new(coords))
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.0
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.0.coords()
    }

    pub fn longitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.coords().map(|c| c.x)
    }

    pub fn len(&self) -> usize {
        self.0.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// `(latitude, longitude)` pairs, the order map renderers expect
    pub fn lat_lngs(&self) -> Vec<(f64, f64)> {
        self.coords().map(|c| (c.y, c.x)).collect()
    }

    /// Largest longitude change between consecutive points
    pub fn max_longitude_step(&self) -> f64 {
        self.0
            .lines()
            .map(|l| (l.end.x - l.start.x).abs())
            .fold(0.0, f64::max)
    }

    /// The same segment moved `delta` degrees east
    pub fn shifted(&self, delta: f64) -> Self {
        Self(self.0.translate(delta, 0.0))
    }
}

/// Every segment needed to draw one arc across the visible world copies.
///
/// Segments come in pairs: each piece in `[0, 360]` followed by its copy
/// shifted by -360.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcResult {
    segments: Vec<PathSegment>,
    crossing: Option<SeamCrossing>,
}

impl ArcResult {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Direction of the seam crossing that split the arc, if any
    pub fn crossing(&self) -> Option<SeamCrossing> {
        self.crossing
    }

    /// Segments of the primary copy (longitudes in `[0, 360]`)
    pub fn primary(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter().step_by(2)
    }

    /// Segments of the copy one world to the west
    pub fn western_copy(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter().skip(1).step_by(2)
    }
}

impl<'a> IntoIterator for &'a ArcResult {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct GeodesicPathBuilder {
    options: ArcOptions,
}

impl GeodesicPathBuilder {
    pub fn new(options: ArcOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ArcOptions {
        &self.options
    }

    /// Build the display geometry of the great-circle arc from `start` to `end`.
    ///
    /// Returns two segments, or four when the arc crosses the display seam.
    /// `start == end` gives a degenerate arc; antipodal endpoints are an error.
    pub fn build(&self, start: GeoPoint, end: GeoPoint) -> Result<ArcResult> {
        let circle = GreatCircle::new(start, end)?;
        let points = circle.sample(self.options.arc_points, self.options.offset);

        let (pieces, crossing) = seam::split_at_seam(points);

        let segments: Vec<PathSegment> = pieces
            .into_iter()
            .map(|mut piece| {
                seam::wrap_longitudes(&mut piece);
                PathSegment::new(piece)
            })
            .flat_map(|segment| {
                let copy = segment.shifted(-WORLD_WIDTH);
                [segment, copy]
            })
            .collect();

        debug!(
            ?start,
            ?end,
            ?crossing,
            segments = segments.len(),
            "built great-circle arc"
        );

        Ok(ArcResult { segments, crossing })
    }
}
