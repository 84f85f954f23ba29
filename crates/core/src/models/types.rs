//! Core value types and errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Points
// ============================================================================

/// A validated geographic position in degrees.
///
/// Latitude is within `[-90, 90]` and longitude within `[-180, 180]`; both
/// bounds are checked on construction and on deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

/// W9YB, West Lafayette
pub const DEFAULT_STATION: GeoPoint = GeoPoint {
    latitude: 40.42,
    longitude: -86.77,
};

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = MapError;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(MapError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(MapError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// True if `other` lies on the opposite side of the globe, where the
    /// great circle between the two is not unique.
    pub fn is_antipodal_to(&self, other: &GeoPoint) -> bool {
        let (lat1, lon1) = (self.latitude.to_radians(), self.longitude.to_radians());
        let (lat2, lon2) = (other.latitude.to_radians(), other.longitude.to_radians());

        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
        cos_angle <= -1.0 + 1e-12
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

impl TryFrom<geo::Point> for GeoPoint {
    type Error = MapError;

    fn try_from(p: geo::Point) -> Result<Self> {
        GeoPoint::new(p.y(), p.x())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Endpoints {0:?} and {1:?} are antipodal; the great circle between them is undefined")]
    AntipodalEndpoints(GeoPoint, GeoPoint),

    #[error("Invalid arc options: {0}")]
    InvalidArcOptions(String),

    #[error("Invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
