//! Map configuration, loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decay::OperatorPalette;
use crate::geodesic::ArcOptions;
use crate::models::{DEFAULT_STATION, GeoPoint, MapError, Result};

/// Station location, operator colours and arc tuning.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Fixed end of every arc
    pub station: GeoPoint,
    pub palette: OperatorPalette,
    pub arc: ArcOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            station: DEFAULT_STATION,
            palette: OperatorPalette::default(),
            arc: ArcOptions::default(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(s)?;
        config.arc.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MapError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::OperatorTag;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();

        assert_eq!(config.station.latitude(), 40.42);
        assert_eq!(config.station.longitude(), -86.77);
        assert_eq!(config.arc.arc_points, 50);
        assert_eq!(config.arc.offset, -1.0);
        assert_eq!(config.palette.color_of(&OperatorTag::new("KD9YWS")), "blue");
    }

    #[test]
    fn test_partial_file() {
        let config = MapConfig::from_json_str(
            r#"{
                "station": {"latitude": 51.5, "longitude": -0.12},
                "arc": {"arc_points": 100}
            }"#,
        )
        .unwrap();

        assert_eq!(config.station.latitude(), 51.5);
        assert_eq!(config.arc.arc_points, 100);
        assert_eq!(config.arc.offset, -1.0);
        assert_eq!(config.palette, OperatorPalette::default());
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(MapConfig::from_json_str("{}").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_invalid_station_rejected() {
        let err = MapConfig::from_json_str(r#"{"station": {"latitude": 95.0, "longitude": 0.0}}"#)
            .unwrap_err();
        assert!(matches!(err, MapError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MapConfig::from_path("/nonexistent/qso-map.json").unwrap_err();
        assert!(matches!(err, MapError::ConfigRead { .. }));
    }
}
