//! Age-based marker styling.
//!
//! Markers shrink and fade as their contact gets older. Radius and opacity are
//! two independent step functions of the same age, so a marker can change
//! size without changing opacity and vice versa.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geodesic::WORLD_WIDTH;
use crate::identifiers::{ContactId, OperatorTag};
use crate::models::{ContactDetails, ContactEvent};

/// `(upper bound in seconds, radius in px)`, checked in order
pub const RADIUS_BANDS: [(f64, f64); 3] = [(60.0, 5.0), (600.0, 4.0), (3600.0, 3.0)];
pub const STALE_RADIUS_PX: f64 = 2.0;

/// `(upper bound in seconds, fill opacity)`, checked in order
pub const OPACITY_BANDS: [(f64, f64); 2] = [(120.0, 0.9), (300.0, 0.7)];
pub const STALE_OPACITY: f64 = 0.45;

fn step(bands: &[(f64, f64)], stale: f64, age_secs: f64) -> f64 {
    bands
        .iter()
        .find(|(limit, _)| age_secs < *limit)
        .map_or(stale, |&(_, value)| value)
}

pub fn radius_px(age_secs: f64) -> f64 {
    step(&RADIUS_BANDS, STALE_RADIUS_PX, age_secs)
}

pub fn fill_opacity(age_secs: f64) -> f64 {
    step(&OPACITY_BANDS, STALE_OPACITY, age_secs)
}

/// Seconds elapsed between an event and `now`, both in epoch milliseconds.
///
/// Negative for events stamped in the future.
pub fn age_seconds(timestamp_millis: i64, now_millis: i64) -> f64 {
    now_millis.saturating_sub(timestamp_millis) as f64 / 1000.0
}

/// Longitude at which the same marker appears on the neighbouring world copy.
///
/// Not idempotent: applying it twice moves the marker back.
pub fn duplicate_longitude(longitude: f64) -> f64 {
    if longitude < 0.0 {
        longitude + WORLD_WIDTH
    } else {
        longitude - WORLD_WIDTH
    }
}

// ============================================================================
// Colours
// ============================================================================

/// Operator to colour table with a fallback for everyone else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatorPalette {
    #[serde(default)]
    colors: HashMap<OperatorTag, String>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    "black".to_owned()
}

impl Default for OperatorPalette {
    fn default() -> Self {
        Self::new(default_fallback())
            .with_color("KD9YWS", "blue")
            .with_color("KD9MEQ", "green")
    }
}

impl OperatorPalette {
    /// An empty palette that colours everything `fallback`
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            colors: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with_color(
        mut self,
        operator: impl Into<OperatorTag>,
        color: impl Into<String>,
    ) -> Self {
        self.colors.insert(operator.into(), color.into());
        self
    }

    pub fn color_of(&self, operator: &OperatorTag) -> &str {
        self.colors
            .get(operator)
            .map_or(self.fallback.as_str(), String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

// ============================================================================
// Policy
// ============================================================================

/// How one marker should be drawn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerVisual {
    pub contact_id: ContactId,
    pub latitude: f64,
    pub display_longitude: f64,
    pub radius_px: f64,
    pub fill_opacity: f64,
    pub color: String,
    /// True for the copy drawn on the neighbouring world
    pub world_copy: bool,
    pub operator: OperatorTag,
    pub details: ContactDetails,
}

impl MarkerVisual {
    /// The same marker on the neighbouring world copy
    pub fn world_copy(&self) -> MarkerVisual {
        MarkerVisual {
            display_longitude: duplicate_longitude(self.display_longitude),
            world_copy: true,
            ..self.clone()
        }
    }

    /// Two-line popup: `CALL - OPERATOR` then `kHz - source`
    pub fn popup_text(&self) -> String {
        format!(
            "{} - {}\n{} - {}",
            self.details.recv_callsign,
            self.operator,
            self.details.freq_khz(),
            self.details.location_source
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct MarkerDecayPolicy {
    palette: OperatorPalette,
}

impl MarkerDecayPolicy {
    pub fn new(palette: OperatorPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &OperatorPalette {
        &self.palette
    }

    pub fn visual_for(&self, event: &ContactEvent, now_millis: i64) -> MarkerVisual {
        let age = age_seconds(event.timestamp_millis, now_millis);

        let visual = MarkerVisual {
            contact_id: event.id.clone(),
            latitude: event.latitude(),
            display_longitude: event.longitude(),
            radius_px: radius_px(age),
            fill_opacity: fill_opacity(age),
            color: self.palette.color_of(&event.operator).to_owned(),
            world_copy: false,
            operator: event.operator.clone(),
            details: event.details.clone(),
        };

        trace!(
            id = %event.id,
            age,
            radius = visual.radius_px,
            opacity = visual.fill_opacity,
            "marker visual"
        );
        visual
    }

    /// The marker and its world copy
    pub fn visuals_for(&self, event: &ContactEvent, now_millis: i64) -> [MarkerVisual; 2] {
        let visual = self.visual_for(event, now_millis);
        let copy = visual.world_copy();
        [visual, copy]
    }
}
