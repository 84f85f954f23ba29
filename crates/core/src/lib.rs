//! # qso-map-core
//!
//! Geometry and styling for a live map of radio contacts.
//!
//! ## Features
//!
//! - **Great-circle arcs**: sampled, split at the display seam and duplicated
//!   for every visible world copy, ready for a straight-line renderer
//! - **Marker decay**: radius and opacity fall off in steps as contacts age
//! - **Scenes**: markers for every contact plus the arc to the latest one
//! - **Render lifecycle**: a layer that removes its previous frame before
//!   drawing the next
//! - **Activity**: active operating minutes from contact times
//!
//! ## Example
//!
//! ```
//! use qso_map_core::prelude::*;
//!
//! let station = GeoPoint::new(40.42, -86.77).unwrap();
//! let tokyo = GeoPoint::new(35.68, 139.69).unwrap();
//!
//! let arc = GeodesicPathBuilder::default().build(station, tokyo).unwrap();
//! assert!(arc.len() == 2 || arc.len() == 4);
//! for segment in &arc {
//!     assert!(segment.max_longitude_step() < 180.0);
//! }
//!
//! let policy = MarkerDecayPolicy::new(OperatorPalette::default());
//! let event = ContactEvent::new("qso-1", tokyo, 0, "KD9YWS");
//! let [marker, copy] = policy.visuals_for(&event, 90_000); // 90 seconds later
//! assert_eq!(marker.radius_px, 4.0);
//! assert_eq!(marker.fill_opacity, 0.9);
//! assert_eq!(marker.color, "blue");
//! assert_eq!(copy.display_longitude, 139.69 - 360.0);
//! ```

pub mod activity;
pub mod config;
pub mod decay;
pub mod geodesic;
pub mod identifiers;
pub mod models;
pub mod render;
pub mod scene;

// Re-exports for convenience
pub mod prelude {
    pub use crate::activity::{Activity, format_hours_minutes};
    pub use crate::config::MapConfig;
    pub use crate::decay::{
        MarkerDecayPolicy, MarkerVisual, OperatorPalette, duplicate_longitude,
    };
    pub use crate::geodesic::{
        ArcOptions, ArcResult, GeodesicPathBuilder, PathSegment, SeamCrossing,
    };
    pub use crate::identifiers::*;
    pub use crate::models::contact::parse_timestamp_millis;
    pub use crate::models::{ContactDetails, ContactEvent, GeoPoint, MapError, Result};
    pub use crate::render::{RenderTarget, SceneLayer};
    pub use crate::scene::{MapScene, SceneComposer, most_recent};
}

pub use prelude::*;
