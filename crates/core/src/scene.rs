//! One render cycle's worth of map geometry.

use serde::Serialize;
use tracing::debug;

use crate::config::MapConfig;
use crate::decay::{MarkerDecayPolicy, MarkerVisual};
use crate::geodesic::{ArcResult, GeodesicPathBuilder};
use crate::identifiers::ContactId;
use crate::models::{ContactEvent, GeoPoint, Result};

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapScene {
    pub station: GeoPoint,
    /// Contact the arc points at
    pub target: Option<ContactId>,
    /// Arc from the station to the most recent contact; `None` without contacts
    pub arc: Option<ArcResult>,
    /// Two markers per contact: primary first, then its world copy
    pub markers: Vec<MarkerVisual>,
}

/// The event with the greatest timestamp. Ties go to the earliest in `events`.
pub fn most_recent(events: &[ContactEvent]) -> Option<&ContactEvent> {
    events.iter().reduce(|best, event| {
        if event.timestamp_millis > best.timestamp_millis {
            event
        } else {
            best
        }
    })
}

#[derive(Clone, Debug)]
pub struct SceneComposer {
    station: GeoPoint,
    builder: GeodesicPathBuilder,
    policy: MarkerDecayPolicy,
}

impl SceneComposer {
    pub fn new(station: GeoPoint, builder: GeodesicPathBuilder, policy: MarkerDecayPolicy) -> Self {
        Self {
            station,
            builder,
            policy,
        }
    }

    pub fn from_config(config: &MapConfig) -> Result<Self> {
        Ok(Self::new(
            config.station,
            GeodesicPathBuilder::new(config.arc)?,
            MarkerDecayPolicy::new(config.palette.clone()),
        ))
    }

    pub fn station(&self) -> GeoPoint {
        self.station
    }

    /// Markers for every event plus the arc to the most recent one.
    ///
    /// The arc builder is skipped entirely when there are no events.
    pub fn compose(&self, events: &[ContactEvent], now_millis: i64) -> Result<MapScene> {
        let markers: Vec<MarkerVisual> = events
            .iter()
            .flat_map(|event| self.policy.visuals_for(event, now_millis))
            .collect();

        let (target, arc) = match most_recent(events) {
            Some(latest) => {
                let arc = self.builder.build(self.station, latest.location)?;
                (Some(latest.id.clone()), Some(arc))
            }
            None => (None, None),
        };

        debug!(
            events = events.len(),
            markers = markers.len(),
            target = ?target,
            "composed map scene"
        );

        Ok(MapScene {
            station: self.station,
            target,
            arc,
            markers,
        })
    }
}
