use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use qso_map_core::{MarkerVisual, PathSegment, RenderTarget};
use std::path::Path;

/// Convert an arc segment to a GeoJSON LineString
fn segment_to_geojson(segment: &PathSegment) -> Value {
    Value::LineString(segment.coords().map(|c| vec![c.x, c.y]).collect())
}

fn segment_to_feature(segment: &PathSegment, index: usize) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("kind".to_string(), serde_json::json!("arc"));
    properties.insert("index".to_string(), serde_json::json!(index));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(segment_to_geojson(segment))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn marker_to_feature(marker: &MarkerVisual) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("kind".to_string(), serde_json::json!("marker"));
    properties.insert("contact_id".to_string(), serde_json::json!(marker.contact_id.as_str()));
    properties.insert("radius_px".to_string(), serde_json::json!(marker.radius_px));
    properties.insert("fill_opacity".to_string(), serde_json::json!(marker.fill_opacity));
    properties.insert("color".to_string(), serde_json::json!(marker.color));
    properties.insert("world_copy".to_string(), serde_json::json!(marker.world_copy));
    properties.insert(
        "recv_callsign".to_string(),
        serde_json::json!(marker.details.recv_callsign),
    );
    properties.insert("operator".to_string(), serde_json::json!(marker.operator.as_str()));
    properties.insert("freq_khz".to_string(), serde_json::json!(marker.details.freq_khz()));
    properties.insert("mode".to_string(), serde_json::json!(marker.details.mode));
    properties.insert(
        "location_source".to_string(),
        serde_json::json!(marker.details.location_source.to_string()),
    );
    properties.insert("popup".to_string(), serde_json::json!(marker.popup_text()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            marker.display_longitude,
            marker.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Render target that collects drawn objects as GeoJSON features.
///
/// Handles are slot indices; removed slots stay empty so later handles
/// remain valid.
#[derive(Debug, Default)]
pub struct GeoJsonTarget {
    slots: Vec<Option<Feature>>,
    arcs_drawn: usize,
}

impl GeoJsonTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Features currently on the target, in drawing order
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.slots.iter().flatten()
    }

    pub fn feature_count(&self) -> usize {
        self.features().count()
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features().cloned().collect(),
            foreign_members: None,
        }
    }

    fn push(&mut self, feature: Feature) -> usize {
        self.slots.push(Some(feature));
        self.slots.len() - 1
    }
}

impl RenderTarget for GeoJsonTarget {
    type Handle = usize;

    fn draw_polyline(&mut self, segment: &PathSegment) -> usize {
        let feature = segment_to_feature(segment, self.arcs_drawn);
        self.arcs_drawn += 1;
        self.push(feature)
    }

    fn draw_marker(&mut self, marker: &MarkerVisual) -> usize {
        self.push(marker_to_feature(marker))
    }

    fn remove(&mut self, handle: usize) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = None;
        }
    }
}

/// Write a feature collection to a GeoJSON file
pub fn write_feature_collection(collection: FeatureCollection, output_path: &Path) -> Result<()> {
    log::info!(
        "Writing {} features to {}",
        collection.features.len(),
        output_path.display()
    );

    let geojson = GeoJson::from(collection);
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::LocationSource;
    use qso_map_core::{
        ContactDetails, ContactEvent, GeoPoint, GeodesicPathBuilder, MarkerDecayPolicy, SceneLayer,
    };

    fn marker() -> MarkerVisual {
        let event = ContactEvent::new("a", GeoPoint::new(35.68, 139.69).unwrap(), 0, "KD9YWS")
            .with_details(ContactDetails {
                recv_callsign: "JA1XYZ".into(),
                freq_rx_hz: 14_074_000,
                mode: "FT8".into(),
                location_source: LocationSource::HamQTH,
            });
        MarkerDecayPolicy::default().visual_for(&event, 90_000)
    }

    fn property<'a>(feature: &'a Feature, key: &str) -> &'a serde_json::Value {
        &feature.properties.as_ref().unwrap()[key]
    }

    #[test]
    fn test_marker_feature() {
        let feature = marker_to_feature(&marker());

        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(position) => assert_eq!(position, &vec![139.69, 35.68]),
            _ => panic!("Expected Point value"),
        }
        assert_eq!(property(&feature, "kind"), "marker");
        assert_eq!(property(&feature, "radius_px"), 4.0);
        assert_eq!(property(&feature, "fill_opacity"), 0.9);
        assert_eq!(property(&feature, "color"), "blue");
        assert_eq!(property(&feature, "world_copy"), false);
    }

    #[test]
    fn test_marker_feature_popup_properties() {
        let feature = marker_to_feature(&marker().world_copy());

        assert_eq!(property(&feature, "recv_callsign"), "JA1XYZ");
        assert_eq!(property(&feature, "operator"), "KD9YWS");
        assert_eq!(property(&feature, "freq_khz"), 14074.0);
        assert_eq!(property(&feature, "mode"), "FT8");
        assert_eq!(property(&feature, "location_source"), "HamQTH");
        assert_eq!(property(&feature, "popup"), "JA1XYZ - KD9YWS\n14074 - HamQTH");
    }

    #[test]
    fn test_segment_feature() {
        let arc = GeodesicPathBuilder::default()
            .build(
                GeoPoint::new(10.0, -10.0).unwrap(),
                GeoPoint::new(10.0, 10.0).unwrap(),
            )
            .unwrap();
        let feature = segment_to_feature(&arc.segments()[0], 0);

        match &feature.geometry.as_ref().unwrap().value {
            Value::LineString(line) => assert_eq!(line.len(), arc.segments()[0].len()),
            _ => panic!("Expected LineString value"),
        }
        assert_eq!(property(&feature, "kind"), "arc");
    }

    #[test]
    fn test_target_removes_by_handle() {
        let mut target = GeoJsonTarget::new();
        let m = marker();
        let first = target.draw_marker(&m);
        let second = target.draw_marker(&m.world_copy());

        target.remove(first);
        assert_eq!(target.feature_count(), 1);
        assert_eq!(property(target.features().next().unwrap(), "world_copy"), true);

        target.remove(second);
        target.remove(second);
        assert_eq!(target.feature_count(), 0);
    }

    #[test]
    fn test_layer_on_geojson_target() {
        let policy = MarkerDecayPolicy::default();
        let event = ContactEvent::new("a", GeoPoint::new(35.68, 139.69).unwrap(), 0, "KD9YWS");
        let scene = qso_map_core::SceneComposer::new(
            GeoPoint::new(40.42, -86.77).unwrap(),
            GeodesicPathBuilder::default(),
            policy,
        )
        .compose(&[event], 90_000)
        .unwrap();

        let mut target = GeoJsonTarget::new();
        let mut layer = SceneLayer::new();
        layer.replace(&mut target, &scene);

        let collection = target.to_feature_collection();
        assert_eq!(
            collection.features.len(),
            scene.markers.len() + scene.arc.as_ref().unwrap().len()
        );

        layer.clear(&mut target);
        assert_eq!(target.feature_count(), 0);
    }

    #[test]
    fn test_write_feature_collection() {
        let mut target = GeoJsonTarget::new();
        target.draw_marker(&marker());

        let path = std::env::temp_dir()
            .join(format!("qso-arc-test-{}.geojson", std::process::id()));
        write_feature_collection(target.to_feature_collection(), &path).unwrap();

        let written: GeoJson = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        std::fs::remove_file(&path).unwrap();
        match written {
            GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 1),
            _ => panic!("Expected FeatureCollection"),
        }
    }
}
