//! GeoJSON rendering of normalized annotations, used for map previews.

use plotmark_core::{Annotation, Geometry};
use serde_json::{json, Map, Value};

/// Render annotations as a GeoJSON `FeatureCollection`.
///
/// Locations become `Point`s with `[lng, lat]` coordinates, areas become
/// single-ring `Polygon`s and lines become `LineString`s. Title, colors,
/// type and description are carried as properties, so the output imports
/// back to the same annotations.
pub fn to_feature_collection(annotations: &[Annotation]) -> Value {
    let features: Vec<Value> = annotations.iter().map(feature).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn feature(annotation: &Annotation) -> Value {
    let geometry = match annotation.geometry() {
        Geometry::Location(point) => json!({
            "type": "Point",
            "coordinates": point.to_position(),
        }),
        Geometry::Area(ring) => json!({
            "type": "Polygon",
            "coordinates": [ring],
        }),
        Geometry::Line(line) => json!({
            "type": "LineString",
            "coordinates": line,
        }),
    };

    let mut properties = Map::new();
    properties.insert("title".into(), annotation.title().into());
    properties.insert("annotationType".into(), annotation.annotation_type().as_str().into());
    properties.insert("color".into(), annotation.color().into());
    properties.insert("fillColor".into(), annotation.fill_color().into());
    if let Some(description) = annotation.description() {
        properties.insert("description".into(), description.into());
    }

    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{import_file, ImportOptions};

    fn sample() -> Vec<Annotation> {
        vec![
            Annotation::new(
                "Gate A",
                "#e53935",
                "#ef9a9a",
                Geometry::location(-38.186, 145.811).unwrap(),
                Some("Entrance"),
            )
            .unwrap(),
            Annotation::new(
                "Lot 1",
                "#43a047",
                "#a5d6a7",
                Geometry::area(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0]]).unwrap(),
                None,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_point_uses_lng_lat_order() {
        let value = to_feature_collection(&sample());
        assert_eq!(value["type"], "FeatureCollection");
        let point = &value["features"][0];
        assert_eq!(point["geometry"]["coordinates"], json!([145.811, -38.186]));
        assert_eq!(point["properties"]["annotationType"], "LOCATION");
        assert_eq!(point["properties"]["description"], "Entrance");
    }

    #[test]
    fn test_area_is_single_closed_ring() {
        let value = to_feature_collection(&sample());
        let polygon = &value["features"][1];
        assert_eq!(polygon["geometry"]["type"], "Polygon");
        assert_eq!(polygon["geometry"]["coordinates"][0].as_array().unwrap().len(), 4);
        assert!(polygon["properties"].get("description").is_none());
    }

    #[test]
    fn test_export_reimports_unchanged() {
        let original = sample();
        let bytes = serde_json::to_vec(&to_feature_collection(&original)).unwrap();
        let report = import_file(&bytes, "preview.geojson", &ImportOptions::default()).unwrap();
        assert_eq!(report.annotations, original);
    }
}
