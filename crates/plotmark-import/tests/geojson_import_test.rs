//! GeoJSON import through the public pipeline.

use plotmark_core::{AnnotationType, Geometry, LatLng};
use plotmark_import::{import_file, FileFormat, ImportError, ImportOptions};
use serde_json::{json, Value};

fn collection(features: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({"type": "FeatureCollection", "features": features})).unwrap()
}

fn point(title: &str, coordinates: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": {"title": title, "color": "#ff0000"},
        "geometry": {"type": "Point", "coordinates": coordinates}
    })
}

#[test]
fn test_point_coordinates_are_inverted() {
    let bytes = collection(json!([point("Gate A", json!([145.811, -38.186]))]));
    let report = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap();

    assert_eq!(report.format, FileFormat::GeoJson);
    assert_eq!(
        report.annotations[0].geometry(),
        &Geometry::Location(LatLng {
            lat: -38.186,
            lng: 145.811
        })
    );
}

#[test]
fn test_json_extension_is_geojson() {
    let bytes = collection(json!([point("Gate A", json!([145.811, -38.186]))]));
    let report = import_file(&bytes, "site.json", &ImportOptions::default()).unwrap();
    assert_eq!(report.format, FileFormat::GeoJson);
}

#[test]
fn test_fill_defaults_to_color_and_explicit_fill_is_kept() {
    let bytes = collection(json!([
        point("Gate A", json!([145.811, -38.186])),
        {
            "type": "Feature",
            "properties": {"title": "Pad", "color": "#00FF00", "fillColor": "#a5d6a7"},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 0]]]}
        }
    ]));
    let report = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap();
    assert_eq!(report.annotations[0].fill_color(), "#ff0000");
    assert_eq!(report.annotations[1].color(), "#00ff00");
    assert_eq!(report.annotations[1].fill_color(), "#a5d6a7");
}

#[test]
fn test_mixed_collection_keeps_good_features() {
    let bytes = collection(json!([
        point("Gate A", json!([145.811, -38.186])),
        {
            "type": "Feature",
            "properties": {"title": "Cluster", "color": "#ff0000"},
            "geometry": {"type": "MultiPoint", "coordinates": [[0, 0], [1, 1]]}
        },
        {
            "type": "Feature",
            "properties": {"color": "#ff0000"},
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
        },
        {
            "type": "Feature",
            "properties": {"title": "Road", "color": "#0000ff"},
            "geometry": {"type": "LineString", "coordinates": [[0, 0, 5], [1, 1, 6]]}
        }
    ]));
    let report = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap();

    let types: Vec<_> = report.annotations.iter().map(|a| a.annotation_type()).collect();
    assert_eq!(types, vec![AnnotationType::Location, AnnotationType::Line]);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].record.index, 1);
    assert!(report.rejected[0].reason.contains("MultiPoint"));
    assert_eq!(report.rejected[1].reason, "Missing required field: title");
}

#[test]
fn test_out_of_range_point_is_rejected() {
    let bytes = collection(json!([
        point("Swapped", json!([-38.186, 145.811])),
        point("Gate A", json!([145.811, -38.186]))
    ]));
    let report = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap();
    assert_eq!(report.annotations.len(), 1);
    assert!(report.rejected[0].reason.starts_with("lat out of range"));
}

#[test]
fn test_structural_errors_are_malformed() {
    for body in [
        &b"{\"type\": \"FeatureCollection\""[..],
        &br#"{"type": "Feature", "geometry": null, "properties": {}}"#[..],
        &br#"{"type": "FeatureCollection", "features": {}}"#[..],
    ] {
        let err = import_file(body, "site.geojson", &ImportOptions::default()).unwrap_err();
        assert!(
            matches!(err, ImportError::MalformedFile { format: FileFormat::GeoJson, .. }),
            "unexpected {err:?}"
        );
    }
}

#[test]
fn test_empty_collection_is_empty_result() {
    let bytes = collection(json!([]));
    let err = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::EmptyResult { ref rejected, .. } if rejected.is_empty()));
}
