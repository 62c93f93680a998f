//! GeoJSON parser.
//!
//! The file must be a `FeatureCollection`. Each feature maps by geometry
//! type: `Point` → LOCATION, `Polygon` → AREA (outer ring only, holes are
//! dropped), `LineString` → LINE. Other geometry types and malformed
//! features are skipped individually.

use super::{decode_text, ParsedFile};
use crate::error::ParseError;
use crate::format::FileFormat;
use crate::raw::{GeoJsonFeature, GeoJsonGeometry, RawFeature, RecordRef, RejectedRecord};
use serde_json::{Map, Value};
use tracing::warn;

pub fn parse(bytes: &[u8]) -> Result<ParsedFile, ParseError> {
    let text = decode_text(bytes)?;
    let root: Value = serde_json::from_str(text)?;
    let root = root
        .as_object()
        .ok_or_else(|| ParseError::GeoJson("top level must be a JSON object".to_string()))?;

    match root.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => {
            return Err(ParseError::GeoJson(format!(
                "expected a FeatureCollection, found '{other}'"
            )))
        }
        None => {
            return Err(ParseError::GeoJson(
                "expected a FeatureCollection, found no 'type'".to_string(),
            ))
        }
    }

    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::GeoJson("'features' must be an array".to_string()))?;

    let mut parsed = ParsedFile::default();
    for (index, feature) in features.iter().enumerate() {
        let properties = feature.get("properties").and_then(Value::as_object);
        let title = properties.and_then(|p| property(p, "title"));
        let reference = RecordRef::new(FileFormat::GeoJson, index, title.clone());

        match read_geometry(feature) {
            Ok(geometry) => parsed.features.push(RawFeature::GeoJson {
                record: reference,
                feature: GeoJsonFeature {
                    title,
                    color: properties.and_then(|p| property(p, "color")),
                    fill_color: properties.and_then(|p| property(p, "fillColor")),
                    description: properties.and_then(|p| property(p, "description")),
                    geometry,
                },
            }),
            Err(reason) => {
                warn!(
                    subsystem = "import",
                    component = "geojson",
                    record = %reference,
                    error = %reason,
                    "Skipping GeoJSON feature"
                );
                parsed.skipped.push(RejectedRecord::new(reference, reason));
            }
        }
    }
    Ok(parsed)
}

/// A property as text; numbers are stringified, blanks are absent.
fn property(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_geometry(feature: &Value) -> Result<GeoJsonGeometry, String> {
    if feature.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err("not a GeoJSON Feature object".to_string());
    }
    let geometry = feature
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| "feature has no geometry".to_string())?;
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "geometry has no type".to_string())?;
    let coordinates = geometry.get("coordinates").cloned().unwrap_or(Value::Null);

    let malformed = |e: serde_json::Error| format!("malformed {kind} coordinates: {e}");
    match kind {
        "Point" => serde_json::from_value(coordinates)
            .map(GeoJsonGeometry::Point)
            .map_err(malformed),
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(coordinates).map_err(malformed)?;
            rings
                .into_iter()
                .next()
                .map(GeoJsonGeometry::Polygon)
                .ok_or_else(|| "polygon has no rings".to_string())
        }
        "LineString" => serde_json::from_value(coordinates)
            .map(GeoJsonGeometry::LineString)
            .map_err(malformed),
        other => Err(format!(
            "unsupported geometry type '{other}' (expected Point, Polygon or LineString)"
        )),
    }
}
