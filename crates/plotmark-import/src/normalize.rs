//! Record normalization.
//!
//! Each raw record variant is converted into a [`Draft`] by its own
//! function; drafts then share color resolution and final validation in
//! [`Annotation::new`]. Coordinate order is fixed here: CSV, GeoJSON and
//! KML paths are `[lng, lat]`, CSV locations use separate `lat`/`lng`
//! columns, and GeoJSON points are inverted into `{lat, lng}`.

use crate::raw::{
    CsvRow, GeoJsonFeature, GeoJsonGeometry, KmlGeometry, KmlPlacemark, RawFeature, RecordRef,
};
use plotmark_core::{
    default_color, nearest_palette_color, normalize_hex, Annotation, AnnotationType, Geometry,
    Position, Result, ValidationError,
};
use tracing::{trace, warn};

/// Options applied to every record of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Snap colors to the nearest palette entry.
    pub standardize_colors: bool,
}

/// Fields gathered from one record before colors are resolved.
#[derive(Debug)]
struct Draft<'a> {
    title: &'a str,
    /// `None` means the format carries no color and the default applies.
    color: Option<&'a str>,
    fill_color: Option<&'a str>,
    description: Option<&'a str>,
    geometry: Geometry,
}

/// Normalize one parsed record into an [`Annotation`].
///
/// Fails with the first [`ValidationError`] found; the caller decides
/// whether that rejects the record or the batch.
pub fn normalize(feature: &RawFeature, options: &NormalizeOptions) -> Result<Annotation> {
    let draft = match feature {
        RawFeature::Csv { row, .. } => from_csv(row)?,
        RawFeature::GeoJson { feature, .. } => from_geojson(feature)?,
        RawFeature::Kml { placemark, .. } => from_kml(placemark)?,
    };
    let record = feature.record();
    let annotation = finish(draft, record, options)?;
    trace!(
        subsystem = "import",
        component = "normalize",
        record = %record,
        annotation_type = %annotation.annotation_type(),
        points = annotation.geometry().point_count(),
        color = annotation.color(),
        "Normalized record"
    );
    Ok(annotation)
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::missing(field))
}

fn number(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::invalid(field, format!("'{raw}' is not a number")))
}

/// A `[lng, lat]` position from a JSON pair.
///
/// CSV pairs must hold exactly two numbers. GeoJSON positions may carry a
/// third (altitude) value, which is dropped.
fn position(index: usize, values: &[f64], allow_altitude: bool) -> Result<Position> {
    match values {
        [lng, lat] => Ok([*lng, *lat]),
        [lng, lat, ..] if allow_altitude => Ok([*lng, *lat]),
        _ => Err(ValidationError::invalid(
            "geometry",
            format!(
                "coordinate pair {}: expected [lng, lat], got {} values",
                index + 1,
                values.len()
            ),
        )),
    }
}

fn path(
    annotation_type: AnnotationType,
    pairs: &[Vec<f64>],
    allow_altitude: bool,
) -> Result<Geometry> {
    let required = annotation_type.min_points();
    if pairs.len() < required {
        return Err(ValidationError::InsufficientPoints {
            annotation_type,
            required,
            actual: pairs.len(),
        });
    }
    let points = pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| position(i, pair, allow_altitude))
        .collect::<Result<Vec<_>>>()?;
    from_points(annotation_type, points)
}

fn from_points(annotation_type: AnnotationType, points: Vec<Position>) -> Result<Geometry> {
    match annotation_type {
        AnnotationType::Location => match points.as_slice() {
            [] => Err(ValidationError::missing("coordinates")),
            [[lng, lat]] => Geometry::location(*lat, *lng),
            _ => Err(ValidationError::invalid(
                "coordinates",
                format!(
                    "Point requires exactly one lng,lat tuple, got {}",
                    points.len()
                ),
            )),
        },
        AnnotationType::Area => Geometry::area(points),
        AnnotationType::Line => Geometry::line(points),
    }
}

fn from_csv(row: &CsvRow) -> Result<Draft<'_>> {
    let raw_type = required("annotationType", row.annotation_type.as_deref())?;
    let title = required("title", row.title.as_deref())?;
    let color = required("color", row.color.as_deref())?;
    let annotation_type: AnnotationType = raw_type.parse()?;

    let geometry = match annotation_type {
        AnnotationType::Location => {
            let lat = number("lat", required("lat", row.lat.as_deref())?)?;
            let lng = number("lng", required("lng", row.lng.as_deref())?)?;
            Geometry::location(lat, lng)?
        }
        AnnotationType::Area | AnnotationType::Line => {
            let pairs = row
                .geometry
                .as_deref()
                .ok_or(ValidationError::missing("geometry"))?;
            path(annotation_type, pairs, false)?
        }
    };

    Ok(Draft {
        title,
        color: Some(color),
        fill_color: row.fill_color.as_deref(),
        description: row.description.as_deref(),
        geometry,
    })
}

fn from_geojson(feature: &GeoJsonFeature) -> Result<Draft<'_>> {
    let title = required("title", feature.title.as_deref())?;
    let color = required("color", feature.color.as_deref())?;

    let geometry = match &feature.geometry {
        GeoJsonGeometry::Point(coordinates) => {
            let [lng, lat] = position(0, coordinates, true)?;
            Geometry::location(lat, lng)?
        }
        GeoJsonGeometry::Polygon(ring) => path(AnnotationType::Area, ring, true)?,
        GeoJsonGeometry::LineString(line) => path(AnnotationType::Line, line, true)?,
    };

    Ok(Draft {
        title,
        color: Some(color),
        fill_color: feature.fill_color.as_deref(),
        description: feature.description.as_deref(),
        geometry,
    })
}

fn from_kml(placemark: &KmlPlacemark) -> Result<Draft<'_>> {
    let title = required("title", placemark.name.as_deref())?;
    let (annotation_type, text) = match &placemark.geometry {
        KmlGeometry::Point(text) => (AnnotationType::Location, text),
        KmlGeometry::Polygon(text) => (AnnotationType::Area, text),
        KmlGeometry::LineString(text) => (AnnotationType::Line, text),
    };
    let geometry = from_points(annotation_type, kml_coordinates(text)?)?;

    Ok(Draft {
        title,
        color: None,
        fill_color: None,
        description: placemark.description.as_deref(),
        geometry,
    })
}

/// Parse whitespace-separated `lng,lat[,alt]` tuples.
fn kml_coordinates(text: &str) -> Result<Vec<Position>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, tuple)| {
            let mut parts = tuple.split(',').map(|p| p.trim().parse::<f64>());
            match (parts.next(), parts.next()) {
                (Some(Ok(lng)), Some(Ok(lat))) if parts.all(|p| p.is_ok()) => Ok([lng, lat]),
                _ => Err(ValidationError::invalid(
                    "coordinates",
                    format!("tuple {} '{tuple}' is not lng,lat[,alt]", i + 1),
                )),
            }
        })
        .collect()
}

fn finish(draft: Draft<'_>, record: &RecordRef, options: &NormalizeOptions) -> Result<Annotation> {
    let color = match draft.color {
        Some(raw) => resolve_color("color", raw, default_color().color, record),
        None => default_color().color.to_string(),
    };
    let fill_color = draft
        .fill_color
        .map(|raw| resolve_color("fillColor", raw, &color, record));

    let (color, fill_color) = if options.standardize_colors {
        standardize(&color, fill_color.as_deref())
    } else {
        let fill_color = fill_color.unwrap_or_else(|| color.clone());
        (color, fill_color)
    };

    Annotation::new(
        draft.title,
        &color,
        &fill_color,
        draft.geometry,
        draft.description,
    )
}

/// Normalized `raw`, or `fallback` with a warning when it is not a color.
fn resolve_color(field: &'static str, raw: &str, fallback: &str, record: &RecordRef) -> String {
    match normalize_hex(raw) {
        Some(hex) => hex,
        None => {
            warn!(
                subsystem = "import",
                component = "normalize",
                record = %record,
                field,
                value = raw,
                fallback,
                "Invalid color, using fallback"
            );
            fallback.to_string()
        }
    }
}

/// Palette color for `color`; the fill comes from the same entry unless
/// the source supplied its own fill, which is matched separately.
fn standardize(color: &str, fill_color: Option<&str>) -> (String, String) {
    let entry = nearest_palette_color(color);
    let fill_entry = fill_color.map_or(entry, nearest_palette_color);
    (entry.color.to_string(), fill_entry.fill_color.to_string())
}
