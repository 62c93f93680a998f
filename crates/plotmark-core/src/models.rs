//! Canonical annotation model.
//!
//! An [`Annotation`] is built once per source record and never mutated.
//! Its geometry variant determines its [`AnnotationType`], so a LOCATION
//! can never carry a path and an AREA or LINE can never carry a point.

use crate::defaults::{MIN_AREA_POINTS, MIN_LINE_POINTS};
use crate::error::{Result, ValidationError};
use crate::validation::{
    sanitize_description, sanitize_title, validate_color_field, validate_coordinates,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A `[lng, lat]` pair, in GeoJSON axis order.
pub type Position = [f64; 2];

/// Kind of annotation on the mapping platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnnotationType {
    Location,
    Area,
    Line,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "LOCATION",
            Self::Area => "AREA",
            Self::Line => "LINE",
        }
    }

    /// Fewest coordinate pairs a geometry of this type may hold.
    pub fn min_points(&self) -> usize {
        match self {
            Self::Location => 1,
            Self::Area => MIN_AREA_POINTS,
            Self::Line => MIN_LINE_POINTS,
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCATION" => Ok(Self::Location),
            "AREA" => Ok(Self::Area),
            "LINE" => Ok(Self::Line),
            _ => Err(ValidationError::invalid(
                "annotationType",
                format!("'{s}' is not one of LOCATION, AREA, LINE"),
            )),
        }
    }
}

/// A single point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// The point as a `[lng, lat]` position.
    pub fn to_position(self) -> Position {
        [self.lng, self.lat]
    }
}

/// Validated annotation geometry.
///
/// Serializes untagged: `{lat, lng}` for a location, an array of
/// `[lng, lat]` pairs for an area or line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Geometry {
    Location(LatLng),
    Area(Vec<Position>),
    Line(Vec<Position>),
}

impl Geometry {
    pub fn location(lat: f64, lng: f64) -> Result<Self> {
        validate_coordinates(lat, lng).map(Self::Location)
    }

    /// Build a closed AREA ring.
    ///
    /// Needs at least three pairs as given. When the first and last pairs
    /// differ a copy of the first is appended; a ring that is already closed
    /// is kept as is.
    pub fn area(points: Vec<Position>) -> Result<Self> {
        let mut ring = validate_path(AnnotationType::Area, points)?;
        if let Some(first) = ring.first().copied() {
            if ring.last() != Some(&first) {
                ring.push(first);
            }
        }
        Ok(Self::Area(ring))
    }

    /// Build an open LINE of at least two pairs.
    pub fn line(points: Vec<Position>) -> Result<Self> {
        validate_path(AnnotationType::Line, points).map(Self::Line)
    }

    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::Location(_) => AnnotationType::Location,
            Self::Area(_) => AnnotationType::Area,
            Self::Line(_) => AnnotationType::Line,
        }
    }

    /// Number of coordinate pairs, counting an AREA's closing point.
    pub fn point_count(&self) -> usize {
        match self {
            Self::Location(_) => 1,
            Self::Area(points) | Self::Line(points) => points.len(),
        }
    }
}

fn validate_path(annotation_type: AnnotationType, points: Vec<Position>) -> Result<Vec<Position>> {
    let required = annotation_type.min_points();
    if points.len() < required {
        return Err(ValidationError::InsufficientPoints {
            annotation_type,
            required,
            actual: points.len(),
        });
    }
    for (i, [lng, lat]) in points.iter().enumerate() {
        validate_coordinates(*lat, *lng).map_err(|e| {
            ValidationError::invalid("geometry", format!("coordinate pair {}: {}", i + 1, e))
        })?;
    }
    Ok(points)
}

/// A normalized annotation ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    title: String,
    color: String,
    fill_color: String,
    geometry: Geometry,
    description: Option<String>,
}

impl Annotation {
    /// Build an annotation from an already validated geometry.
    ///
    /// The title and description are sanitized here. Colors must already be
    /// valid hex; they are re-normalized to lowercase `#rrggbb`.
    pub fn new(
        title: &str,
        color: &str,
        fill_color: &str,
        geometry: Geometry,
        description: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            title: sanitize_title(title)?,
            color: validate_color_field("color", color)?,
            fill_color: validate_color_field("fillColor", fill_color)?,
            geometry,
            description: description.and_then(sanitize_description),
        })
    }

    /// A copy with a new title and/or color, as produced by a preview edit.
    pub fn with_overrides(&self, title: Option<&str>, color: Option<&str>) -> Result<Self> {
        let mut next = self.clone();
        if let Some(title) = title {
            next.title = sanitize_title(title)?;
        }
        if let Some(color) = color {
            next.color = validate_color_field("color", color)?;
        }
        Ok(next)
    }

    pub fn annotation_type(&self) -> AnnotationType {
        self.geometry.annotation_type()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn fill_color(&self) -> &str {
        &self.fill_color
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.description.is_some() { 6 } else { 5 };
        let mut state = serializer.serialize_struct("Annotation", len)?;
        state.serialize_field("annotationType", &self.annotation_type())?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("color", &self.color)?;
        state.serialize_field("fillColor", &self.fill_color)?;
        state.serialize_field("geometry", &self.geometry)?;
        if let Some(description) = &self.description {
            state.serialize_field("description", description)?;
        }
        state.end()
    }
}
