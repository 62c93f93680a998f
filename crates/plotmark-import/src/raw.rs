//! Format-tagged raw records produced by the parsers.
//!
//! Each parser emits its own record shape; the normalizer has one
//! conversion per variant into the canonical annotation.

use crate::format::FileFormat;
use serde::Serialize;
use std::fmt;

/// Where a record came from, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRef {
    pub format: FileFormat,
    /// 1-based data row for CSV, 0-based feature or placemark index otherwise.
    pub index: usize,
    /// Best-effort human label, usually the source title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RecordRef {
    pub fn new(format: FileFormat, index: usize, label: Option<String>) -> Self {
        Self {
            format,
            index,
            label,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.format {
            FileFormat::Csv => "row",
            FileFormat::GeoJson => "feature",
            FileFormat::Kml | FileFormat::Kmz => "placemark",
        };
        write!(f, "{} {} {}", self.format, unit, self.index)?;
        if let Some(label) = &self.label {
            write!(f, " ('{label}')")?;
        }
        Ok(())
    }
}

/// A record excluded from the result, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub record: RecordRef,
    pub reason: String,
}

impl RejectedRecord {
    pub fn new(record: RecordRef, reason: impl Into<String>) -> Self {
        Self {
            record,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.reason)
    }
}

/// One CSV data row, cells trimmed, empty cells absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvRow {
    pub annotation_type: Option<String>,
    pub title: Option<String>,
    pub color: Option<String>,
    pub fill_color: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Decoded `geometry` cell for AREA and LINE rows.
    pub geometry: Option<Vec<Vec<f64>>>,
    pub description: Option<String>,
}

/// Geometry of a GeoJSON feature, positions as given (altitude included).
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonGeometry {
    Point(Vec<f64>),
    /// Outer ring only.
    Polygon(Vec<Vec<f64>>),
    LineString(Vec<Vec<f64>>),
}

/// One GeoJSON feature with its string properties extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonFeature {
    pub title: Option<String>,
    pub color: Option<String>,
    pub fill_color: Option<String>,
    pub description: Option<String>,
    pub geometry: GeoJsonGeometry,
}

/// Supported KML geometry, carrying the raw `<coordinates>` text.
#[derive(Debug, Clone, PartialEq)]
pub enum KmlGeometry {
    Point(String),
    Polygon(String),
    LineString(String),
}

/// One KML placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlPlacemark {
    pub name: Option<String>,
    pub description: Option<String>,
    pub geometry: KmlGeometry,
}

/// A parsed record awaiting normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFeature {
    Csv { record: RecordRef, row: CsvRow },
    GeoJson { record: RecordRef, feature: GeoJsonFeature },
    Kml { record: RecordRef, placemark: KmlPlacemark },
}

impl RawFeature {
    pub fn record(&self) -> &RecordRef {
        match self {
            Self::Csv { record, .. } | Self::GeoJson { record, .. } | Self::Kml { record, .. } => {
                record
            }
        }
    }
}
