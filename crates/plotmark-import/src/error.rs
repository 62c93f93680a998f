//! Error types for file parsing and import.

use crate::format::FileFormat;
use crate::raw::RejectedRecord;
use thiserror::Error;

/// Structural failure that makes a whole file unreadable.
///
/// Record-level problems never surface as `ParseError`; they are collected
/// as [`RejectedRecord`]s instead.
#[derive(Error, Debug)]
pub enum ParseError {
    /// File bytes are not valid UTF-8 text
    #[error("Invalid text encoding: {0}")]
    Encoding(String),

    /// CSV header could not be read
    #[error("Malformed CSV: {0}")]
    Csv(String),

    /// Top-level JSON is not parseable
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but is not a GeoJSON FeatureCollection
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    /// XML is not well formed
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// XML is well formed but not a usable KML document
    #[error("Invalid KML: {0}")]
    Kml(String),

    /// KMZ archive is unreadable or has no KML entry
    #[error("Invalid KMZ archive: {0}")]
    Archive(String),
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        ParseError::Csv(e.to_string())
    }
}

impl From<zip::result::ZipError> for ParseError {
    fn from(e: zip::result::ZipError) -> Self {
        ParseError::Archive(e.to_string())
    }
}

/// File-level import failure.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Extension is not one of csv, json, geojson, kml, kmz
    #[error("Unsupported file format: '{0}' (expected .csv, .json, .geojson, .kml or .kmz)")]
    UnsupportedFormat(String),

    /// File could not be parsed at all
    #[error("Malformed {format} file: {source}")]
    MalformedFile {
        format: FileFormat,
        #[source]
        source: ParseError,
    },

    /// File parsed but every record was rejected
    #[error("{format} file produced no valid annotations ({} records rejected)", .rejected.len())]
    EmptyResult {
        format: FileFormat,
        rejected: Vec<RejectedRecord>,
    },

    /// Input exceeds the configured size limit
    #[error("File is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },
}

impl ImportError {
    /// Records rejected before the import failed, if any were collected.
    pub fn rejected(&self) -> &[RejectedRecord] {
        match self {
            Self::EmptyResult { rejected, .. } => rejected,
            _ => &[],
        }
    }
}
