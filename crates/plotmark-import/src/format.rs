//! Supported upload formats and extension dispatch.

use serde::Serialize;
use std::fmt;

/// A file format the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    GeoJson,
    Kml,
    Kmz,
}

impl FileFormat {
    /// Pick a format from a file name's extension, ignoring case.
    ///
    /// `.csv` → CSV, `.json`/`.geojson` → GeoJSON, `.kml` → KML,
    /// `.kmz` → KMZ. Anything else is unsupported.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match extension(file_name)?.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "geojson" => Some(Self::GeoJson),
            "kml" => Some(Self::Kml),
            "kmz" => Some(Self::Kmz),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
            Self::Kml => "kml",
            Self::Kmz => "kmz",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::GeoJson => write!(f, "GeoJSON"),
            Self::Kml => write!(f, "KML"),
            Self::Kmz => write!(f, "KMZ"),
        }
    }
}

/// Extension of the last path component, without the dot.
pub fn extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}
