//! Format parsers.
//!
//! Each parser turns raw bytes into [`RawFeature`]s. A bad row, feature or
//! placemark is recorded in [`ParsedFile::skipped`] and parsing continues;
//! only structural problems (unreadable text, bad XML/JSON, missing archive
//! member) fail the whole file with a [`ParseError`].

pub mod csv;
pub mod geojson;
pub mod kml;
pub mod kmz;

use crate::error::ParseError;
use crate::format::FileFormat;
use crate::raw::{RawFeature, RejectedRecord};

/// Parser output: records to normalize plus records already skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    pub features: Vec<RawFeature>,
    pub skipped: Vec<RejectedRecord>,
}

/// Parse `bytes` with the parser for `format`.
///
/// `max_bytes` bounds decompressed content; plain-text formats are already
/// bounded by the input size.
pub fn parse(format: FileFormat, bytes: &[u8], max_bytes: usize) -> Result<ParsedFile, ParseError> {
    match format {
        FileFormat::Csv => csv::parse(bytes),
        FileFormat::GeoJson => geojson::parse(bytes),
        FileFormat::Kml => kml::parse(bytes),
        FileFormat::Kmz => kmz::parse(bytes, max_bytes),
    }
}

/// Decode UTF-8 text, dropping a leading byte order mark.
pub(crate) fn decode_text(bytes: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::Encoding(e.to_string()))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xef\xbb\xbftitle";
        assert_eq!(decode_text(bytes).unwrap(), "title");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_text(&[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ParseError::Encoding(_)));
    }
}
