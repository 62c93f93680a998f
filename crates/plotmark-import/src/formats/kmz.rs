//! KMZ parser: a zip archive wrapping a KML document.

use super::{kml, ParsedFile};
use crate::error::ParseError;
use crate::format::FileFormat;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Parse a KMZ archive. The extracted KML may not exceed `max_bytes`.
pub fn parse(bytes: &[u8], max_bytes: usize) -> Result<ParsedFile, ParseError> {
    if !infer::archive::is_zip(bytes) {
        return Err(ParseError::Archive("not a zip archive".to_string()));
    }
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    // Archive order, not name order.
    let mut found = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if !entry.is_dir() && entry.name().to_ascii_lowercase().ends_with(".kml") {
            found = Some(i);
            break;
        }
    }
    let index = found.ok_or_else(|| ParseError::Archive("no .kml entry found".to_string()))?;

    let mut entry = archive.by_index(index)?;
    let name = entry.name().to_string();
    debug!(
        subsystem = "import",
        component = "kmz",
        op = "unzip",
        entry = %name,
        compressed_bytes = entry.compressed_size(),
        size_bytes = entry.size(),
        max_bytes,
        "Extracting KML from KMZ"
    );
    let limit = max_bytes as u64;
    if entry.size() > limit {
        return Err(too_large(&name, max_bytes));
    }

    // The header size can lie; never inflate more than one byte past the limit.
    let mut buf = Vec::new();
    (&mut entry)
        .take(limit.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| ParseError::Archive(format!("{name}: {e}")))?;
    if buf.len() as u64 > limit {
        return Err(too_large(&name, max_bytes));
    }

    let text = String::from_utf8(buf).map_err(|e| ParseError::Encoding(format!("{name}: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    kml::parse_document(text, FileFormat::Kmz)
}

fn too_large(name: &str, max_bytes: usize) -> ParseError {
    ParseError::Archive(format!("{name} inflates past the {max_bytes} byte limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawFeature;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const LIMIT: usize = 1024 * 1024;

    const DOC: &str = "<kml><Document><Placemark><name>Pin</name>\
        <Point><coordinates>145.811,-38.186</coordinates></Point></Placemark></Document></kml>";

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_first_kml_entry() {
        let bytes = archive(&[
            ("files/readme.txt", "ignore me"),
            ("doc.KML", DOC),
            ("other.kml", "<kml><Document/></kml>"),
        ]);
        let parsed = parse(&bytes, LIMIT).unwrap();
        assert_eq!(parsed.features.len(), 1);
        let RawFeature::Kml { record, .. } = &parsed.features[0] else {
            panic!("expected KML feature");
        };
        assert_eq!(record.format, FileFormat::Kmz);
        assert_eq!(record.label.as_deref(), Some("Pin"));
    }

    #[test]
    fn test_no_kml_entry() {
        let bytes = archive(&[("images/icon.png", "png")]);
        let err = parse(&bytes, LIMIT).unwrap_err();
        assert!(matches!(err, ParseError::Archive(ref m) if m == "no .kml entry found"));
    }

    #[test]
    fn test_not_a_zip() {
        let err = parse(DOC.as_bytes(), LIMIT).unwrap_err();
        assert!(matches!(err, ParseError::Archive(ref m) if m == "not a zip archive"));
    }

    #[test]
    fn test_entry_larger_than_limit_is_refused() {
        let bytes = archive(&[("doc.kml", DOC)]);
        let err = parse(&bytes, DOC.len() - 1).unwrap_err();
        assert!(matches!(err, ParseError::Archive(ref m) if m.contains("inflates past")));

        let parsed = parse(&bytes, DOC.len()).unwrap();
        assert_eq!(parsed.features.len(), 1);
    }

    #[test]
    fn test_embedded_kml_errors_propagate() {
        let bytes = archive(&[("doc.kml", "<kml><Placemark></kml>")]);
        assert!(matches!(parse(&bytes, LIMIT), Err(ParseError::Xml(_))));
    }
}
