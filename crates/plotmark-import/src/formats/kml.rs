//! KML parser.
//!
//! Streams the XML with `quick_xml` and collects every `<Placemark>` inside
//! the `<Document>`, including those nested in folders. Supported geometry
//! is `<Point>`, `<LineString>` and the outer `<LinearRing>` of a
//! `<Polygon>`; coordinates are kept as raw text for the normalizer.
//!
//! Styles are not read. Placemarks without a supported geometry are
//! skipped with a warning; malformed XML fails the whole file.

use super::{decode_text, ParsedFile};
use crate::error::ParseError;
use crate::format::FileFormat;
use crate::raw::{KmlGeometry, KmlPlacemark, RawFeature, RecordRef, RejectedRecord};
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// KML geometry elements the importer cannot represent.
const UNSUPPORTED_GEOMETRIES: &[&str] = &[
    "MultiGeometry",
    "LinearRing",
    "Model",
    "Track",
    "MultiTrack",
];

const OUTER_RING_PATH: [&str; 3] = ["outerBoundaryIs", "LinearRing", "coordinates"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeometryKind {
    Point,
    Polygon,
    LineString,
}

/// Accumulates one placemark while its element is open.
#[derive(Debug)]
struct PlacemarkBuilder {
    index: usize,
    /// Stack position of the `<Placemark>` element.
    depth: usize,
    name: Option<String>,
    description: Option<String>,
    kind: Option<GeometryKind>,
    geometry_depth: usize,
    unsupported: Option<String>,
    coordinates: Option<String>,
}

impl PlacemarkBuilder {
    fn new(index: usize, depth: usize) -> Self {
        Self {
            index,
            depth,
            name: None,
            description: None,
            kind: None,
            geometry_depth: 0,
            unsupported: None,
            coordinates: None,
        }
    }

    /// Called for each direct child element of the placemark.
    fn open_child(&mut self, name: &str, depth: usize) {
        if self.kind.is_some() || self.unsupported.is_some() {
            return;
        }
        let kind = match name {
            "Point" => GeometryKind::Point,
            "Polygon" => GeometryKind::Polygon,
            "LineString" => GeometryKind::LineString,
            other => {
                if UNSUPPORTED_GEOMETRIES.contains(&other) {
                    self.unsupported = Some(other.to_string());
                }
                return;
            }
        };
        self.kind = Some(kind);
        self.geometry_depth = depth;
    }

    fn text(&mut self, stack: &[String], text: &str) {
        let Some(top) = stack.last() else {
            return;
        };
        let child_of_placemark = stack.len() == self.depth + 2;
        match top.as_str() {
            "name" if child_of_placemark => append(&mut self.name, text, ""),
            "description" if child_of_placemark => append(&mut self.description, text, ""),
            "coordinates" if self.accepts_coordinates(stack) => {
                append(&mut self.coordinates, text, " ")
            }
            _ => {}
        }
    }

    fn accepts_coordinates(&self, stack: &[String]) -> bool {
        let Some(kind) = self.kind else {
            return false;
        };
        let Some(path) = stack.get(self.geometry_depth + 1..) else {
            return false;
        };
        match kind {
            GeometryKind::Point | GeometryKind::LineString => path.len() == 1,
            GeometryKind::Polygon => path.iter().map(String::as_str).eq(OUTER_RING_PATH),
        }
    }

    fn finish(self, format: FileFormat) -> Result<RawFeature, RejectedRecord> {
        let record = RecordRef::new(format, self.index, self.name.clone());
        let geometry = match (self.kind, self.coordinates) {
            (Some(GeometryKind::Point), Some(text)) => KmlGeometry::Point(text),
            (Some(GeometryKind::Polygon), Some(text)) => KmlGeometry::Polygon(text),
            (Some(GeometryKind::LineString), Some(text)) => KmlGeometry::LineString(text),
            (Some(kind), None) => {
                return Err(RejectedRecord::new(
                    record,
                    format!("{kind:?} has no coordinates"),
                ))
            }
            (None, _) => {
                let reason = match self.unsupported {
                    Some(element) => format!("unsupported geometry <{element}>"),
                    None => "placemark has no geometry".to_string(),
                };
                return Err(RejectedRecord::new(record, reason));
            }
        };
        Ok(RawFeature::Kml {
            record,
            placemark: KmlPlacemark {
                name: self.name,
                description: self.description,
                geometry,
            },
        })
    }
}

fn append(slot: &mut Option<String>, text: &str, separator: &str) {
    match slot {
        Some(existing) => {
            existing.push_str(separator);
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

fn unescaped(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(s) => s.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

/// Move a closed placemark into `parsed` as a feature or a skipped record.
fn collect(parsed: &mut ParsedFile, builder: PlacemarkBuilder, format: FileFormat) {
    match builder.finish(format) {
        Ok(feature) => parsed.features.push(feature),
        Err(rejected) => {
            warn!(
                subsystem = "import",
                component = "kml",
                record = %rejected.record,
                error = %rejected.reason,
                "Skipping placemark"
            );
            parsed.skipped.push(rejected);
        }
    }
}

pub fn parse(bytes: &[u8]) -> Result<ParsedFile, ParseError> {
    let text = decode_text(bytes)?;
    parse_document(text, FileFormat::Kml)
}

/// Parse KML text, tagging records with `format` (KMZ reuses this).
pub(crate) fn parse_document(text: &str, format: FileFormat) -> Result<ParsedFile, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut document_seen = false;
    let mut current: Option<PlacemarkBuilder> = None;
    let mut placemark_count = 0usize;
    let mut parsed = ParsedFile::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let depth = stack.len();
                match name.as_str() {
                    "Document" => document_seen = true,
                    "Placemark"
                        if current.is_none() && stack.iter().any(|n| n == "Document") =>
                    {
                        current = Some(PlacemarkBuilder::new(placemark_count, depth));
                        placemark_count += 1;
                    }
                    _ => {}
                }
                if let Some(builder) = current.as_mut() {
                    if depth == builder.depth + 1 {
                        builder.open_child(&name, depth);
                    }
                }
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                let closes_current = current
                    .as_ref()
                    .is_some_and(|b| name == "Placemark" && b.depth == stack.len());
                if closes_current {
                    if let Some(builder) = current.take() {
                        collect(&mut parsed, builder, format);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(builder) = current.as_mut() {
                    builder.text(&stack, &unescaped(&t));
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(builder) = current.as_mut() {
                    builder.text(&stack, String::from_utf8_lossy(&c).trim());
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let depth = stack.len();
                match name.as_str() {
                    "Document" => document_seen = true,
                    "Placemark"
                        if current.is_none() && stack.iter().any(|n| n == "Document") =>
                    {
                        let builder = PlacemarkBuilder::new(placemark_count, depth);
                        placemark_count += 1;
                        collect(&mut parsed, builder, format);
                    }
                    _ => {
                        if let Some(builder) = current.as_mut() {
                            if depth == builder.depth + 1 {
                                builder.open_child(&name, depth);
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "{e} (at byte {})",
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Xml(format!(
            "unexpected end of document inside <{open}>"
        )));
    }
    if !document_seen {
        return Err(ParseError::Kml("missing <Document> element".to_string()));
    }

    debug!(
        subsystem = "import",
        component = "kml",
        op = "parse",
        placemark_count,
        feature_count = parsed.features.len(),
        rejected_count = parsed.skipped.len(),
        "Parsed KML document"
    );
    Ok(parsed)
}
