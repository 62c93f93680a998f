//! CSV parser.
//!
//! Header-driven: columns are located by name, so their order is free.
//! Header names are matched ignoring case, spaces and underscores, so
//! `annotationType`, `annotation_type` and `Annotation Type` are the same
//! column. The legacy `type` header is accepted for `annotationType`.
//!
//! AREA and LINE rows carry their path in a `geometry` column holding a
//! JSON array of `[lng, lat]` pairs. A row whose geometry cell is not valid
//! JSON is skipped; the rest of the file still imports.

use super::{decode_text, ParsedFile};
use crate::error::ParseError;
use crate::format::FileFormat;
use crate::raw::{CsvRow, RawFeature, RecordRef, RejectedRecord};
use ::csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

/// Column positions resolved from the header row.
#[derive(Debug, Default, Clone, PartialEq)]
struct Columns {
    annotation_type: Option<usize>,
    title: Option<usize>,
    color: Option<usize>,
    fill_color: Option<usize>,
    lat: Option<usize>,
    lng: Option<usize>,
    geometry: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        let mut columns = Self::default();
        let mut legacy_type = None;
        for (i, header) in headers.iter().enumerate() {
            let slot = match header_key(header).as_str() {
                "annotationtype" => &mut columns.annotation_type,
                "type" => &mut legacy_type,
                "title" => &mut columns.title,
                "color" => &mut columns.color,
                "fillcolor" => &mut columns.fill_color,
                "lat" => &mut columns.lat,
                "lng" => &mut columns.lng,
                "geometry" => &mut columns.geometry,
                "description" => &mut columns.description,
                _ => continue,
            };
            // First occurrence wins.
            slot.get_or_insert(i);
        }
        if columns.annotation_type.is_none() {
            columns.annotation_type = legacy_type;
        }
        columns
    }
}

fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn cell(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn parse(bytes: &[u8]) -> Result<ParsedFile, ParseError> {
    let text = decode_text(bytes)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    let header_len = headers.len();
    let columns = Columns::resolve(headers);
    debug!(
        subsystem = "import",
        component = "csv",
        op = "parse",
        ?columns,
        "Resolved CSV columns"
    );

    let mut parsed = ParsedFile::default();
    for (i, result) in reader.records().enumerate() {
        let row_number = i + 1;
        // Short rows are fine; missing trailing cells read as empty.
        let record = match result {
            Ok(record) if record.len() <= header_len => record,
            Ok(record) => {
                skip_unreadable(
                    &mut parsed,
                    row_number,
                    format!("{} fields, header has {header_len}", record.len()),
                );
                continue;
            }
            Err(e) => {
                skip_unreadable(&mut parsed, row_number, e.to_string());
                continue;
            }
        };
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let title = cell(&record, columns.title);
        let reference = RecordRef::new(FileFormat::Csv, row_number, title.clone());
        match read_row(&record, &columns, title) {
            Ok(row) => parsed.features.push(RawFeature::Csv {
                record: reference,
                row,
            }),
            Err(reason) => {
                warn!(
                    subsystem = "import",
                    component = "csv",
                    record = %reference,
                    error = %reason,
                    "Skipping CSV row"
                );
                parsed.skipped.push(RejectedRecord::new(reference, reason));
            }
        }
    }
    Ok(parsed)
}

fn skip_unreadable(parsed: &mut ParsedFile, row_number: usize, error: String) {
    let rejected = RejectedRecord::new(
        RecordRef::new(FileFormat::Csv, row_number, None),
        format!("unreadable row: {error}"),
    );
    warn!(
        subsystem = "import",
        component = "csv",
        record = %rejected.record,
        error = %error,
        "Skipping CSV row"
    );
    parsed.skipped.push(rejected);
}

fn read_row(
    record: &StringRecord,
    columns: &Columns,
    title: Option<String>,
) -> Result<CsvRow, String> {
    let annotation_type = cell(record, columns.annotation_type);
    let is_location = annotation_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("LOCATION"));

    // Locations use lat/lng columns; a stray geometry cell is ignored.
    let geometry = match cell(record, columns.geometry) {
        Some(raw) if !is_location => Some(
            serde_json::from_str::<Vec<Vec<f64>>>(&raw).map_err(|e| {
                format!("Invalid geometry: not a JSON array of [lng, lat] pairs ({e})")
            })?,
        ),
        _ => None,
    };

    Ok(CsvRow {
        annotation_type,
        title,
        color: cell(record, columns.color),
        fill_color: cell(record, columns.fill_color),
        lat: cell(record, columns.lat),
        lng: cell(record, columns.lng),
        geometry,
        description: cell(record, columns.description),
    })
}
