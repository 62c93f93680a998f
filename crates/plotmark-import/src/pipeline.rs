//! End-to-end import: dispatch, parse, normalize, report.

use crate::error::ImportError;
use crate::format::{extension, FileFormat};
use crate::formats::{self, ParsedFile};
use crate::normalize::{normalize, NormalizeOptions};
use crate::raw::RejectedRecord;
use chrono::{DateTime, Utc};
use plotmark_core::{defaults, Annotation};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Options for one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Snap colors to the nearest palette entry.
    pub standardize_colors: bool,
    /// Inputs larger than this are refused before parsing; also caps the
    /// KML extracted from a KMZ.
    pub max_file_bytes: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            standardize_colors: defaults::STANDARDIZE_COLORS,
            max_file_bytes: defaults::MAX_FILE_BYTES,
        }
    }
}

impl ImportOptions {
    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            standardize_colors: self.standardize_colors,
        }
    }
}

/// Outcome of a successful import.
///
/// A report always holds at least one annotation; `rejected` lists every
/// record that was skipped, ordered by position in the source file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub import_id: Uuid,
    pub file_name: String,
    pub format: FileFormat,
    pub parsed_at: DateTime<Utc>,
    pub annotations: Vec<Annotation>,
    pub rejected: Vec<RejectedRecord>,
}

impl ImportReport {
    /// One-line count summary, e.g. `"12 parsed, 2 skipped"`.
    pub fn summary(&self) -> String {
        format!(
            "{} parsed, {} skipped",
            self.annotations.len(),
            self.rejected.len()
        )
    }

    /// True when some records were skipped.
    pub fn is_partial(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Import one uploaded file.
///
/// The format is chosen from `file_name`'s extension. Structural problems
/// fail the whole file; bad records are skipped and reported. A file in
/// which no record survives is an [`ImportError::EmptyResult`].
#[instrument(
    skip(bytes, options),
    fields(
        subsystem = "import",
        component = "pipeline",
        op = "import",
        import_id = tracing::field::Empty
    )
)]
pub fn import_file(
    bytes: &[u8],
    file_name: &str,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let start = Instant::now();
    let import_id = Uuid::now_v7();
    tracing::Span::current().record("import_id", tracing::field::display(import_id));

    let format = FileFormat::from_file_name(file_name).ok_or_else(|| {
        ImportError::UnsupportedFormat(extension(file_name).unwrap_or(file_name).to_string())
    })?;
    if bytes.len() > options.max_file_bytes {
        return Err(ImportError::FileTooLarge {
            size: bytes.len(),
            limit: options.max_file_bytes,
        });
    }
    debug!(
        format = format.as_str(),
        file_bytes = bytes.len(),
        standardize_colors = options.standardize_colors,
        "Dispatching import"
    );

    let ParsedFile {
        features,
        skipped: mut rejected,
    } = formats::parse(format, bytes, options.max_file_bytes).map_err(|source| {
        warn!(format = format.as_str(), error = %source, "File could not be parsed");
        ImportError::MalformedFile { format, source }
    })?;
    let feature_count = features.len();

    let normalize_options = options.normalize_options();
    let mut annotations = Vec::with_capacity(feature_count);
    for feature in &features {
        match normalize(feature, &normalize_options) {
            Ok(annotation) => annotations.push(annotation),
            Err(e) => {
                warn!(
                    record = %feature.record(),
                    field = e.field(),
                    error = %e,
                    "Rejecting record"
                );
                rejected.push(RejectedRecord::new(feature.record().clone(), e.to_string()));
            }
        }
    }
    rejected.sort_by_key(|r| r.record.index);

    if annotations.is_empty() {
        warn!(
            format = format.as_str(),
            rejected_count = rejected.len(),
            "No valid annotations in file"
        );
        return Err(ImportError::EmptyResult { format, rejected });
    }

    info!(
        format = format.as_str(),
        feature_count,
        annotation_count = annotations.len(),
        rejected_count = rejected.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Import completed"
    );

    Ok(ImportReport {
        import_id,
        file_name: file_name.to_string(),
        format,
        parsed_at: Utc::now(),
        annotations,
        rejected,
    })
}
