//! Structured logging field name constants for plotmark.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query imports consistently.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Import could not run at all (unreadable input, bad config) |
//! | WARN  | Record rejected, color fallback applied, file-level parse failure |
//! | INFO  | Import completions with counts |
//! | DEBUG | Format dispatch, option choices, config source |
//! | TRACE | Per-record normalization |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation id of one import run (UUIDv7).
pub const IMPORT_ID: &str = "import_id";

/// Subsystem originating the log event.
/// Values: "import", "config", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pipeline", "csv", "geojson", "kml", "kmz", "normalize"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "import", "parse", "normalize", "load"
pub const OPERATION: &str = "op";

// ─── Input fields ──────────────────────────────────────────────────────────

/// Uploaded file name.
pub const FILE_NAME: &str = "file_name";

/// Detected file format ("csv", "geojson", "kml", "kmz").
pub const FORMAT: &str = "format";

/// Input size in bytes.
pub const FILE_BYTES: &str = "file_bytes";

/// Human-readable reference to one source record.
pub const RECORD: &str = "record";

/// Field that failed validation.
pub const FIELD: &str = "field";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of raw records produced by a parser.
pub const FEATURE_COUNT: &str = "feature_count";

/// Number of annotations that survived normalization.
pub const ANNOTATION_COUNT: &str = "annotation_count";

/// Number of records rejected during parsing or normalization.
pub const REJECTED_COUNT: &str = "rejected_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Whether palette standardization was applied.
pub const STANDARDIZE_COLORS: &str = "standardize_colors";
