//! # plotmark-import
//!
//! File parsing and annotation normalization for plotmark.
//!
//! Accepts a raw upload (bytes plus file name), dispatches on the file
//! extension to a CSV, GeoJSON, KML or KMZ parser, normalizes each parsed
//! record into a [`plotmark_core::Annotation`], and returns the surviving
//! annotations together with every rejected record and its reason.
//!
//! ```no_run
//! use plotmark_import::{import_file, ImportOptions};
//!
//! let bytes = std::fs::read("site.geojson").unwrap();
//! let report = import_file(&bytes, "site.geojson", &ImportOptions::default()).unwrap();
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod normalize;
pub mod pipeline;
pub mod raw;
pub mod templates;

pub use config::{ConfigError, ImportConfig};
pub use error::{ImportError, ParseError};
pub use export::to_feature_collection;
pub use format::FileFormat;
pub use formats::ParsedFile;
pub use normalize::{normalize, NormalizeOptions};
pub use pipeline::{import_file, ImportOptions, ImportReport};
pub use raw::{RawFeature, RecordRef, RejectedRecord};
pub use templates::template;
