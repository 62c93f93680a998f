//! # plotmark-core
//!
//! Core types for the plotmark annotation importer.
//!
//! This crate provides the canonical [`Annotation`] model, the fixed
//! DroneDeploy color palette with perceptual nearest-color matching, and the
//! field validators shared by the import pipeline and by API callers that
//! need to check a plan id or API key before building a request.

pub mod color;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod palette;
pub mod validation;

// Re-export commonly used types at crate root
pub use color::{
    color_distance, hex_to_rgb, nearest_palette_color, nearest_palette_match, rgb_to_hex,
    rgb_to_hsl, Hsl, Rgb,
};
pub use error::{Result, ValidationError};
pub use models::{Annotation, AnnotationType, Geometry, LatLng, Position};
pub use palette::{default_color, DroneDeployColor, PALETTE};
pub use validation::{
    normalize_color_or_default, normalize_hex, plan_node_id, sanitize_description,
    sanitize_title, validate_api_key, validate_color, validate_coordinates, validate_plan_id,
};
