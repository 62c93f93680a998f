//! Field-level validators.
//!
//! Used by the import normalizer and by callers that need to check a plan
//! id or API key before building a request to the mapping platform.
//! Colors come in two flavors: [`validate_color`] fails fast for direct API
//! callers, [`normalize_color_or_default`] falls back for bulk imports.

use crate::defaults::{
    API_KEY_MIN_LEN, LAT_MAX, LAT_MIN, LNG_MAX, LNG_MIN, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
    PLAN_ID_HEX_LEN, PLAN_ID_PREFIX, TEXT_ALLOWED_PUNCTUATION,
};
use crate::error::{Result, ValidationError};
use crate::models::LatLng;
use crate::palette::default_color;
use once_cell::sync::Lazy;
use regex::Regex;

static PLAN_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[0-9a-fA-F]{{{PLAN_ID_HEX_LEN}}}$")).expect("plan id pattern compiles")
});

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("api key pattern compiles"));

/// Check a coordinate against WGS84 bounds.
///
/// Values are never clamped: anything outside the bounds, or not finite,
/// is an error naming the offending axis.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<LatLng> {
    check_axis("lat", lat, LAT_MIN, LAT_MAX)?;
    check_axis("lng", lng, LNG_MIN, LNG_MAX)?;
    Ok(LatLng { lat, lng })
}

fn check_axis(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ValidationError::invalid(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Normalize a hex color to lowercase `#rrggbb`.
///
/// Accepts an optional `#` and either six digits or the three-digit
/// shorthand. Returns `None` for anything else.
pub fn normalize_hex(hex: &str) -> Option<String> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(format!("#{}", digits.to_ascii_lowercase())),
        3 => {
            let expanded: String = digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase();
            Some(format!("#{expanded}"))
        }
        _ => None,
    }
}

/// Strict color validation for direct API callers.
pub fn validate_color(hex: &str) -> Result<String> {
    validate_color_field("color", hex)
}

pub(crate) fn validate_color_field(field: &'static str, hex: &str) -> Result<String> {
    normalize_hex(hex).ok_or_else(|| {
        ValidationError::invalid(field, format!("'{hex}' is not a #RRGGBB hex color"))
    })
}

/// Lenient color normalization; invalid input becomes the default color.
pub fn normalize_color_or_default(hex: &str) -> String {
    normalize_hex(hex).unwrap_or_else(|| default_color().color.to_string())
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || TEXT_ALLOWED_PUNCTUATION.contains(&c)
}

/// Strip disallowed characters, trim, and cap at `max_chars`.
fn sanitize_text(raw: &str, max_chars: usize) -> String {
    let cleaned: String = raw.chars().filter(|c| is_allowed_char(*c)).collect();
    cleaned.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

/// Sanitize an annotation title.
///
/// Keeps word characters, whitespace and `-_.,()`, then truncates to
/// [`MAX_TITLE_LEN`] characters. A title that is empty afterwards is
/// rejected.
pub fn sanitize_title(raw: &str) -> Result<String> {
    let title = sanitize_text(raw, MAX_TITLE_LEN);
    if title.is_empty() {
        return Err(ValidationError::invalid(
            "title",
            format!("'{raw}' contains no allowed characters"),
        ));
    }
    Ok(title)
}

/// Sanitize an optional description; empty results are dropped.
pub fn sanitize_description(raw: &str) -> Option<String> {
    let description = sanitize_text(raw, MAX_DESCRIPTION_LEN);
    (!description.is_empty()).then_some(description)
}

/// Validate a map plan id, returning the bare 24-hex-character form.
///
/// Accepts either the bare id or one already prefixed with `MapPlan:`.
pub fn validate_plan_id(id: &str) -> Result<String> {
    let trimmed = id.trim();
    let bare = trimmed.strip_prefix(PLAN_ID_PREFIX).unwrap_or(trimmed);
    if !PLAN_ID_RE.is_match(bare) {
        return Err(ValidationError::invalid(
            "planId",
            format!("expected {PLAN_ID_HEX_LEN} hex characters, optionally prefixed with '{PLAN_ID_PREFIX}', got '{id}'"),
        ));
    }
    Ok(bare.to_string())
}

/// Fully qualified `MapPlan:<id>` node id for a validated plan id.
pub fn plan_node_id(id: &str) -> Result<String> {
    validate_plan_id(id).map(|bare| format!("{PLAN_ID_PREFIX}{bare}"))
}

/// Validate an API key's length and character set.
pub fn validate_api_key(key: &str) -> Result<()> {
    if key.len() < API_KEY_MIN_LEN {
        return Err(ValidationError::invalid(
            "apiKey",
            format!("must be at least {API_KEY_MIN_LEN} characters"),
        ));
    }
    if !API_KEY_RE.is_match(key) {
        return Err(ValidationError::invalid(
            "apiKey",
            "may only contain letters, digits, '_', '-' and '.'",
        ));
    }
    Ok(())
}
