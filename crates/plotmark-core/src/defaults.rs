//! Centralized default constants for plotmark.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// COORDINATES
// =============================================================================

/// Southern WGS84 latitude bound in decimal degrees.
pub const LAT_MIN: f64 = -90.0;

/// Northern WGS84 latitude bound in decimal degrees.
pub const LAT_MAX: f64 = 90.0;

/// Western WGS84 longitude bound in decimal degrees.
pub const LNG_MIN: f64 = -180.0;

/// Eastern WGS84 longitude bound in decimal degrees.
pub const LNG_MAX: f64 = 180.0;

/// Minimum coordinate pairs for an AREA, not counting the closing point the
/// normalizer appends.
pub const MIN_AREA_POINTS: usize = 3;

/// Minimum coordinate pairs for a LINE.
pub const MIN_LINE_POINTS: usize = 2;

// =============================================================================
// TEXT FIELDS
// =============================================================================

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Punctuation allowed in titles and descriptions besides word characters
/// and whitespace.
pub const TEXT_ALLOWED_PUNCTUATION: &[char] = &['-', '_', '.', ',', '(', ')'];

// =============================================================================
// REMOTE IDENTIFIERS
// =============================================================================

/// Prefix of a fully qualified map plan node id.
pub const PLAN_ID_PREFIX: &str = "MapPlan:";

/// Number of hex characters in a bare plan id.
pub const PLAN_ID_HEX_LEN: usize = 24;

/// Minimum API key length.
pub const API_KEY_MIN_LEN: usize = 10;

// =============================================================================
// IMPORT
// =============================================================================

/// Largest accepted upload in bytes (10 MiB).
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Whether color standardization is on when nothing configures it.
pub const STANDARDIZE_COLORS: bool = false;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Directory under the platform config dir holding plotmark settings.
pub const CONFIG_DIR_NAME: &str = "plotmark";

/// Import configuration file name.
pub const CONFIG_FILE_NAME: &str = "import.toml";

/// Environment variable toggling color standardization.
pub const ENV_STANDARDIZE_COLORS: &str = "PLOTMARK_STANDARDIZE_COLORS";

/// Environment variable overriding the upload size limit.
pub const ENV_MAX_FILE_BYTES: &str = "PLOTMARK_MAX_FILE_BYTES";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_ordered() {
        assert!(LAT_MIN < LAT_MAX);
        assert!(LNG_MIN < LNG_MAX);
    }

    #[test]
    fn test_area_needs_more_points_than_line() {
        assert!(MIN_AREA_POINTS > MIN_LINE_POINTS);
    }

    #[test]
    fn test_description_longer_than_title() {
        assert!(MAX_DESCRIPTION_LEN > MAX_TITLE_LEN);
    }
}
