//! Perceptual color matching against the fixed palette.
//!
//! Distance between two colors blends a channel-weighted RGB distance with
//! an HSL distance that treats hue as circular:
//!
//! ```text
//! rgb  = sqrt(2·Δr² + 4·Δg² + 3·Δb²)
//! hsl  = sqrt((2·Δh)² + Δs² + (0.5·Δl)²)      Δh = min(|h1-h2|, 360-|h1-h2|)
//! dist = 0.7·rgb + 0.3·hsl
//! ```
//!
//! Hue is in degrees, saturation and lightness in percent. The result is
//! deterministic so tests can assert exact matches.

use crate::palette::{default_color, DroneDeployColor, PALETTE};
use once_cell::sync::Lazy;

const RGB_WEIGHTS: (f64, f64, f64) = (2.0, 4.0, 3.0);
const HUE_WEIGHT: f64 = 2.0;
const LIGHTNESS_WEIGHT: f64 = 0.5;
const RGB_SHARE: f64 = 0.7;
const HSL_SHARE: f64 = 0.3;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Palette entries paired with their parsed channels.
static PALETTE_RGB: Lazy<Vec<(&'static DroneDeployColor, Rgb)>> = Lazy::new(|| {
    PALETTE
        .iter()
        .filter_map(|entry| hex_to_rgb(entry.color).map(|rgb| (entry, rgb)))
        .collect()
});

/// Parse a 6-digit hex color, with or without a leading `#`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Format channels as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: l * 100.0,
        };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: h / 6.0 * 360.0,
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// Combined perceptual distance between two colors.
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    let (wr, wg, wb) = RGB_WEIGHTS;
    let rgb_distance = (wr * dr * dr + wg * dg * dg + wb * db * db).sqrt();

    let ha = rgb_to_hsl(a);
    let hb = rgb_to_hsl(b);
    let raw_hue = (ha.h - hb.h).abs();
    let dh = raw_hue.min(360.0 - raw_hue);
    let ds = ha.s - hb.s;
    let dl = ha.l - hb.l;
    let hsl_distance =
        ((HUE_WEIGHT * dh).powi(2) + ds * ds + (LIGHTNESS_WEIGHT * dl).powi(2)).sqrt();

    RGB_SHARE * rgb_distance + HSL_SHARE * hsl_distance
}

/// Nearest palette entry and its distance; `None` when `hex` does not parse.
///
/// Ties resolve to the earliest entry in palette order.
pub fn nearest_palette_match(hex: &str) -> Option<(&'static DroneDeployColor, f64)> {
    let rgb = hex_to_rgb(hex)?;
    let mut best: Option<(&'static DroneDeployColor, f64)> = None;
    for (entry, candidate) in PALETTE_RGB.iter() {
        let distance = color_distance(rgb, *candidate);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }
    best
}

/// Nearest palette entry for any input; invalid input yields the default.
pub fn nearest_palette_color(hex: &str) -> &'static DroneDeployColor {
    nearest_palette_match(hex)
        .map(|(entry, _)| entry)
        .unwrap_or_else(default_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(hex: &str) -> Rgb {
        hex_to_rgb(hex).unwrap()
    }

    #[test]
    fn test_hex_to_rgb_with_and_without_hash() {
        assert_eq!(rgb("#ff8000"), Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(rgb("FF8000"), Rgb { r: 255, g: 128, b: 0 });
    }

    #[test]
    fn test_hex_to_rgb_rejects_bad_input() {
        assert!(hex_to_rgb("").is_none());
        assert!(hex_to_rgb("#fff").is_none());
        assert!(hex_to_rgb("#gg0000").is_none());
        assert!(hex_to_rgb("#ff00000").is_none());
        assert!(hex_to_rgb("#ff00é").is_none());
    }

    #[test]
    fn test_rgb_to_hex_lowercase() {
        assert_eq!(rgb_to_hex(Rgb { r: 171, g: 205, b: 239 }), "#abcdef");
        assert_eq!(rgb_to_hex(Rgb::default()), "#000000");
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = rgb_to_hsl(rgb("#ff0000"));
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));

        let green = rgb_to_hsl(rgb("#00ff00"));
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = rgb_to_hsl(rgb("#0000ff"));
        assert!((blue.h - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_to_hsl_achromatic() {
        let grey = rgb_to_hsl(rgb("#808080"));
        assert_eq!(grey.h, 0.0);
        assert_eq!(grey.s, 0.0);
        assert!((grey.l - 50.196).abs() < 0.001);
    }

    #[test]
    fn test_rgb_to_hsl_magenta_wraps_hue() {
        let magenta = rgb_to_hsl(rgb("#ff00ff"));
        assert!((magenta.h - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let c = rgb("#123456");
        assert_eq!(color_distance(c, c), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = rgb("#123456");
        let b = rgb("#fedcba");
        assert!((color_distance(a, b) - color_distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_hue_difference_is_circular() {
        // 350° and 10° are 20° apart, not 340°.
        let a = Rgb { r: 255, g: 0, b: 43 };
        let b = Rgb { r: 255, g: 43, b: 0 };
        let ha = rgb_to_hsl(a).h;
        let hb = rgb_to_hsl(b).h;
        assert!(ha > 340.0 && hb < 20.0);
        let d = color_distance(a, b);
        // The RGB term alone is 0.7 * sqrt(2*0 + 4*43² + 3*43²) ≈ 79.6, so a
        // non-circular hue term would push the total far past 150.
        assert!(d < 110.0, "distance {d}");
    }

    #[test]
    fn test_every_palette_entry_matches_itself() {
        for entry in PALETTE.iter() {
            let (matched, distance) = nearest_palette_match(entry.color).unwrap();
            assert_eq!(matched, entry);
            assert_eq!(distance, 0.0);
        }
    }

    #[test]
    fn test_representative_matches() {
        let cases = [
            ("#123456", "Teal"),
            ("#ff0000", "Red"),
            ("#f44336", "Red"),
            ("#00ff00", "Green"),
            ("#000000", "Black"),
            ("#ffa500", "Orange"),
            ("#ffff00", "Yellow"),
            ("#800080", "Purple"),
            ("#008080", "Teal"),
            ("#2196f3", "Blue"),
        ];
        for (input, expected) in cases {
            assert_eq!(nearest_palette_color(input).name, expected, "input {input}");
        }
    }

    #[test]
    fn test_invalid_input_defaults() {
        assert_eq!(nearest_palette_color("not a color"), default_color());
        assert_eq!(nearest_palette_color(""), default_color());
        assert!(nearest_palette_match("#12").is_none());
    }

    #[test]
    fn test_match_is_deterministic() {
        let first = nearest_palette_color("#123456");
        for _ in 0..10 {
            assert_eq!(nearest_palette_color("#123456"), first);
        }
    }
}
