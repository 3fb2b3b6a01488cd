//! CSS color parsing and the color/opacity split used by both exporters.
//!
//! SVG renderers treat `fill="rgba(…)"` inconsistently, so exported markup
//! always carries the RGB channel and the alpha channel separately
//! (`fill` + `fill-opacity`, `stop-color` + `stop-opacity`).

use crate::math::{fmt_num, scan_numbers};
use serde::{Deserialize, Serialize};

/// An RGBA color: channels in `0.0..=255.0`, alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `rgb()`, `rgba()`, `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`,
    /// `transparent` and `none`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") || s.eq_ignore_ascii_case("none") {
            return Some(Self::TRANSPARENT);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            let nums = scan_numbers(&lower);
            return match nums.as_slice() {
                [r, g, b] => Some(Self::new(*r, *g, *b, 1.0)),
                [r, g, b, a] => Some(Self::new(*r, *g, *b, a.clamp(0.0, 1.0))),
                _ => None,
            };
        }
        None
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| f64::from(v * 17));
        let long = |i: usize| -> Option<f64> {
            Some(f64::from(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?))
        };
        match bytes.len() {
            3 => Some(Self::new(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::new(short(0)?, short(1)?, short(2)?, short(3)? / 255.0)),
            6 => Some(Self::new(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::new(long(0)?, long(2)?, long(4)?, long(6)? / 255.0)),
            _ => None,
        }
    }

    /// `rgb(r,g,b)` with rounded channels.
    pub fn to_rgb_string(&self) -> String {
        format!(
            "rgb({},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// `rgba(r,g,b,a)` with rounded channels.
    pub fn to_rgba_string(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            fmt_num(self.a.clamp(0.0, 1.0))
        )
    }

    /// Linear blend, channel by channel.
    pub fn lerp(&self, to: &Rgba, t: f64) -> Rgba {
        Rgba::new(
            self.r + (to.r - self.r) * t,
            self.g + (to.g - self.g) * t,
            self.b + (to.b - self.b) * t,
            self.a + (to.a - self.a) * t,
        )
    }
}

fn channel(v: f64) -> String {
    fmt_num(v.round().clamp(0.0, 255.0))
}

/// Split a CSS color into its `rgb(...)` part and its opacity.
///
/// Unparseable input passes through unchanged with opacity 1 so that named
/// colors and `url(#…)` references survive the export.
pub fn split_color_opacity(color: &str) -> (String, f64) {
    match Rgba::parse(color) {
        Some(c) => (c.to_rgb_string(), c.a),
        None => (color.trim().to_string(), 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_functional_notation() {
        assert_eq!(Rgba::parse("rgb(10, 20, 30)"), Some(Rgba::new(10.0, 20.0, 30.0, 1.0)));
        assert_eq!(
            Rgba::parse("rgba(10,20,30,0.5)"),
            Some(Rgba::new(10.0, 20.0, 30.0, 0.5))
        );
        assert_eq!(Rgba::parse("rgb(1,2)"), None);
    }

    #[test]
    fn parses_hex() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::new(255.0, 255.0, 255.0, 1.0)));
        assert_eq!(Rgba::parse("#6C5CE7"), Some(Rgba::new(108.0, 92.0, 231.0, 1.0)));
        let c = Rgba::parse("#FF000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(Rgba::parse("#12"), None);
    }

    #[test]
    fn split_keeps_alpha_apart() {
        assert_eq!(
            split_color_opacity("rgba(255,0,0,0.25)"),
            ("rgb(255,0,0)".to_string(), 0.25)
        );
        assert_eq!(split_color_opacity("#000"), ("rgb(0,0,0)".to_string(), 1.0));
        assert_eq!(
            split_color_opacity("url(#grad)"),
            ("url(#grad)".to_string(), 1.0)
        );
    }

    #[test]
    fn lerp_midpoint() {
        let a = Rgba::new(0.0, 0.0, 0.0, 0.0);
        let b = Rgba::new(200.0, 100.0, 50.0, 1.0);
        assert_eq!(a.lerp(&b, 0.5), Rgba::new(100.0, 50.0, 25.0, 0.5));
        assert_eq!(a.lerp(&b, 0.5).to_rgba_string(), "rgba(100,50,25,0.5)");
    }
}
