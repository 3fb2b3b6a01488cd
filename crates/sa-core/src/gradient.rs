//! The serialized gradient mini-format stored in `Transition::value`:
//!
//! ```text
//! GRADIENT;<linear|radial>;<angleDegrees>;<color>_<offset>;<color>_<offset>;...
//! ```
//!
//! Colors use CSS `rgb()`/`rgba()` syntax. Parsing never fails: malformed
//! input yields an empty default gradient, and callers must tolerate a
//! gradient without stops.

use crate::color::Rgba;
use crate::math::fmt_num;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Leading token that marks a value string as a serialized gradient.
pub const GRADIENT_SENTINEL: &str = "GRADIENT";

/// Gradient id prefix the editor uses inside its static SVG.
pub const EDITOR_GRADIENT_PREFIX: &str = "SVGID_";

/// Gradient id prefix used in exported documents.
pub const EXPORT_GRADIENT_PREFIX: &str = "sa-gradient-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

impl GradientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
        }
    }

    /// The SVG element name for this kind.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Linear => "linearGradient",
            Self::Radial => "radialGradient",
        }
    }
}

/// A gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: Rgba,
    pub offset: f64, // 0.0 .. 1.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub kind: GradientKind,
    /// Direction of a linear gradient in degrees; 0 runs left → right.
    pub angle: f64,
    pub color_stops: Vec<ColorStop>,
}

/// Whether a transition value is a serialized gradient.
pub fn is_gradient(value: &str) -> bool {
    value.starts_with(GRADIENT_SENTINEL)
}

/// Parse the mini-format; malformed input yields `Gradient::default()`.
pub fn parse_gradient(s: &str) -> Gradient {
    try_parse_gradient(s).unwrap_or_else(|| {
        log::debug!("malformed gradient value {s:?}, using empty gradient");
        Gradient::default()
    })
}

fn try_parse_gradient(s: &str) -> Option<Gradient> {
    let mut parts = s.split(';');
    if parts.next()? != GRADIENT_SENTINEL {
        return None;
    }
    let kind = match parts.next()?.trim() {
        "linear" => GradientKind::Linear,
        "radial" => GradientKind::Radial,
        _ => return None,
    };
    let angle = parts.next()?.trim().parse::<f64>().ok()?;
    let mut color_stops = Vec::new();
    for part in parts.filter(|p| !p.trim().is_empty()) {
        let (color, offset) = part.rsplit_once('_')?;
        color_stops.push(ColorStop {
            color: Rgba::parse(color)?,
            offset: offset.trim().parse::<f64>().ok()?,
        });
    }
    Some(Gradient {
        kind,
        angle,
        color_stops,
    })
}

/// Serialize back into the mini-format.
pub fn serialize_gradient(gradient: &Gradient) -> String {
    let mut out = format!(
        "{GRADIENT_SENTINEL};{};{}",
        gradient.kind.as_str(),
        fmt_num(gradient.angle)
    );
    for stop in &gradient.color_stops {
        out.push(';');
        out.push_str(&stop_color_string(&stop.color));
        out.push('_');
        out.push_str(&fmt_num(stop.offset));
    }
    out
}

fn stop_color_string(color: &Rgba) -> String {
    if color.a >= 1.0 {
        color.to_rgb_string()
    } else {
        color.to_rgba_string()
    }
}

/// Replace the editor-internal gradient id prefix with the export-safe one.
pub fn rewrite_gradient_ids(svg: &str) -> String {
    svg.replace(EDITOR_GRADIENT_PREFIX, EXPORT_GRADIENT_PREFIX)
}

impl Gradient {
    /// A gradient whose stops all share one color, evenly spaced.
    /// Used when a solid color keyframe sits between gradient keyframes.
    pub fn uniform(color: Rgba, stops: usize) -> Self {
        let count = stops.max(1);
        let color_stops = (0..count)
            .map(|i| ColorStop {
                color,
                offset: if count == 1 {
                    0.0
                } else {
                    i as f64 / (count - 1) as f64
                },
            })
            .collect();
        Self {
            kind: GradientKind::Linear,
            angle: 0.0,
            color_stops,
        }
    }

    /// Endpoints of a linear gradient in `objectBoundingBox` units.
    pub fn vector(&self) -> (f64, f64, f64, f64) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (0.5 - cos / 2.0, 0.5 - sin / 2.0, 0.5 + cos / 2.0, 0.5 + sin / 2.0)
    }

    /// Stop-by-stop interpolation. A shorter stop list is padded with its last
    /// stop; the kind switches when `t` reaches 1.
    pub fn lerp(&self, to: &Gradient, t: f64) -> Gradient {
        let count = self.color_stops.len().max(to.color_stops.len());
        let stop_at = |g: &Gradient, i: usize| -> ColorStop {
            g.color_stops
                .get(i)
                .or(g.color_stops.last())
                .copied()
                .unwrap_or(ColorStop {
                    color: Rgba::TRANSPARENT,
                    offset: 0.0,
                })
        };
        let color_stops = (0..count)
            .map(|i| {
                let a = stop_at(self, i);
                let b = stop_at(to, i);
                ColorStop {
                    color: a.color.lerp(&b.color, t),
                    offset: a.offset + (b.offset - a.offset) * t,
                }
            })
            .collect();
        Gradient {
            kind: if t >= 1.0 { to.kind } else { self.kind },
            angle: self.angle + (to.angle - self.angle) * t,
            color_stops,
        }
    }
}

/// Memoizes parsed gradients for the duration of one export or playback
/// session. Owned by its caller; never shared between projects.
#[derive(Debug, Default)]
pub struct GradientCache {
    parsed: HashMap<String, Gradient>,
}

impl GradientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, value: &str) -> &Gradient {
        self.parsed
            .entry(value.to_string())
            .or_insert_with(|| parse_gradient(value))
    }

    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "GRADIENT;linear;90;rgb(255,0,0)_0;rgba(0,0,255,0.5)_1";

    #[test]
    fn detects_sentinel() {
        assert!(is_gradient(SAMPLE));
        assert!(!is_gradient("rgb(0,0,0)"));
    }

    #[test]
    fn parses_stops() {
        let g = parse_gradient(SAMPLE);
        assert_eq!(g.kind, GradientKind::Linear);
        assert_eq!(g.angle, 90.0);
        assert_eq!(g.color_stops.len(), 2);
        assert_eq!(g.color_stops[1].color, Rgba::new(0.0, 0.0, 255.0, 0.5));
        assert_eq!(g.color_stops[1].offset, 1.0);
    }

    #[test]
    fn round_trip_preserves_gradient() {
        let g = parse_gradient(SAMPLE);
        let s = serialize_gradient(&g);
        assert_eq!(s, SAMPLE);
        assert_eq!(parse_gradient(&s), g);

        let radial = "GRADIENT;radial;0;rgb(1,2,3)_0.25";
        assert_eq!(serialize_gradient(&parse_gradient(radial)), radial);
    }

    #[test]
    fn malformed_yields_default() {
        assert_eq!(parse_gradient("GRADIENT;conic;0"), Gradient::default());
        assert_eq!(parse_gradient("GRADIENT;linear;abc"), Gradient::default());
        assert!(parse_gradient("nonsense").color_stops.is_empty());
    }

    #[test]
    fn lerp_pads_shorter_list() {
        let a = parse_gradient("GRADIENT;linear;0;rgb(0,0,0)_0");
        let b = parse_gradient("GRADIENT;linear;90;rgb(100,100,100)_0;rgb(200,200,200)_1");
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.angle, 45.0);
        assert_eq!(mid.color_stops.len(), 2);
        assert_eq!(mid.color_stops[1].color, Rgba::new(100.0, 100.0, 100.0, 1.0));
        assert_eq!(mid.color_stops[1].offset, 0.5);
    }

    #[test]
    fn rewrites_prefix() {
        assert_eq!(
            rewrite_gradient_ids(r#"<linearGradient id="SVGID_3"/><rect fill="url(#SVGID_3)"/>"#),
            r#"<linearGradient id="sa-gradient-3"/><rect fill="url(#sa-gradient-3)"/>"#
        );
    }

    #[test]
    fn cache_memoizes() {
        let mut cache = GradientCache::new();
        assert_eq!(cache.get(SAMPLE).color_stops.len(), 2);
        cache.get(SAMPLE);
        assert_eq!(cache.len(), 1);
    }
}
