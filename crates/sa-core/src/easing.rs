//! Named easing curves shared by the playback engine and both exporters.
//!
//! Names follow the editor's timeline engine (`linear`, `easeInQuad`,
//! `easeOutElastic`, ...). Playback evaluates the real curve; the exporters
//! need a `cubic-bezier` approximation, which some curves do not have.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    Back,
    Elastic,
    Bounce,
}

impl Curve {
    pub const ALL: [Curve; 10] = [
        Curve::Quad,
        Curve::Cubic,
        Curve::Quart,
        Curve::Quint,
        Curve::Sine,
        Curve::Expo,
        Curve::Circ,
        Curve::Back,
        Curve::Elastic,
        Curve::Bounce,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Quad => "Quad",
            Self::Cubic => "Cubic",
            Self::Quart => "Quart",
            Self::Quint => "Quint",
            Self::Sine => "Sine",
            Self::Expo => "Expo",
            Self::Circ => "Circ",
            Self::Back => "Back",
            Self::Elastic => "Elastic",
            Self::Bounce => "Bounce",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == s)
    }

    /// The ease-in form of the curve on `0..=1`.
    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Quad => t.powi(2),
            Self::Cubic => t.powi(3),
            Self::Quart => t.powi(4),
            Self::Quint => t.powi(5),
            Self::Sine => 1.0 - (t * PI / 2.0).cos(),
            Self::Expo => 2f64.powf(10.0 * t - 10.0),
            Self::Circ => 1.0 - (1.0 - t * t).sqrt(),
            Self::Back => t * t * (3.0 * t - 2.0),
            Self::Elastic => {
                let (amplitude, period) = (1.0_f64, 0.5_f64);
                let s = period / (2.0 * PI) * (1.0 / amplitude).asin();
                -amplitude * 2f64.powf(10.0 * (t - 1.0)) * ((t - 1.0 - s) * 2.0 * PI / period).sin()
            }
            Self::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    #[default]
    Linear,
    In(Curve),
    Out(Curve),
    InOut(Curve),
}

impl Easing {
    /// Every named easing, `linear` first.
    pub fn all() -> impl Iterator<Item = Easing> {
        std::iter::once(Easing::Linear).chain(
            Curve::ALL
                .into_iter()
                .flat_map(|c| [Easing::In(c), Easing::Out(c), Easing::InOut(c)]),
        )
    }

    /// Look up a curve by name. Unknown and empty names resolve to `linear`.
    pub fn from_name(name: &str) -> Self {
        Self::try_from_name(name).unwrap_or_else(|| {
            if !name.is_empty() {
                log::debug!("unknown easing {name:?}, falling back to linear");
            }
            Easing::Linear
        })
    }

    fn try_from_name(name: &str) -> Option<Self> {
        if name == "linear" {
            return Some(Easing::Linear);
        }
        if let Some(curve) = name.strip_prefix("easeInOut") {
            return Curve::from_name(curve).map(Easing::InOut);
        }
        if let Some(curve) = name.strip_prefix("easeIn") {
            return Curve::from_name(curve).map(Easing::In);
        }
        if let Some(curve) = name.strip_prefix("easeOut") {
            return Curve::from_name(curve).map(Easing::Out);
        }
        None
    }

    pub fn name(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::In(c) => format!("easeIn{}", c.name()),
            Easing::Out(c) => format!("easeOut{}", c.name()),
            Easing::InOut(c) => format!("easeInOut{}", c.name()),
        }
    }

    /// Map linear progress `t` to eased progress. Endpoints are exact.
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::In(c) => c.ease_in(t),
            Easing::Out(c) => 1.0 - c.ease_in(1.0 - t),
            Easing::InOut(c) => {
                if t < 0.5 {
                    c.ease_in(t * 2.0) / 2.0
                } else {
                    1.0 - c.ease_in(t * -2.0 + 2.0) / 2.0
                }
            }
        }
    }

    /// Control points of the `cubic-bezier` approximation.
    ///
    /// `easeInBack` and every `Elastic`/`Bounce` variant have no entry: they
    /// export as `linear`, a known approximation.
    pub fn cubic_bezier(&self) -> Option<[f64; 4]> {
        use Curve::*;
        let points = match *self {
            Easing::Linear => return None,
            Easing::In(Quad) => [0.55, 0.085, 0.68, 0.53],
            Easing::In(Cubic) => [0.55, 0.055, 0.675, 0.19],
            Easing::In(Quart) => [0.895, 0.03, 0.685, 0.22],
            Easing::In(Quint) => [0.755, 0.05, 0.855, 0.06],
            Easing::In(Sine) => [0.47, 0.0, 0.745, 0.715],
            Easing::In(Expo) => [0.95, 0.05, 0.795, 0.035],
            Easing::In(Circ) => [0.6, 0.04, 0.98, 0.335],
            Easing::Out(Quad) => [0.25, 0.46, 0.45, 0.94],
            Easing::Out(Cubic) => [0.215, 0.61, 0.355, 1.0],
            Easing::Out(Quart) => [0.165, 0.84, 0.44, 1.0],
            Easing::Out(Quint) => [0.23, 1.0, 0.32, 1.0],
            Easing::Out(Sine) => [0.39, 0.575, 0.565, 1.0],
            Easing::Out(Expo) => [0.19, 1.0, 0.22, 1.0],
            Easing::Out(Circ) => [0.075, 0.82, 0.165, 1.0],
            Easing::Out(Back) => [0.175, 0.885, 0.32, 1.275],
            Easing::InOut(Quad) => [0.455, 0.03, 0.515, 0.955],
            Easing::InOut(Cubic) => [0.645, 0.045, 0.355, 1.0],
            Easing::InOut(Quart) => [0.77, 0.0, 0.175, 1.0],
            Easing::InOut(Quint) => [0.86, 0.0, 0.07, 1.0],
            Easing::InOut(Sine) => [0.445, 0.05, 0.55, 0.95],
            Easing::InOut(Expo) => [1.0, 0.0, 0.0, 1.0],
            Easing::InOut(Circ) => [0.785, 0.135, 0.15, 0.86],
            Easing::InOut(Back) => [0.68, -0.55, 0.265, 1.55],
            Easing::In(Back) | Easing::In(Elastic) | Easing::Out(Elastic) | Easing::InOut(Elastic) => {
                return None;
            }
            Easing::In(Bounce) | Easing::Out(Bounce) | Easing::InOut(Bounce) => return None,
        };
        Some(points)
    }

    /// CSS `animation-timing-function` value.
    pub fn css_timing_function(&self) -> String {
        match self.cubic_bezier() {
            Some([x1, y1, x2, y2]) => format!("cubic-bezier({x1},{y1},{x2},{y2})"),
            None => "linear".to_string(),
        }
    }

    /// SMIL `keySplines` entry. SMIL requires every control value in `0..=1`,
    /// so overshooting curves are clamped.
    pub fn key_spline(&self) -> String {
        let [x1, y1, x2, y2] = self.cubic_bezier().unwrap_or([0.0, 0.0, 1.0, 1.0]);
        let c = |v: f64| v.clamp(0.0, 1.0);
        format!("{} {} {} {}", c(x1), c(y1), c(x2), c(y2))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Easing::from_name(&s))
    }
}
