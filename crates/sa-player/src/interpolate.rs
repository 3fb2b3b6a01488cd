//! Value interpolation between two keyframes.
//!
//! Numbers blend linearly, colors per RGBA channel, gradients stop by stop.
//! Other strings (path data, point lists, dash arrays) are treated as numeric
//! templates: when both ends have the same literal skeleton the embedded
//! numbers blend; otherwise the start value holds until the segment ends.

use sa_core::color::Rgba;
use sa_core::gradient::{Gradient, GradientCache, serialize_gradient};
use sa_core::math::{fmt_num, parse_number};
use sa_core::model::TransitionValue;
use std::fmt;

/// A sampled property value, classified for the update callback.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatedValue {
    Number(f64),
    Color(Rgba),
    Gradient(Gradient),
    Text(String),
}

impl AnimatedValue {
    /// Classify a stored keyframe value.
    pub fn classify(value: &TransitionValue, gradients: &mut GradientCache) -> Self {
        if let Some(n) = value.as_number() {
            return Self::Number(n);
        }
        let text = value.to_string();
        if value.is_gradient() {
            return Self::Gradient(gradients.get(&text).clone());
        }
        match Rgba::parse(&text) {
            Some(color) => Self::Color(color),
            None => Self::Text(text),
        }
    }
}

impl fmt::Display for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&fmt_num(*n)),
            Self::Color(c) => f.write_str(&c.to_rgba_string()),
            Self::Gradient(g) => f.write_str(&serialize_gradient(g)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Blend two keyframe values at eased progress `t`.
pub fn interpolate(
    from: &TransitionValue,
    to: &TransitionValue,
    t: f64,
    gradients: &mut GradientCache,
) -> AnimatedValue {
    let a = AnimatedValue::classify(from, gradients);
    let b = AnimatedValue::classify(to, gradients);
    blend(a, b, t)
}

fn blend(a: AnimatedValue, b: AnimatedValue, t: f64) -> AnimatedValue {
    use AnimatedValue as V;
    match (a, b) {
        (V::Number(x), V::Number(y)) => V::Number(x + (y - x) * t),
        (V::Color(x), V::Color(y)) => V::Color(x.lerp(&y, t)),
        (V::Gradient(x), V::Gradient(y)) => V::Gradient(x.lerp(&y, t)),
        // A solid color next to a gradient acts as a single-color gradient.
        (V::Color(x), V::Gradient(y)) => V::Gradient(promote(x, &y).lerp(&y, t)),
        (V::Gradient(x), V::Color(y)) => {
            let to = promote(y, &x);
            V::Gradient(x.lerp(&to, t))
        }
        (V::Text(x), V::Text(y)) => V::Text(blend_template(&x, &y, t)),
        (x, y) => {
            if t >= 1.0 {
                y
            } else {
                x
            }
        }
    }
}

/// A uniform gradient shaped like `like`.
fn promote(color: Rgba, like: &Gradient) -> Gradient {
    Gradient {
        kind: like.kind,
        angle: like.angle,
        ..Gradient::uniform(color, like.color_stops.len())
    }
}

/// Literal fragments and the numbers between them.
struct Template<'a> {
    literals: Vec<&'a str>,
    numbers: Vec<f64>,
}

fn split_template(s: &str) -> Template<'_> {
    let mut literals = Vec::new();
    let mut numbers = Vec::new();
    let mut rest = s;
    let mut literal_start = s;
    while !rest.is_empty() {
        let before = rest;
        let mut probe = rest;
        if let Ok(n) = parse_number(&mut probe) {
            let consumed = literal_start.len() - before.len();
            literals.push(&literal_start[..consumed]);
            numbers.push(n);
            rest = probe;
            literal_start = rest;
        } else {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }
    literals.push(literal_start);
    Template { literals, numbers }
}

fn blend_template(from: &str, to: &str, t: f64) -> String {
    let a = split_template(from);
    let b = split_template(to);
    if a.numbers.is_empty() || a.literals != b.literals || a.numbers.len() != b.numbers.len() {
        return if t >= 1.0 { to.to_string() } else { from.to_string() };
    }
    let mut out = String::with_capacity(from.len().max(to.len()));
    for (i, literal) in a.literals.iter().enumerate() {
        out.push_str(literal);
        if let (Some(x), Some(y)) = (a.numbers.get(i), b.numbers.get(i)) {
            out.push_str(&fmt_num(x + (y - x) * t));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lerp(a: impl Into<TransitionValue>, b: impl Into<TransitionValue>, t: f64) -> AnimatedValue {
        interpolate(&a.into(), &b.into(), t, &mut GradientCache::new())
    }

    #[test]
    fn numbers_blend() {
        assert_eq!(lerp(10.0, 50.0, 0.25), AnimatedValue::Number(20.0));
    }

    #[test]
    fn colors_blend_per_channel() {
        assert_eq!(
            lerp("rgb(0,0,0)", "rgba(200,100,0,0)", 0.5),
            AnimatedValue::Color(Rgba::new(100.0, 50.0, 0.0, 0.5))
        );
    }

    #[test]
    fn path_templates_blend_numbers() {
        assert_eq!(
            lerp("M 0 0 L 10 0 Z", "M 10 10 L 20 0 Z", 0.5),
            AnimatedValue::Text("M 5 5 L 15 0 Z".to_string())
        );
    }

    #[test]
    fn mismatched_templates_hold_then_switch() {
        assert_eq!(
            lerp("M 0 0 L 10 0", "M 0 0 C 1 1 2 2 3 3", 0.9),
            AnimatedValue::Text("M 0 0 L 10 0".to_string())
        );
        assert_eq!(
            lerp("M 0 0 L 10 0", "M 0 0 C 1 1 2 2 3 3", 1.0),
            AnimatedValue::Text("M 0 0 C 1 1 2 2 3 3".to_string())
        );
    }

    #[test]
    fn solid_to_gradient_promotes_color() {
        let value = lerp(
            "rgb(255,255,255)",
            "GRADIENT;linear;90;rgb(0,0,0)_0;rgb(0,0,0)_1",
            0.5,
        );
        let AnimatedValue::Gradient(g) = value else {
            panic!("expected gradient, got {value:?}");
        };
        assert_eq!(g.angle, 90.0);
        assert_eq!(g.color_stops.len(), 2);
        assert_eq!(g.color_stops[0].color, Rgba::new(127.5, 127.5, 127.5, 1.0));
    }

    #[test]
    fn numeric_strings_are_numbers() {
        assert_eq!(lerp("4", 8.0, 0.5), AnimatedValue::Number(6.0));
    }
}
