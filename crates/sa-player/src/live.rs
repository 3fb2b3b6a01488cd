//! Applying sampled values onto live canvas objects.
//!
//! The canvas toolkit is an external collaborator; the player only sees it
//! through [`LiveShape`] (a settable bag of named attributes) and
//! [`ShapeRegistry`] (id → live shape lookup). A missing live shape is a
//! silent no-op: shapes can disappear between scheduling and tick.

use crate::interpolate::AnimatedValue;
use kurbo::{BezPath, Point};
use sa_core::color::Rgba;
use sa_core::gradient::Gradient;
use sa_core::id::ShapeId;
use sa_core::kind::ShapeKind;
use sa_core::math::scan_numbers;
use std::collections::{BTreeMap, HashMap};

/// A decoded value ready for assignment onto a live shape.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveValue {
    Number(f64),
    Color(Rgba),
    Gradient(Gradient),
    DashArray(Vec<f64>),
    Path(BezPath),
    Points(Vec<Point>),
    Text(String),
}

/// Per-shape cache of the most recently sampled values, keyed by property.
pub type AnimationCache = BTreeMap<String, AnimatedValue>;

/// A canvas object the player can write to.
pub trait LiveShape {
    fn set(&mut self, property: &str, value: LiveValue);
}

/// Looks up live shapes by id.
pub trait ShapeRegistry {
    fn live_shape(&mut self, id: ShapeId) -> Option<&mut dyn LiveShape>;
}

impl<S: LiveShape> ShapeRegistry for HashMap<ShapeId, S> {
    fn live_shape(&mut self, id: ShapeId) -> Option<&mut dyn LiveShape> {
        self.get_mut(&id).map(|s| s as &mut dyn LiveShape)
    }
}

/// A plain attribute map, usable as a headless live shape.
impl LiveShape for BTreeMap<String, LiveValue> {
    fn set(&mut self, property: &str, value: LiveValue) {
        self.insert(property.to_string(), value);
    }
}

/// Convert a sampled value into the representation its property expects.
pub fn decode(property: &str, value: &AnimatedValue) -> LiveValue {
    match (property, value) {
        ("strokeDashArray", AnimatedValue::Number(n)) => LiveValue::DashArray(vec![*n]),
        ("strokeDashArray", AnimatedValue::Text(s)) => LiveValue::DashArray(scan_numbers(s)),
        (_, AnimatedValue::Number(n)) => LiveValue::Number(*n),
        (_, AnimatedValue::Color(c)) => LiveValue::Color(*c),
        (_, AnimatedValue::Gradient(g)) => LiveValue::Gradient(g.clone()),
        ("path", AnimatedValue::Text(s)) => match BezPath::from_svg(s) {
            Ok(path) => LiveValue::Path(path),
            Err(err) => {
                log::debug!("undecodable path data {s:?}: {err}");
                LiveValue::Text(s.clone())
            }
        },
        ("points", AnimatedValue::Text(s)) => LiveValue::Points(decode_points(s)),
        (_, AnimatedValue::Text(s)) => LiveValue::Text(s.clone()),
    }
}

/// Parse a `points` list (`"x,y x,y …"`). A dangling coordinate is dropped.
pub fn decode_points(s: &str) -> Vec<Point> {
    scan_numbers(s)
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// The update callback: write every cached value onto the live shape.
/// Ellipses also get `rx`/`ry` at half their animated `width`/`height`.
pub fn apply_cache(live: &mut dyn LiveShape, kind: ShapeKind, cache: &AnimationCache) {
    for (property, value) in cache {
        live.set(property, decode(property, value));
        if kind == ShapeKind::Ellipse {
            if let AnimatedValue::Number(n) = value {
                match property.as_str() {
                    "width" => live.set("rx", LiveValue::Number(n / 2.0)),
                    "height" => live.set("ry", LiveValue::Number(n / 2.0)),
                    _ => {}
                }
            }
        }
    }
}
