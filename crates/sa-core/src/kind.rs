//! Shape kinds and the per-kind behavior tables.
//!
//! Everything that differs between rect, ellipse, circle, … lives here as a
//! lookup indexed by `ShapeKind`: property → SVG attribute mapping, the
//! origin-aware offset formula, and companion-attribute rules. Exporters and
//! the player consult these tables instead of branching on type strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The drawable entity kinds the editor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Circle,
    Ellipse,
    Line,
    Path,
    Polyline,
    Polygon,
    #[serde(rename = "i-text")]
    Text,
    Image,
    Group,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Path => "path",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Text => "i-text",
            Self::Image => "image",
            Self::Group => "group",
        }
    }

    /// The SVG element that draws this kind. Groups have none of their own.
    pub fn svg_tag(self) -> Option<&'static str> {
        match self {
            Self::Rect => Some("rect"),
            Self::Circle => Some("circle"),
            Self::Ellipse => Some("ellipse"),
            Self::Line => Some("line"),
            Self::Path => Some("path"),
            Self::Polyline => Some("polyline"),
            Self::Polygon => Some("polygon"),
            Self::Text => Some("text"),
            Self::Image => Some("image"),
            Self::Group => None,
        }
    }

    /// Kinds whose vertices live in a `points` attribute.
    pub fn has_points(self) -> bool {
        matches!(self, Self::Polyline | Self::Polygon)
    }

    /// Whether a points list of this kind closes back on its first vertex.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Polygon)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Origin ──────────────────────────────────────────────────────────────

/// One axis of a transform origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// `left` / `top`
    Start,
    #[default]
    Center,
    /// `right` / `bottom`
    End,
}

/// A shape's transform origin, written `"<x> <y>"` (e.g. `"left top"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin {
    pub x: Anchor,
    pub y: Anchor,
}

impl Origin {
    /// Parse `"left top"`, `"center bottom"`, … Unknown words mean center.
    pub fn parse(s: &str) -> Self {
        let mut words = s.split_whitespace();
        let x = match words.next() {
            Some("left") => Anchor::Start,
            Some("right") => Anchor::End,
            _ => Anchor::Center,
        };
        let y = match words.next() {
            Some("top") => Anchor::Start,
            Some("bottom") => Anchor::End,
            _ => Anchor::Center,
        };
        Self { x, y }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self.x {
            Anchor::Start => "left",
            Anchor::Center => "center",
            Anchor::End => "right",
        };
        let y = match self.y {
            Anchor::Start => "top",
            Anchor::Center => "center",
            Anchor::End => "bottom",
        };
        write!(f, "{x} {y}")
    }
}

impl Serialize for Origin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Origin::parse(&s))
    }
}

// ─── Origin-aware offsets ────────────────────────────────────────────────

/// How a size value turns into a position offset for one anchor.
#[derive(Debug, Clone, Copy)]
struct OffsetRule {
    kind: ShapeKind,
    attribute: &'static str,
    /// Which origin axis drives this attribute.
    horizontal: bool,
    /// Offset as a multiple of the size value for start / center / end.
    factors: [f64; 3],
}

/// Offset of the shape's geometry relative to its origin point, per kind and
/// attribute. `rect` x/y are driven by width/height, `ellipse` cx/cy by
/// width/height (the full diameter), `circle` cx/cy by the radius.
const OFFSET_RULES: &[OffsetRule] = &[
    OffsetRule { kind: ShapeKind::Rect, attribute: "x", horizontal: true, factors: [0.0, -0.5, -1.0] },
    OffsetRule { kind: ShapeKind::Rect, attribute: "y", horizontal: false, factors: [0.0, -0.5, -1.0] },
    OffsetRule { kind: ShapeKind::Ellipse, attribute: "cx", horizontal: true, factors: [0.5, 0.0, -0.5] },
    OffsetRule { kind: ShapeKind::Ellipse, attribute: "cy", horizontal: false, factors: [0.5, 0.0, -0.5] },
    OffsetRule { kind: ShapeKind::Circle, attribute: "cx", horizontal: true, factors: [1.0, 0.0, -1.0] },
    OffsetRule { kind: ShapeKind::Circle, attribute: "cy", horizontal: false, factors: [1.0, 0.0, -1.0] },
];

/// Position attribute value that keeps `origin` visually fixed for a shape
/// of the given size. Returns 0 for combinations without a rule.
pub fn calc_transform_by_origin(kind: ShapeKind, origin: Origin, attribute: &str, value: f64) -> f64 {
    let Some(rule) = OFFSET_RULES
        .iter()
        .find(|r| r.kind == kind && r.attribute == attribute)
    else {
        return 0.0;
    };
    let anchor = if rule.horizontal { origin.x } else { origin.y };
    let factor = match anchor {
        Anchor::Start => rule.factors[0],
        Anchor::Center => rule.factors[1],
        Anchor::End => rule.factors[2],
    };
    // 0.0 + … keeps a center origin from producing -0.
    0.0 + value * factor
}

// ─── Attribute mapping ───────────────────────────────────────────────────

/// One SVG attribute written when a property changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrTarget {
    /// The attribute takes `value * scale`.
    Scaled { attribute: &'static str, scale: f64 },
    /// The attribute takes the origin-aware offset for `value`.
    Origin { attribute: &'static str },
}

impl AttrTarget {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Scaled { attribute, .. } | Self::Origin { attribute } => attribute,
        }
    }

    /// Resolve the attribute value for a numeric property value.
    pub fn resolve(&self, kind: ShapeKind, origin: Origin, value: f64) -> f64 {
        match *self {
            Self::Scaled { scale, .. } => value * scale,
            Self::Origin { attribute } => calc_transform_by_origin(kind, origin, attribute, value),
        }
    }
}

const fn scaled(attribute: &'static str, scale: f64) -> AttrTarget {
    AttrTarget::Scaled { attribute, scale }
}

const fn origin(attribute: &'static str) -> AttrTarget {
    AttrTarget::Origin { attribute }
}

/// Geometry properties whose effect depends on the shape kind: the attribute
/// itself plus its companions.
const GEOMETRY_RULES: &[(ShapeKind, &str, &[AttrTarget])] = &[
    (ShapeKind::Rect, "width", &[scaled("width", 1.0), origin("x")]),
    (ShapeKind::Rect, "height", &[scaled("height", 1.0), origin("y")]),
    (ShapeKind::Ellipse, "width", &[scaled("rx", 0.5), origin("cx")]),
    (ShapeKind::Ellipse, "height", &[scaled("ry", 0.5), origin("cy")]),
    (ShapeKind::Ellipse, "rx", &[scaled("rx", 1.0)]),
    (ShapeKind::Ellipse, "ry", &[scaled("ry", 1.0)]),
    (ShapeKind::Circle, "radius", &[scaled("r", 1.0), origin("cx"), origin("cy")]),
    (ShapeKind::Image, "width", &[scaled("width", 1.0)]),
    (ShapeKind::Image, "height", &[scaled("height", 1.0)]),
];

/// Numeric attributes shared by every kind.
const COMMON_NUMERIC: &[(&str, &str)] = &[
    ("opacity", "opacity"),
    ("strokeWidth", "stroke-width"),
    ("strokeDashOffset", "stroke-dashoffset"),
    ("fontSize", "font-size"),
    ("x1", "x1"),
    ("y1", "y1"),
    ("x2", "x2"),
    ("y2", "y2"),
];

/// Where a property's value lands in the SVG.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrMapping {
    /// Numeric attributes (size, stroke width, …), possibly with companions.
    Numeric(Vec<AttrTarget>),
    /// A paint attribute (`fill`/`stroke`); values are colors or gradients.
    Paint(&'static str),
    /// A string attribute copied verbatim (`d`, `points`, dash arrays).
    Verbatim(&'static str),
    /// No SVG counterpart.
    Unsupported,
}

/// Map an editor property name onto the SVG attribute(s) it drives.
pub fn attribute_mapping(kind: ShapeKind, property: &str) -> AttrMapping {
    if let Some((_, _, targets)) = GEOMETRY_RULES
        .iter()
        .find(|(k, p, _)| *k == kind && *p == property)
    {
        return AttrMapping::Numeric(targets.to_vec());
    }
    if let Some((_, attr)) = COMMON_NUMERIC.iter().find(|(p, _)| *p == property) {
        return AttrMapping::Numeric(vec![scaled(attr, 1.0)]);
    }
    match property {
        "fill" => AttrMapping::Paint("fill"),
        "stroke" => AttrMapping::Paint("stroke"),
        "strokeDashArray" => AttrMapping::Verbatim("stroke-dasharray"),
        "path" => AttrMapping::Verbatim("d"),
        "points" if kind.has_points() => AttrMapping::Verbatim("points"),
        _ => AttrMapping::Unsupported,
    }
}

/// Static geometry attributes that follow the origin rule, with the size
/// attribute they derive from: `(position attribute, size attribute, size
/// multiplier)`. Used to re-anchor a static element on its origin.
pub fn origin_anchored_attributes(kind: ShapeKind) -> &'static [(&'static str, &'static str, f64)] {
    match kind {
        ShapeKind::Rect => &[("x", "width", 1.0), ("y", "height", 1.0)],
        ShapeKind::Ellipse => &[("cx", "rx", 2.0), ("cy", "ry", 2.0)],
        ShapeKind::Circle => &[("cx", "r", 1.0), ("cy", "r", 1.0)],
        _ => &[],
    }
}
