//! Export preparation shared by the CSS and SMIL exporters.
//!
//! Both exporters run the same front half: rewrite gradient ids, parse,
//! strip editor bookkeeping, classify each shape's properties into keyframe
//! tables with boundary keyframes at 0 and the total duration, and wrap each
//! animated shape in one nested `<g>` per transform component. Only the
//! emission differs.

use crate::dom::{self, Document, Element, Node};
use crate::error::ExportResult;
use crate::options::ExportOptions;
use sa_core::color::Rgba;
use sa_core::easing::Easing;
use sa_core::gradient::{EXPORT_GRADIENT_PREFIX, Gradient, GradientCache, rewrite_gradient_ids};
use sa_core::id::ShapeId;
use sa_core::kind::{AttrMapping, Origin, ShapeKind, attribute_mapping, calc_transform_by_origin, origin_anchored_attributes};
use sa_core::math::{Decomposition, decompose, fmt_num, parse_transform, ratio, scan_numbers};
use sa_core::model::{AnimationDescriptor, Property, TransitionValue};
use sa_core::Affine;
use serde::Deserialize;
use std::collections::HashMap;

/// `id` of the generated `<style>` element.
pub(crate) const STYLE_ID: &str = "sa-animation-style";

/// Leading text of the generator comment.
pub(crate) const GENERATOR: &str = "Generator: SVG Animator";

/// Editor-only attributes removed from every `<g>`.
const BOOKKEEPING: [&str; 4] = ["data-transform", "data-group", "data-origin", "data-name"];

// ─── Cleanup ─────────────────────────────────────────────────────────────

/// The origin point recorded by the editor in `data-transform`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct DataTransform {
    pub left: Option<f64>,
    pub top: Option<f64>,
}

/// A parsed, cleaned document plus what the cleanup read out of it.
pub(crate) struct Cleaned {
    pub doc: Document,
    /// `data-transform` per wrapper class.
    pub data_transforms: HashMap<String, DataTransform>,
}

/// Rewrite gradient ids, parse, drop previously generated output and strip
/// bookkeeping attributes.
pub(crate) fn clean(svg: &str, options: &ExportOptions) -> ExportResult<Cleaned> {
    let svg = rewrite_gradient_ids(svg);
    let mut doc = dom::parse(&svg)?;
    strip_generated(&mut doc.root);

    let mut data_transforms = HashMap::new();
    doc.root.walk_mut(&mut |e| {
        if e.name != "g" {
            return;
        }
        if let (Some(raw), Some(class)) = (e.attr("data-transform").map(str::to_string), e.attr("class")) {
            match serde_json::from_str::<DataTransform>(&raw) {
                Ok(data) => {
                    for c in class.split_whitespace() {
                        data_transforms.insert(c.to_string(), data);
                    }
                }
                Err(err) => log::debug!("ignoring data-transform {raw:?}: {err}"),
            }
        }
        for key in BOOKKEEPING {
            e.remove_attr(key);
        }
    });

    if let Some(value) = &options.preserve_aspect_ratio {
        doc.root.set_attr("preserveAspectRatio", value);
    }
    Ok(Cleaned {
        doc,
        data_transforms,
    })
}

fn strip_generated(root: &mut Element) {
    root.children.retain(|node| match node {
        Node::Comment(c) => !c.trim().starts_with(GENERATOR),
        Node::Element(e) => !(e.name == "style" && e.attr("id") == Some(STYLE_ID)),
        _ => true,
    });
}

/// Prepend the generator comment and an optional extra node to the root.
pub(crate) fn prepend_generated(root: &mut Element, version: &str, extra: Option<Node>) {
    if let Some(node) = extra {
        root.prepend_child(node);
    }
    root.prepend_child(Node::Comment(format!(" {GENERATOR} {version} ")));
}

/// Final compaction: newlines and tabs are dropped.
pub(crate) fn strip_whitespace(svg: &str) -> String {
    svg.chars().filter(|c| !matches!(c, '\n' | '\r' | '\t')).collect()
}

// ─── Keyframe tables ─────────────────────────────────────────────────────

/// One row of a derived keyframe table. `easing` is the curve of the
/// segment that ends at this key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Key<V> {
    pub second: f64,
    pub easing: Easing,
    pub value: V,
}

/// Easing of the segment leaving key `i`, i.e. the easing of key `i + 1`.
pub(crate) fn outgoing_easing<V>(keys: &[Key<V>], i: usize) -> Option<Easing> {
    keys.get(i + 1).map(|k| k.easing)
}

fn build_table<V: Clone>(
    property: &Property,
    total: f64,
    mut convert: impl FnMut(&TransitionValue) -> Option<V>,
) -> Vec<Key<V>> {
    let mut keys: Vec<Key<V>> = property
        .transitions
        .iter()
        .filter_map(|t| match convert(&t.value) {
            Some(value) => Some(Key {
                second: t.second.max(0.0),
                easing: t.easing,
                value,
            }),
            None => {
                log::debug!("skipping {} keyframe with value {}", property.id, t.value);
                None
            }
        })
        .collect();
    keys.sort_by(|a, b| a.second.total_cmp(&b.second));
    keys.dedup_by(|later, earlier| {
        let same = (later.second - earlier.second).abs() < 1e-9;
        if same {
            std::mem::swap(later, earlier);
        }
        same
    });
    boundary_fill(keys, total)
}

/// Guarantee keys at 0 and at `total`: the 0 key clones the earliest key and
/// the `total` key clones the latest one. Keys past `total` are cut, so a
/// shortened duration ends on the latest value instead of losing the track.
/// The source transitions are never touched.
pub(crate) fn boundary_fill<V: Clone>(mut keys: Vec<Key<V>>, total: f64) -> Vec<Key<V>> {
    let (Some(first), Some(latest)) = (keys.first().cloned(), keys.last().cloned()) else {
        return keys;
    };
    let cut = latest.second > total + 1e-9;
    if cut {
        log::debug!("cutting keyframes past {total}s");
        keys.retain(|k| k.second <= total + 1e-9);
    }
    if first.second > 0.0 {
        keys.insert(
            0,
            Key {
                second: 0.0,
                ..first
            },
        );
    }
    let ends_early = keys.last().is_some_and(|k| k.second < total);
    if ends_early {
        keys.push(Key {
            second: total,
            // the cut segment still eases toward the latest key
            easing: if cut { latest.easing } else { Easing::Linear },
            ..latest
        });
    }
    keys
}

/// CSS keyframe selector for a second.
pub(crate) fn percent(second: f64, total: f64) -> String {
    format!("{}%", fmt_num(ratio(second, total) * 100.0))
}

/// SMIL `keyTimes` entry for a second.
pub(crate) fn key_time(second: f64, total: f64) -> String {
    fmt_num(ratio(second, total))
}

// ─── Classification ──────────────────────────────────────────────────────

/// A transform component, in wrapper nesting order (outermost first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Component {
    Top,
    Left,
    Angle,
    ScaleY,
    ScaleX,
    SkewY,
    SkewX,
}

impl Component {
    pub const NESTING: [Component; 7] = [
        Component::Top,
        Component::Left,
        Component::Angle,
        Component::ScaleY,
        Component::ScaleX,
        Component::SkewY,
        Component::SkewX,
    ];

    pub fn from_property(property: &str) -> Option<Self> {
        Some(match property {
            "top" => Component::Top,
            "left" => Component::Left,
            "angle" => Component::Angle,
            "scaleY" => Component::ScaleY,
            "scaleX" => Component::ScaleX,
            "skewY" => Component::SkewY,
            "skewX" => Component::SkewX,
            _ => return None,
        })
    }

    /// Class suffix of the wrapper group.
    pub fn suffix(self) -> &'static str {
        match self {
            Component::Top => "top",
            Component::Left => "left",
            Component::Angle => "angle",
            Component::ScaleY => "scaleY",
            Component::ScaleX => "scaleX",
            Component::SkewY => "skewY",
            Component::SkewX => "skewX",
        }
    }

    pub fn seed(self, parts: &Decomposition) -> f64 {
        match self {
            Component::Top => parts.translate_y,
            Component::Left => parts.translate_x,
            Component::Angle => parts.angle,
            Component::ScaleY => parts.scale_y,
            Component::ScaleX => parts.scale_x,
            Component::SkewY => parts.skew_y,
            Component::SkewX => parts.skew_x,
        }
    }

    fn is_identity(self, value: f64) -> bool {
        let identity = match self {
            Component::ScaleX | Component::ScaleY => 1.0,
            _ => 0.0,
        };
        (value - identity).abs() < 1e-9
    }

    /// CSS transform function.
    pub fn css(self, value: f64) -> String {
        let v = fmt_num(value);
        match self {
            Component::Top => format!("translateY({v}px)"),
            Component::Left => format!("translateX({v}px)"),
            Component::Angle => format!("rotate({v}deg)"),
            Component::ScaleY => format!("scaleY({v})"),
            Component::ScaleX => format!("scaleX({v})"),
            Component::SkewY => format!("skewY({v}deg)"),
            Component::SkewX => format!("skewX({v}deg)"),
        }
    }

    /// `<animateTransform type>`.
    pub fn smil_type(self) -> &'static str {
        match self {
            Component::Top | Component::Left => "translate",
            Component::Angle => "rotate",
            Component::ScaleY | Component::ScaleX => "scale",
            Component::SkewY => "skewY",
            Component::SkewX => "skewX",
        }
    }

    /// One `<animateTransform>` value.
    pub fn smil_value(self, value: f64) -> String {
        let v = fmt_num(value);
        match self {
            Component::Top => format!("0 {v}"),
            Component::Left => format!("{v} 0"),
            Component::ScaleY => format!("1 {v}"),
            Component::ScaleX => format!("{v} 1"),
            Component::Angle | Component::SkewY | Component::SkewX => v,
        }
    }

    /// SVG `transform` attribute value.
    pub fn svg_transform(self, value: f64) -> String {
        format!("{}({})", self.smil_type(), self.smil_value(value))
    }
}

/// A paint channel: solid colors, or gradients when any keyframe is one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PaintKeys {
    Solid(Vec<Key<Rgba>>),
    Gradient(Vec<Key<Gradient>>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FlatValue {
    Number(f64),
    Text(String),
}

/// One SVG attribute driven by a property.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlatTrack {
    pub attribute: &'static str,
    pub keys: Vec<Key<FlatValue>>,
}

/// Everything the emitters need about one animated shape.
#[derive(Debug, Clone)]
pub(crate) struct ShapePlan {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Origin used for companion attributes and re-centering.
    pub origin: Origin,
    pub transforms: Vec<(Component, Vec<Key<f64>>)>,
    pub paints: Vec<(&'static str, PaintKeys)>,
    pub flats: Vec<FlatTrack>,
}

impl ShapePlan {
    pub fn new(
        descriptor: &AnimationDescriptor,
        origin: Origin,
        total: f64,
        gradients: &mut GradientCache,
    ) -> Self {
        let mut plan = ShapePlan {
            id: descriptor.id,
            kind: descriptor.kind,
            origin,
            transforms: Vec::new(),
            paints: Vec::new(),
            flats: Vec::new(),
        };
        for property in descriptor.properties.iter().filter(|p| !p.is_empty()) {
            plan.classify(property, total, gradients);
        }
        plan.transforms
            .sort_by_key(|(c, _)| Component::NESTING.iter().position(|n| n == c));
        plan
    }

    fn classify(&mut self, property: &Property, total: f64, gradients: &mut GradientCache) {
        if let Some(component) = Component::from_property(&property.id) {
            let keys = build_table(property, total, TransitionValue::as_number);
            self.transforms.push((component, keys));
            return;
        }
        match attribute_mapping(self.kind, &property.id) {
            AttrMapping::Numeric(targets) => {
                for target in targets {
                    let (kind, origin) = (self.kind, self.origin);
                    let keys = build_table(property, total, |v| {
                        v.as_number()
                            .map(|n| FlatValue::Number(target.resolve(kind, origin, n)))
                    });
                    self.flats.push(FlatTrack {
                        attribute: target.attribute(),
                        keys,
                    });
                }
            }
            AttrMapping::Paint(attribute) => {
                let keys = paint_keys(property, total, gradients);
                self.paints.push((attribute, keys));
            }
            AttrMapping::Verbatim(attribute) => {
                let keys = build_table(property, total, |v| Some(FlatValue::Text(v.to_string())));
                self.flats.push(FlatTrack { attribute, keys });
            }
            AttrMapping::Unsupported => {
                log::debug!("{}: property {:?} has no SVG counterpart", self.id, property.id);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.paints.is_empty() && self.flats.is_empty()
    }

    pub fn is_animated(&self, component: Component) -> bool {
        self.transforms.iter().any(|(c, _)| *c == component)
    }

    /// Class of the element carrying flat attribute animations.
    pub fn shape_class(&self) -> String {
        format!("{}-shape", self.id)
    }

    pub fn wrapper_class(&self, component: Component) -> String {
        format!("{}-{}", self.id, component.suffix())
    }
}

fn paint_keys(property: &Property, total: f64, gradients: &mut GradientCache) -> PaintKeys {
    let template = property
        .transitions
        .iter()
        .filter_map(|t| t.value.as_str())
        .filter(|s| sa_core::gradient::is_gradient(s))
        .map(|s| gradients.get(s).clone())
        .max_by_key(|g| g.color_stops.len());
    let Some(template) = template else {
        return PaintKeys::Solid(build_table(property, total, |v| Rgba::parse(&v.to_string())));
    };
    let stops = template.color_stops.len();
    PaintKeys::Gradient(build_table(property, total, |v| {
        let text = v.to_string();
        if sa_core::gradient::is_gradient(&text) {
            return Some(gradients.get(&text).clone());
        }
        Rgba::parse(&text).map(|color| Gradient {
            kind: template.kind,
            angle: template.angle,
            ..Gradient::uniform(color, stops)
        })
    }))
}

// ─── Wrapping ────────────────────────────────────────────────────────────

/// How the wrappers carry their static transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StaticTransform {
    /// `style="transform:…"` (CSS export).
    InlineStyle,
    /// `transform="…"`, omitted on animated components (SMIL export).
    Attribute,
}

/// The origin to anchor a shape on: its own when the editor recorded an
/// origin point, otherwise the center the matrix translation refers to.
pub(crate) fn effective_origin(descriptor: &AnimationDescriptor, data: Option<&DataTransform>) -> Origin {
    match data {
        Some(d) if d.left.is_some() || d.top.is_some() => descriptor.origin,
        _ => Origin::default(),
    }
}

/// Wrap the shape's `<g class="{id}">` contents in the component groups,
/// re-center origin-anchored geometry and tag the animated element with
/// [`ShapePlan::shape_class`]. Returns false when the wrapper is missing.
pub(crate) fn wrap_shape(
    root: &mut Element,
    plan: &ShapePlan,
    data: Option<&DataTransform>,
    mode: StaticTransform,
) -> bool {
    let id = plan.id.as_str();
    let Some(wrapper) = root.find_mut(&|e| e.name == "g" && e.has_class(id)) else {
        log::debug!("no wrapper <g class=\"{id}\"> in the static SVG");
        return false;
    };

    let matrix = take_matrix(wrapper).unwrap_or(Affine::IDENTITY);
    let mut seeds = decompose(matrix);
    if let Some(data) = data {
        seeds.translate_x = data.left.unwrap_or(seeds.translate_x);
        seeds.translate_y = data.top.unwrap_or(seeds.translate_y);
    }

    if let Some(tag) = plan.kind.svg_tag() {
        match wrapper.find_mut(&|e| e.name == tag) {
            Some(shape) => {
                recenter(shape, plan.kind, plan.origin);
                shape.add_class(&plan.shape_class());
            }
            None if plan.paints.is_empty() && plan.flats.is_empty() => {}
            None => log::debug!(
                "{id}: no <{tag}> inside the wrapper, its {} attribute animation(s) have no target",
                plan.paints.len() + plan.flats.len()
            ),
        }
    }

    let mut content = std::mem::take(&mut wrapper.children);
    for component in Component::NESTING.iter().rev().copied() {
        let mut group = Element::new("g").with_attr("class", &plan.wrapper_class(component));
        if component == Component::SkewX && plan.kind == ShapeKind::Group {
            group.add_class(&plan.shape_class());
        }
        let value = component.seed(&seeds);
        match mode {
            StaticTransform::InlineStyle if !component.is_identity(value) => {
                group.set_attr("style", &format!("transform:{}", component.css(value)));
            }
            StaticTransform::Attribute
                if !plan.is_animated(component) && !component.is_identity(value) =>
            {
                group.set_attr("transform", &component.svg_transform(value));
            }
            _ => {}
        }
        group.children = content;
        content = vec![Node::Element(group)];
    }
    wrapper.children = content;
    true
}

/// Remove and parse the first `transform` along the single-child chain
/// below (and including) `e`.
fn take_matrix(e: &mut Element) -> Option<Affine> {
    if let Some(raw) = e.remove_attr("transform") {
        let parsed = parse_transform(&raw);
        if parsed.is_none() {
            log::debug!("unparseable transform {raw:?}");
        }
        return parsed;
    }
    let mut children = e.element_children_mut();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    take_matrix(only)
}

/// Re-anchor rect/ellipse/circle geometry on `origin` at its static size.
fn recenter(shape: &mut Element, kind: ShapeKind, origin: Origin) {
    for &(position, size, multiplier) in origin_anchored_attributes(kind) {
        let Some(size_value) = shape.attr(size).and_then(|s| s.trim().parse::<f64>().ok()) else {
            continue;
        };
        let value = calc_transform_by_origin(kind, origin, position, size_value * multiplier);
        shape.set_attr(position, &fmt_num(value));
    }
}

// ─── Geometry rewrites ───────────────────────────────────────────────────

/// `"x,y x,y …"` → `"M x y L x y … [Z]"`.
pub(crate) fn points_to_path(points: &str, closed: bool) -> String {
    let numbers = scan_numbers(points);
    let mut out = String::new();
    for (i, pair) in numbers.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(if i == 0 { "M " } else { "L " });
        out.push_str(&fmt_num(pair[0]));
        out.push(' ');
        out.push_str(&fmt_num(pair[1]));
    }
    if closed && !out.is_empty() {
        out.push_str(" Z");
    }
    out
}

// ─── Paint & gradients ───────────────────────────────────────────────────

/// Value of one declaration in a `style` attribute.
pub(crate) fn style_get<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim() == property).then_some(value.trim())
    })
}

/// Replace (or append) one declaration in a `style` attribute.
pub(crate) fn style_set(style: &str, property: &str, value: &str) -> String {
    let mut found = false;
    let mut decls: Vec<String> = style
        .split(';')
        .filter(|d| !d.trim().is_empty())
        .map(|decl| match decl.split_once(':') {
            Some((key, _)) if key.trim() == property => {
                found = true;
                format!("{property}: {value}")
            }
            _ => decl.trim().to_string(),
        })
        .collect();
    if !found {
        decls.push(format!("{property}: {value}"));
    }
    decls.join("; ")
}

/// Drop one declaration from an element's inline style, removing the
/// attribute when nothing is left.
pub(crate) fn style_remove(e: &mut Element, property: &str) {
    let Some(style) = e.attr("style").map(str::to_string) else {
        return;
    };
    let kept: Vec<&str> = style
        .split(';')
        .filter(|decl| {
            !decl.trim().is_empty()
                && decl.split_once(':').is_none_or(|(key, _)| key.trim() != property)
        })
        .map(str::trim)
        .collect();
    if kept.is_empty() {
        e.remove_attr("style");
    } else {
        e.set_attr("style", &kept.join("; "));
    }
}

/// Current paint of `attribute`; inline style wins over the attribute.
pub(crate) fn paint_of(e: &Element, attribute: &str) -> Option<String> {
    e.attr("style").map(str::to_string)
        .and_then(|s| style_get(&s, attribute).map(str::to_string))
        .or_else(|| e.attr(attribute).map(str::to_string))
}

/// Set a paint on both the attribute and any inline style declaration.
pub(crate) fn set_paint(e: &mut Element, attribute: &str, value: &str) {
    e.set_attr(attribute, value);
    if let Some(style) = e.attr("style").map(str::to_string) {
        if style_get(&style, attribute).is_some() {
            e.set_attr("style", &style_set(&style, attribute, value));
        }
    }
}

/// `url(#id)` → `id`.
fn url_target(paint: &str) -> Option<&str> {
    paint
        .trim()
        .strip_prefix("url(")?
        .strip_suffix(')')?
        .trim_matches(|c| c == '"' || c == '\'')
        .strip_prefix('#')
}

/// Make sure the shape's `attribute` paints with a gradient that has at
/// least as many stops as `template`, synthesizing one in `<defs>` when the
/// shape was solid. Returns the gradient id.
pub(crate) fn ensure_gradient(
    root: &mut Element,
    plan: &ShapePlan,
    attribute: &str,
    template: &Gradient,
) -> Option<String> {
    let shape_class = plan.shape_class();
    let existing = root
        .find(&|e| e.has_class(&shape_class))
        .and_then(|e| paint_of(e, attribute))
        .and_then(|paint| url_target(&paint).map(str::to_string))
        .filter(|gid| root.find(&|e| e.attr("id") == Some(gid.as_str())).is_some());

    let gradient_id = match existing {
        Some(gid) => gid,
        None => {
            let gid = format!("{EXPORT_GRADIENT_PREFIX}{}-{attribute}", plan.id);
            defs_mut(root)?.push_child(Node::Element(gradient_element(&gid, template)));
            let shape = root.find_mut(&|e| e.has_class(&shape_class))?;
            set_paint(shape, attribute, &format!("url(#{gid})"));
            gid
        }
    };

    let gradient = root.find_mut(&|e| e.attr("id") == Some(gradient_id.as_str()))?;
    pad_stops(gradient, template);
    Some(gradient_id)
}

fn defs_mut(root: &mut Element) -> Option<&mut Element> {
    let idx = match root
        .children
        .iter()
        .position(|n| matches!(n, Node::Element(e) if e.name == "defs"))
    {
        Some(idx) => idx,
        None => {
            root.prepend_child(Node::Element(Element::new("defs")));
            0
        }
    };
    match root.children.get_mut(idx)? {
        Node::Element(e) => Some(e),
        _ => None,
    }
}

/// A gradient element drawing `gradient` in bounding-box units.
pub(crate) fn gradient_element(id: &str, gradient: &Gradient) -> Element {
    let mut e = Element::new(gradient.kind.element_name()).with_attr("id", id);
    if gradient.kind == sa_core::gradient::GradientKind::Linear {
        let (x1, y1, x2, y2) = gradient.vector();
        for (key, value) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2)] {
            e.set_attr(key, &fmt_num(value));
        }
    }
    for stop in &gradient.color_stops {
        let (color, opacity) = (stop.color.to_rgb_string(), stop.color.a);
        e.push_child(Node::Element(
            Element::new("stop")
                .with_attr("offset", &fmt_num(stop.offset))
                .with_attr("stop-color", &color)
                .with_attr("stop-opacity", &fmt_num(opacity)),
        ));
    }
    e
}

/// Pad a gradient element with copies of its last stop (or `template`'s
/// stops) until it has as many stops as `template`.
fn pad_stops(gradient: &mut Element, template: &Gradient) {
    let have = gradient.element_children().filter(|e| e.name == "stop").count();
    for stop in template.color_stops.iter().skip(have) {
        let last = gradient
            .element_children()
            .filter(|e| e.name == "stop")
            .last()
            .cloned();
        let node = last.unwrap_or_else(|| {
            Element::new("stop")
                .with_attr("stop-color", &stop.color.to_rgb_string())
                .with_attr("stop-opacity", &fmt_num(stop.color.a))
        });
        gradient.push_child(Node::Element(node.with_attr("offset", &fmt_num(stop.offset))));
    }
}
