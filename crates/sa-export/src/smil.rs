//! SMIL exporter: `<animate>` / `<animateTransform>` elements injected next
//! to what they animate.

use crate::dom::{Element, Node};
use crate::error::ExportResult;
use crate::options::ExportOptions;
use crate::prepare::{
    self, Cleaned, FlatValue, Key, PaintKeys, ShapePlan, StaticTransform, effective_origin,
    ensure_gradient, key_time, style_remove, wrap_shape,
};
use sa_core::color::Rgba;
use sa_core::gradient::{Gradient, GradientCache, GradientKind};
use sa_core::math::fmt_num;
use sa_core::model::{AnimationDescriptor, Direction};

/// Tag and attribute names SMIL needs in camel case, keyed by their
/// lowercased form (as an HTML serializer writes them).
const CAMEL_CASE: [(&str, &str); 10] = [
    ("animatetransform", "animateTransform"),
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("keytimes", "keyTimes"),
    ("keysplines", "keySplines"),
    ("calcmode", "calcMode"),
    ("repeatcount", "repeatCount"),
    ("gradienttransform", "gradientTransform"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
];

/// Export `svg` with `animations` as SMIL elements.
///
/// With no animated shape, or a non-positive total duration, the cleaned
/// static SVG is returned instead.
pub fn render_smil_animated_svg(
    svg: &str,
    animations: &[AnimationDescriptor],
    options: &ExportOptions,
) -> ExportResult<String> {
    let Cleaned {
        mut doc,
        data_transforms,
    } = prepare::clean(svg, options)?;
    let total = options.total_duration;
    if total <= 0.0 {
        log::debug!("total duration {total}: exporting static SVG");
        return Ok(doc.to_svg_string());
    }
    if options.direction != Direction::Normal {
        log::debug!("SMIL has no {} playback; exporting normal", options.direction.as_str());
    }

    let timing = Timing {
        total,
        dur: format!("{}s", fmt_num(total)),
        repeat: options.repeat.smil_value(),
    };
    let mut gradients = GradientCache::new();
    let mut animated = 0;
    for descriptor in animations {
        let data = data_transforms.get(descriptor.id.as_str());
        let origin = effective_origin(descriptor, data);
        let plan = ShapePlan::new(descriptor, origin, total, &mut gradients);
        if plan.is_empty() || !wrap_shape(&mut doc.root, &plan, data, StaticTransform::Attribute) {
            continue;
        }
        animated += animate_shape(&mut doc.root, &plan, &timing);
    }

    if animated == 0 {
        return Ok(doc.to_svg_string());
    }
    prepare::prepend_generated(&mut doc.root, &options.version, None);
    let svg = normalize_case(&doc.to_svg_string());
    Ok(prepare::strip_whitespace(&svg))
}

/// Attributes every animation element shares.
struct Timing {
    total: f64,
    dur: String,
    repeat: String,
}

impl Timing {
    /// `values`, `keyTimes`, `calcMode` and `keySplines` for a table, or
    /// `None` when it has fewer than two keys.
    fn table<V>(&self, keys: &[Key<V>], value: impl Fn(&V) -> String) -> Option<Element> {
        if keys.len() < 2 {
            return None;
        }
        let values: Vec<String> = keys.iter().map(|k| value(&k.value)).collect();
        let times: Vec<String> = keys.iter().map(|k| key_time(k.second, self.total)).collect();
        // segment i runs into key i + 1 and takes its easing
        let splines: Vec<String> = keys[1..].iter().map(|k| k.easing.key_spline()).collect();
        Some(
            Element::new("animate")
                .with_attr("values", &values.join(";"))
                .with_attr("keyTimes", &times.join(";"))
                .with_attr("calcMode", "spline")
                .with_attr("keySplines", &splines.join(";"))
                .with_attr("dur", &self.dur)
                .with_attr("repeatCount", &self.repeat)
                .with_attr("fill", "freeze"),
        )
    }

    fn animate<V>(&self, attribute: &str, keys: &[Key<V>], value: impl Fn(&V) -> String) -> Option<Node> {
        let mut e = self.table(keys, value)?;
        e.attrs.insert(0, ("attributeName".to_string(), attribute.to_string()));
        Some(Node::Element(e))
    }

    fn animate_transform<V>(
        &self,
        attribute: &str,
        kind: &str,
        keys: &[Key<V>],
        value: impl Fn(&V) -> String,
    ) -> Option<Node> {
        let mut e = self.table(keys, value)?;
        e.name = "animateTransform".to_string();
        let mut attrs = vec![
            ("attributeName".to_string(), attribute.to_string()),
            ("attributeType".to_string(), "XML".to_string()),
            ("type".to_string(), kind.to_string()),
        ];
        attrs.append(&mut e.attrs);
        e.attrs = attrs;
        e.set_attr("additive", "sum");
        Some(Node::Element(e))
    }
}

/// Inject every animation element for one shape. Returns how many were
/// written.
fn animate_shape(root: &mut Element, plan: &ShapePlan, timing: &Timing) -> usize {
    let mut written = 0;
    for (component, keys) in &plan.transforms {
        let class = plan.wrapper_class(*component);
        let node = timing.animate_transform("transform", component.smil_type(), keys, |v| {
            component.smil_value(*v)
        });
        written += inject(root, &class, node.into_iter().collect());
    }

    let shape_class = plan.shape_class();
    for (attribute, paint) in &plan.paints {
        match paint {
            PaintKeys::Solid(keys) => {
                let nodes = [
                    timing.animate(attribute, keys, Rgba::to_rgb_string),
                    timing.animate(&format!("{attribute}-opacity"), keys, |c| fmt_num(c.a)),
                ];
                written += inject(root, &shape_class, nodes.into_iter().flatten().collect());
            }
            PaintKeys::Gradient(keys) => written += animate_gradient(root, plan, attribute, keys, timing),
        }
    }

    for track in &plan.flats {
        let node = timing.animate(track.attribute, &track.keys, |v| match v {
            FlatValue::Number(n) => fmt_num(*n),
            FlatValue::Text(text) => text.clone(),
        });
        written += inject(root, &shape_class, node.into_iter().collect());
    }
    written
}

/// Prepend `nodes` to the element carrying `class`. Inline style
/// declarations of the animated attributes are dropped, as they would
/// override the animation.
fn inject(root: &mut Element, class: &str, nodes: Vec<Node>) -> usize {
    if nodes.is_empty() {
        return 0;
    }
    let Some(target) = root.find_mut(&|e| e.has_class(class)) else {
        log::debug!("no element with class {class:?} to animate");
        return 0;
    };
    for node in &nodes {
        if let Node::Element(e) = node {
            if let Some(attribute) = e.attr("attributeName").filter(|a| *a != "transform") {
                style_remove(target, attribute);
            }
        }
    }
    let count = nodes.len();
    target.prepend_children(nodes);
    count
}

fn animate_gradient(
    root: &mut Element,
    plan: &ShapePlan,
    attribute: &str,
    keys: &[Key<Gradient>],
    timing: &Timing,
) -> usize {
    let Some(template) = keys.iter().max_by_key(|k| k.value.color_stops.len()) else {
        return 0;
    };
    let Some(gradient_id) = ensure_gradient(root, plan, attribute, &template.value) else {
        return 0;
    };
    let Some(gradient) = root.find_mut(&|e| e.attr("id") == Some(gradient_id.as_str())) else {
        return 0;
    };

    let mut written = 0;
    let mut index = 0;
    for stop in gradient.element_children_mut().filter(|e| e.name == "stop") {
        let n = index;
        index += 1;
        let stop_of = |g: &Gradient| g.color_stops.get(n).or(g.color_stops.last()).copied();
        let nodes: Vec<Node> = [
            timing.animate("stop-color", keys, |g| {
                stop_of(g).map_or(Rgba::BLACK, |s| s.color).to_rgb_string()
            }),
            timing.animate("stop-opacity", keys, |g| {
                fmt_num(stop_of(g).map_or(1.0, |s| s.color.a))
            }),
            timing.animate("offset", keys, |g| fmt_num(stop_of(g).map_or(0.0, |s| s.offset))),
        ]
        .into_iter()
        .flatten()
        .collect();
        written += nodes.len();
        stop.prepend_children(nodes);
    }

    let rotates = keys.windows(2).any(|w| w[0].value.angle != w[1].value.angle);
    if rotates && template.value.kind == GradientKind::Linear {
        // rotate the angle-0 vector about the bounding box center
        for (key, value) in [("x1", "0"), ("y1", "0.5"), ("x2", "1"), ("y2", "0.5")] {
            gradient.set_attr(key, value);
        }
        gradient.set_attr("gradientUnits", "objectBoundingBox");
        gradient.remove_attr("gradientTransform");
        if let Some(node) = timing.animate_transform("gradientTransform", "rotate", keys, |g| {
            format!("{} 0.5 0.5", fmt_num(g.angle))
        }) {
            gradient.push_child(node);
            written += 1;
        }
    }
    written
}

// ─── Case normalization ──────────────────────────────────────────────────

/// Restore camel case on SMIL tag and attribute names. Only `<name`,
/// `</name` and ` name=` tokens are touched.
pub fn normalize_case(svg: &str) -> String {
    let mut out = svg.to_string();
    for (lower, camel) in CAMEL_CASE {
        out = replace_token(&out, lower, camel);
    }
    out
}

fn replace_token(svg: &str, lower: &str, camel: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(at) = rest.find(lower) {
        let (before, tail) = rest.split_at(at);
        let after = &tail[lower.len()..];
        let opens = before.ends_with('<') || before.ends_with("</");
        let tag_end = after.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/');
        let is_attr = before.ends_with(|c: char| c.is_whitespace()) && after.starts_with('=');
        out.push_str(before);
        out.push_str(if (opens && tag_end) || is_attr { camel } else { lower });
        rest = after;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn restores_camel_case_on_tokens_only() {
        let svg = r#"<svg><lineargradient id="g" gradienttransform="rotate(3)"/><text>keytimes calcmode=</text></svg>"#;
        assert_eq!(
            normalize_case(svg),
            r#"<svg><linearGradient id="g" gradientTransform="rotate(3)"/><text>keytimes calcMode=</text></svg>"#
        );
        assert_eq!(normalize_case("</radialgradient>"), "</radialGradient>");
    }

    #[test]
    fn splines_follow_destination_easing() {
        let timing = Timing {
            total: 2.0,
            dur: "2s".into(),
            repeat: "1".into(),
        };
        let keys = [
            Key {
                second: 0.0,
                easing: sa_core::Easing::from_name("easeOutBack"),
                value: 0.0,
            },
            Key {
                second: 2.0,
                easing: sa_core::Easing::from_name("easeInOutBack"),
                value: 1.0,
            },
        ];
        let Some(Node::Element(e)) = timing.animate("opacity", &keys, |v| fmt_num(*v)) else {
            panic!("two keys make an animation");
        };
        assert_eq!(e.attr("keySplines"), Some("0.68 0 0.265 1"));
        assert_eq!(e.attr("keyTimes"), Some("0;1"));
        assert_eq!(e.attrs[0], ("attributeName".to_string(), "opacity".to_string()));
        assert!(timing.animate("opacity", &keys[..1], |v| fmt_num(*v)).is_none());
    }
}
