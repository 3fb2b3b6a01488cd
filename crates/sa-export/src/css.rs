//! CSS `@keyframes` exporter.
//!
//! Transform components animate the wrapper groups, one animation each.
//! Everything else on the shape element is merged into a single
//! `@keyframes {id}` table, since an element can only carry one `animation`.
//! Gradient stops animate through `#gradient stop:nth-child(n)` rules.

use crate::dom::{Element, Node};
use crate::error::ExportResult;
use crate::options::ExportOptions;
use crate::prepare::{
    self, Cleaned, FlatTrack, FlatValue, Key, PaintKeys, STYLE_ID, ShapePlan, StaticTransform,
    effective_origin, ensure_gradient, outgoing_easing, percent, points_to_path, wrap_shape,
};
use sa_core::color::Rgba;
use sa_core::easing::Easing;
use sa_core::gradient::{Gradient, GradientCache};
use sa_core::math::fmt_num;
use sa_core::model::AnimationDescriptor;

/// Attributes that stay unitless as CSS properties.
const UNITLESS: [&str; 1] = ["opacity"];

/// Presentation attributes with no CSS property counterpart.
const NOT_CSS: [&str; 4] = ["x1", "y1", "x2", "y2"];

/// Export `svg` with `animations` as CSS keyframes in an embedded `<style>`.
///
/// With no animated shape, or a non-positive total duration, the cleaned
/// static SVG is returned instead.
pub fn render_css_animated_svg(
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

    let mut sheet = StyleSheet::new(options);
    let mut gradients = GradientCache::new();
    for descriptor in animations {
        let data = data_transforms.get(descriptor.id.as_str());
        let origin = effective_origin(descriptor, data);
        let plan = ShapePlan::new(descriptor, origin, total, &mut gradients);
        if plan.is_empty() || !wrap_shape(&mut doc.root, &plan, data, StaticTransform::InlineStyle) {
            continue;
        }
        sheet.shape(&mut doc.root, &plan, total);
    }

    if sheet.is_empty() {
        return Ok(doc.to_svg_string());
    }
    let style = Element {
        children: vec![Node::Raw(sheet.finish())],
        ..Element::new("style").with_attr("id", STYLE_ID)
    };
    prepare::prepend_generated(&mut doc.root, &options.version, Some(Node::Element(style)));
    Ok(prepare::strip_whitespace(&doc.to_svg_string()))
}

// ─── Style sheet ─────────────────────────────────────────────────────────

/// One merged keyframe of a flat table.
struct Row {
    second: f64,
    decls: Vec<String>,
    timing: Option<Easing>,
}

struct StyleSheet {
    rules: String,
    /// `{dur} linear 0s {count} {direction} both`
    animation_tail: String,
    animations: usize,
}

impl StyleSheet {
    fn new(options: &ExportOptions) -> Self {
        Self {
            rules: String::new(),
            animation_tail: format!(
                "{}s linear 0s {} {} both",
                fmt_num(options.total_duration),
                options.repeat.css_value(),
                options.direction.as_str()
            ),
            animations: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.animations == 0
    }

    fn finish(self) -> String {
        self.rules
    }

    /// `selector{animation:…}@keyframes name{…}`
    fn animation(&mut self, selector: &str, name: &str, rows: Vec<Row>, total: f64) {
        if rows.is_empty() {
            return;
        }
        self.animations += 1;
        self.rules.push_str(&format!(
            "{selector}{{animation:{name} {}}}@keyframes {name}{{",
            self.animation_tail
        ));
        for row in rows {
            let mut decls = row.decls.join(";");
            if let Some(easing) = row.timing {
                decls.push_str(";animation-timing-function:");
                decls.push_str(&easing.css_timing_function());
            }
            self.rules.push_str(&format!("{}{{{decls}}}", percent(row.second, total)));
        }
        self.rules.push('}');
    }

    fn shape(&mut self, root: &mut Element, plan: &ShapePlan, total: f64) {
        for (component, keys) in &plan.transforms {
            let class = plan.wrapper_class(*component);
            let rows = rows_from(keys, |v| vec![format!("transform:{}", component.css(*v))]);
            self.animation(&format!(".{class}"), &class, rows, total);
        }

        if plan.paints.is_empty() && plan.flats.is_empty() {
            return;
        }
        let shape_class = plan.shape_class();
        if root.find(&|e| e.has_class(&shape_class)).is_none() {
            log::debug!(
                "{}: no drawable element, dropping {} attribute animation(s)",
                plan.id,
                plan.paints.len() + plan.flats.len()
            );
            return;
        }

        let mut merged: Vec<Row> = Vec::new();
        for (attribute, paint) in &plan.paints {
            match paint {
                PaintKeys::Solid(keys) => merge(&mut merged, keys, |c| paint_decls(attribute, c)),
                PaintKeys::Gradient(keys) => self.gradient(root, plan, attribute, keys, total),
            }
        }
        for track in &plan.flats {
            if NOT_CSS.contains(&track.attribute) {
                log::debug!("{}: {} cannot be animated with CSS", plan.id, track.attribute);
                continue;
            }
            if track.attribute == "points" {
                rewrite_as_path(root, plan);
            }
            merge(&mut merged, &track.keys, |v| flat_decls(track, v, plan));
        }
        merged.sort_by(|a, b| a.second.total_cmp(&b.second));
        let id = plan.id.as_str();
        self.animation(&format!(".{shape_class}"), id, merged, total);
    }

    fn gradient(
        &mut self,
        root: &mut Element,
        plan: &ShapePlan,
        attribute: &str,
        keys: &[Key<Gradient>],
        total: f64,
    ) {
        let Some(template) = keys.iter().max_by_key(|k| k.value.color_stops.len()) else {
            return;
        };
        if keys.windows(2).any(|w| w[0].value.angle != w[1].value.angle) {
            log::debug!("{}: gradient angle changes are not animated in CSS", plan.id);
        }
        let Some(gradient_id) = ensure_gradient(root, plan, attribute, &template.value) else {
            return;
        };
        for n in 0..template.value.color_stops.len() {
            let rows = rows_from(keys, |g| {
                let stop = g.color_stops.get(n).or(g.color_stops.last());
                let color = stop.map_or(Rgba::BLACK, |s| s.color);
                vec![
                    format!("stop-color:{}", color.to_rgb_string()),
                    format!("stop-opacity:{}", fmt_num(color.a)),
                ]
            });
            let selector = format!("#{gradient_id} stop:nth-child({})", n + 1);
            self.animation(&selector, &format!("{gradient_id}-stop-{}", n + 1), rows, total);
        }
    }
}

/// Timing function for the segment leaving key `i`, when it has a curve.
fn timing<V>(keys: &[Key<V>], i: usize) -> Option<Easing> {
    outgoing_easing(keys, i).filter(|e| e.cubic_bezier().is_some())
}

fn rows_from<V>(keys: &[Key<V>], decls: impl Fn(&V) -> Vec<String>) -> Vec<Row> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| Row {
            second: key.second,
            decls: decls(&key.value),
            timing: timing(keys, i),
        })
        .collect()
}

/// Fold one track into the merged table. The first track with a curve on a
/// shared second decides that keyframe's timing function.
fn merge<V>(rows: &mut Vec<Row>, keys: &[Key<V>], decls: impl Fn(&V) -> Vec<String>) {
    for (i, key) in keys.iter().enumerate() {
        let row_timing = timing(keys, i);
        let new_decls = decls(&key.value);
        if new_decls.is_empty() {
            continue;
        }
        match rows.iter_mut().find(|r| (r.second - key.second).abs() < 1e-9) {
            Some(row) => {
                row.decls.extend(new_decls);
                row.timing = row.timing.or(row_timing);
            }
            None => rows.push(Row {
                second: key.second,
                decls: new_decls,
                timing: row_timing,
            }),
        }
    }
}

fn paint_decls(attribute: &str, color: &Rgba) -> Vec<String> {
    vec![
        format!("{attribute}:{}", color.to_rgb_string()),
        format!("{attribute}-opacity:{}", fmt_num(color.a)),
    ]
}

fn flat_decls(track: &FlatTrack, value: &FlatValue, plan: &ShapePlan) -> Vec<String> {
    let attribute = track.attribute;
    let decl = match (attribute, value) {
        (_, FlatValue::Number(n)) if UNITLESS.contains(&attribute) => format!("{attribute}:{}", fmt_num(*n)),
        (_, FlatValue::Number(n)) => format!("{attribute}:{}px", fmt_num(*n)),
        ("d", FlatValue::Text(d)) => format!("d:path(\"{d}\")"),
        ("points", FlatValue::Text(points)) => {
            format!("d:path(\"{}\")", points_to_path(points, plan.kind.is_closed()))
        }
        (_, FlatValue::Text(text)) => format!("{attribute}:{text}"),
    };
    vec![decl]
}

/// CSS can animate `d` but not `points`: turn the polygon into a path.
fn rewrite_as_path(root: &mut Element, plan: &ShapePlan) {
    let class = plan.shape_class();
    let Some(shape) = root.find_mut(&|e| e.has_class(&class)) else {
        return;
    };
    if shape.name == "path" {
        return;
    }
    let points = shape.remove_attr("points").unwrap_or_default();
    shape.name = "path".to_string();
    shape.set_attr("d", &points_to_path(&points, plan.kind.is_closed()));
}
