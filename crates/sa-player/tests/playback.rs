//! Integration tests: scene JSON → preview → live shapes (sa-player ↔ sa-core).

use kurbo::Point;
use pretty_assertions::assert_eq;
use sa_core::color::Rgba;
use sa_core::{Easing, ShapeId, Transition};
use sa_player::{LiveValue, Preview, SceneEdit};
use std::collections::{BTreeMap, HashMap};

type Registry = HashMap<ShapeId, BTreeMap<String, LiveValue>>;

fn load() -> (Preview, Registry) {
    let preview = Preview::from_json(include_str!("fixtures/scene.json")).unwrap();
    let mut registry = Registry::new();
    for name in ["rect_1", "poly_1", "static_1"] {
        registry.insert(ShapeId::intern(name), BTreeMap::new());
    }
    (preview, registry)
}

fn attr<'a>(registry: &'a Registry, shape: &str, property: &str) -> Option<&'a LiveValue> {
    registry.get(&ShapeId::intern(shape))?.get(property)
}

// ─── Scrubbing ──────────────────────────────────────────────────────────

#[test]
fn scene_duration_spans_all_shapes() {
    let (preview, _) = load();
    assert_eq!(preview.timeline().total_duration(), 3.0);
}

#[test]
fn scrub_to_start_applies_first_keyframes() {
    let (mut preview, mut registry) = load();
    assert!(preview.seek(0.0, &mut registry));
    assert_eq!(attr(&registry, "rect_1", "left"), Some(&LiveValue::Number(10.0)));
    assert_eq!(attr(&registry, "rect_1", "width"), Some(&LiveValue::Number(40.0)));
    assert_eq!(
        attr(&registry, "rect_1", "fill"),
        Some(&LiveValue::Color(Rgba::new(255.0, 0.0, 0.0, 0.5)))
    );
    assert_eq!(
        attr(&registry, "poly_1", "points"),
        Some(&LiveValue::Points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]))
    );
    // Shapes without keyframes are never touched.
    assert!(registry[&ShapeId::intern("static_1")].is_empty());
}

#[test]
fn scrub_mid_segment_uses_destination_easing() {
    let (mut preview, mut registry) = load();
    preview.seek(1.0, &mut registry);
    // left: 10 → 50 with easeInQuad at t = 0.5
    assert_eq!(attr(&registry, "rect_1", "left"), Some(&LiveValue::Number(20.0)));
    // width: linear 40 → 80
    assert_eq!(attr(&registry, "rect_1", "width"), Some(&LiveValue::Number(60.0)));
}

#[test]
fn fill_crosses_into_gradient() {
    let (mut preview, mut registry) = load();
    preview.seek(2.0, &mut registry);
    let Some(LiveValue::Gradient(gradient)) = attr(&registry, "rect_1", "fill") else {
        panic!("fill should be a gradient after its last keyframe");
    };
    assert_eq!(gradient.color_stops.len(), 2);
    assert_eq!(gradient.color_stops[1].color, Rgba::new(0.0, 0.0, 255.0, 1.0));
}

// ─── Playing ────────────────────────────────────────────────────────────

#[test]
fn infinite_alternate_keeps_playing() {
    let (mut preview, mut registry) = load();
    preview.play();
    assert!(preview.tick(3500.0, &mut registry));
    assert!(preview.timeline().is_playing());
    // second iteration runs backwards: 3.5 s → position 2.5 s
    assert_eq!(preview.timeline().current_time(), 2.5);
    assert!(!preview.seek(0.0, &mut registry));
    preview.pause();
    assert!(preview.seek(0.0, &mut registry));
}

#[test]
fn edits_during_playback_apply_next_tick() {
    let (mut preview, mut registry) = load();
    let id = ShapeId::intern("rect_1");
    preview.play();
    preview.apply_edit(SceneEdit::AddTransition {
        id,
        transition: Transition::new("opacity", 1.0, 0.25).with_easing(Easing::Linear),
    });
    preview.tick(100.0, &mut registry);
    assert_eq!(attr(&registry, "rect_1", "opacity"), Some(&LiveValue::Number(0.25)));
}
