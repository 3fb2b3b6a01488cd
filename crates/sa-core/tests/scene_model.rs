//! Integration tests: scene persistence, derived timing and the keyframe map.

use pretty_assertions::assert_eq;
use sa_core::keyframes::{map_duration, track_duration};
use sa_core::*;

fn load() -> Scene {
    Scene::from_json(include_str!("fixtures/scene.json")).unwrap()
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn load_sorts_by_z_index() {
    let scene = load();
    let ids: Vec<&str> = scene.shapes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["rect_1", "static_1", "poly_1"]);
}

#[test]
fn load_normalizes_transitions() {
    let scene = load();
    let rect = scene.shape(ShapeId::intern("rect_1")).unwrap();
    let left = rect.property("left").unwrap();
    let seconds: Vec<f64> = left.transitions.iter().map(|t| t.second).collect();
    assert_eq!(seconds, vec![0.0, 2.0]);
    assert!(left.transitions.iter().all(|t| t.shape_id == rect.id));

    let poly = scene.shape(ShapeId::intern("poly_1")).unwrap();
    let points = poly.property("points").unwrap();
    assert_eq!(points.first().unwrap().property, "points");
}

#[test]
fn load_recomputes_timing() {
    let scene = load();
    let rect = scene.shape(ShapeId::intern("rect_1")).unwrap();
    assert_eq!((rect.start, rect.duration), (0.0, 2.0));
    let poly = scene.shape(ShapeId::intern("poly_1")).unwrap();
    assert_eq!((poly.start, poly.duration), (1.0, 2.0));
    assert_eq!(scene.total_duration(), 3.0);
}

#[test]
fn load_reads_playback_config() {
    let scene = load();
    assert_eq!(scene.playback.repeat, Repeat::Infinite);
    assert_eq!(scene.playback.direction, Direction::Alternate);
    assert_eq!(scene.playback.offset, 25.0);
}

#[test]
fn save_then_load_is_stable() {
    let scene = load();
    let json = scene.to_json().unwrap();
    let again = Scene::from_json(&json).unwrap();
    assert_eq!(again.shapes(), scene.shapes());
    assert_eq!(again.to_json().unwrap(), json);
}

// ─── Animation list ─────────────────────────────────────────────────────

#[test]
fn animation_list_has_descriptor_shape() {
    let scene = load();
    let list = scene.animation_list();
    assert_eq!(list.len(), 2);
    let json = serde_json::to_value(&list[0]).unwrap();
    assert_eq!(json["id"], "rect_1");
    assert_eq!(json["type"], "rect");
    assert_eq!(json["origin"], "left top");
    assert_eq!(json["properties"][0]["id"], "left");
    assert_eq!(json["properties"][0]["transitions"][1]["easing"], "easeInQuad");
    assert_eq!(json["properties"][0]["transitions"][1]["value"], 50.0);
}

// ─── Keyframe map ───────────────────────────────────────────────────────

#[test]
fn keyframe_map_for_late_starting_shape() {
    let scene = load();
    let poly = scene.shape(ShapeId::intern("poly_1")).unwrap();
    let map = to_anime(&poly.properties);
    let points = &map["points"];
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].duration, 0.0);
    assert_eq!(points[1].duration, 1000.0);
    assert_eq!(points[2].duration, 2000.0);
    assert_eq!(points[2].easing, Easing::Out(Curve::Cubic));
    assert_eq!(track_duration(points), 3000.0);
    assert_eq!(map_duration(&map), 3000.0);
}

// ─── Editing ────────────────────────────────────────────────────────────

#[test]
fn edits_mark_dirty_until_flush() {
    let mut scene = load();
    let id = ShapeId::intern("rect_1");
    scene.add_transition(id, Transition::new("opacity", 6.0, 0.0));
    assert!(scene.shape(id).unwrap().is_dirty());
    assert_eq!(scene.shape(id).unwrap().duration, 2.0);
    assert_eq!(scene.flush(), vec![id]);
    assert_eq!(scene.shape(id).unwrap().duration, 6.0);
    assert!(!scene.shape(id).unwrap().is_dirty());
}

#[test]
fn added_shape_gets_next_z_index() {
    let mut scene = load();
    let mut shape = Shape::new(ShapeId::intern("circle_9"), ShapeKind::Circle);
    shape.z_index = 1;
    scene.add_shape(shape);
    let added = scene.shape(ShapeId::intern("circle_9")).unwrap();
    assert_eq!(added.z_index, 5);
    assert_eq!(scene.shapes().last().unwrap().id, added.id);
}
