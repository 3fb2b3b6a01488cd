//! Live shapes backed by JavaScript canvas objects.
//!
//! Each registered shape is a plain JS object (typically the canvas
//! toolkit's shape instance). Sampled values are written onto it with
//! `Reflect.set`, converted to the representation the toolkit reads.

use js_sys::{Array, Object, Reflect};
use kurbo::Point;
use sa_core::gradient::serialize_gradient;
use sa_core::id::ShapeId;
use sa_player::{LiveShape, LiveValue, ShapeRegistry};
use std::collections::HashMap;
use wasm_bindgen::JsValue;

/// A JS object receiving animated attribute writes.
pub struct JsShape {
    target: Object,
}

impl JsShape {
    pub fn new(target: Object) -> Self {
        Self { target }
    }
}

impl LiveShape for JsShape {
    fn set(&mut self, property: &str, value: LiveValue) {
        let value = to_js(&value);
        if let Err(err) = Reflect::set(&self.target, &JsValue::from_str(property), &value) {
            log::warn!("cannot set {property} on live shape: {err:?}");
        }
    }
}

/// Registered live shapes by id.
#[derive(Default)]
pub struct JsRegistry {
    shapes: HashMap<ShapeId, JsShape>,
}

impl JsRegistry {
    pub fn insert(&mut self, id: ShapeId, target: Object) {
        self.shapes.insert(id, JsShape::new(target));
    }

    pub fn remove(&mut self, id: ShapeId) -> bool {
        self.shapes.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ShapeRegistry for JsRegistry {
    fn live_shape(&mut self, id: ShapeId) -> Option<&mut dyn LiveShape> {
        self.shapes.get_mut(&id).map(|s| s as &mut dyn LiveShape)
    }
}

/// The string form a value takes when it is not a plain number or list.
pub fn live_value_text(value: &LiveValue) -> Option<String> {
    match value {
        LiveValue::Color(c) => Some(c.to_rgba_string()),
        LiveValue::Gradient(g) => Some(serialize_gradient(g)),
        LiveValue::Path(path) => Some(path.to_svg()),
        LiveValue::Text(s) => Some(s.clone()),
        LiveValue::Number(_) | LiveValue::DashArray(_) | LiveValue::Points(_) => None,
    }
}

fn to_js(value: &LiveValue) -> JsValue {
    match value {
        LiveValue::Number(n) => JsValue::from_f64(*n),
        LiveValue::DashArray(dashes) => dashes
            .iter()
            .map(|d| JsValue::from_f64(*d))
            .collect::<Array>()
            .into(),
        LiveValue::Points(points) => points.iter().map(point_to_js).collect::<Array>().into(),
        other => live_value_text(other).map_or(JsValue::NULL, |s| JsValue::from_str(&s)),
    }
}

fn point_to_js(point: &Point) -> JsValue {
    let obj = Object::new();
    let _ = Reflect::set(&obj, &"x".into(), &JsValue::from_f64(point.x));
    let _ = Reflect::set(&obj, &"y".into(), &JsValue::from_f64(point.y));
    obj.into()
}
