//! Keyframe data model: Scene → Shape → Property → Transition.
//!
//! The model only stores timing and value data. Geometry and paint live on
//! the canvas, cross-referenced by [`ShapeId`]. Derived shape timing
//! (`start`/`duration`) is recomputed lazily: edits mark the shape dirty and
//! [`Scene::flush`] recomputes every dirty shape in one pass.

use crate::easing::Easing;
use crate::events::{ChangeEvent, Entity, EventBus, SubscriptionId};
use crate::gradient::is_gradient;
use crate::id::ShapeId;
use crate::kind::{Origin, ShapeKind};
use crate::math::fmt_num;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Two seconds closer than this are the same keyframe slot.
const SECOND_EPSILON: f64 = 1e-9;

fn same_second(a: f64, b: f64) -> bool {
    (a - b).abs() < SECOND_EPSILON
}

fn clamp_second(second: f64) -> f64 {
    if second.is_finite() { second.max(0.0) } else { 0.0 }
}

// ─── Transition values ───────────────────────────────────────────────────

/// A keyframe value: a number, or a string holding a color, path data, a
/// points list, a dash array or a serialized gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionValue {
    Number(f64),
    Text(String),
}

impl TransitionValue {
    /// Numeric view. Numeric strings (`"12.5"`) count as numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn is_gradient(&self) -> bool {
        self.as_str().is_some_and(is_gradient)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for TransitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&fmt_num(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for TransitionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for TransitionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TransitionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ─── Transition ──────────────────────────────────────────────────────────

/// One keyframe of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default)]
    pub shape_id: ShapeId,
    #[serde(default)]
    pub property: String,
    pub second: f64,
    pub value: TransitionValue,
    #[serde(default)]
    pub easing: Easing,
}

impl Transition {
    pub fn new(property: &str, second: f64, value: impl Into<TransitionValue>) -> Self {
        Self {
            shape_id: ShapeId::default(),
            property: property.to_string(),
            second: clamp_second(second),
            value: value.into(),
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

// ─── Property ────────────────────────────────────────────────────────────

pub type Transitions = SmallVec<[Transition; 4]>;

/// A named animatable channel. Transitions stay sorted by `second`, one per
/// second.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub transitions: Transitions,
}

impl Property {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            transitions: SmallVec::new(),
        }
    }

    /// Insert a transition in order. A transition at the same second is
    /// replaced and returned.
    pub fn upsert(&mut self, mut transition: Transition) -> Option<Transition> {
        transition.second = clamp_second(transition.second);
        transition.property.clone_from(&self.id);
        if let Some(existing) = self.get_mut(transition.second) {
            return Some(std::mem::replace(existing, transition));
        }
        let idx = self
            .transitions
            .iter()
            .position(|t| t.second > transition.second)
            .unwrap_or(self.transitions.len());
        self.transitions.insert(idx, transition);
        None
    }

    pub fn remove_at(&mut self, second: f64) -> Option<Transition> {
        let idx = self
            .transitions
            .iter()
            .position(|t| same_second(t.second, second))?;
        Some(self.transitions.remove(idx))
    }

    /// Reposition a keyframe. A keyframe already at `to` is overwritten.
    pub fn move_transition(&mut self, from: f64, to: f64) -> bool {
        let Some(mut transition) = self.remove_at(from) else {
            return false;
        };
        transition.second = to;
        self.upsert(transition);
        true
    }

    pub fn get(&self, second: f64) -> Option<&Transition> {
        self.transitions.iter().find(|t| same_second(t.second, second))
    }

    pub fn get_mut(&mut self, second: f64) -> Option<&mut Transition> {
        self.transitions
            .iter_mut()
            .find(|t| same_second(t.second, second))
    }

    pub fn first(&self) -> Option<&Transition> {
        self.transitions.first()
    }

    pub fn last(&self) -> Option<&Transition> {
        self.transitions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// The value in effect at `second`: the latest keyframe at or before it,
    /// or the first keyframe when `second` precedes them all.
    pub fn value_at(&self, second: f64) -> Option<&TransitionValue> {
        self.transitions
            .iter()
            .rev()
            .find(|t| t.second <= second + SECOND_EPSILON)
            .or_else(|| self.first())
            .map(|t| &t.value)
    }

    /// `(min, max)` second, or `None` without transitions.
    pub fn second_range(&self) -> Option<(f64, f64)> {
        Some((self.first()?.second, self.last()?.second))
    }

    /// Re-establish ordering and uniqueness after loading raw data.
    fn normalize(&mut self, shape_id: ShapeId) {
        let raw = std::mem::take(&mut self.transitions);
        for mut transition in raw {
            transition.shape_id = shape_id;
            self.upsert(transition);
        }
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

/// One drawable entity and its animated properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(skip)]
    dirty: bool,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            name: id.to_string(),
            z_index: 0,
            origin: Origin::default(),
            start: 0.0,
            duration: 0.0,
            properties: Vec::new(),
            dirty: false,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.id == name)
    }

    pub fn has_transitions(&self) -> bool {
        self.properties.iter().any(|p| !p.is_empty())
    }

    /// Record a transition, creating its property on first use. Returns the
    /// replaced transition, if any, and whether the property was created.
    pub fn upsert_transition(&mut self, mut transition: Transition) -> (Option<Transition>, bool) {
        transition.shape_id = self.id;
        self.dirty = true;
        if let Some(property) = self.property_mut(&transition.property) {
            return (property.upsert(transition), false);
        }
        let mut property = Property::new(&transition.property);
        property.upsert(transition);
        self.properties.push(property);
        (None, true)
    }

    /// Remove one keyframe. An emptied property is destroyed; the second
    /// return value reports that.
    pub fn remove_transition(&mut self, property: &str, second: f64) -> (Option<Transition>, bool) {
        let Some(idx) = self.properties.iter().position(|p| p.id == property) else {
            return (None, false);
        };
        let removed = self.properties[idx].remove_at(second);
        if removed.is_some() {
            self.dirty = true;
        }
        let destroyed = self.properties[idx].is_empty();
        if destroyed {
            self.properties.remove(idx);
        }
        (removed, destroyed)
    }

    pub fn move_transition(&mut self, property: &str, from: f64, to: f64) -> bool {
        let moved = self
            .property_mut(property)
            .is_some_and(|p| p.move_transition(from, to));
        self.dirty |= moved;
        moved
    }

    pub fn clear_property(&mut self, property: &str) -> Option<Property> {
        let idx = self.properties.iter().position(|p| p.id == property)?;
        self.dirty = true;
        Some(self.properties.remove(idx))
    }

    /// `(start, duration)` computed from the current transitions.
    pub fn timing(&self) -> (f64, f64) {
        let range = self
            .properties
            .iter()
            .filter_map(Property::second_range)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        match range {
            Some((min, max)) => (min, max - min),
            None => (0.0, 0.0),
        }
    }

    /// Refresh `start`/`duration`. Idempotent; returns whether they changed.
    pub fn recompute(&mut self) -> bool {
        let (start, duration) = self.timing();
        let changed = start != self.start || duration != self.duration;
        self.start = start;
        self.duration = duration;
        self.dirty = false;
        changed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Latest keyframe second over all properties.
    pub fn end(&self) -> f64 {
        let (start, duration) = self.timing();
        start + duration
    }

    fn normalize(&mut self) {
        let id = self.id;
        for property in &mut self.properties {
            property.normalize(id);
        }
        self.properties.retain(|p| !p.is_empty());
    }
}

// ─── Playback configuration ──────────────────────────────────────────────

/// How many times the animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(1)
    }
}

impl Repeat {
    /// CSS `animation-iteration-count` value.
    pub fn css_value(&self) -> String {
        match self {
            Repeat::Count(n) => n.to_string(),
            Repeat::Infinite => "infinite".to_string(),
        }
    }

    /// SMIL `repeatCount` value.
    pub fn smil_value(&self) -> String {
        match self {
            Repeat::Count(n) => n.to_string(),
            Repeat::Infinite => "indefinite".to_string(),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::Count(n) => write!(f, "{n}"),
            Repeat::Infinite => f.write_str("infinity"),
        }
    }
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "infinity" | "infinite" | "indefinite" => Ok(Repeat::Infinite),
            other => other
                .parse::<u32>()
                .map(Repeat::Count)
                .map_err(|_| format!("invalid repeat value {other:?}")),
        }
    }
}

impl Serialize for Repeat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Repeat::Count(n) => serializer.serialize_u32(*n),
            Repeat::Infinite => serializer.serialize_str("infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for Repeat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Repeat::Count(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Normal => "normal",
            Direction::Reverse => "reverse",
            Direction::Alternate => "alternate",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(Direction::Normal),
            "reverse" => Ok(Direction::Reverse),
            "alternate" => Ok(Direction::Alternate),
            other => Err(format!("invalid direction {other:?}")),
        }
    }
}

/// Settings for the embeddable player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackConfig {
    pub repeat: Repeat,
    pub direction: Direction,
    /// Percent of the viewport the SVG must enter before playback starts.
    pub offset: f64,
}

// ─── Animation descriptors ───────────────────────────────────────────────

/// Exporter input: one entry per animated shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDescriptor {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl AnimationDescriptor {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == name)
    }

    pub fn has_transitions(&self) -> bool {
        self.properties.iter().any(|p| !p.is_empty())
    }
}

impl From<&Shape> for AnimationDescriptor {
    fn from(shape: &Shape) -> Self {
        let (start, duration) = shape.timing();
        Self {
            id: shape.id,
            kind: shape.kind,
            origin: shape.origin,
            start,
            duration,
            properties: shape
                .properties
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
        }
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// The authoritative shape registry, ordered by `zIndex`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    shapes: Vec<Shape>,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(skip)]
    events: EventBus,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes in paint order (ascending `zIndex`).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    fn sort(&mut self) {
        self.shapes.sort_by_key(|s| s.z_index);
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn publish(
        &mut self,
        entity: Entity,
        field: &'static str,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) {
        self.events
            .publish(ChangeEvent::new(entity, field, old_value, new_value));
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Add a shape. A shape with the same id is replaced; a `zIndex` already
    /// taken by another shape is bumped past the current maximum.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        if self.index_of(shape.id).is_some() {
            log::debug!("replacing shape {}", shape.id);
            self.remove_shape(shape.id);
        }
        if self.shapes.iter().any(|s| s.z_index == shape.z_index) {
            shape.z_index = self.shapes.iter().map(|s| s.z_index).max().unwrap_or(0) + 1;
        }
        shape.normalize();
        shape.mark_dirty();
        let id = shape.id;
        self.shapes.push(shape);
        self.sort();
        self.publish(Entity::Scene, "shapes", None, Some(Value::from(id.as_str())));
        id
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let idx = self.index_of(id)?;
        let shape = self.shapes.remove(idx);
        self.publish(Entity::Scene, "shapes", Some(Value::from(id.as_str())), None);
        Some(shape)
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    /// Record a keyframe. Returns false if the shape does not exist.
    pub fn add_transition(&mut self, id: ShapeId, transition: Transition) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            log::debug!("add_transition: no shape {id}");
            return false;
        };
        let property = transition.property.clone();
        let second = clamp_second(transition.second);
        let new_value = transition.value.to_json();
        let (replaced, created) = shape.upsert_transition(transition);
        if created {
            self.publish(
                Entity::Shape { shape: id },
                "properties",
                None,
                Some(Value::from(property.as_str())),
            );
        }
        self.publish(
            Entity::Transition {
                shape: id,
                property,
                second,
            },
            "value",
            replaced.map(|t| t.value.to_json()),
            Some(new_value),
        );
        true
    }

    /// Edit a keyframe's value and/or easing in place.
    pub fn update_transition(
        &mut self,
        id: ShapeId,
        property: &str,
        second: f64,
        value: Option<TransitionValue>,
        easing: Option<Easing>,
    ) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        let Some(transition) = shape.property_mut(property).and_then(|p| p.get_mut(second)) else {
            return false;
        };
        let mut changes = Vec::new();
        if let Some(value) = value {
            let old = std::mem::replace(&mut transition.value, value);
            changes.push(("value", old.to_json(), transition.value.to_json()));
        }
        if let Some(easing) = easing {
            let old = std::mem::replace(&mut transition.easing, easing);
            changes.push((
                "easing",
                Value::from(old.name()),
                Value::from(transition.easing.name()),
            ));
        }
        shape.mark_dirty();
        for (field, old, new) in changes {
            self.publish(
                Entity::Transition {
                    shape: id,
                    property: property.to_string(),
                    second,
                },
                field,
                Some(old),
                Some(new),
            );
        }
        true
    }

    /// Drag a keyframe to a new second. Collisions resolve last-write-wins.
    pub fn move_transition(&mut self, id: ShapeId, property: &str, from: f64, to: f64) -> bool {
        let to = clamp_second(to);
        let moved = self
            .shape_mut(id)
            .is_some_and(|s| s.move_transition(property, from, to));
        if moved {
            self.publish(
                Entity::Transition {
                    shape: id,
                    property: property.to_string(),
                    second: from,
                },
                "second",
                Some(Value::from(from)),
                Some(Value::from(to)),
            );
        }
        moved
    }

    pub fn remove_transition(&mut self, id: ShapeId, property: &str, second: f64) -> Option<Transition> {
        let (removed, destroyed) = self.shape_mut(id)?.remove_transition(property, second);
        let removed = removed?;
        self.publish(
            Entity::Transition {
                shape: id,
                property: property.to_string(),
                second,
            },
            "value",
            Some(removed.value.to_json()),
            None,
        );
        if destroyed {
            self.publish(
                Entity::Shape { shape: id },
                "properties",
                Some(Value::from(property)),
                None,
            );
        }
        Some(removed)
    }

    /// Drop every keyframe of one property.
    pub fn clear_property(&mut self, id: ShapeId, property: &str) -> bool {
        let cleared = self
            .shape_mut(id)
            .and_then(|s| s.clear_property(property))
            .is_some();
        if cleared {
            self.publish(
                Entity::Shape { shape: id },
                "properties",
                Some(Value::from(property)),
                None,
            );
        }
        cleared
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Swap `zIndex` with the next-higher shape.
    pub fn move_forward(&mut self, id: ShapeId) -> bool {
        self.swap_z(id, true)
    }

    /// Swap `zIndex` with the next-lower shape.
    pub fn move_backward(&mut self, id: ShapeId) -> bool {
        self.swap_z(id, false)
    }

    fn swap_z(&mut self, id: ShapeId, forward: bool) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let z = self.shapes[idx].z_index;
        let neighbor = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| if forward { s.z_index > z } else { s.z_index < z })
            .min_by_key(|(_, s)| (s.z_index - z).abs())
            .map(|(i, _)| i);
        let Some(other) = neighbor else {
            return false;
        };
        let other_z = self.shapes[other].z_index;
        let other_id = self.shapes[other].id;
        self.shapes[idx].z_index = other_z;
        self.shapes[other].z_index = z;
        self.sort();
        self.publish(
            Entity::Shape { shape: id },
            "zIndex",
            Some(Value::from(z)),
            Some(Value::from(other_z)),
        );
        self.publish(
            Entity::Shape { shape: other_id },
            "zIndex",
            Some(Value::from(other_z)),
            Some(Value::from(z)),
        );
        true
    }

    // ─── Derived state ───────────────────────────────────────────────────

    /// Recompute every dirty shape. Returns the ids that were dirty.
    pub fn flush(&mut self) -> Vec<ShapeId> {
        let mut flushed = Vec::new();
        let mut changes = Vec::new();
        for shape in self.shapes.iter_mut().filter(|s| s.is_dirty()) {
            let (old_start, old_duration) = (shape.start, shape.duration);
            if shape.recompute() {
                changes.push((shape.id, old_start, old_duration, shape.start, shape.duration));
            }
            flushed.push(shape.id);
        }
        for (id, old_start, old_duration, start, duration) in changes {
            if old_start != start {
                self.publish(
                    Entity::Shape { shape: id },
                    "start",
                    Some(Value::from(old_start)),
                    Some(Value::from(start)),
                );
            }
            if old_duration != duration {
                self.publish(
                    Entity::Shape { shape: id },
                    "duration",
                    Some(Value::from(old_duration)),
                    Some(Value::from(duration)),
                );
            }
        }
        flushed
    }

    /// Latest keyframe second over the whole scene.
    pub fn total_duration(&self) -> f64 {
        self.shapes.iter().map(Shape::end).fold(0.0, f64::max)
    }

    /// One descriptor per animated shape, in paint order.
    pub fn animation_list(&self) -> Vec<AnimationDescriptor> {
        self.shapes
            .iter()
            .filter(|s| s.has_transitions())
            .map(AnimationDescriptor::from)
            .collect()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a scene, re-establishing transition order and derived timing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scene: Scene = serde_json::from_str(json)?;
        for shape in &mut scene.shapes {
            shape.normalize();
            shape.recompute();
        }
        scene.sort();
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene_with(ids: &[&str]) -> (Scene, Vec<ShapeId>) {
        let mut scene = Scene::new();
        let ids = ids
            .iter()
            .map(|name| scene.add_shape(Shape::new(ShapeId::intern(name), ShapeKind::Rect)))
            .collect();
        (scene, ids)
    }

    #[test]
    fn upsert_keeps_order_and_replaces_same_second() {
        let mut p = Property::new("left");
        p.upsert(Transition::new("left", 2.0, 20.0));
        p.upsert(Transition::new("left", 0.5, 5.0));
        p.upsert(Transition::new("left", 1.0, 10.0));
        let replaced = p.upsert(Transition::new("left", 2.0, 99.0));
        assert_eq!(replaced.map(|t| t.value), Some(TransitionValue::Number(20.0)));
        let seconds: Vec<f64> = p.transitions.iter().map(|t| t.second).collect();
        assert_eq!(seconds, [0.5, 1.0, 2.0]);
        assert_eq!(p.last().map(|t| &t.value), Some(&TransitionValue::Number(99.0)));
    }

    #[test]
    fn negative_seconds_clamp_to_zero() {
        let mut p = Property::new("top");
        p.upsert(Transition::new("top", -3.0, 1.0));
        assert_eq!(p.first().map(|t| t.second), Some(0.0));
    }

    #[test]
    fn move_transition_collides_last_write_wins() {
        let mut p = Property::new("opacity");
        p.upsert(Transition::new("opacity", 0.0, 0.0));
        p.upsert(Transition::new("opacity", 1.0, 1.0));
        assert!(p.move_transition(0.0, 1.0));
        assert_eq!(p.len(), 1);
        assert_eq!(p.value_at(1.0), Some(&TransitionValue::Number(0.0)));
        assert!(!p.move_transition(5.0, 6.0));
    }

    #[test]
    fn value_at_holds_previous_keyframe() {
        let mut p = Property::new("fill");
        p.upsert(Transition::new("fill", 1.0, "rgb(0,0,0)"));
        p.upsert(Transition::new("fill", 3.0, "rgb(255,0,0)"));
        assert_eq!(p.value_at(2.0), Some(&TransitionValue::from("rgb(0,0,0)")));
        assert_eq!(p.value_at(0.0), Some(&TransitionValue::from("rgb(0,0,0)")));
        assert_eq!(p.value_at(3.0), Some(&TransitionValue::from("rgb(255,0,0)")));
    }

    #[test]
    fn start_and_duration_follow_transitions() {
        let (mut scene, ids) = scene_with(&["timing_a"]);
        for (second, prop) in [(2.0, "left"), (5.0, "top"), (1.0, "left")] {
            scene.add_transition(ids[0], Transition::new(prop, second, 0.0));
        }
        assert_eq!(scene.flush(), vec![ids[0]]);
        let shape = scene.shape(ids[0]).unwrap();
        assert_eq!(shape.start, 1.0);
        assert_eq!(shape.duration, 4.0);
        assert!(scene.flush().is_empty());
    }

    #[test]
    fn removing_last_transition_destroys_property() {
        let (mut scene, ids) = scene_with(&["destroy_a"]);
        scene.add_transition(ids[0], Transition::new("left", 1.0, 1.0));
        assert!(scene.remove_transition(ids[0], "left", 1.0).is_some());
        assert!(scene.shape(ids[0]).unwrap().property("left").is_none());
        scene.flush();
        let shape = scene.shape(ids[0]).unwrap();
        assert_eq!((shape.start, shape.duration), (0.0, 0.0));
    }

    #[test]
    fn z_order_swaps_with_neighbors() {
        let (mut scene, ids) = scene_with(&["z_a", "z_b", "z_c"]);
        assert!(scene.move_forward(ids[0]));
        let order: Vec<_> = scene.shapes().iter().map(|s| s.id).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
        assert!(!scene.move_forward(ids[2]));
        assert!(!scene.move_backward(ids[1]));
        assert!(scene.move_backward(ids[2]));
        assert_eq!(scene.shapes()[1].id, ids[2]);
    }

    #[test]
    fn mutations_publish_events() {
        let (mut scene, ids) = scene_with(&["events_a"]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        scene.subscribe(move |e| sink.borrow_mut().push(e.field));
        scene.add_transition(ids[0], Transition::new("left", 0.0, 1.0));
        scene.update_transition(ids[0], "left", 0.0, None, Some(Easing::from_name("easeInQuad")));
        scene.flush();
        assert_eq!(*log.borrow(), vec!["properties", "value", "easing"]);
    }

    #[test]
    fn repeat_serde() {
        assert_eq!(serde_json::to_string(&Repeat::Infinite).unwrap(), "\"infinity\"");
        assert_eq!(serde_json::from_str::<Repeat>("3").unwrap(), Repeat::Count(3));
        assert_eq!(serde_json::from_str::<Repeat>("\"infinity\"").unwrap(), Repeat::Infinite);
        assert!(serde_json::from_str::<Repeat>("\"often\"").is_err());
    }

    #[test]
    fn animation_list_skips_static_shapes() {
        let (mut scene, ids) = scene_with(&["list_a", "list_b"]);
        scene.add_transition(ids[1], Transition::new("opacity", 2.0, 0.5));
        let list = scene.animation_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, ids[1]);
        assert_eq!(list[0].start, 2.0);
        assert_eq!(scene.total_duration(), 2.0);
    }
}
