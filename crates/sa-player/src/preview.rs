//! Live preview: keeps a [`Timeline`] in sync with a [`Scene`].
//!
//! Edits land on the scene immediately and mark the preview dirty. The
//! keyframe maps are re-synthesized in one batch on [`Preview::flush`], which
//! every clock operation calls first, so a burst of edits between two frames
//! costs a single rebuild per touched shape.

use crate::live::ShapeRegistry;
use crate::timeline::Timeline;
use sa_core::easing::Easing;
use sa_core::id::ShapeId;
use sa_core::keyframes::to_anime;
use sa_core::events::{ChangeEvent, SubscriptionId};
use sa_core::model::{PlaybackConfig, Scene, Shape, Transition, TransitionValue};

/// A scene edit coming from the editor UI or canvas.
#[derive(Debug, Clone)]
pub enum SceneEdit {
    AddShape(Box<Shape>),
    RemoveShape {
        id: ShapeId,
    },
    AddTransition {
        id: ShapeId,
        transition: Transition,
    },
    UpdateTransition {
        id: ShapeId,
        property: String,
        second: f64,
        value: Option<TransitionValue>,
        easing: Option<Easing>,
    },
    MoveTransition {
        id: ShapeId,
        property: String,
        from: f64,
        to: f64,
    },
    RemoveTransition {
        id: ShapeId,
        property: String,
        second: f64,
    },
    ClearProperty {
        id: ShapeId,
        property: String,
    },
    MoveForward {
        id: ShapeId,
    },
    MoveBackward {
        id: ShapeId,
    },
}

/// Scene plus the timeline that previews it. The scene is only changed
/// through [`Preview::apply_edit`] and [`Preview::set_playback`], so the
/// timeline never misses a rebuild.
pub struct Preview {
    scene: Scene,
    timeline: Timeline,
    /// Set when the scene changed and the timeline needs a rebuild.
    timeline_dirty: bool,
}

impl Preview {
    pub fn new(scene: Scene) -> Self {
        let mut preview = Self {
            timeline: Timeline::with_config(scene.playback),
            scene,
            timeline_dirty: false,
        };
        preview.rebuild();
        preview
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(Scene::from_json(json)?))
    }

    /// Apply one edit. Returns whether the scene changed.
    pub fn apply_edit(&mut self, edit: SceneEdit) -> bool {
        let changed = match edit {
            SceneEdit::AddShape(shape) => {
                self.scene.add_shape(*shape);
                true
            }
            SceneEdit::RemoveShape { id } => self.scene.remove_shape(id).is_some(),
            SceneEdit::AddTransition { id, transition } => self.scene.add_transition(id, transition),
            SceneEdit::UpdateTransition {
                id,
                property,
                second,
                value,
                easing,
            } => self
                .scene
                .update_transition(id, &property, second, value, easing),
            SceneEdit::MoveTransition {
                id,
                property,
                from,
                to,
            } => self.scene.move_transition(id, &property, from, to),
            SceneEdit::RemoveTransition {
                id,
                property,
                second,
            } => self.scene.remove_transition(id, &property, second).is_some(),
            SceneEdit::ClearProperty { id, property } => self.scene.clear_property(id, &property),
            SceneEdit::MoveForward { id } => self.scene.move_forward(id),
            SceneEdit::MoveBackward { id } => self.scene.move_backward(id),
        };
        self.timeline_dirty |= changed;
        changed
    }

    /// The authoritative scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The playback timeline derived from the scene.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Replace repeat/direction/offset on both the scene and the clock.
    pub fn set_playback(&mut self, config: PlaybackConfig) {
        self.scene.playback = config;
        self.timeline.set_config(config);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.scene.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.scene.unsubscribe(id)
    }

    pub fn is_dirty(&self) -> bool {
        self.timeline_dirty
    }

    /// Recompute dirty shapes and re-synthesize their keyframe maps.
    /// Returns the ids whose sub-timelines were rebuilt.
    pub fn flush(&mut self) -> Vec<ShapeId> {
        if !self.timeline_dirty {
            return Vec::new();
        }
        self.timeline_dirty = false;
        let flushed = self.scene.flush();

        let stale: Vec<ShapeId> = self
            .timeline
            .shape_ids()
            .filter(|id| self.scene.shape(*id).is_none_or(|s| !s.has_transitions()))
            .collect();
        for id in stale {
            self.timeline.remove(id);
        }
        for &id in &flushed {
            self.sync_shape(id);
        }
        self.timeline.set_config(self.scene.playback);
        flushed
    }

    fn rebuild(&mut self) {
        self.scene.flush();
        let ids: Vec<ShapeId> = self.scene.shapes().iter().map(|s| s.id).collect();
        for id in ids {
            self.sync_shape(id);
        }
    }

    fn sync_shape(&mut self, id: ShapeId) {
        match self.scene.shape(id) {
            Some(shape) if shape.has_transitions() => {
                self.timeline
                    .set_shape(id, shape.kind, &to_anime(&shape.properties));
            }
            _ => {
                self.timeline.remove(id);
            }
        }
    }

    // ─── Clock ───────────────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.flush();
        self.timeline.play();
    }

    pub fn pause(&mut self) {
        self.timeline.pause();
    }

    pub fn tick(&mut self, dt_ms: f64, registry: &mut dyn ShapeRegistry) -> bool {
        self.flush();
        self.timeline.tick(dt_ms, registry)
    }

    pub fn seek(&mut self, seconds: f64, registry: &mut dyn ShapeRegistry) -> bool {
        self.flush();
        self.timeline.seek(seconds, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::AnimatedValue;
    use crate::live::LiveValue;
    use sa_core::kind::ShapeKind;
    use std::collections::{BTreeMap, HashMap};

    type Registry = HashMap<ShapeId, BTreeMap<String, LiveValue>>;

    fn preview_with_shape(name: &str) -> (Preview, ShapeId) {
        let mut preview = Preview::new(Scene::new());
        let id = ShapeId::intern(name);
        preview.apply_edit(SceneEdit::AddShape(Box::new(Shape::new(id, ShapeKind::Rect))));
        (preview, id)
    }

    #[test]
    fn edits_rebuild_on_flush() {
        let (mut preview, id) = preview_with_shape("pv_flush");
        for (second, value) in [(0.0, 0.0), (2.0, 40.0)] {
            preview.apply_edit(SceneEdit::AddTransition {
                id,
                transition: Transition::new("top", second, value),
            });
        }
        assert!(preview.is_dirty());
        assert_eq!(preview.timeline().total_duration(), 0.0);
        assert_eq!(preview.flush(), vec![id]);
        assert_eq!(preview.timeline().total_duration(), 2.0);
        assert!(preview.flush().is_empty());
    }

    #[test]
    fn seek_flushes_pending_edits() {
        let (mut preview, id) = preview_with_shape("pv_seek");
        preview.apply_edit(SceneEdit::AddTransition {
            id,
            transition: Transition::new("opacity", 1.0, 0.5),
        });
        let mut registry = Registry::new();
        assert!(preview.seek(0.0, &mut registry));
        let cache = preview.timeline().cache(id).unwrap();
        assert_eq!(cache["opacity"], AnimatedValue::Number(0.5));
    }

    #[test]
    fn removing_shape_drops_sub_timeline() {
        let (mut preview, id) = preview_with_shape("pv_remove");
        preview.apply_edit(SceneEdit::AddTransition {
            id,
            transition: Transition::new("left", 3.0, 1.0),
        });
        preview.flush();
        assert!(preview.timeline().contains(id));
        preview.apply_edit(SceneEdit::RemoveShape { id });
        preview.flush();
        assert!(!preview.timeline().contains(id));
        assert_eq!(preview.timeline().total_duration(), 0.0);
    }

    #[test]
    fn clearing_last_property_drops_sub_timeline() {
        let (mut preview, id) = preview_with_shape("pv_clear");
        preview.apply_edit(SceneEdit::AddTransition {
            id,
            transition: Transition::new("left", 1.0, 1.0),
        });
        preview.flush();
        assert!(preview.apply_edit(SceneEdit::ClearProperty {
            id,
            property: "left".into(),
        }));
        preview.flush();
        assert!(!preview.timeline().contains(id));
    }

    #[test]
    fn playback_reaches_scene_and_clock() {
        use sa_core::model::{Direction, PlaybackConfig, Repeat};

        let (mut preview, id) = preview_with_shape("pv_playback");
        let config = PlaybackConfig {
            repeat: Repeat::Infinite,
            direction: Direction::Alternate,
            offset: 25.0,
        };
        preview.set_playback(config);
        assert_eq!(preview.scene().playback, config);
        assert_eq!(*preview.timeline().config(), config);
        // a later flush keeps the new config
        preview.apply_edit(SceneEdit::AddTransition {
            id,
            transition: Transition::new("left", 1.0, 4.0),
        });
        assert_eq!(preview.flush(), vec![id]);
        assert_eq!(*preview.timeline().config(), config);
    }
}
