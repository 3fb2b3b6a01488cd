//! WASM bridge for SVG Animator — exposes the timeline model, live preview
//! and exporters to the browser editor.
//!
//! Compiled via `wasm-pack build --target web`. Structured results cross the
//! boundary as JSON strings: `{"ok":true,…}` or `{"ok":false,"error":"…"}`.

mod live;

use live::JsRegistry;
use sa_core::easing::Easing;
use sa_core::id::ShapeId;
use sa_core::model::{AnimationDescriptor, PlaybackConfig, Scene, Shape, Transition, TransitionValue};
use sa_export::{ExportMode, ExportOptions};
use sa_player::{Preview, SceneEdit};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

/// The editor-facing animation controller.
///
/// Owns the scene, its preview timeline and the registry of live canvas
/// objects. Every edit from the timeline panel goes through this struct.
#[wasm_bindgen]
pub struct Animator {
    preview: Preview,
    live: JsRegistry,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Animator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            preview: Preview::new(Scene::new()),
            live: JsRegistry::default(),
        }
    }

    // ─── Scene I/O ───────────────────────────────────────────────────────

    /// Replace the scene with a saved one. Live shapes stay registered.
    /// Returns `true` on success.
    pub fn load_scene(&mut self, json: &str) -> bool {
        match Preview::from_json(json) {
            Ok(preview) => {
                self.preview = preview;
                true
            }
            Err(err) => {
                log::warn!("invalid scene JSON: {err}");
                false
            }
        }
    }

    /// Serialize the scene, `{"ok":true,"scene":{…}}`.
    pub fn save_scene(&mut self) -> String {
        self.preview.flush();
        match self.preview.scene().to_json() {
            Ok(scene) => format!(r#"{{"ok":true,"scene":{scene}}}"#),
            Err(err) => error_json(err),
        }
    }

    /// Exporter input for the current scene, as a JSON array.
    pub fn animation_list(&mut self) -> String {
        self.preview.flush();
        serde_json::to_string(&self.preview.scene().animation_list()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn total_duration(&mut self) -> f64 {
        self.preview.flush();
        self.preview.scene().total_duration()
    }

    // ─── Live shapes ─────────────────────────────────────────────────────

    /// Attach the canvas object animated for shape `id`.
    pub fn register_shape(&mut self, id: &str, target: js_sys::Object) {
        self.live.insert(ShapeId::intern(id), target);
    }

    pub fn unregister_shape(&mut self, id: &str) -> bool {
        self.live.remove(ShapeId::intern(id))
    }

    pub fn live_shape_count(&self) -> usize {
        self.live.len()
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Add (or replace) a shape from its JSON form.
    pub fn add_shape(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Shape>(json) {
            Ok(shape) => self.preview.apply_edit(SceneEdit::AddShape(Box::new(shape))),
            Err(err) => {
                log::warn!("invalid shape JSON: {err}");
                false
            }
        }
    }

    pub fn remove_shape(&mut self, id: &str) -> bool {
        self.preview.apply_edit(SceneEdit::RemoveShape {
            id: ShapeId::intern(id),
        })
    }

    /// Insert a keyframe from its JSON form (`{"property","second","value","easing"}`).
    pub fn add_transition(&mut self, id: &str, json: &str) -> bool {
        match serde_json::from_str::<Transition>(json) {
            Ok(transition) => self.preview.apply_edit(SceneEdit::AddTransition {
                id: ShapeId::intern(id),
                transition,
            }),
            Err(err) => {
                log::warn!("invalid transition JSON: {err}");
                false
            }
        }
    }

    /// Edit a keyframe. An empty `value_json` or `easing` leaves that field
    /// alone.
    pub fn update_transition(
        &mut self,
        id: &str,
        property: &str,
        second: f64,
        value_json: &str,
        easing: &str,
    ) -> bool {
        let value = match optional_value(value_json) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("invalid transition value: {err}");
                return false;
            }
        };
        let easing = (!easing.trim().is_empty()).then(|| Easing::from_name(easing));
        self.preview.apply_edit(SceneEdit::UpdateTransition {
            id: ShapeId::intern(id),
            property: property.to_string(),
            second,
            value,
            easing,
        })
    }

    pub fn move_transition(&mut self, id: &str, property: &str, from: f64, to: f64) -> bool {
        self.preview.apply_edit(SceneEdit::MoveTransition {
            id: ShapeId::intern(id),
            property: property.to_string(),
            from,
            to,
        })
    }

    pub fn remove_transition(&mut self, id: &str, property: &str, second: f64) -> bool {
        self.preview.apply_edit(SceneEdit::RemoveTransition {
            id: ShapeId::intern(id),
            property: property.to_string(),
            second,
        })
    }

    pub fn clear_property(&mut self, id: &str, property: &str) -> bool {
        self.preview.apply_edit(SceneEdit::ClearProperty {
            id: ShapeId::intern(id),
            property: property.to_string(),
        })
    }

    pub fn move_forward(&mut self, id: &str) -> bool {
        self.preview.apply_edit(SceneEdit::MoveForward {
            id: ShapeId::intern(id),
        })
    }

    pub fn move_backward(&mut self, id: &str) -> bool {
        self.preview.apply_edit(SceneEdit::MoveBackward {
            id: ShapeId::intern(id),
        })
    }

    /// Set repeat/direction/offset from `{"repeat","direction","offset"}`.
    pub fn set_playback(&mut self, json: &str) -> bool {
        match serde_json::from_str::<PlaybackConfig>(json) {
            Ok(config) => {
                self.preview.set_playback(config);
                true
            }
            Err(err) => {
                log::warn!("invalid playback JSON: {err}");
                false
            }
        }
    }

    /// Call `callback(eventJson)` on every scene change. Returns the
    /// subscription id for [`Animator::off_change`].
    pub fn on_change(&mut self, callback: js_sys::Function) -> f64 {
        let id = self.preview.subscribe(move |event| {
            let Ok(json) = serde_json::to_string(event) else {
                return;
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("change listener threw: {err:?}");
            }
        });
        id as f64
    }

    pub fn off_change(&mut self, id: f64) -> bool {
        self.preview.unsubscribe(id as u64)
    }

    // ─── Playback ────────────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.preview.play();
    }

    pub fn pause(&mut self) {
        self.preview.pause();
    }

    pub fn is_playing(&self) -> bool {
        self.preview.timeline().is_playing()
    }

    /// Advance by one animation frame. Returns `true` while still playing.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.preview.tick(dt_ms, &mut self.live)
    }

    /// Scrub to `seconds`. Ignored (returns `false`) while playing.
    pub fn seek(&mut self, seconds: f64) -> bool {
        self.preview.seek(seconds, &mut self.live)
    }

    pub fn current_time(&self) -> f64 {
        self.preview.timeline().current_time()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Export the scene over `svg` (the canvas's static SVG).
    /// `mode` is `"css"` or `"smil"`; `options_json` may be empty.
    pub fn export(&mut self, svg: &str, mode: &str, options_json: &str) -> String {
        self.preview.flush();
        let scene = self.preview.scene();
        export_json(svg, mode, &scene.animation_list(), || {
            scene_options(scene, options_json)
        })
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(message: &str);
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                console_error(&format!("SVG Animator WASM panic: {info}"));
            }));
        });
    }
}

// ─── Standalone functions (no animator needed) ───────────────────────────

/// Render an animated SVG from a static SVG, an animation list and export
/// options, all as JSON. Returns `{"ok":true,"svg":"…"}` or
/// `{"ok":false,"error":"…"}`.
#[wasm_bindgen]
pub fn render_animated_svg(svg: &str, mode: &str, animations_json: &str, options_json: &str) -> String {
    let animations: Vec<AnimationDescriptor> = match serde_json::from_str(animations_json) {
        Ok(list) => list,
        Err(err) => return error_json(format!("invalid animation list: {err}")),
    };
    export_json(svg, mode, &animations, || {
        if options_json.trim().is_empty() {
            Ok(ExportOptions::default())
        } else {
            serde_json::from_str(options_json).map_err(|e| format!("invalid export options: {e}"))
        }
    })
}

/// Every easing name the editor can offer, as a JSON array.
#[wasm_bindgen]
pub fn easing_names() -> String {
    let names: Vec<String> = Easing::all().map(|e| e.name()).collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}

fn export_json(
    svg: &str,
    mode: &str,
    animations: &[AnimationDescriptor],
    options: impl FnOnce() -> Result<ExportOptions, String>,
) -> String {
    let mode: ExportMode = match mode.parse() {
        Ok(mode) => mode,
        Err(err) => return error_json(err),
    };
    let options = match options() {
        Ok(options) => options,
        Err(err) => return error_json(err),
    };
    match mode.render(svg, animations, &options) {
        Ok(svg) => json!({ "ok": true, "svg": svg }).to_string(),
        Err(err) => error_json(err),
    }
}

/// Scene-derived options, overridden field by field by `options_json`.
fn scene_options(scene: &Scene, options_json: &str) -> Result<ExportOptions, String> {
    let base = ExportOptions::for_scene(scene);
    if options_json.trim().is_empty() {
        return Ok(base);
    }
    let overrides: Value =
        serde_json::from_str(options_json).map_err(|e| format!("invalid export options: {e}"))?;
    let mut merged = serde_json::to_value(&base).map_err(|e| e.to_string())?;
    if let (Value::Object(merged), Value::Object(overrides)) = (&mut merged, overrides) {
        merged.extend(overrides);
    }
    serde_json::from_value(merged).map_err(|e| format!("invalid export options: {e}"))
}

fn optional_value(json: &str) -> Result<Option<TransitionValue>, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(json).map(Some)
}

fn error_json(err: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": err.to_string() }).to_string()
}
