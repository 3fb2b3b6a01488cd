//! The global playback timeline.
//!
//! One [`Timeline`] holds a sub-timeline per animated shape, all anchored at
//! offset 0. The clock is advanced by an external frame scheduler through
//! [`Timeline::tick`], or positioned directly by [`Timeline::seek`] while
//! paused (scrubbing). Both paths sample every track into the per-shape
//! animation cache and run the update callback.

use crate::interpolate::{AnimatedValue, interpolate};
use crate::live::{AnimationCache, ShapeRegistry, apply_cache};
use sa_core::easing::Easing;
use sa_core::gradient::GradientCache;
use sa_core::id::ShapeId;
use sa_core::keyframes::KeyframeMap;
use sa_core::kind::ShapeKind;
use sa_core::model::{Direction, PlaybackConfig, Repeat, TransitionValue};
use smallvec::SmallVec;
use std::collections::HashMap;

/// A keyframe positioned on the absolute clock.
#[derive(Debug, Clone, PartialEq)]
struct Sample {
    at_ms: f64,
    easing: Easing,
    value: TransitionValue,
}

/// One property's keyframes on the absolute clock.
#[derive(Debug, Clone, PartialEq)]
struct Track {
    property: String,
    samples: SmallVec<[Sample; 4]>,
}

impl Track {
    fn from_keyframes(property: &str, keyframes: &[sa_core::AnimeKeyframe]) -> Self {
        let mut at_ms = 0.0;
        let samples = keyframes
            .iter()
            .map(|k| {
                at_ms += k.duration;
                Sample {
                    at_ms,
                    easing: k.easing,
                    value: k.value.clone(),
                }
            })
            .collect();
        Self {
            property: property.to_string(),
            samples,
        }
    }

    fn duration_ms(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.at_ms)
    }

    /// Value at `time_ms`. The easing of the destination keyframe drives
    /// each segment.
    fn sample(&self, time_ms: f64, gradients: &mut GradientCache) -> Option<AnimatedValue> {
        let first = self.samples.first()?;
        if time_ms <= first.at_ms || self.samples.len() == 1 {
            return Some(AnimatedValue::classify(&first.value, gradients));
        }
        let Some(idx) = self.samples.iter().position(|s| s.at_ms > time_ms) else {
            let last = self.samples.last()?;
            return Some(AnimatedValue::classify(&last.value, gradients));
        };
        let from = &self.samples[idx - 1];
        let to = &self.samples[idx];
        let span = to.at_ms - from.at_ms;
        let progress = if span > 0.0 {
            (time_ms - from.at_ms) / span
        } else {
            1.0
        };
        Some(interpolate(
            &from.value,
            &to.value,
            to.easing.apply(progress),
            gradients,
        ))
    }
}

#[derive(Debug, Clone)]
struct SubTimeline {
    id: ShapeId,
    kind: ShapeKind,
    tracks: Vec<Track>,
}

impl SubTimeline {
    fn duration_ms(&self) -> f64 {
        self.tracks.iter().map(Track::duration_ms).fold(0.0, f64::max)
    }
}

/// Playback state for the whole scene.
#[derive(Debug, Default)]
pub struct Timeline {
    subs: Vec<SubTimeline>,
    caches: HashMap<ShapeId, AnimationCache>,
    gradients: GradientCache,
    config: PlaybackConfig,
    /// Elapsed play time across all iterations, in ms.
    clock_ms: f64,
    /// Position inside the current iteration, in seconds.
    current_time: f64,
    playing: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    // ─── Sub-timelines ───────────────────────────────────────────────────

    /// Add or replace a shape's sub-timeline.
    pub fn set_shape(&mut self, id: ShapeId, kind: ShapeKind, keyframes: &KeyframeMap) {
        let tracks: Vec<Track> = keyframes
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(property, keys)| Track::from_keyframes(property, keys))
            .collect();
        log::trace!("timeline: {id} with {} tracks", tracks.len());
        let sub = SubTimeline { id, kind, tracks };
        match self.subs.iter_mut().find(|s| s.id == id) {
            Some(existing) => *existing = sub,
            None => self.subs.push(sub),
        }
    }

    /// Drop a shape's sub-timeline. An empty timeline resets to 0.
    pub fn remove(&mut self, id: ShapeId) -> bool {
        let before = self.subs.len();
        self.subs.retain(|s| s.id != id);
        self.caches.remove(&id);
        if self.subs.is_empty() {
            self.clock_ms = 0.0;
            self.current_time = 0.0;
        }
        self.subs.len() != before
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.subs.iter().any(|s| s.id == id)
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.subs.iter().map(|s| s.id)
    }

    // ─── Clock ───────────────────────────────────────────────────────────

    /// Longest sub-timeline, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.total_ms() / 1000.0
    }

    fn total_ms(&self) -> f64 {
        self.subs.iter().map(SubTimeline::duration_ms).fold(0.0, f64::max)
    }

    /// Position inside the current iteration, in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start or resume. A finished run restarts from the beginning.
    pub fn play(&mut self) {
        if self.finished() {
            self.clock_ms = 0.0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    fn finished(&self) -> bool {
        match self.config.repeat {
            Repeat::Count(n) => self.clock_ms >= self.total_ms() * f64::from(n.max(1)),
            Repeat::Infinite => false,
        }
    }

    /// Advance the clock by `dt_ms` while playing, sample every track and
    /// run the update callback. Returns false when paused.
    pub fn tick(&mut self, dt_ms: f64, registry: &mut dyn ShapeRegistry) -> bool {
        if !self.playing {
            return false;
        }
        self.clock_ms += dt_ms.max(0.0);
        let total = self.total_ms();
        let position = if total <= 0.0 {
            self.playing = false;
            0.0
        } else {
            let iterations = match self.config.repeat {
                Repeat::Count(n) => Some(f64::from(n.max(1))),
                Repeat::Infinite => None,
            };
            let (iteration, local) = match iterations {
                Some(n) if self.clock_ms >= total * n => {
                    self.playing = false;
                    self.clock_ms = total * n;
                    (n - 1.0, total)
                }
                _ => {
                    let iteration = (self.clock_ms / total).floor();
                    (iteration, self.clock_ms - iteration * total)
                }
            };
            self.directed(iteration, local, total)
        };
        self.render(position, registry);
        true
    }

    fn directed(&self, iteration: f64, local: f64, total: f64) -> f64 {
        match self.config.direction {
            Direction::Normal => local,
            Direction::Reverse => total - local,
            Direction::Alternate if iteration % 2.0 == 1.0 => total - local,
            Direction::Alternate => local,
        }
    }

    /// Scrub to `seconds`. Ignored while playing.
    pub fn seek(&mut self, seconds: f64, registry: &mut dyn ShapeRegistry) -> bool {
        if self.playing {
            log::trace!("seek ignored while playing");
            return false;
        }
        let position = (seconds * 1000.0).clamp(0.0, self.total_ms());
        self.clock_ms = position;
        self.render(position, registry);
        true
    }

    /// Sample every sub-timeline at `position_ms`, refresh the caches and
    /// push them onto the live shapes.
    fn render(&mut self, position_ms: f64, registry: &mut dyn ShapeRegistry) {
        self.current_time = position_ms / 1000.0;
        for sub in &self.subs {
            let cache = self.caches.entry(sub.id).or_default();
            for track in &sub.tracks {
                if let Some(value) = track.sample(position_ms, &mut self.gradients) {
                    cache.insert(track.property.clone(), value);
                }
            }
            match registry.live_shape(sub.id) {
                Some(live) => apply_cache(live, sub.kind, cache),
                None => log::trace!("no live shape for {}", sub.id),
            }
        }
    }

    /// The last sampled values of a shape.
    pub fn cache(&self, id: ShapeId) -> Option<&AnimationCache> {
        self.caches.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::LiveValue;
    use sa_core::keyframes::to_anime;
    use sa_core::model::{Property, Transition};
    use std::collections::BTreeMap;

    type Registry = HashMap<ShapeId, BTreeMap<String, LiveValue>>;

    fn timeline_with(id: &str, keys: &[(f64, f64)]) -> (Timeline, ShapeId) {
        let id = ShapeId::intern(id);
        let mut property = Property::new("left");
        for (second, value) in keys {
            property.upsert(Transition::new("left", *second, *value));
        }
        let mut timeline = Timeline::new();
        timeline.set_shape(id, ShapeKind::Rect, &to_anime(&[property]));
        (timeline, id)
    }

    fn left(timeline: &Timeline, id: ShapeId) -> Option<AnimatedValue> {
        timeline.cache(id).and_then(|c| c.get("left")).cloned()
    }

    #[test]
    fn total_duration_is_longest_track() {
        let (timeline, _) = timeline_with("tl_total", &[(1.0, 0.0), (2.5, 10.0)]);
        assert_eq!(timeline.total_duration(), 2.5);
    }

    #[test]
    fn seek_samples_between_keyframes() {
        let (mut timeline, id) = timeline_with("tl_seek", &[(0.0, 10.0), (2.0, 50.0)]);
        let mut registry = Registry::new();
        registry.insert(id, BTreeMap::new());
        assert!(timeline.seek(1.0, &mut registry));
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(30.0)));
        assert_eq!(registry[&id]["left"], LiveValue::Number(30.0));
        assert_eq!(timeline.current_time(), 1.0);
    }

    #[test]
    fn seek_is_ignored_while_playing() {
        let (mut timeline, _) = timeline_with("tl_playing", &[(0.0, 0.0), (1.0, 1.0)]);
        timeline.play();
        assert!(!timeline.seek(0.5, &mut Registry::new()));
    }

    #[test]
    fn tick_advances_and_stops_at_end() {
        let (mut timeline, id) = timeline_with("tl_tick", &[(0.0, 0.0), (1.0, 100.0)]);
        let mut registry = Registry::new();
        assert!(!timeline.tick(16.0, &mut registry));
        timeline.play();
        assert!(timeline.tick(250.0, &mut registry));
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(25.0)));
        timeline.tick(5000.0, &mut registry);
        assert!(!timeline.is_playing());
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(100.0)));
    }

    #[test]
    fn alternate_runs_backwards_on_odd_iterations() {
        let (mut timeline, id) = timeline_with("tl_alt", &[(0.0, 0.0), (1.0, 100.0)]);
        timeline.set_config(PlaybackConfig {
            repeat: Repeat::Infinite,
            direction: Direction::Alternate,
            offset: 0.0,
        });
        let mut registry = Registry::new();
        timeline.play();
        timeline.tick(1250.0, &mut registry);
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(75.0)));
        assert!(timeline.is_playing());
    }

    #[test]
    fn remove_last_shape_resets_duration() {
        let (mut timeline, id) = timeline_with("tl_remove", &[(0.0, 0.0), (3.0, 1.0)]);
        assert!(timeline.remove(id));
        assert!(!timeline.remove(id));
        assert_eq!(timeline.total_duration(), 0.0);
        assert!(timeline.cache(id).is_none());
    }

    #[test]
    fn missing_live_shape_is_silent() {
        let (mut timeline, id) = timeline_with("tl_missing", &[(0.0, 1.0), (1.0, 2.0)]);
        assert!(timeline.seek(1.0, &mut Registry::new()));
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(2.0)));
    }

    #[test]
    fn destination_easing_drives_segment() {
        let id = ShapeId::intern("tl_ease");
        let mut property = Property::new("left");
        property.upsert(Transition::new("left", 0.0, 0.0));
        property.upsert(
            Transition::new("left", 1.0, 100.0).with_easing(Easing::from_name("easeInQuad")),
        );
        let mut timeline = Timeline::new();
        timeline.set_shape(id, ShapeKind::Rect, &to_anime(&[property]));
        timeline.seek(0.5, &mut Registry::new());
        assert_eq!(left(&timeline, id), Some(AnimatedValue::Number(25.0)));
    }
}
