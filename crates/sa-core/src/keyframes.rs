//! Keyframe map: the playback engine's view of a shape's properties.
//!
//! Stored transitions carry absolute seconds; the engine consumes relative
//! durations. Each property becomes an ordered list of
//! `{easing, duration, value}` where `duration` is the gap in milliseconds
//! since the previous keyframe.

use crate::easing::Easing;
use crate::model::{Property, TransitionValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeKeyframe {
    pub easing: Easing,
    /// Milliseconds since the previous keyframe.
    pub duration: f64,
    pub value: TransitionValue,
}

/// Property id → keyframes.
pub type KeyframeMap = BTreeMap<String, Vec<AnimeKeyframe>>;

/// Build the keyframe map for a shape's properties.
///
/// A property whose earliest keyframe is not at 0 gets a synthesized leading
/// keyframe at 0 (same value and easing), so playback always starts from a
/// defined state. Stored transitions are not touched. An empty property maps
/// to an empty list.
pub fn to_anime(properties: &[Property]) -> KeyframeMap {
    properties
        .iter()
        .map(|property| (property.id.clone(), property_keyframes(property)))
        .collect()
}

fn property_keyframes(property: &Property) -> Vec<AnimeKeyframe> {
    let Some(first) = property.first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(property.len() + 1);
    let mut previous = 0.0;
    if first.second != 0.0 {
        out.push(AnimeKeyframe {
            easing: first.easing,
            duration: 0.0,
            value: first.value.clone(),
        });
    }
    for transition in &property.transitions {
        out.push(AnimeKeyframe {
            easing: transition.easing,
            duration: (transition.second - previous) * 1000.0,
            value: transition.value.clone(),
        });
        previous = transition.second;
    }
    out
}

/// Total length of one property's keyframes in milliseconds.
pub fn track_duration(keyframes: &[AnimeKeyframe]) -> f64 {
    keyframes.iter().map(|k| k.duration).sum()
}

/// Longest track of a keyframe map in milliseconds.
pub fn map_duration(map: &KeyframeMap) -> f64 {
    map.values()
        .map(|k| track_duration(k))
        .fold(0.0, f64::max)
}
