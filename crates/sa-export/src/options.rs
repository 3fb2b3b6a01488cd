//! Exporter configuration.

use sa_core::model::{Direction, Repeat, Scene};
use serde::{Deserialize, Serialize};

/// Options shared by the CSS and SMIL exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Written onto the root `<svg>` when set.
    pub preserve_aspect_ratio: Option<String>,
    pub repeat: Repeat,
    /// Length of one iteration in seconds. Keyframe percentages and
    /// `keyTimes` are relative to it.
    pub total_duration: f64,
    /// Embedded in the generator comment.
    pub version: String,
    /// CSS only; SMIL has no reverse playback.
    pub direction: Direction,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            preserve_aspect_ratio: None,
            repeat: Repeat::default(),
            total_duration: 0.0,
            version: env!("CARGO_PKG_VERSION").to_string(),
            direction: Direction::default(),
        }
    }
}

impl ExportOptions {
    /// Options matching a scene: its playback settings and total duration.
    pub fn for_scene(scene: &Scene) -> Self {
        Self {
            repeat: scene.playback.repeat,
            direction: scene.playback.direction,
            total_duration: scene.total_duration(),
            ..Self::default()
        }
    }

    pub fn with_total_duration(mut self, seconds: f64) -> Self {
        self.total_duration = seconds;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_preserve_aspect_ratio(mut self, value: &str) -> Self {
        self.preserve_aspect_ratio = Some(value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{"totalDuration": 4, "repeat": "infinity", "preserveAspectRatio": "xMidYMid meet"}"#;
        let options: ExportOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.total_duration, 4.0);
        assert_eq!(options.repeat, Repeat::Infinite);
        assert_eq!(options.preserve_aspect_ratio.as_deref(), Some("xMidYMid meet"));
        assert_eq!(options.direction, Direction::Normal);
        assert_eq!(options.version, env!("CARGO_PKG_VERSION"));
    }
}
