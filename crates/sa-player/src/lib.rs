pub mod interpolate;
pub mod live;
pub mod preview;
pub mod timeline;

pub use interpolate::{AnimatedValue, interpolate};
pub use live::{AnimationCache, LiveShape, LiveValue, ShapeRegistry, apply_cache};
pub use preview::{Preview, SceneEdit};
pub use timeline::Timeline;
