pub mod color;
pub mod easing;
pub mod events;
pub mod gradient;
pub mod id;
pub mod keyframes;
pub mod kind;
pub mod math;
pub mod model;

pub use color::{Rgba, split_color_opacity};
pub use easing::{Curve, Easing};
pub use events::{ChangeEvent, Entity, EventBus, SubscriptionId};
pub use gradient::{Gradient, GradientCache, GradientKind, is_gradient, parse_gradient, serialize_gradient};
pub use id::ShapeId;
pub use keyframes::{AnimeKeyframe, KeyframeMap, to_anime};
pub use kind::{Origin, ShapeKind, calc_transform_by_origin};
pub use math::{Decomposition, compose, decompose};
pub use model::*;

// Re-export kurbo's matrix type so downstream crates share one geometry stack
pub use kurbo::Affine;
