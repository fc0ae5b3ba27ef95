mod node;
mod reconcile;
mod transition;

pub use node::{Geometry, NodeKind, NodeStyle, SceneNodeSpec};
pub use reconcile::{DiffSummary, NodePhase, SceneNode, SceneTree};
pub use transition::{TransitionSpec, Tween};
