use serde::{Deserialize, Serialize};

/// Resolved top-left corner for a tooltip box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
}

/// Places a tooltip near an anchor, clamped inside the container.
///
/// The box prefers sitting right of and above the anchor (10 px over,
/// 10 px up); whatever the anchor position, the resulting bounding box
/// never crosses a container edge. A box larger than the container pins
/// to the top-left corner.
#[must_use]
pub fn clamp_tooltip(
    anchor: (f64, f64),
    box_size: (f64, f64),
    container: (f64, f64),
) -> TooltipPlacement {
    let preferred_x = anchor.0 + 10.0;
    let preferred_y = anchor.1 - 10.0 - box_size.1;

    let max_x = (container.0 - box_size.0).max(0.0);
    let max_y = (container.1 - box_size.1).max(0.0);

    TooltipPlacement {
        x: preferred_x.clamp(0.0, max_x),
        y: preferred_y.clamp(0.0, max_y),
    }
}
