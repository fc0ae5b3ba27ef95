use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Viewport;

/// Default debounce window between raw size notifications and relayout.
pub const DEFAULT_DEBOUNCE_MS: f64 = 150.0;

/// Debounces viewport-size notifications into at most one relayout per
/// window.
///
/// Each `notify` cancels and replaces the pending deadline (timers never
/// stack); `poll` hands the coalesced viewport back once the window has
/// elapsed. Time is supplied by the caller, so scheduling stays
/// deterministic and testable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeCoordinator {
    debounce_ms: f64,
    pending: Option<(Viewport, f64)>,
}

impl ResizeCoordinator {
    #[must_use]
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            debounce_ms: debounce_ms.max(0.0),
            pending: None,
        }
    }

    /// Records a raw size change at `now_ms`, replacing any pending one.
    pub fn notify(&mut self, viewport: Viewport, now_ms: f64) {
        trace!(
            width = viewport.width,
            height = viewport.height,
            "resize notification"
        );
        self.pending = Some((viewport, now_ms + self.debounce_ms));
    }

    /// Returns the latest viewport once the debounce window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<Viewport> {
        match self.pending {
            Some((viewport, deadline)) if now_ms >= deadline => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
