use serde::{Deserialize, Serialize};

/// Timing contract for one reconcile pass.
///
/// `reduced_motion` is a hard override: when set, every duration
/// collapses to zero and nodes snap to their target state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub duration_ms: f64,
    pub reduced_motion: bool,
}

impl TransitionSpec {
    #[must_use]
    pub const fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            reduced_motion: false,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::new(0.0)
    }

    #[must_use]
    pub const fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    #[must_use]
    pub fn effective_duration_ms(self) -> f64 {
        if self.reduced_motion {
            0.0
        } else {
            self.duration_ms.max(0.0)
        }
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Progress of one node's interpolation, advanced by explicit deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    duration_ms: f64,
    elapsed_ms: f64,
}

impl Tween {
    #[must_use]
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.duration_ms);
        }
    }

    #[must_use]
    pub fn is_done(self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Eased progress in `[0, 1]` (cubic out).
    #[must_use]
    pub fn progress(self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let linear = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        ease_cubic_out(linear)
    }
}

fn ease_cubic_out(t: f64) -> f64 {
    let inverted = 1.0 - t;
    1.0 - inverted * inverted * inverted
}
