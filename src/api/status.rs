use serde::{Deserialize, Serialize};

/// Lifecycle of one chart instance.
///
/// Failure is terminal and per-instance: a failed widget renders its
/// fallback message, ignores interaction, and never retries, while
/// sibling instances keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// Constructed, first data not yet supplied.
    AwaitingData,
    Ready,
    /// Wrangling produced zero usable rows; a placeholder is rendered.
    NoData,
    Failed {
        message: String,
    },
}

impl InstanceStatus {
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
