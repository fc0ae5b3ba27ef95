use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Categorical palette of ten hues, applied in order.
pub const CATEGORICAL_PALETTE: [Color; 10] = [
    Color::rgb(0.306, 0.475, 0.655),
    Color::rgb(0.949, 0.557, 0.169),
    Color::rgb(0.882, 0.341, 0.349),
    Color::rgb(0.463, 0.718, 0.698),
    Color::rgb(0.349, 0.631, 0.310),
    Color::rgb(0.929, 0.788, 0.282),
    Color::rgb(0.690, 0.478, 0.631),
    Color::rgb(1.000, 0.616, 0.655),
    Color::rgb(0.608, 0.459, 0.369),
    Color::rgb(0.729, 0.690, 0.675),
];

/// Ordinal color assignment cached by key.
///
/// Keys receive palette slots in first-seen order and keep them for the
/// registry's lifetime, so a series never changes hue across re-renders
/// or active-set churn. Assignment is append-only; re-asking for a known
/// key is a pure lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorRegistry {
    assigned: IndexMap<String, usize>,
}

impl ColorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key's color, assigning the next palette slot on first use.
    pub fn color_for(&mut self, key: &str) -> Color {
        let next_slot = self.assigned.len() % CATEGORICAL_PALETTE.len();
        let slot = *self
            .assigned
            .entry(key.to_owned())
            .or_insert(next_slot);
        CATEGORICAL_PALETTE[slot % CATEGORICAL_PALETTE.len()]
    }

    /// Lookup without assignment, for render paths that must not mutate.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Color> {
        self.assigned
            .get(key)
            .map(|slot| CATEGORICAL_PALETTE[*slot % CATEGORICAL_PALETTE.len()])
    }

    #[must_use]
    pub fn assigned_keys(&self) -> impl Iterator<Item = &str> {
        self.assigned.keys().map(String::as_str)
    }
}
