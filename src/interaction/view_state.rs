use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::PointScale;

/// Recorded result of a one-shot trivia answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// User-driven selections orthogonal to the domain model.
///
/// Exactly one chart instance owns a `ViewState`. Every transition is a
/// pure function returning the next state; requests that would violate
/// an invariant (emptying the active set, re-answering a resolved
/// category) return the state unchanged rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    active_keys: IndexSet<String>,
    selected_index: Option<usize>,
    hovered_key: Option<String>,
    overlay_visible: bool,
    answers: IndexMap<String, AnswerOutcome>,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overlay_visible: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_active_keys(mut self, keys: IndexSet<String>) -> Self {
        self.active_keys = keys;
        self
    }

    #[must_use]
    pub fn with_selected_index(mut self, index: Option<usize>) -> Self {
        self.selected_index = index;
        self
    }

    #[must_use]
    pub fn active_keys(&self) -> &IndexSet<String> {
        &self.active_keys
    }

    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.active_keys.contains(key)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    #[must_use]
    pub fn hovered_key(&self) -> Option<&str> {
        self.hovered_key.as_deref()
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    #[must_use]
    pub fn answer_for(&self, category: &str) -> Option<AnswerOutcome> {
        self.answers.get(category).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Flips `key` in the active set.
    ///
    /// Removing the sole remaining active key is rejected as a no-op:
    /// at least one series stays visible while any exist. Unknown keys
    /// (not currently active) simply become active.
    #[must_use]
    pub fn toggle_key(&self, key: &str) -> Self {
        let mut next = self.clone();
        if next.active_keys.contains(key) {
            if next.active_keys.len() == 1 {
                trace!(key, "refused to empty active key set");
                return next;
            }
            next.active_keys.shift_remove(key);
        } else {
            next.active_keys.insert(key.to_owned());
        }
        next
    }

    /// Flips overlay visibility (e.g. world-event markers).
    #[must_use]
    pub fn toggle_overlay(&self) -> Self {
        let mut next = self.clone();
        next.overlay_visible = !next.overlay_visible;
        next
    }

    /// Sets or clears the hovered key.
    #[must_use]
    pub fn hover(&self, key: Option<&str>) -> Self {
        let mut next = self.clone();
        next.hovered_key = key.map(str::to_owned);
        next
    }

    /// Snaps the selection to the category nearest `pixel` on `scale`.
    ///
    /// Nearest-neighbor by absolute pixel distance, ties toward the
    /// lower index; the result always names a category present in the
    /// scale's domain.
    #[must_use]
    pub fn drag_to(&self, scale: &PointScale, pixel: f64) -> Self {
        let mut next = self.clone();
        if let Some(index) = scale.nearest_index(pixel) {
            next.selected_index = Some(index);
        }
        next
    }

    /// Clamped direct selection, for hosts mirroring an external control.
    #[must_use]
    pub fn select_index(&self, index: usize, len: usize) -> Self {
        let mut next = self.clone();
        if len > 0 {
            next.selected_index = Some(index.min(len - 1));
        }
        next
    }

    /// Records a one-shot answer against `category`.
    ///
    /// The first call resolves the category to `Correct` or `Incorrect`
    /// and locks it; later calls are rejected and leave the recorded
    /// outcome unchanged (`None` is returned as the transition outcome).
    #[must_use]
    pub fn answer(&self, category: &str, chosen: &str, correct: &str) -> (Self, Option<AnswerOutcome>) {
        if self.answers.contains_key(category) {
            trace!(category, "refused to re-answer resolved category");
            return (self.clone(), None);
        }

        let outcome = if chosen == correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        let mut next = self.clone();
        next.answers.insert(category.to_owned(), outcome);
        (next, Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;

    use super::{AnswerOutcome, ViewState};

    fn with_keys(keys: &[&str]) -> ViewState {
        let set: IndexSet<String> = keys.iter().map(|key| (*key).to_owned()).collect();
        ViewState::new().with_active_keys(set)
    }

    #[test]
    fn toggling_sole_active_key_is_a_no_op() {
        let state = with_keys(&["only"]);
        let next = state.toggle_key("only");
        assert_eq!(next.active_keys(), state.active_keys());
    }

    #[test]
    fn toggle_round_trip_restores_membership() {
        let state = with_keys(&["a", "b"]);
        let next = state.toggle_key("b").toggle_key("b");
        assert_eq!(next.active_keys(), state.active_keys());
    }

    #[test]
    fn overlay_double_toggle_is_identity() {
        let state = ViewState::new();
        let toggled = state.toggle_overlay();
        assert_ne!(toggled.overlay_visible(), state.overlay_visible());
        assert_eq!(
            toggled.toggle_overlay().overlay_visible(),
            state.overlay_visible()
        );
    }

    #[test]
    fn answer_is_one_shot() {
        let state = ViewState::new();
        let (answered, outcome) = state.answer("2019", "RPG", "FPS");
        assert_eq!(outcome, Some(AnswerOutcome::Incorrect));
        assert_eq!(answered.answer_for("2019"), Some(AnswerOutcome::Incorrect));

        let (again, outcome) = answered.answer("2019", "FPS", "FPS");
        assert_eq!(outcome, None);
        assert_eq!(again.answer_for("2019"), Some(AnswerOutcome::Incorrect));
    }
}
