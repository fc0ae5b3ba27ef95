use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    CategoryWinner, ColumnSpec, DrawingArea, Margin, PointScale, Row, Viewport,
    arg_max_by_category,
};
use crate::error::ChartResult;
use crate::interaction::{AnswerOutcome, ViewState};
use crate::render::{Color, RenderFrame, Renderer, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::stacked::placeholder_frame;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout knobs for the trivia timeline widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaConfig {
    pub viewport: Viewport,
    pub margin: Margin,
    pub dot_radius: f64,
    pub connector_gap: f64,
    pub option_count: usize,
    pub transition: TransitionSpec,
    pub columns: ColumnSpec,
}

impl TriviaConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: Margin::new(40.0, 24.0, 48.0, 24.0),
            dot_radius: 16.0,
            connector_gap: 2.0,
            option_count: 4,
            transition: TransitionSpec::new(300.0),
            columns: ColumnSpec::default(),
        }
    }
}

/// One posed question: a category and its shuffled answer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub category: String,
    pub options: Vec<String>,
}

/// Guess-the-winner mini-game over a dot timeline.
///
/// Each category holds its arg-max winner; asking a category yields a
/// deterministic option set (the winner plus rotating distractors), and
/// answering resolves the category exactly once.
pub struct TriviaTimeline<R: Renderer> {
    renderer: R,
    config: TriviaConfig,
    winners: Vec<CategoryWinner>,
    genres: Vec<String>,
    state: ViewState,
    tree: SceneTree,
    status: InstanceStatus,
    current: Option<usize>,
}

impl<R: Renderer> TriviaTimeline<R> {
    pub fn new(renderer: R, config: TriviaConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        Ok(Self {
            renderer,
            config,
            winners: Vec::new(),
            genres: Vec::new(),
            state: ViewState::new(),
            tree: SceneTree::new(),
            status: InstanceStatus::AwaitingData,
            current: None,
        })
    }

    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        self.winners = arg_max_by_category(rows, &self.config.columns);
        let mut genres: Vec<String> = self
            .winners
            .iter()
            .map(|winner| winner.key.clone())
            .collect();
        genres.sort();
        genres.dedup();
        self.genres = genres;
        self.current = None;
        debug!(
            categories = self.winners.len(),
            genres = self.genres.len(),
            "trivia data replaced"
        );

        if self.winners.is_empty() {
            self.status = InstanceStatus::NoData;
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.winners
            .iter()
            .map(|winner| winner.category.to_string())
            .collect()
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<String> {
        self.current
            .and_then(|index| self.winners.get(index))
            .map(|winner| winner.category.to_string())
    }

    /// Poses the question for a category.
    ///
    /// Options hold the winner plus rotating distractors drawn from the
    /// other winners' genres; both the distractor window and the
    /// winner's slot are keyed off the category index, so an identical
    /// dataset always produces identical option lists.
    pub fn ask(&mut self, category: &str) -> ChartResult<Option<TriviaQuestion>> {
        if !self.status.is_interactive() {
            return Ok(None);
        }
        let Some(index) = self
            .winners
            .iter()
            .position(|winner| winner.category.to_string() == category)
        else {
            return Ok(None);
        };
        self.current = Some(index);

        let correct = self.winners[index].key.clone();
        let distractors: Vec<&String> = self
            .genres
            .iter()
            .filter(|genre| **genre != correct)
            .collect();

        let wanted = self.config.option_count.max(1);
        let mut options: Vec<String> = Vec::with_capacity(wanted);
        if distractors.is_empty() {
            options.push(correct);
        } else {
            for offset in 0..(wanted - 1).min(distractors.len()) {
                options.push(distractors[(index + offset) % distractors.len()].clone());
            }
            let slot = index % (options.len() + 1);
            options.insert(slot, correct);
        }

        Ok(Some(TriviaQuestion {
            category: category.to_owned(),
            options,
        }))
    }

    /// Resolves the currently asked category with the chosen option.
    ///
    /// The first answer locks the category permanently; re-answering a
    /// resolved category returns `None` and changes nothing.
    pub fn answer(&mut self, chosen: &str) -> ChartResult<Option<AnswerOutcome>> {
        if !self.status.is_interactive() {
            return Ok(None);
        }
        let Some(index) = self.current else {
            return Ok(None);
        };
        let winner = &self.winners[index];
        let category = winner.category.to_string();

        let (next, outcome) = self.state.answer(&category, chosen, &winner.key);
        if outcome.is_none() {
            return Ok(None);
        }
        self.state = next;
        self.rebuild_scene()?;
        Ok(outcome)
    }

    #[must_use]
    pub fn outcome_for(&self, category: &str) -> Option<AnswerOutcome> {
        self.state.answer_for(category)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.state.answered_count()
    }

    /// Hint text for a category: the stored hint column when present,
    /// otherwise a generated first-letter/word-count fallback.
    #[must_use]
    pub fn hint(&self, category: &str) -> Option<String> {
        let winner = self
            .winners
            .iter()
            .find(|winner| winner.category.to_string() == category)?;
        Some(
            winner
                .hint
                .clone()
                .unwrap_or_else(|| fallback_hint(&winner.key)),
        )
    }

    #[must_use]
    pub fn status(&self) -> &InstanceStatus {
        &self.status
    }

    pub fn mark_load_failed(&mut self, message: impl Into<String>) {
        self.status = InstanceStatus::Failed {
            message: message.into(),
        };
    }

    #[must_use]
    pub fn scene(&self) -> &SceneTree {
        &self.tree
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.tree.advance(delta_ms);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        viewport.validate()?;
        self.config.viewport = viewport;
        if self.status.is_interactive() {
            self.rebuild_scene()?;
        }
        Ok(())
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    /// Diagnostics summary for host logging.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot::new("trivia-timeline", self.status.clone())
            .with_categories(self.categories())
            .with_selection(self.current_selection())
            .with_answered(self.answered_count())
            .with_node_count(self.tree.len())
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        match &self.status {
            InstanceStatus::Ready => paint_scene(&self.tree, self.config.viewport),
            status => Ok(placeholder_frame(self.config.viewport, status)),
        }
    }

    fn rebuild_scene(&mut self) -> ChartResult<()> {
        let area = DrawingArea::from_viewport(self.config.viewport, self.config.margin)?;
        let left = self.config.margin.left;
        let mid_y = self.config.margin.top + area.height / 2.0;

        let scale = PointScale::new(self.categories(), (0.0, area.width), 0.5)?;

        let mut target = Vec::new();

        target.push(SceneNodeSpec::new(
            "axis",
            NodeKind::Line,
            Geometry::Polyline {
                points: SmallVec::from_slice(&[(left, mid_y), (left + area.width, mid_y)]),
            },
            NodeStyle::filled(Color::rgb(0.6, 0.6, 0.6)).with_stroke_width(1.0),
        ));

        // Connector segments between neighboring dots, shortened by the
        // dot radius on both sides.
        for (index, winner) in self.winners.iter().enumerate().skip(1) {
            let previous_x = left + scale.position_at(index - 1);
            let current_x = left + scale.position_at(index);
            let offset = self.config.dot_radius + self.config.connector_gap;
            target.push(SceneNodeSpec::new(
                format!("connector:{}", winner.category),
                NodeKind::Line,
                Geometry::Polyline {
                    points: SmallVec::from_slice(&[
                        (previous_x + offset, mid_y),
                        (current_x - offset, mid_y),
                    ]),
                },
                NodeStyle::filled(Color::rgb(0.4, 0.4, 0.4))
                    .with_stroke_width(1.0)
                    .with_opacity(0.6),
            ));
        }

        for (index, winner) in self.winners.iter().enumerate() {
            let category = winner.category.to_string();
            let x = left + scale.position_at(index);
            let fill = match self.state.answer_for(&category) {
                Some(AnswerOutcome::Correct) => Color::rgb(0.22, 0.60, 0.31),
                Some(AnswerOutcome::Incorrect) => Color::rgb(0.80, 0.25, 0.25),
                None => Color::rgb(0.35, 0.40, 0.48),
            };
            target.push(
                SceneNodeSpec::new(
                    format!("dot:{category}"),
                    NodeKind::Point,
                    Geometry::Circle {
                        cx: x,
                        cy: mid_y,
                        radius: self.config.dot_radius / 2.0,
                    },
                    NodeStyle::filled(fill),
                )
                .with_data_ref(category.clone()),
            );
            target.push(
                SceneNodeSpec::new(
                    format!("year:{category}"),
                    NodeKind::Label,
                    Geometry::Anchor {
                        x,
                        y: mid_y + 38.0,
                    },
                    NodeStyle::filled(Color::rgb(0.2, 0.2, 0.2)),
                )
                .with_text(category.clone()),
            );
            if self.state.answer_for(&category).is_none() {
                target.push(
                    SceneNodeSpec::new(
                        format!("qmark:{category}"),
                        NodeKind::Label,
                        Geometry::Anchor {
                            x,
                            y: mid_y - 22.0,
                        },
                        NodeStyle::filled(Color::rgb(0.35, 0.40, 0.48)),
                    )
                    .with_text("?"),
                );
            }
        }

        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}

/// Shape-of-the-word hint used when no hint column was supplied.
fn fallback_hint(genre: &str) -> String {
    let first = genre
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_owned());
    if genre.split_whitespace().count() > 1 {
        format!("Two or more words; starts with \"{first}\".")
    } else {
        format!(
            "Starts with \"{first}\" and has {} letters.",
            genre.chars().count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_hint;

    #[test]
    fn fallback_hint_describes_single_words() {
        assert_eq!(fallback_hint("rpg"), "Starts with \"R\" and has 3 letters.");
    }

    #[test]
    fn fallback_hint_flags_multi_word_genres() {
        assert_eq!(
            fallback_hint("battle royale"),
            "Two or more words; starts with \"B\"."
        );
    }
}
