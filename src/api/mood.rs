use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    DrawingArea, LinearScale, Margin, MoodEntry, PointScale, Row, Viewport, mood_balance,
};
use crate::error::ChartResult;
use crate::interaction::ViewState;
use crate::render::{Color, RenderFrame, Renderer, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::fmt::{format_percent, format_thousands};
use super::stacked::placeholder_frame;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout knobs for the radial mood widget: a half dial on top of a
/// scrubbable balance timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialMoodConfig {
    pub viewport: Viewport,
    pub dial_radius: f64,
    pub ring_width: f64,
    pub dial_height: f64,
    pub timeline_margin: Margin,
    pub handle_radius: f64,
    pub transition: TransitionSpec,
}

impl RadialMoodConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            dial_radius: 125.0,
            ring_width: 24.0,
            dial_height: 220.0,
            timeline_margin: Margin::new(18.0, 32.0, 40.0, 50.0),
            handle_radius: 6.0,
            transition: TransitionSpec::none(),
        }
    }
}

/// Per-year comfort/challenge shares for the selected entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub category: i64,
    pub comfort: f64,
    pub challenge: f64,
    pub total: f64,
    pub balance: f64,
    pub comfort_share: f64,
    pub challenge_share: f64,
}

impl MoodSummary {
    /// One-line host-facing summary, e.g.
    /// `Comfort 25% (20) • Challenge 75% (60)`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "Comfort {} ({}) \u{2022} Challenge {} ({})",
            format_percent(self.comfort_share),
            format_thousands(self.comfort),
            format_percent(self.challenge_share),
            format_thousands(self.challenge),
        )
    }
}

/// Half-dial balance indicator with a drag-to-scrub year timeline.
///
/// The dial angle maps balance `[-1, 1]` onto `[-π, 0]`; dragging the
/// scrub overlay snaps the selection to the nearest year.
pub struct RadialMoodIndicator<R: Renderer> {
    renderer: R,
    config: RadialMoodConfig,
    entries: Vec<MoodEntry>,
    state: ViewState,
    tree: SceneTree,
    status: InstanceStatus,
}

impl<R: Renderer> RadialMoodIndicator<R> {
    pub fn new(renderer: R, config: RadialMoodConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        Ok(Self {
            renderer,
            config,
            entries: Vec::new(),
            state: ViewState::new(),
            tree: SceneTree::new(),
            status: InstanceStatus::AwaitingData,
        })
    }

    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        self.entries = mood_balance(rows);
        debug!(entries = self.entries.len(), "mood data replaced");

        if self.entries.is_empty() {
            self.status = InstanceStatus::NoData;
            self.state = self.state.clone().with_selected_index(None);
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        // Clamp any previous selection into the new entry range.
        let index = self
            .state
            .selected_index()
            .unwrap_or(0)
            .min(self.entries.len() - 1);
        self.state = self.state.clone().with_selected_index(Some(index));
        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    /// Selects a year by its category label; unknown years are ignored.
    pub fn set_selection(&mut self, category: &str) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.category.to_string() == category)
        else {
            return Ok(());
        };
        if self.state.selected_index() == Some(index) {
            return Ok(());
        }
        self.state = self.state.select_index(index, self.entries.len());
        self.rebuild_scene()
    }

    /// Scrub handler: snaps the selection to the year nearest the given
    /// timeline-local pixel position.
    pub fn drag_to(&mut self, pixel: f64) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        let scale = self.year_scale()?;
        let (_, extent) = self.timeline_extent()?;
        let next = self.state.drag_to(&scale, pixel.clamp(0.0, extent));
        if next.selected_index() == self.state.selected_index() {
            self.state = next;
            return Ok(());
        }
        self.state = next;
        self.rebuild_scene()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.category.to_string())
            .collect()
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<String> {
        let index = self.state.selected_index()?;
        self.entries
            .get(index)
            .map(|entry| entry.category.to_string())
    }

    #[must_use]
    pub fn summary(&self) -> Option<MoodSummary> {
        let entry = self.entries.get(self.state.selected_index()?)?;
        Some(MoodSummary {
            category: entry.category,
            comfort: entry.comfort,
            challenge: entry.challenge,
            total: entry.total,
            balance: entry.balance,
            comfort_share: entry.comfort_share(),
            challenge_share: entry.challenge_share(),
        })
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
        WidgetSnapshot::new("radial-mood", self.status.clone())
            .with_categories(self.categories())
            .with_selection(self.current_selection())
            .with_node_count(self.tree.len())
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Dial angle for a balance value: `[-1, 1]` onto `[-π, 0]`.
    pub fn balance_angle(&self, balance: f64) -> ChartResult<f64> {
        LinearScale::new((-1.0, 1.0), (-PI, 0.0))?.position(balance.clamp(-1.0, 1.0))
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        match &self.status {
            InstanceStatus::Ready => paint_scene(&self.tree, self.config.viewport),
            status => Ok(placeholder_frame(self.config.viewport, status)),
        }
    }

    fn timeline_extent(&self) -> ChartResult<(DrawingArea, f64)> {
        let timeline_viewport = Viewport::new(
            self.config.viewport.width,
            (f64::from(self.config.viewport.height) - self.config.dial_height).max(1.0) as u32,
        );
        let area = DrawingArea::from_viewport(timeline_viewport, self.config.timeline_margin)?;
        Ok((area, area.width))
    }

    fn year_scale(&self) -> ChartResult<PointScale> {
        let (_, extent) = self.timeline_extent()?;
        PointScale::new(self.categories(), (0.0, extent), 0.5)
    }

    fn rebuild_scene(&mut self) -> ChartResult<()> {
        let Some(selected) = self.state.selected_index() else {
            return Ok(());
        };
        let entry = &self.entries[selected];

        let center_x = f64::from(self.config.viewport.width) / 2.0;
        let center_y = self.config.dial_radius + 24.0;
        let (area, _) = self.timeline_extent()?;
        let timeline_left = self.config.timeline_margin.left;
        let timeline_top = self.config.dial_height + self.config.timeline_margin.top;

        let years = self.year_scale()?;
        let balance_y = LinearScale::new((-1.0, 1.0), (area.height, 0.0))?;
        let zero_y = timeline_top + balance_y.position(0.0)?;

        let mut target = Vec::new();

        // Background halves paint first: challenge tint above the zero
        // line, comfort tint below.
        target.push(SceneNodeSpec::new(
            "background:above",
            NodeKind::Bar,
            Geometry::Rect {
                x: timeline_left,
                y: timeline_top,
                width: area.width,
                height: zero_y - timeline_top,
            },
            NodeStyle::filled(Color::rgb(0.992, 0.910, 0.910)),
        ));
        target.push(SceneNodeSpec::new(
            "background:below",
            NodeKind::Bar,
            Geometry::Rect {
                x: timeline_left,
                y: zero_y,
                width: area.width,
                height: (timeline_top + area.height - zero_y).max(0.0),
            },
            NodeStyle::filled(Color::rgb(0.910, 0.969, 0.910)),
        ));

        // Dial ring ticks at fixed balance stops.
        for stop in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let angle = self.balance_angle(stop)?;
            let inner = self.config.dial_radius - self.config.ring_width - 8.0;
            let outer = inner - 14.0;
            target.push(SceneNodeSpec::new(
                format!("tick:{stop}"),
                NodeKind::Line,
                Geometry::Polyline {
                    points: SmallVec::from_slice(&[
                        (center_x + angle.cos() * inner, center_y + angle.sin() * inner),
                        (center_x + angle.cos() * outer, center_y + angle.sin() * outer),
                    ]),
                },
                NodeStyle::filled(Color::rgb(0.35, 0.35, 0.35)).with_stroke_width(1.5),
            ));
        }

        for (key, offset, text) in [
            ("dial-label:comfort", -(self.config.dial_radius - 28.0), "Comfort"),
            ("dial-label:challenge", self.config.dial_radius - 28.0, "Challenge"),
        ] {
            target.push(
                SceneNodeSpec::new(
                    key,
                    NodeKind::Label,
                    Geometry::Anchor {
                        x: center_x + offset,
                        y: center_y + 36.0,
                    },
                    NodeStyle::filled(Color::rgb(0.2, 0.2, 0.2)),
                )
                .with_text(text),
            );
        }

        // Pointer tracks the selected entry's balance.
        let pointer_length = self.config.dial_radius - self.config.ring_width + 4.0;
        let angle = self.balance_angle(entry.balance)?;
        target.push(SceneNodeSpec::new(
            "pointer",
            NodeKind::Line,
            Geometry::Polyline {
                points: SmallVec::from_slice(&[
                    (center_x, center_y),
                    (
                        center_x + angle.cos() * pointer_length,
                        center_y + angle.sin() * pointer_length,
                    ),
                ]),
            },
            NodeStyle::filled(Color::rgb(0.12, 0.12, 0.12)).with_stroke_width(3.0),
        ));
        target.push(SceneNodeSpec::new(
            "pointer-cap",
            NodeKind::Point,
            Geometry::Circle {
                cx: center_x,
                cy: center_y,
                radius: 14.0,
            },
            NodeStyle::filled(Color::rgb(0.12, 0.12, 0.12)),
        ));

        target.push(SceneNodeSpec::new(
            "zero-line",
            NodeKind::Line,
            Geometry::Polyline {
                points: SmallVec::from_slice(&[
                    (timeline_left, zero_y),
                    (timeline_left + area.width, zero_y),
                ]),
            },
            NodeStyle::filled(Color::rgb(0.5, 0.5, 0.5)).with_stroke_width(1.0),
        ));

        let mut balance_points: SmallVec<[(f64, f64); 8]> = SmallVec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            balance_points.push((
                timeline_left + years.position_at(index),
                timeline_top + balance_y.position(entry.balance)?,
            ));
        }
        target.push(SceneNodeSpec::new(
            "balance-line",
            NodeKind::Line,
            Geometry::Polyline {
                points: balance_points,
            },
            NodeStyle::filled(Color::rgb(0.18, 0.32, 0.52)).with_stroke_width(2.0),
        ));

        for (index, entry) in self.entries.iter().enumerate() {
            let active = index == selected;
            target.push(
                SceneNodeSpec::new(
                    format!("point:{}", entry.category),
                    NodeKind::Point,
                    Geometry::Circle {
                        cx: timeline_left + years.position_at(index),
                        cy: timeline_top + balance_y.position(entry.balance)?,
                        radius: if active { 7.0 } else { 6.0 },
                    },
                    NodeStyle::filled(Color::rgb(0.18, 0.32, 0.52))
                        .with_opacity(if active { 1.0 } else { 0.75 }),
                )
                .with_data_ref(entry.category.to_string()),
            );
        }

        let handle_x = timeline_left + years.position_at(selected);
        target.push(SceneNodeSpec::new(
            "handle",
            NodeKind::Line,
            Geometry::Polyline {
                points: SmallVec::from_slice(&[
                    (handle_x, timeline_top),
                    (handle_x, timeline_top + area.height),
                ]),
            },
            NodeStyle::filled(Color::rgb(0.12, 0.12, 0.12)).with_stroke_width(1.5),
        ));
        target.push(SceneNodeSpec::new(
            "handle-dot",
            NodeKind::Point,
            Geometry::Circle {
                cx: handle_x,
                cy: timeline_top + balance_y.position(entry.balance)?,
                radius: self.config.handle_radius,
            },
            NodeStyle::filled(Color::rgb(0.12, 0.12, 0.12)),
        ));

        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}
