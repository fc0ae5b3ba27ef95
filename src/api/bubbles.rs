use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    BubbleDatum, DrawingArea, Margin, PackedCircle, Row, Viewport, bubble_data, pack_circles,
};
use crate::error::ChartResult;
use crate::interaction::{TooltipPlacement, ViewState, clamp_tooltip};
use crate::render::{Color, RenderFrame, Renderer, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::stacked::placeholder_frame;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout knobs for the bubble pack widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubblePackConfig {
    pub viewport: Viewport,
    pub margin: Margin,
    pub fill: Color,
    /// Exact column holding the bubble name.
    pub name_column: String,
    /// Fragment matched against headers to find the value column.
    pub value_fragment: String,
    pub transition: TransitionSpec,
}

impl BubblePackConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: Margin::new(24.0, 24.0, 24.0, 24.0),
            fill: Color::rgb(0.569, 0.275, 1.0),
            name_column: "game".to_owned(),
            value_fragment: "change watch time".to_owned(),
            transition: TransitionSpec::none(),
        }
    }
}

/// Flat circle pack of value-weighted bubbles with hover emphasis.
///
/// Bubble identity is the name, so data refreshes morph the shared
/// entries rather than rebuilding the pack.
pub struct BubblePackChart<R: Renderer> {
    renderer: R,
    config: BubblePackConfig,
    data: Vec<BubbleDatum>,
    packed: Vec<PackedCircle>,
    state: ViewState,
    tree: SceneTree,
    status: InstanceStatus,
}

impl<R: Renderer> BubblePackChart<R> {
    pub fn new(renderer: R, config: BubblePackConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        Ok(Self {
            renderer,
            config,
            data: Vec::new(),
            packed: Vec::new(),
            state: ViewState::new(),
            tree: SceneTree::new(),
            status: InstanceStatus::AwaitingData,
        })
    }

    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        self.data = bubble_data(rows, &self.config.name_column, &self.config.value_fragment);
        debug!(bubbles = self.data.len(), "bubble data replaced");

        if self.data.is_empty() {
            self.status = InstanceStatus::NoData;
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    /// Names of the packed bubbles, largest first.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.packed
            .iter()
            .map(|circle| circle.name.clone())
            .collect()
    }

    /// Sets or clears bubble hover; returns the clamped tooltip
    /// placement for the hovered bubble, if any.
    pub fn hover(
        &mut self,
        name: Option<&str>,
        box_size: (f64, f64),
    ) -> ChartResult<Option<TooltipPlacement>> {
        if !self.status.is_interactive() {
            return Ok(None);
        }
        self.state = self.state.hover(name);
        self.rebuild_scene()?;

        let Some(name) = self.state.hovered_key() else {
            return Ok(None);
        };
        let Some(circle) = self.packed.iter().find(|circle| circle.name == name) else {
            return Ok(None);
        };
        Ok(Some(clamp_tooltip(
            (
                self.config.margin.left + circle.x,
                self.config.margin.top + circle.y,
            ),
            box_size,
            (
                f64::from(self.config.viewport.width),
                f64::from(self.config.viewport.height),
            ),
        )))
    }

    /// The bubble whose packed circle contains the given pixel, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        let local_x = x - self.config.margin.left;
        let local_y = y - self.config.margin.top;
        // Later entries pack on top of earlier (larger) ones, so scan
        // smallest-first for the tightest hit.
        self.packed
            .iter()
            .rev()
            .find(|circle| {
                let dx = circle.x - local_x;
                let dy = circle.y - local_y;
                dx * dx + dy * dy <= circle.radius * circle.radius
            })
            .map(|circle| circle.name.as_str())
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
        WidgetSnapshot::new("bubble-pack", self.status.clone())
            .with_categories(self.categories())
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
        self.packed = pack_circles(&self.data, area);

        let mut target = Vec::with_capacity(self.packed.len());
        for circle in &self.packed {
            let hovered = self.state.hovered_key() == Some(circle.name.as_str());
            let style = NodeStyle::filled(self.config.fill)
                .with_opacity(if hovered { 1.0 } else { 0.7 })
                .with_stroke_width(if hovered { 3.0 } else { 2.0 });
            target.push(
                SceneNodeSpec::new(
                    circle.name.clone(),
                    NodeKind::Point,
                    Geometry::Circle {
                        cx: self.config.margin.left + circle.x,
                        cy: self.config.margin.top + circle.y,
                        radius: circle.radius,
                    },
                    style,
                )
                .with_data_ref(circle.name.clone()),
            );
        }

        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}
