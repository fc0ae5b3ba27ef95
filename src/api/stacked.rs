use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    BandScale, ColorRegistry, ColumnSpec, DrawingArea, LinearScale, Margin, Row, Viewport,
    stack_by_category,
};
use crate::core::frames::CategoryFrame;
use crate::error::ChartResult;
use crate::interaction::ViewState;
use crate::render::{Color, RenderFrame, Renderer, TextHAlign, TextPrimitive, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::fmt::format_thousands;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout and timing knobs for the stacked composition widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedConfig {
    pub viewport: Viewport,
    pub margin: Margin,
    pub bar_height: f64,
    pub band_padding: f64,
    pub label_offset: f64,
    pub legend_column_width: f64,
    pub legend_row_height: f64,
    pub swatch_size: f64,
    pub transition: TransitionSpec,
    pub columns: ColumnSpec,
}

impl StackedConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: Margin::new(48.0, 32.0, 48.0, 48.0),
            bar_height: 48.0,
            band_padding: 0.4,
            label_offset: 32.0,
            legend_column_width: 160.0,
            legend_row_height: 28.0,
            swatch_size: 16.0,
            transition: TransitionSpec::new(600.0),
            columns: ColumnSpec::default(),
        }
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.transition = self.transition.with_reduced_motion(reduced_motion);
        self
    }
}

/// One horizontal composition bar per selected category, with segment
/// subtotals and a column-flow legend.
///
/// Segment identity is the segment key, so switching categories morphs
/// each key's slice instead of rebuilding the bar.
pub struct StackedCompositionChart<R: Renderer> {
    renderer: R,
    config: StackedConfig,
    frames: Vec<CategoryFrame>,
    state: ViewState,
    tree: SceneTree,
    colors: ColorRegistry,
    status: InstanceStatus,
}

impl<R: Renderer> StackedCompositionChart<R> {
    pub fn new(renderer: R, config: StackedConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        Ok(Self {
            renderer,
            config,
            frames: Vec::new(),
            state: ViewState::new(),
            tree: SceneTree::new(),
            colors: ColorRegistry::new(),
            status: InstanceStatus::AwaitingData,
        })
    }

    /// Replaces the domain model, keeping the selected category when it
    /// survives the reload.
    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        let previous_category = self.current_selection().map(str::to_owned);
        self.frames = stack_by_category(rows, &self.config.columns);
        debug!(frames = self.frames.len(), "stacked data replaced");

        if self.frames.is_empty() {
            self.status = InstanceStatus::NoData;
            self.state = self.state.clone().with_selected_index(None);
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        let index = previous_category
            .and_then(|category| self.index_of(&category))
            .unwrap_or(0);
        self.state = self.state.clone().with_selected_index(Some(index));
        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    /// Selects a category by name; unknown categories are ignored.
    pub fn set_selection(&mut self, category: &str) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        let Some(index) = self.index_of(category) else {
            return Ok(());
        };
        if self.state.selected_index() == Some(index) {
            return Ok(());
        }
        self.state = self.state.select_index(index, self.frames.len());
        self.rebuild_scene()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| frame.category().to_owned())
            .collect()
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<&str> {
        let index = self.state.selected_index()?;
        self.frames.get(index).map(CategoryFrame::category)
    }

    /// The selected frame's reported total.
    #[must_use]
    pub fn current_total(&self) -> Option<f64> {
        let index = self.state.selected_index()?;
        self.frames.get(index).map(CategoryFrame::total)
    }

    #[must_use]
    pub fn status(&self) -> &InstanceStatus {
        &self.status
    }

    /// Marks the external row source as failed; terminal for this
    /// instance.
    pub fn mark_load_failed(&mut self, message: impl Into<String>) {
        self.status = InstanceStatus::Failed {
            message: message.into(),
        };
    }

    #[must_use]
    pub fn scene(&self) -> &SceneTree {
        &self.tree
    }

    /// Advances in-flight transitions by an explicit delta.
    pub fn advance(&mut self, delta_ms: f64) {
        self.tree.advance(delta_ms);
    }

    /// Relayouts for a new viewport without re-wrangling data.
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
        WidgetSnapshot::new("stacked-composition", self.status.clone())
            .with_categories(self.categories())
            .with_selection(self.current_selection().map(str::to_owned))
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

    fn index_of(&self, category: &str) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| frame.category() == category)
    }

    fn rebuild_scene(&mut self) -> ChartResult<()> {
        let Some(index) = self.state.selected_index() else {
            return Ok(());
        };
        let frame = &self.frames[index];
        let area = DrawingArea::from_viewport(self.config.viewport, self.config.margin)?;
        let left = self.config.margin.left;
        let top = self.config.margin.top;

        let x = LinearScale::for_values(Some(frame.total()), 1.0, (0.0, area.width))?;
        let band = BandScale::new(
            vec![frame.category().to_owned()],
            (0.0, self.config.bar_height),
            self.config.band_padding,
        )?;
        let band_y = band
            .position_of(frame.category())
            .unwrap_or(0.0);
        let bandwidth = band.bandwidth();

        let mut colors = self.colors.clone();
        let mut target = Vec::with_capacity(frame.segments().len() * 3 + 1);

        target.push(
            SceneNodeSpec::new(
                "total",
                NodeKind::Label,
                Geometry::Anchor {
                    x: left + area.width,
                    y: (top - 12.0).max(0.0),
                },
                NodeStyle::filled(Color::rgb(0.1, 0.1, 0.1)),
            )
            .with_text(format!("Total: {}", format_thousands(frame.total()))),
        );

        for segment in frame.segments() {
            let color = colors.color_for(&segment.key);
            let start_px = x.position(segment.cumulative_start)?;
            let end_px = x.position(segment.cumulative_end)?;
            target.push(
                SceneNodeSpec::new(
                    segment.key.clone(),
                    NodeKind::Bar,
                    Geometry::Rect {
                        x: left + start_px,
                        y: top + band_y,
                        width: (end_px - start_px).max(0.0),
                        height: bandwidth,
                    },
                    NodeStyle::filled(color),
                )
                .with_data_ref(format!("{}-{}", frame.category(), segment.key)),
            );
        }

        for segment in frame.segments() {
            let center = x.position(segment.cumulative_start + segment.value / 2.0)?;
            target.push(
                SceneNodeSpec::new(
                    format!("label:{}", segment.key),
                    NodeKind::Label,
                    Geometry::Anchor {
                        x: left + center,
                        y: top + self.config.bar_height + self.config.label_offset / 2.0,
                    },
                    NodeStyle::filled(Color::rgb(0.2, 0.2, 0.2)),
                )
                .with_text(format_thousands(segment.value)),
            );
        }

        let columns = ((area.width / self.config.legend_column_width).floor() as usize).max(1);
        let column_spacing = area.width / columns as f64;
        let legend_top = top + self.config.bar_height + self.config.label_offset;
        for (position, segment) in frame.segments().iter().enumerate() {
            let color = colors.color_for(&segment.key);
            let column = position % columns;
            let row = position / columns;
            target.push(
                SceneNodeSpec::new(
                    format!("legend:{}", segment.key),
                    NodeKind::LegendItem,
                    Geometry::Rect {
                        x: left + column as f64 * column_spacing,
                        y: legend_top + row as f64 * self.config.legend_row_height,
                        width: self.config.swatch_size,
                        height: self.config.swatch_size,
                    },
                    NodeStyle::filled(color),
                )
                .with_text(segment.key.clone()),
            );
        }

        self.colors = colors;
        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}

/// Fallback frame for placeholder and failure states.
pub(super) fn placeholder_frame(viewport: Viewport, status: &InstanceStatus) -> RenderFrame {
    let message = match status {
        InstanceStatus::AwaitingData => "Loading data…",
        InstanceStatus::NoData => "No data available.",
        InstanceStatus::Failed { message } => message.as_str(),
        InstanceStatus::Ready => "",
    };
    let mut frame = RenderFrame::new(viewport);
    if !message.is_empty() {
        frame.texts.push(TextPrimitive::new(
            message,
            f64::from(viewport.width) / 2.0,
            f64::from(viewport.height) / 2.0,
            14.0,
            Color::rgb(0.45, 0.45, 0.45),
            TextHAlign::Center,
        ));
    }
    frame
}
