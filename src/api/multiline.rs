use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    ColorRegistry, ColumnSpec, DrawingArea, EventMarker, LANE_SPACING_PX, LinearScale, Margin,
    Row, Series, Viewport, pack_lanes, series_by_key,
};
use crate::error::ChartResult;
use crate::interaction::{TooltipPlacement, ViewState, clamp_tooltip};
use crate::render::{RenderFrame, Renderer, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::stacked::placeholder_frame;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout knobs for the multi-series line widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLineConfig {
    pub viewport: Viewport,
    pub margin: Margin,
    /// Inclusive category window applied while wrangling.
    pub window: Option<(i64, i64)>,
    /// Headroom multiplier over the visible maximum value.
    pub value_padding_factor: f64,
    pub legend_row_height: f64,
    pub marker_radius: f64,
    pub transition: TransitionSpec,
    pub columns: ColumnSpec,
}

impl MultiLineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: Margin::new(40.0, 40.0, 60.0, 70.0),
            window: Some((2010, 2023)),
            value_padding_factor: 1.1,
            legend_row_height: 15.0,
            marker_radius: 5.0,
            transition: TransitionSpec::none(),
            columns: ColumnSpec::default(),
        }
    }
}

/// Label used for the all-series selection.
pub const ALL_SERIES: &str = "All";

/// One line per series key with a legend and optional baseline event
/// markers. Selection narrows the drawn set to a single key; the value
/// axis re-fits the visible maximum.
pub struct MultiSeriesLineChart<R: Renderer> {
    renderer: R,
    config: MultiLineConfig,
    series: Vec<Series>,
    events: Vec<EventMarker>,
    state: ViewState,
    tree: SceneTree,
    colors: ColorRegistry,
    status: InstanceStatus,
    selected: Option<String>,
}

impl<R: Renderer> MultiSeriesLineChart<R> {
    pub fn new(renderer: R, config: MultiLineConfig) -> ChartResult<Self> {
        config.viewport.validate()?;
        Ok(Self {
            renderer,
            config,
            series: Vec::new(),
            events: Vec::new(),
            state: ViewState::new(),
            tree: SceneTree::new(),
            colors: ColorRegistry::new(),
            status: InstanceStatus::AwaitingData,
            selected: None,
        })
    }

    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        self.series = series_by_key(rows, &self.config.columns, self.config.window);
        debug!(series = self.series.len(), "line data replaced");

        if self.series.is_empty() {
            self.status = InstanceStatus::NoData;
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        // A selection that no longer exists falls back to the full set.
        if let Some(selected) = &self.selected
            && !self.series.iter().any(|series| series.key() == selected)
        {
            self.selected = None;
        }
        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    /// Attaches point-in-time markers drawn along the baseline.
    pub fn set_events(&mut self, entries: &[(f64, String, Option<String>)]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }
        self.events = pack_lanes(entries);
        if self.status.is_interactive() {
            self.rebuild_scene()?;
        }
        Ok(())
    }

    /// Narrows the drawn set to `category`, or restores every series
    /// with [`ALL_SERIES`]. Unknown keys are ignored.
    pub fn set_selection(&mut self, category: &str) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        let next = if category == ALL_SERIES {
            None
        } else if self.series.iter().any(|series| series.key() == category) {
            Some(category.to_owned())
        } else {
            return Ok(());
        };
        if next == self.selected {
            return Ok(());
        }
        self.selected = next;
        self.rebuild_scene()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.series
            .iter()
            .map(|series| series.key().to_owned())
            .collect()
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Sets or clears marker hover; returns the clamped tooltip
    /// placement for the hovered marker, if any.
    pub fn hover_event(
        &mut self,
        key: Option<&str>,
        box_size: (f64, f64),
    ) -> ChartResult<Option<TooltipPlacement>> {
        if !self.status.is_interactive() {
            return Ok(None);
        }
        self.state = self.state.hover(key);
        self.rebuild_scene()?;

        let Some(key) = self.state.hovered_key() else {
            return Ok(None);
        };
        let Some(node) = self.tree.get(key) else {
            return Ok(None);
        };
        let &Geometry::Circle { cx, cy, .. } = node.target_geometry() else {
            return Ok(None);
        };
        Ok(Some(clamp_tooltip(
            (cx, cy),
            box_size,
            (
                f64::from(self.config.viewport.width),
                f64::from(self.config.viewport.height),
            ),
        )))
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
        WidgetSnapshot::new("multi-series-line", self.status.clone())
            .with_categories(self.categories())
            .with_selection(self.selected.clone())
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

    fn visible_series(&self) -> Vec<&Series> {
        self.series
            .iter()
            .filter(|series| {
                self.selected
                    .as_deref()
                    .is_none_or(|selected| series.key() == selected)
            })
            .collect()
    }

    fn rebuild_scene(&mut self) -> ChartResult<()> {
        let area = DrawingArea::from_viewport(self.config.viewport, self.config.margin)?;
        let left = self.config.margin.left;
        let top = self.config.margin.top;

        let visible = self.visible_series();
        let xs: Vec<f64> = visible
            .iter()
            .flat_map(|series| series.points().iter().map(|point| point.x))
            .chain(self.events.iter().map(|event| event.x))
            .collect();
        let x = LinearScale::for_span(&xs, (0.0, area.width))?;

        let max_visible = visible
            .iter()
            .filter_map(|series| series.max_y())
            .fold(None, |acc: Option<f64>, value| {
                Some(acc.map_or(value, |max| max.max(value)))
            });
        let y = LinearScale::for_values(
            max_visible,
            self.config.value_padding_factor,
            (area.height, 0.0),
        )?;

        let mut colors = self.colors.clone();
        let mut target = Vec::new();

        for series in &visible {
            let color = colors.color_for(series.key());
            let mut points: SmallVec<[(f64, f64); 8]> = SmallVec::new();
            for point in series.points() {
                points.push((left + x.position(point.x)?, top + y.position(point.y)?));
            }
            target.push(
                SceneNodeSpec::new(
                    series.key().to_owned(),
                    NodeKind::Line,
                    Geometry::Polyline { points },
                    NodeStyle::filled(color).with_stroke_width(2.0),
                )
                .with_data_ref(series.key().to_owned()),
            );
        }

        for (row, series) in visible.iter().enumerate() {
            let color = colors.color_for(series.key());
            target.push(
                SceneNodeSpec::new(
                    format!("legend:{}", series.key()),
                    NodeKind::LegendItem,
                    Geometry::Rect {
                        x: left + 20.0,
                        y: top + 10.0 + row as f64 * self.config.legend_row_height,
                        width: 6.0,
                        height: 6.0,
                    },
                    NodeStyle::filled(color),
                )
                .with_text(series.key().to_owned()),
            );
        }

        let baseline = top + area.height;
        for event in &self.events {
            let key = format!("event:{}:{}", event.x, event.title);
            let hovered = self.state.hovered_key() == Some(key.as_str());
            let radius = if hovered {
                self.config.marker_radius * 1.4
            } else {
                self.config.marker_radius
            };
            let cy = baseline - f64::from(event.lane) * LANE_SPACING_PX;
            target.push(
                SceneNodeSpec::new(
                    key,
                    NodeKind::Point,
                    Geometry::Circle {
                        cx: left + x.position(event.x)?,
                        cy,
                        radius,
                    },
                    NodeStyle::filled(crate::render::Color::rgb(0.2, 0.2, 0.2)),
                )
                .with_data_ref(event.title.clone()),
            );
        }

        self.colors = colors;
        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}
