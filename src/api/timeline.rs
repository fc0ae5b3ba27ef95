use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    ColorRegistry, ColumnSpec, DrawingArea, EventMarker, LANE_SPACING_PX, LinearScale, Margin,
    Row, Series, Viewport, carry_over_active_keys, pack_lanes, series_by_key,
};
use crate::error::ChartResult;
use crate::interaction::{TooltipPlacement, ViewState, clamp_tooltip};
use crate::render::{Color, RenderFrame, Renderer, paint_scene};
use crate::scene::{Geometry, NodeKind, NodeStyle, SceneNodeSpec, SceneTree, TransitionSpec};

use super::stacked::placeholder_frame;
use super::status::InstanceStatus;
use super::snapshot::WidgetSnapshot;

/// Layout knobs for the categorical timeline widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub viewport: Viewport,
    pub margin: Margin,
    pub value_padding_factor: f64,
    pub marker_radius: f64,
    pub transition: TransitionSpec,
    pub columns: ColumnSpec,
}

impl TimelineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: Margin::new(48.0, 56.0, 88.0, 64.0),
            value_padding_factor: 1.1,
            marker_radius: 7.5,
            transition: TransitionSpec::none(),
            columns: ColumnSpec::default(),
        }
    }
}

/// Series lines with toggleable keys plus a lane-packed overlay of
/// world-event markers.
///
/// The active-key set survives data replacement by intersection with
/// the incoming key set, refilling with every key when the intersection
/// comes up empty. Toggling the last active key off is refused.
pub struct CategoricalTimeline<R: Renderer> {
    renderer: R,
    config: TimelineConfig,
    series: Vec<Series>,
    events: Vec<EventMarker>,
    state: ViewState,
    tree: SceneTree,
    colors: ColorRegistry,
    status: InstanceStatus,
}

impl<R: Renderer> CategoricalTimeline<R> {
    pub fn new(renderer: R, config: TimelineConfig) -> ChartResult<Self> {
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
        })
    }

    pub fn set_data(&mut self, rows: &[Row]) -> ChartResult<()> {
        if self.status.is_failed() {
            return Ok(());
        }

        self.series = series_by_key(rows, &self.config.columns, None);
        let keys: Vec<String> = self
            .series
            .iter()
            .map(|series| series.key().to_owned())
            .collect();
        debug!(series = keys.len(), "timeline data replaced");

        let carried = carry_over_active_keys(self.state.active_keys(), &keys);
        self.state = self.state.clone().with_active_keys(carried);

        if self.series.is_empty() && self.events.is_empty() {
            self.status = InstanceStatus::NoData;
            self.tree.reconcile(Vec::new(), TransitionSpec::none())?;
            return Ok(());
        }

        self.status = InstanceStatus::Ready;
        self.rebuild_scene()
    }

    /// Attaches world-event markers, lane-packed per co-incident year.
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

    /// Toggles a series key. Unknown keys and the sole remaining active
    /// key are no-ops; active-set changes re-resolve scales before the
    /// reconcile pass.
    pub fn toggle_key(&mut self, key: &str) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        if !self.series.iter().any(|series| series.key() == key) {
            return Ok(());
        }
        let next = self.state.toggle_key(key);
        if next == self.state {
            return Ok(());
        }
        self.state = next;
        self.rebuild_scene()
    }

    /// Shows/hides the event-marker overlay. Hover emphasis on markers
    /// is suppressed while hidden.
    pub fn toggle_overlay(&mut self) -> ChartResult<()> {
        if !self.status.is_interactive() {
            return Ok(());
        }
        self.state = self.state.toggle_overlay();
        if !self.state.overlay_visible() {
            self.state = self.state.hover(None);
        }
        self.rebuild_scene()
    }

    /// Sets or clears marker hover. Ignored while the overlay is
    /// hidden; returns the clamped tooltip placement when hovering.
    pub fn hover_event(
        &mut self,
        key: Option<&str>,
        box_size: (f64, f64),
    ) -> ChartResult<Option<TooltipPlacement>> {
        if !self.status.is_interactive() || !self.state.overlay_visible() {
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
    pub fn categories(&self) -> Vec<String> {
        self.series
            .iter()
            .map(|series| series.key().to_owned())
            .collect()
    }

    #[must_use]
    pub fn active_keys(&self) -> Vec<String> {
        self.state.active_keys().iter().cloned().collect()
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.state.overlay_visible()
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
        WidgetSnapshot::new("categorical-timeline", self.status.clone())
            .with_categories(self.categories())
            .with_active_keys(self.active_keys())
            .with_node_count(self.tree.len())
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Distinct axis years across series and events, ascending, with
    /// degenerate domains widened: empty becomes `{0, 1}` and a single
    /// year gains synthetic neighbors on both sides.
    #[must_use]
    pub fn axis_years(&self) -> Vec<f64> {
        let mut years: Vec<f64> = self
            .series
            .iter()
            .flat_map(|series| series.points().iter().map(|point| point.x))
            .chain(self.events.iter().map(|event| event.x))
            .collect();
        years.sort_by(f64::total_cmp);
        years.dedup();

        match years.as_slice() {
            [] => vec![0.0, 1.0],
            [only] => vec![only - 1.0, *only, only + 1.0],
            _ => years,
        }
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
        let top = self.config.margin.top;

        let years = self.axis_years();
        let x = LinearScale::for_span(&years, (0.0, area.width))?;

        // The value domain covers every series, not just the active
        // ones, so toggling keys does not rescale survivors.
        let max_value = self
            .series
            .iter()
            .filter_map(Series::max_y)
            .fold(None, |acc: Option<f64>, value| {
                Some(acc.map_or(value, |max| max.max(value)))
            });
        let y = LinearScale::for_values(
            max_value,
            self.config.value_padding_factor,
            (area.height, 0.0),
        )?;

        let mut colors = self.colors.clone();
        let mut target = Vec::new();

        for series in &self.series {
            if !self.state.is_active(series.key()) {
                continue;
            }
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
                    NodeStyle::filled(color).with_stroke_width(2.4),
                )
                .with_data_ref(series.key().to_owned()),
            );
        }

        if self.state.overlay_visible() {
            let baseline = top + area.height;
            for event in &self.events {
                let key = format!("{}-{}", event.x, event.title);
                let hovered = self.state.hovered_key() == Some(key.as_str());
                let radius = if hovered {
                    self.config.marker_radius * 1.2
                } else {
                    self.config.marker_radius
                };
                let fill = if hovered {
                    Color::rgb(0.086, 0.227, 0.42)
                } else {
                    Color::rgb(0.043, 0.122, 0.227)
                };
                target.push(
                    SceneNodeSpec::new(
                        key,
                        NodeKind::Point,
                        Geometry::Circle {
                            cx: left + x.position(event.x)?,
                            cy: baseline - f64::from(event.lane) * LANE_SPACING_PX,
                            radius,
                        },
                        NodeStyle::filled(fill),
                    )
                    .with_data_ref(event.title.clone()),
                );
            }
        }

        // Legend rows cover every known key; inactive ones stay visible
        // at reduced opacity so they remain clickable targets.
        for (row, series) in self.series.iter().enumerate() {
            let color = colors.color_for(series.key());
            let opacity = if self.state.is_active(series.key()) {
                1.0
            } else {
                0.35
            };
            target.push(
                SceneNodeSpec::new(
                    format!("legend:{}", series.key()),
                    NodeKind::LegendItem,
                    Geometry::Rect {
                        x: left,
                        y: top + area.height + 40.0 + row as f64 * 18.0,
                        width: 12.0,
                        height: 12.0,
                    },
                    NodeStyle::filled(color).with_opacity(opacity),
                )
                .with_text(series.key().to_owned()),
            );
        }

        self.colors = colors;
        self.tree.reconcile(target, self.config.transition)?;
        Ok(())
    }
}
