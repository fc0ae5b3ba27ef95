use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};
use crate::scene::{Geometry, NodeKind, SceneTree};

/// Lowers the retained scene tree into a draw frame.
///
/// Nodes are visited in tree order, which the reconciler keeps aligned
/// with the target description, so stacked segments and legend rows
/// paint in the order the widget asked for.
pub fn paint_scene(tree: &SceneTree, viewport: Viewport) -> ChartResult<RenderFrame> {
    viewport.validate()?;
    let mut frame = RenderFrame::new(viewport);

    for node in tree.nodes() {
        let style = node.style();
        if style.opacity <= 0.0 {
            continue;
        }
        let color = style.color.with_alpha(style.color.alpha * style.opacity);

        match (node.kind, node.geometry()) {
            (NodeKind::Bar, Geometry::Rect { x, y, width, height }) => {
                frame.rects.push(RectPrimitive::new(x, y, width, height, color));
            }
            (NodeKind::Point, Geometry::Circle { cx, cy, radius }) => {
                let mut circle = CirclePrimitive::new(cx, cy, radius, color);
                circle.stroke_width = style.stroke_width;
                frame.circles.push(circle);
            }
            (NodeKind::Line, Geometry::Polyline { points }) => {
                for pair in points.windows(2) {
                    frame.lines.push(LinePrimitive::new(
                        pair[0].0,
                        pair[0].1,
                        pair[1].0,
                        pair[1].1,
                        style.stroke_width,
                        color,
                    ));
                }
            }
            (NodeKind::Label, Geometry::Anchor { x, y }) => {
                if let Some(text) = node.text.as_deref().filter(|text| !text.is_empty()) {
                    frame.texts.push(TextPrimitive::new(
                        text,
                        x,
                        y,
                        style.font_size_px,
                        color,
                        TextHAlign::Center,
                    ));
                }
            }
            (NodeKind::LegendItem, Geometry::Rect { x, y, width, height }) => {
                frame.rects.push(RectPrimitive::new(x, y, width, height, color));
                if let Some(text) = node.text.as_deref().filter(|text| !text.is_empty()) {
                    frame.texts.push(TextPrimitive::new(
                        text,
                        x + width + 8.0,
                        y + height / 2.0,
                        style.font_size_px,
                        color,
                        TextHAlign::Left,
                    ));
                }
            }
            // A kind paired with a foreign geometry draws nothing rather
            // than failing the whole frame.
            _ => {}
        }
    }

    frame.validate()?;
    Ok(frame)
}
