mod frame;
mod null_renderer;
mod primitives;
mod scene_painter;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene_painter::paint_scene;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
