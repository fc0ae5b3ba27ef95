pub mod color;
pub mod events;
pub mod frames;
pub mod ordinal;
pub mod pack;
pub mod rows;
pub mod scale;
pub mod types;
pub mod wrangle;

pub use color::{CATEGORICAL_PALETTE, ColorRegistry};
pub use events::{EventMarker, LANE_SPACING_PX, pack_lanes};
pub use frames::{CategoryFrame, Segment};
pub use ordinal::{BandScale, PointScale};
pub use pack::{PackedCircle, pack_circles};
pub use rows::{Row, RowValue};
pub use scale::LinearScale;
pub use types::{DataPoint, DrawingArea, Margin, Series, Viewport};
pub use wrangle::{
    BubbleDatum, CategoryWinner, ColumnSpec, MoodEntry, arg_max_by_category, bubble_data,
    carry_over_active_keys, mood_balance, series_by_key, stack_by_category,
};
