mod bubbles;
mod fmt;
mod mood;
mod multiline;
mod resize;
mod snapshot;
mod stacked;
mod status;
mod timeline;
mod trivia;

pub use bubbles::{BubblePackChart, BubblePackConfig};
pub use mood::{MoodSummary, RadialMoodConfig, RadialMoodIndicator};
pub use multiline::{ALL_SERIES, MultiLineConfig, MultiSeriesLineChart};
pub use resize::{DEFAULT_DEBOUNCE_MS, ResizeCoordinator};
pub use snapshot::WidgetSnapshot;
pub use stacked::{StackedCompositionChart, StackedConfig};
pub use status::InstanceStatus;
pub use timeline::{CategoricalTimeline, TimelineConfig};
pub use trivia::{TriviaConfig, TriviaQuestion, TriviaTimeline};
