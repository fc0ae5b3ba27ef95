use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Outer margins reserved around the plot region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Inner plot region after margins are subtracted from a viewport.
///
/// Widths below one pixel are clamped up so scales never receive a
/// zero-length range on extreme container sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingArea {
    pub width: f64,
    pub height: f64,
}

impl DrawingArea {
    pub fn from_viewport(viewport: Viewport, margin: Margin) -> ChartResult<Self> {
        viewport.validate()?;
        let width = f64::from(viewport.width) - margin.left - margin.right;
        let height = f64::from(viewport.height) - margin.top - margin.bottom;
        Ok(Self {
            width: width.max(1.0),
            height: height.max(1.0),
        })
    }
}

/// Normalized unit of plotted data. Immutable once produced by wrangling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub key: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub group: Option<String>,
}

impl DataPoint {
    #[must_use]
    pub fn new(key: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            x,
            y,
            group: None,
        }
    }
}

/// One named series of points, ordered ascending by `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    key: String,
    points: Vec<DataPoint>,
}

impl Series {
    /// Builds a series, sorting points ascending by `x`.
    ///
    /// Ordering is an invariant owned here; downstream scale and scene
    /// code assumes it and never re-sorts.
    #[must_use]
    pub fn new(key: impl Into<String>, mut points: Vec<DataPoint>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self {
            key: key.into(),
            points,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|point| point.y)
            .fold(None, |acc, y| Some(acc.map_or(y, |max: f64| max.max(y))))
    }
}
