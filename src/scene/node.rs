use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Visual role of a scene node. Drives neutral-state derivation and the
/// lowering to draw primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Bar,
    Line,
    Point,
    Label,
    LegendItem,
}

/// Pixel-space geometry carried by a scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
    },
    Polyline {
        points: SmallVec<[(f64, f64); 8]>,
    },
    Anchor {
        x: f64,
        y: f64,
    },
}

impl Geometry {
    /// The zero state a node enters from and exits toward: size
    /// dimensions collapse, positions stay put.
    #[must_use]
    pub fn collapsed(&self) -> Self {
        match self {
            Self::Rect {
                x,
                y,
                height,
                ..
            } => Self::Rect {
                x: *x,
                y: *y,
                width: 0.0,
                height: *height,
            },
            Self::Circle { cx, cy, .. } => Self::Circle {
                cx: *cx,
                cy: *cy,
                radius: 0.0,
            },
            Self::Polyline { points } => Self::Polyline {
                points: points.clone(),
            },
            Self::Anchor { x, y } => Self::Anchor { x: *x, y: *y },
        }
    }

    /// Linear interpolation between matching shapes; mismatched shapes
    /// snap to the target.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        match (self, target) {
            (
                Self::Rect {
                    x: x0,
                    y: y0,
                    width: w0,
                    height: h0,
                },
                Self::Rect {
                    x: x1,
                    y: y1,
                    width: w1,
                    height: h1,
                },
            ) => Self::Rect {
                x: lerp(*x0, *x1, t),
                y: lerp(*y0, *y1, t),
                width: lerp(*w0, *w1, t),
                height: lerp(*h0, *h1, t),
            },
            (
                Self::Circle {
                    cx: cx0,
                    cy: cy0,
                    radius: r0,
                },
                Self::Circle {
                    cx: cx1,
                    cy: cy1,
                    radius: r1,
                },
            ) => Self::Circle {
                cx: lerp(*cx0, *cx1, t),
                cy: lerp(*cy0, *cy1, t),
                radius: lerp(*r0, *r1, t),
            },
            (Self::Polyline { points: from }, Self::Polyline { points: to })
                if from.len() == to.len() =>
            {
                Self::Polyline {
                    points: from
                        .iter()
                        .zip(to.iter())
                        .map(|((x0, y0), (x1, y1))| (lerp(*x0, *x1, t), lerp(*y0, *y1, t)))
                        .collect(),
                }
            }
            (Self::Anchor { x: x0, y: y0 }, Self::Anchor { x: x1, y: y1 }) => Self::Anchor {
                x: lerp(*x0, *x1, t),
                y: lerp(*y0, *y1, t),
            },
            _ => target.clone(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        let finite = match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => {
                x.is_finite()
                    && y.is_finite()
                    && width.is_finite()
                    && height.is_finite()
                    && *width >= 0.0
                    && *height >= 0.0
            }
            Self::Circle { cx, cy, radius } => {
                cx.is_finite() && cy.is_finite() && radius.is_finite() && *radius >= 0.0
            }
            Self::Polyline { points } => points
                .iter()
                .all(|(x, y)| x.is_finite() && y.is_finite()),
            Self::Anchor { x, y } => x.is_finite() && y.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(ChartError::InvalidData(
                "scene geometry must be finite with non-negative extents".to_owned(),
            ))
        }
    }
}

/// Paint attributes attached to a node, interpolated alongside geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: Color,
    pub opacity: f64,
    pub stroke_width: f64,
    pub font_size_px: f64,
}

impl NodeStyle {
    #[must_use]
    pub const fn filled(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            stroke_width: 2.0,
            font_size_px: 12.0,
        }
    }

    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub const fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Entry/exit style: fully transparent, everything else unchanged.
    #[must_use]
    pub const fn faded(mut self) -> Self {
        self.opacity = 0.0;
        self
    }

    #[must_use]
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        Self {
            color: Color {
                red: lerp(self.color.red, target.color.red, t),
                green: lerp(self.color.green, target.color.green, t),
                blue: lerp(self.color.blue, target.color.blue, t),
                alpha: lerp(self.color.alpha, target.color.alpha, t),
            },
            opacity: lerp(self.opacity, target.opacity, t),
            stroke_width: lerp(self.stroke_width, target.stroke_width, t),
            font_size_px: lerp(self.font_size_px, target.font_size_px, t),
        }
    }
}

/// One entry of a target description handed to the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNodeSpec {
    pub key: String,
    pub kind: NodeKind,
    pub geometry: Geometry,
    pub style: NodeStyle,
    /// Stable reference back to the logical entity this node draws.
    #[serde(default)]
    pub data_ref: Option<String>,
    /// Label content for `Label` and `LegendItem` nodes.
    #[serde(default)]
    pub text: Option<String>,
}

impl SceneNodeSpec {
    #[must_use]
    pub fn new(key: impl Into<String>, kind: NodeKind, geometry: Geometry, style: NodeStyle) -> Self {
        Self {
            key: key.into(),
            kind,
            geometry,
            style,
            data_ref: None,
            text: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_data_ref(mut self, data_ref: impl Into<String>) -> Self {
        self.data_ref = Some(data_ref.into());
        self
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
