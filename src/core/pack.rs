use serde::{Deserialize, Serialize};

use crate::core::types::DrawingArea;
use crate::core::wrangle::BubbleDatum;

/// Gap kept between packed circles, in pre-scale pixels.
const PACK_PADDING: f64 = 1.5;
/// Fraction of the drawing area targeted by the summed circle areas
/// before the final fit pass.
const PACK_COVERAGE: f64 = 0.55;

/// One placed bubble, positioned relative to the drawing-area origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedCircle {
    pub name: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Packs value-weighted circles into the drawing area.
///
/// Radii grow with the square root of value; placement is largest-first
/// on an outward ring search, then the whole layout is scaled uniformly
/// to fit the area. The procedure is pure: identical inputs give
/// identical layouts. Guarantees: no two circles overlap (beyond float
/// tolerance), every circle lies inside the area, and radius order
/// matches value order.
#[must_use]
pub fn pack_circles(data: &[BubbleDatum], area: DrawingArea) -> Vec<PackedCircle> {
    if data.is_empty() {
        return Vec::new();
    }

    let total: f64 = data.iter().map(|datum| datum.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut ordered: Vec<&BubbleDatum> = data.iter().collect();
    ordered.sort_by(|a, b| b.value.total_cmp(&a.value));

    let budget = area.width * area.height * PACK_COVERAGE;
    let mut placed: Vec<PackedCircle> = Vec::with_capacity(ordered.len());

    for datum in ordered {
        let radius = (datum.value / total * budget / std::f64::consts::PI).sqrt();
        let (x, y) = find_spot(&placed, radius);
        placed.push(PackedCircle {
            name: datum.name.clone(),
            value: datum.value,
            x,
            y,
            radius,
        });
    }

    fit_to_area(&mut placed, area);
    placed
}

/// First collision-free center on an outward ring sweep around origin.
fn find_spot(placed: &[PackedCircle], radius: f64) -> (f64, f64) {
    if placed.is_empty() {
        return (0.0, 0.0);
    }

    let ring_step = (radius * 0.25).max(1.0);
    let mut ring = 0.0;
    loop {
        let candidates = if ring == 0.0 {
            1
        } else {
            // Enough angular samples that adjacent candidates sit about
            // one step apart on the ring.
            ((ring * std::f64::consts::TAU / ring_step).ceil() as usize).max(8)
        };
        for sample in 0..candidates {
            let angle = std::f64::consts::TAU * sample as f64 / candidates as f64;
            let x = ring * angle.cos();
            let y = ring * angle.sin();
            if !collides(placed, x, y, radius) {
                return (x, y);
            }
        }
        ring += ring_step;
    }
}

fn collides(placed: &[PackedCircle], x: f64, y: f64, radius: f64) -> bool {
    placed.iter().any(|other| {
        let dx = other.x - x;
        let dy = other.y - y;
        let min_distance = other.radius + radius + PACK_PADDING;
        dx * dx + dy * dy < min_distance * min_distance
    })
}

/// Uniformly scales and translates the layout into the drawing area.
///
/// A uniform scale preserves the pairwise-distance to radius ratios, so
/// the no-overlap property survives the fit.
fn fit_to_area(placed: &mut [PackedCircle], area: DrawingArea) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for circle in placed.iter() {
        min_x = min_x.min(circle.x - circle.radius);
        max_x = max_x.max(circle.x + circle.radius);
        min_y = min_y.min(circle.y - circle.radius);
        max_y = max_y.max(circle.y + circle.radius);
    }

    let bounds_width = (max_x - min_x).max(f64::EPSILON);
    let bounds_height = (max_y - min_y).max(f64::EPSILON);
    let scale = (area.width / bounds_width)
        .min(area.height / bounds_height)
        .min(1.0);

    let offset_x = (area.width - bounds_width * scale) / 2.0;
    let offset_y = (area.height - bounds_height * scale) / 2.0;

    for circle in placed.iter_mut() {
        circle.x = (circle.x - min_x) * scale + offset_x;
        circle.y = (circle.y - min_y) * scale + offset_y;
        circle.radius *= scale;
    }
}
