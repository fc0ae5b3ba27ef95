use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Evenly spaced positions for a discrete domain, with outer padding
/// expressed in steps (0.5 reserves half a step at each end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointScale {
    domain: Vec<String>,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl PointScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        if domain.is_empty() {
            return Err(ChartError::InvalidData(
                "point scale domain must not be empty".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "point scale range must be finite".to_owned(),
            ));
        }
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidData(
                "point scale padding must be finite and >= 0".to_owned(),
            ));
        }

        Ok(Self {
            domain,
            range_start: range.0,
            range_end: range.1,
            padding,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Distance between adjacent points.
    #[must_use]
    pub fn step(&self) -> f64 {
        let extent = self.range_end - self.range_start;
        let denominator = (self.domain.len() as f64 - 1.0 + 2.0 * self.padding).max(1.0);
        extent / denominator
    }

    #[must_use]
    pub fn position_of(&self, category: &str) -> Option<f64> {
        let index = self.domain.iter().position(|entry| entry == category)?;
        Some(self.position_at(index))
    }

    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        let step = self.step();
        self.range_start + step * self.padding + step * index as f64
    }

    /// Index of the category whose position is nearest `pixel`.
    ///
    /// Ties resolve toward the lower index. Returns `None` only for an
    /// empty domain, which construction already rejects.
    #[must_use]
    pub fn nearest_index(&self, pixel: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in 0..self.domain.len() {
            let distance = (self.position_at(index) - pixel).abs();
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Discrete domain mapped to bands with inner padding (d3-style band scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: Vec<String>,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        if domain.is_empty() {
            return Err(ChartError::InvalidData(
                "band scale domain must not be empty".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidData(
                "band scale padding must be in [0, 1)".to_owned(),
            ));
        }

        Ok(Self {
            domain,
            range_start: range.0,
            range_end: range.1,
            padding,
        })
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        let extent = self.range_end - self.range_start;
        let count = self.domain.len() as f64;
        extent / (count - self.padding + 2.0 * self.padding).max(1.0)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    #[must_use]
    pub fn position_of(&self, category: &str) -> Option<f64> {
        let index = self.domain.iter().position(|entry| entry == category)?;
        let step = self.step();
        Some(self.range_start + step * self.padding + step * index as f64)
    }
}
