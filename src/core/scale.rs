use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Linear domain -> pixel mapping with an explicit range.
///
/// Scales are value types: recomputed wholesale when the domain model or
/// drawing area changes, never mutated in place. Mapping is pure, so
/// identical inputs always produce bit-identical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Value axis over `[0, max * padding_factor]`.
    ///
    /// An absent or all-zero maximum falls back to a `[0, 1]` domain so
    /// downstream division never sees a zero-width span.
    pub fn for_values(max_value: Option<f64>, padding_factor: f64, range: (f64, f64)) -> ChartResult<Self> {
        if !padding_factor.is_finite() || padding_factor < 1.0 {
            return Err(ChartError::InvalidData(
                "padding factor must be finite and >= 1".to_owned(),
            ));
        }
        let top = match max_value {
            Some(max) if max.is_finite() && max > 0.0 => max * padding_factor,
            _ => 1.0,
        };
        Self::new((0.0, top), range)
    }

    /// X axis spanning the min/max of a category set, widening degenerate
    /// domains by one unit on each side.
    pub fn for_span(values: &[f64], range: (f64, f64)) -> ChartResult<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let domain = match (
            finite.iter().copied().fold(None, min_fold),
            finite.iter().copied().fold(None, max_fold),
        ) {
            (Some(min), Some(max)) if min < max => (min, max),
            (Some(only), Some(_)) => (only - 1.0, only + 1.0),
            _ => (0.0, 1.0),
        };
        Self::new(domain, range)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn position(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let extent = self.range_end - self.range_start;
        if extent == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a zero-length range".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / extent;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

fn min_fold(acc: Option<f64>, value: f64) -> Option<f64> {
    Some(acc.map_or(value, |current| current.min(value)))
}

fn max_fold(acc: Option<f64>, value: f64) -> Option<f64> {
    Some(acc.map_or(value, |current| current.max(value)))
}
