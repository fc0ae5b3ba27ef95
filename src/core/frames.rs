use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One value slice of a stacked composition, with cumulative extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub key: String,
    pub value: f64,
    pub cumulative_start: f64,
    pub cumulative_end: f64,
}

/// A stacked composition for one category (e.g. one year).
///
/// Segments are ordered descending by value; equal values keep their
/// input order. The last segment's `cumulative_end` equals `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrame {
    category: String,
    segments: Vec<Segment>,
    total: f64,
}

impl CategoryFrame {
    /// Stacks `(key, value)` pairs into cumulative segments.
    ///
    /// The descending sort is stable, so equal-value ties preserve the
    /// caller's input order.
    #[must_use]
    pub fn stack(category: impl Into<String>, entries: &[(String, f64)]) -> Self {
        let mut ordered: Vec<(String, f64)> = entries.to_vec();
        ordered.sort_by_key(|(_, value)| std::cmp::Reverse(OrderedFloat(*value)));

        let mut cursor = 0.0;
        let mut segments = Vec::with_capacity(ordered.len());
        for (key, value) in ordered {
            let start = cursor;
            cursor += value;
            segments.push(Segment {
                key,
                value,
                cumulative_start: start,
                cumulative_end: cursor,
            });
        }

        Self {
            category: category.into(),
            segments,
            total: cursor,
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| segment.key.as_str())
    }

    /// Checks the cumulative bookkeeping against the reported total.
    pub fn validate(&self) -> ChartResult<()> {
        let mut expected_start = 0.0;
        for segment in &self.segments {
            if (segment.cumulative_start - expected_start).abs() > 1e-9 {
                return Err(ChartError::InvalidData(format!(
                    "segment `{}` cumulative start drifted",
                    segment.key
                )));
            }
            if (segment.cumulative_end - segment.cumulative_start - segment.value).abs() > 1e-9 {
                return Err(ChartError::InvalidData(format!(
                    "segment `{}` span does not match its value",
                    segment.key
                )));
            }
            expected_start = segment.cumulative_end;
        }
        if (expected_start - self.total).abs() > 1e-9 {
            return Err(ChartError::InvalidData(
                "frame total does not match last cumulative end".to_owned(),
            ));
        }
        Ok(())
    }
}
