use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Vertical pitch between stacked co-incident event markers, in pixels.
pub const LANE_SPACING_PX: f64 = 20.0;

/// A point-in-time marker carried alongside series data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub x: f64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Packing slot among markers sharing this `x`; 0 is the baseline.
    pub lane: u32,
}

/// Assigns lanes to markers so co-incident entries do not overlap.
///
/// Markers sharing an `x` get lanes `0, 1, 2, …` in input order; the
/// counter resets for each distinct `x`. Lane pitch in pixels is applied
/// later by the scene builders, not here.
#[must_use]
pub fn pack_lanes(entries: &[(f64, String, Option<String>)]) -> Vec<EventMarker> {
    let mut per_x: IndexMap<OrderedX, u32> = IndexMap::new();
    let mut packed = Vec::with_capacity(entries.len());

    for (x, title, description) in entries {
        let lane = per_x.entry(OrderedX(x.to_bits())).or_insert(0);
        packed.push(EventMarker {
            x: *x,
            title: title.clone(),
            description: description.clone(),
            lane: *lane,
        });
        *lane += 1;
    }

    packed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OrderedX(u64);

#[cfg(test)]
mod tests {
    use super::pack_lanes;

    #[test]
    fn coincident_markers_get_increasing_lanes() {
        let packed = pack_lanes(&[
            (2020.0, "a".to_owned(), None),
            (2020.0, "b".to_owned(), None),
            (2021.0, "c".to_owned(), None),
            (2020.0, "d".to_owned(), None),
        ]);

        let lanes: Vec<u32> = packed.iter().map(|event| event.lane).collect();
        assert_eq!(lanes, vec![0, 1, 0, 2]);
    }

    #[test]
    fn lane_counter_resets_per_distinct_x() {
        let packed = pack_lanes(&[
            (1.0, "a".to_owned(), None),
            (2.0, "b".to_owned(), None),
            (3.0, "c".to_owned(), None),
        ]);
        assert!(packed.iter().all(|event| event.lane == 0));
    }
}
