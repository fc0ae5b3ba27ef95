use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::frames::CategoryFrame;
use crate::core::rows::{Row, filter_rows};
use crate::core::types::{DataPoint, Series};

/// Column names consumed by the year/key/value wranglers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub category: String,
    pub key: String,
    pub value: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            category: "year".to_owned(),
            key: "genre".to_owned(),
            value: "count".to_owned(),
        }
    }
}

/// Stacks rows into one `CategoryFrame` per category, in ascending
/// category order.
///
/// Rows missing a field or carrying a non-finite value are dropped
/// silently before aggregation.
#[must_use]
pub fn stack_by_category(rows: &[Row], columns: &ColumnSpec) -> Vec<CategoryFrame> {
    let parsed = filter_rows(rows, "stack_by_category", |row| {
        let category = row.number(&columns.category)? as i64;
        let key = row.text(&columns.key)?.to_owned();
        let value = row.number(&columns.value)?;
        Some((category, key, value))
    });

    let mut grouped: IndexMap<i64, Vec<(String, f64)>> = IndexMap::new();
    for (category, key, value) in parsed {
        grouped.entry(category).or_default().push((key, value));
    }
    grouped.sort_keys();

    grouped
        .into_iter()
        .map(|(category, entries)| CategoryFrame::stack(category.to_string(), &entries))
        .collect()
}

/// Winner of an arg-max aggregation for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWinner {
    pub category: i64,
    pub key: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Picks the highest-value key per category; ties keep the first-seen row.
///
/// Winners come back in ascending category order. An optional `hint`
/// column is carried through when present.
#[must_use]
pub fn arg_max_by_category(rows: &[Row], columns: &ColumnSpec) -> Vec<CategoryWinner> {
    let parsed = filter_rows(rows, "arg_max_by_category", |row| {
        let category = row.number(&columns.category)? as i64;
        let key = row.text(&columns.key)?.to_owned();
        let value = row.number(&columns.value)?;
        let hint = row.text("hint").map(str::to_owned);
        Some((category, key, value, hint))
    });

    let mut best: IndexMap<i64, (String, f64, Option<String>)> = IndexMap::new();
    for (category, key, value, hint) in parsed {
        match best.get_mut(&category) {
            Some(current) if value > current.1 => *current = (key, value, hint),
            Some(_) => {}
            None => {
                best.insert(category, (key, value, hint));
            }
        }
    }
    best.sort_keys();

    best.into_iter()
        .map(|(category, (key, _, hint))| CategoryWinner {
            category,
            key,
            hint,
        })
        .collect()
}

/// Per-category comfort/challenge aggregate with its normalized balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub category: i64,
    pub comfort: f64,
    pub challenge: f64,
    pub total: f64,
    /// `(challenge - comfort) / total`, clamped to `[-1, 1]`; 0 for an
    /// empty total.
    pub balance: f64,
}

impl MoodEntry {
    #[must_use]
    pub fn comfort_share(&self) -> f64 {
        if self.total > 0.0 {
            self.comfort / self.total
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn challenge_share(&self) -> f64 {
        if self.total > 0.0 {
            self.challenge / self.total
        } else {
            0.0
        }
    }
}

/// Sums mood rows (`comfort` / `challenge`) per category and derives the
/// balance. Unknown mood labels are ignored; categories arrive sorted.
#[must_use]
pub fn mood_balance(rows: &[Row]) -> Vec<MoodEntry> {
    let parsed = filter_rows(rows, "mood_balance", |row| {
        let category = row.number("year")? as i64;
        let mood = row.text("mood")?.to_lowercase();
        let count = row.number("count").unwrap_or(0.0);
        Some((category, mood, count))
    });

    let mut grouped: IndexMap<i64, (f64, f64)> = IndexMap::new();
    for (category, mood, count) in parsed {
        let entry = grouped.entry(category).or_insert((0.0, 0.0));
        match mood.as_str() {
            "comfort" => entry.0 += count,
            "challenge" => entry.1 += count,
            _ => {}
        }
    }
    grouped.sort_keys();

    grouped
        .into_iter()
        .map(|(category, (comfort, challenge))| {
            let total = comfort + challenge;
            let balance = if total == 0.0 {
                0.0
            } else {
                ((challenge - comfort) / total).clamp(-1.0, 1.0)
            };
            MoodEntry {
                category,
                comfort,
                challenge,
                total,
                balance,
            }
        })
        .collect()
}

/// Splits rows into one series per key, restricted to an inclusive
/// category window. Series appear in first-seen key order; points are
/// sorted ascending by x (the `Series` constructor's invariant).
#[must_use]
pub fn series_by_key(
    rows: &[Row],
    columns: &ColumnSpec,
    window: Option<(i64, i64)>,
) -> Vec<Series> {
    let parsed = filter_rows(rows, "series_by_key", |row| {
        let category = row.number(&columns.category)? as i64;
        let key = row.text(&columns.key)?.to_owned();
        let value = row.number(&columns.value)?;
        if let Some((low, high)) = window
            && !(low..=high).contains(&category)
        {
            return None;
        }
        Some((category, key, value))
    });

    let mut grouped: IndexMap<String, Vec<DataPoint>> = IndexMap::new();
    for (category, key, value) in parsed {
        let point = DataPoint {
            key: format!("{category}-{key}"),
            x: category as f64,
            y: value,
            group: Some(key.clone()),
        };
        grouped.entry(key).or_default().push(point);
    }

    debug!(series = grouped.len(), "wrangled rows into series");

    grouped
        .into_iter()
        .map(|(key, points)| Series::new(key, points))
        .collect()
}

/// Carries the active-key selection across a data replacement.
///
/// Previously active keys are intersected with the new key set; if the
/// intersection comes up empty (including on first load), every new key
/// becomes active so the user is never left with zero visible series.
#[must_use]
pub fn carry_over_active_keys(
    previous: &IndexSet<String>,
    new_keys: &[String],
) -> IndexSet<String> {
    let carried: IndexSet<String> = new_keys
        .iter()
        .filter(|key| previous.contains(*key))
        .cloned()
        .collect();

    if carried.is_empty() {
        new_keys.iter().cloned().collect()
    } else {
        carried
    }
}

/// Name/value pair for the bubble pack, already filtered to positive
/// finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleDatum {
    pub name: String,
    pub value: f64,
}

/// Extracts bubble data with fuzzy header matching: an exact `name`
/// column plus the first column whose header contains `value_fragment`.
#[must_use]
pub fn bubble_data(rows: &[Row], name_column: &str, value_fragment: &str) -> Vec<BubbleDatum> {
    filter_rows(rows, "bubble_data", |row| {
        let name = row.text(name_column)?.to_owned();
        let value = row.get_fuzzy(value_fragment)?.as_number()?;
        if value <= 0.0 {
            return None;
        }
        Some(BubbleDatum { name, value })
    })
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;

    use super::{ColumnSpec, arg_max_by_category, carry_over_active_keys, mood_balance};
    use crate::core::rows::Row;

    fn genre_row(year: f64, genre: &str, count: f64) -> Row {
        Row::new()
            .with("year", year)
            .with("genre", genre)
            .with("count", count)
    }

    #[test]
    fn arg_max_ties_keep_first_seen() {
        let rows = vec![
            genre_row(2019.0, "RPG", 50.0),
            genre_row(2019.0, "FPS", 50.0),
        ];
        let winners = arg_max_by_category(&rows, &ColumnSpec::default());
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].key, "RPG");
    }

    #[test]
    fn mood_rows_with_unknown_labels_are_ignored() {
        let rows = vec![
            Row::new()
                .with("year", 2021.0)
                .with("mood", "comfort")
                .with("count", 20.0),
            Row::new()
                .with("year", 2021.0)
                .with("mood", "mystery")
                .with("count", 99.0),
        ];
        let entries = mood_balance(&rows);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total, 20.0);
    }

    #[test]
    fn carry_over_refills_when_intersection_is_empty() {
        let previous: IndexSet<String> = ["gone".to_owned()].into_iter().collect();
        let next = carry_over_active_keys(&previous, &["a".to_owned(), "b".to_owned()]);
        assert_eq!(next.len(), 2);
    }
}
