use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One untyped cell of an externally loaded row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowValue {
    Number(f64),
    Text(String),
}

impl RowValue {
    /// Lenient numeric coercion, mirroring tabular loaders that hand
    /// back strings with thousands separators or unit suffixes.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Number(_) => None,
            Self::Text(text) => parse_numeric(text),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One externally loaded row: column name -> value, read-only for the core.
///
/// Column order is preserved as loaded so fuzzy header matching stays
/// deterministic across identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: IndexMap<String, RowValue>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Exact-name lookup after header normalization.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValue> {
        let wanted = normalize_header(column);
        self.cells
            .iter()
            .find(|(name, _)| normalize_header(name) == wanted)
            .map(|(_, value)| value)
    }

    /// First column whose normalized header contains `fragment`.
    ///
    /// Used for loosely named columns such as "Change Watch Time (%)".
    #[must_use]
    pub fn get_fuzzy(&self, fragment: &str) -> Option<&RowValue> {
        let wanted = normalize_header(fragment);
        self.cells
            .iter()
            .find(|(name, _)| normalize_header(name).contains(&wanted))
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(RowValue::as_number)
    }

    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(RowValue::as_text)
    }
}

/// Strips a UTF-8 BOM, trims, and lowercases a header name.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | 'e' | 'E'))
        .collect();
    let parsed = cleaned.parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Keeps only rows for which `extract` produces a value, logging the
/// number dropped. Malformed rows are a recoverable local condition,
/// never an error.
pub fn filter_rows<'a, T>(
    rows: &'a [Row],
    context: &'static str,
    mut extract: impl FnMut(&'a Row) -> Option<T>,
) -> Vec<T> {
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(value) = extract(row) {
            kept.push(value);
        }
    }
    if kept.len() < rows.len() {
        debug!(
            context,
            dropped = rows.len() - kept.len(),
            kept = kept.len(),
            "dropped malformed rows"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::{Row, normalize_header};

    #[test]
    fn normalized_lookup_ignores_bom_case_and_whitespace() {
        let row = Row::new().with("\u{feff} Game ", "Celeste");
        assert_eq!(row.text("game"), Some("Celeste"));
    }

    #[test]
    fn fuzzy_lookup_matches_header_fragment() {
        let row = Row::new().with("Change Watch Time (%)", "1,234");
        let value = row.get_fuzzy("change watch time").expect("fuzzy match");
        assert_eq!(value.as_number(), Some(1234.0));
    }

    #[test]
    fn numeric_parse_strips_decoration() {
        let row = Row::new().with("count", "12,500 hrs");
        assert_eq!(row.number("count"), Some(12500.0));
    }

    #[test]
    fn header_normalization_is_stable() {
        assert_eq!(normalize_header("\u{feff}Year"), "year");
        assert_eq!(normalize_header("  YEAR  "), "year");
    }
}
