use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::status::InstanceStatus;

/// Host-facing diagnostics summary of one widget instance.
///
/// Serialized with `serde_json` so embedding applications can log or
/// inspect widget state without reaching into internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub widget: String,
    pub status: InstanceStatus,
    pub categories: Vec<String>,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub active_keys: Vec<String>,
    #[serde(default)]
    pub answered: usize,
    pub node_count: usize,
}

impl WidgetSnapshot {
    #[must_use]
    pub fn new(widget: impl Into<String>, status: InstanceStatus) -> Self {
        Self {
            widget: widget.into(),
            status,
            categories: Vec::new(),
            selection: None,
            active_keys: Vec::new(),
            answered: 0,
            node_count: 0,
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Option<String>) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_active_keys(mut self, active_keys: Vec<String>) -> Self {
        self.active_keys = active_keys;
        self
    }

    #[must_use]
    pub fn with_answered(mut self, answered: usize) -> Self {
        self.answered = answered;
        self
    }

    #[must_use]
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidData(format!("snapshot serialization: {err}")))
    }
}
