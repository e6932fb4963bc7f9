//! List records as returned by the backend

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single list record. Identity is the `id`; every other field may be refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
    /// Remaining fields selected by the query (name, description, ...)
    #[serde(flatten)]
    pub display_fields: BTreeMap<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, is_favorite: bool) -> Self {
        Self {
            id: id.into(),
            is_favorite,
            display_fields: BTreeMap::new(),
        }
    }

    /// Builder-style helper for attaching a display field
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.display_fields.insert(name.to_string(), value.into());
        self
    }

    /// Get a display field as text (empty for missing or non-string values)
    pub fn text(&self, name: &str) -> &str {
        self.display_fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// Pagination metadata of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of results, in server order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub nodes: Vec<Node>,
    pub page_info: PageInfo,
}

/// Descriptor handed back by a create dialog after a successful creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl From<CreatedRecord> for Node {
    fn from(record: CreatedRecord) -> Self {
        Node {
            id: record.id,
            is_favorite: record.is_favorite,
            display_fields: record.fields,
        }
    }
}
