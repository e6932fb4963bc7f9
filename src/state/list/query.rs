//! List query composition

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter/sort input object of a list query.
///
/// `favorites_first` and `search` are understood by the client; anything else is
/// forwarded to the backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub favorites_first: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListFilter {
    pub fn favorites_first() -> Self {
        Self {
            favorites_first: true,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() { None } else { Some(search) };
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// A single, immutable list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    document: &'static str,
    filter: ListFilter,
    cursor: Option<String>,
    page_size: u32,
}

impl ListQuery {
    pub fn document(&self) -> &'static str {
        self.document
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// GraphQL variables: `{ input: { ...filter, first, after } }`
    pub fn variables(&self) -> Value {
        let mut input = match serde_json::to_value(&self.filter) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        input.insert("first".to_string(), Value::from(self.page_size));
        if let Some(cursor) = &self.cursor {
            input.insert("after".to_string(), Value::from(cursor.clone()));
        }

        let mut variables = Map::new();
        variables.insert("input".to_string(), Value::Object(input));
        Value::Object(variables)
    }
}

/// Builds list queries for one list document.
///
/// The document must alias its connection field as `data`, so every list shares
/// one response shape: `data { nodes { id ... isFavorite } pageInfo { hasNextPage endCursor } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryComposer {
    document: &'static str,
}

impl QueryComposer {
    pub const fn new(document: &'static str) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &'static str {
        self.document
    }

    /// Compose a query for `filter`, resuming at `cursor` when given.
    ///
    /// Returns `None` for a zero page size.
    pub fn compose(
        &self,
        filter: &ListFilter,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Option<ListQuery> {
        if page_size == 0 {
            return None;
        }
        Some(ListQuery {
            document: self.document,
            filter: filter.clone(),
            cursor: cursor.map(str::to_string),
            page_size,
        })
    }
}

/// Rotations list
pub const ROTATIONS_QUERY: &str = r#"
query rotationsQuery($input: RotationSearchOptions) {
  data: rotations(input: $input) {
    nodes {
      id
      name
      description
      isFavorite
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// Heartbeat monitors list
pub const HEARTBEAT_MONITORS_QUERY: &str = r#"
query heartbeatMonitorsQuery($input: HeartbeatMonitorSearchOptions) {
  data: heartbeatMonitors(input: $input) {
    nodes {
      id
      name
      timeoutMinutes
      lastState
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;
