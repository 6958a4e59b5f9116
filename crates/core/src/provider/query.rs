use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameters for listing CMS entries.
///
/// Renders to the delivery API's query-string vocabulary (`content_type`,
/// `limit`, `skip`, `order`, `fields.<name>`, `sys.id[in]`, `query`,
/// `include`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Sort order, e.g. `-fields.date` for descending by date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Field equality filters keyed by field name (without `fields.`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Restricts results to these entry ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    /// Full-text search term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Link resolution depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<u8>,
}

impl EntryQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query entries of a content type.
    pub fn of_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Adds an equality filter on `fields.<name>`.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Restricts results to the given ids. Ids are kept sorted and unique.
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self.ids.sort();
        self.ids.dedup();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_include(mut self, depth: u8) -> Self {
        self.include = Some(depth);
        self
    }

    /// Renders the query as URL query pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(content_type) = &self.content_type {
            pairs.push(("content_type".to_string(), content_type.clone()));
        }
        for (name, value) in &self.fields {
            pairs.push((format!("fields.{name}"), value.clone()));
        }
        if !self.ids.is_empty() {
            pairs.push(("sys.id[in]".to_string(), self.ids.join(",")));
        }
        if let Some(search) = &self.search {
            pairs.push(("query".to_string(), search.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(include) = self.include {
            pairs.push(("include".to_string(), include.to_string()));
        }
        pairs
    }

    /// Renders the query as `name=value` pairs sorted by name.
    ///
    /// Equal parameter sets always produce the same string, so this is
    /// suitable as a cache key segment.
    pub fn canonical(&self) -> String {
        let mut pairs = self.pairs();
        pairs.sort();
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}
