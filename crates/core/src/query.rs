// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table query types for the gateway

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque numeric table identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned record identifier
pub type RecordId = i64;

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Equal,
    StringContains,
    StringStartsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// A `{field, operator, value}` triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(rename = "name")]
    pub field: String,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, FilterOp::Equal, value)
    }

    /// Check a record against this filter
    pub fn matches(&self, record: &serde_json::Value) -> bool {
        let Some(actual) = record.get(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Equal => values_equal(actual, &self.value),
            FilterOp::StringContains => match (actual.as_str(), self.value.as_str()) {
                (Some(a), Some(v)) => a.to_lowercase().contains(&v.to_lowercase()),
                _ => false,
            },
            FilterOp::StringStartsWith => match (actual.as_str(), self.value.as_str()) {
                (Some(a), Some(v)) => a.to_lowercase().starts_with(&v.to_lowercase()),
                _ => false,
            },
            FilterOp::GreaterThan => compare(actual, &self.value).is_some_and(|o| o.is_gt()),
            FilterOp::GreaterThanOrEqual => compare(actual, &self.value).is_some_and(|o| o.is_ge()),
            FilterOp::LessThan => compare(actual, &self.value).is_some_and(|o| o.is_lt()),
            FilterOp::LessThanOrEqual => compare(actual, &self.value).is_some_and(|o| o.is_le()),
        }
    }
}

fn values_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &serde_json::Value, b: &serde_json::Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (serde_json::Value::String(x), serde_json::Value::String(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// A paged, sorted, filtered table read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "PageNo")]
    pub page: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
    #[serde(rename = "OrderByField")]
    pub order_by: String,
    #[serde(rename = "IsAsc")]
    pub ascending: bool,
    #[serde(rename = "Filters")]
    pub filters: Vec<Filter>,
}

impl PageQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            order_by: "id".to_string(),
            ascending: false,
            filters: Vec::new(),
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order_by = field.into();
        self.ascending = ascending;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "List", default = "Vec::new")]
    pub items: Vec<T>,
    /// Total matching records across all pages
    #[serde(rename = "VirtualCount", default)]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Whether more pages follow this one
    pub fn has_more(&self, query: &PageQuery) -> bool {
        u64::from(query.page) * u64::from(query.page_size) < self.total
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
