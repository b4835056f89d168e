//! The filter tree, as received from callers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of a filter tree. Deserializes from, and serializes to, any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Filter {
    Null,
    Scalar(Scalar),
    Sequence(Vec<Filter>),
    /// Operator keys (starting with `$`) or attribute keys, in insertion order.
    Map(IndexMap<String, Filter>),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Filter {
    pub fn is_null(&self) -> bool {
        matches!(self, Filter::Null)
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Filter>> {
        match self {
            Filter::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Filter]> {
        match self {
            Filter::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Filter::Scalar(Scalar::String(string)) => Some(string),
            _ => None,
        }
    }

    /// The JSON value bound to a placeholder for this node.
    pub fn to_json(&self) -> serde_json::Value {
        self.clone().into()
    }
}

impl Scalar {
    /// The textual form used when the scalar is embedded in a pattern.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(boolean) => boolean.to_string(),
            Scalar::Number(number) => number.to_string(),
            Scalar::String(string) => string.clone(),
        }
    }
}

impl From<serde_json::Value> for Filter {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Filter::Null,
            serde_json::Value::Bool(boolean) => Filter::Scalar(Scalar::Bool(boolean)),
            serde_json::Value::Number(number) => Filter::Scalar(Scalar::Number(number)),
            serde_json::Value::String(string) => Filter::Scalar(Scalar::String(string)),
            serde_json::Value::Array(items) => {
                Filter::Sequence(items.into_iter().map(Filter::from).collect())
            }
            serde_json::Value::Object(entries) => Filter::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Filter::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Filter> for serde_json::Value {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Null => serde_json::Value::Null,
            Filter::Scalar(Scalar::Bool(boolean)) => serde_json::Value::Bool(boolean),
            Filter::Scalar(Scalar::Number(number)) => serde_json::Value::Number(number),
            Filter::Scalar(Scalar::String(string)) => serde_json::Value::String(string),
            Filter::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Filter::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}
