//! Type definitions of a low-level SQL string representation.

use indexmap::IndexMap;

use super::ast::ParameterName;

/// Values bound to named placeholders, in the order they were bound.
pub type Parameters = IndexMap<String, serde_json::Value>;

/// A SQL string with named placeholders, and the values bound to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
    pub params: Parameters,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: Parameters::new(),
        }
    }
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
    /// Append a single quoted identifier. Embedded double quotes are doubled.
    pub fn append_identifier(&mut self, identifier: &str) {
        self.sql.push('"');
        self.sql.push_str(&identifier.replace('"', "\"\""));
        self.sql.push('"');
    }
    /// Append a dot-separated name as a qualified identifier, quoting each part.
    pub fn append_qualified_identifier(&mut self, name: &str) {
        for (index, part) in name.split('.').enumerate() {
            if index > 0 {
                self.sql.push('.');
            }
            self.append_identifier(part);
        }
    }
    pub fn append_parameter(&mut self, name: &ParameterName) {
        self.sql.push(':');
        self.sql.push_str(&name.0);
    }
    pub fn append_parameter_list(&mut self, name: &ParameterName) {
        self.sql.push_str("(:...");
        self.sql.push_str(&name.0);
        self.sql.push(')');
    }
}
