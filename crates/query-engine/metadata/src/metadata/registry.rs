//! The model registry: which table stores an entity, and how its attributes map to columns.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mapping from an entity name to its storage information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ModelRegistry(pub BTreeMap<String, EntityInfo>);

impl ModelRegistry {
    pub fn empty() -> Self {
        ModelRegistry(BTreeMap::new())
    }

    /// Lookup an entity's storage information by the entity name.
    pub fn lookup_entity(&self, entity_name: &str) -> Option<&EntityInfo> {
        self.0.get(entity_name)
    }

    /// Register an entity, replacing any previous entry under the same name.
    #[must_use]
    pub fn with_entity(mut self, entity_name: impl Into<String>, info: EntityInfo) -> Self {
        self.0.insert(entity_name.into(), info);
        self
    }
}

/// Storage information about an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    /// The physical table. A dot separates the schema from the table name.
    pub storage_table_name: String,
    /// Logical attribute name to physical column name. Attributes missing from
    /// the map are stored in a column of the same name.
    #[serde(default)]
    pub data_shaper_map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityInfo {
    pub fn new(storage_table_name: impl Into<String>) -> Self {
        EntityInfo {
            storage_table_name: storage_table_name.into(),
            data_shaper_map: BTreeMap::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, column: impl Into<String>) -> Self {
        self.data_shaper_map.insert(attribute.into(), column.into());
        self
    }

    /// The column an attribute is stored in.
    pub fn column_name<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.data_shaper_map
            .get(attribute)
            .map_or(attribute, String::as_str)
    }
}
