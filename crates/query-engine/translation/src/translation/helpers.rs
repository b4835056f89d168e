//! Helpers for compiling filters and building SQL.

use query_engine_metadata::metadata;
use query_engine_sql::sql;

use super::error::Error;

/// Whether the statement fetches one record or many.
///
/// Relational sub-conditions compile to an uncorrelated `IN` lookup when many
/// records are fetched, and to a correlated existence check otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Single,
    Many,
}

/// Rewrites an attribute's column name before it is referenced in SQL, for example to
/// qualify it with a table alias. A result containing dots renders as a qualified name.
pub type AttributeNameTransform<'a> = &'a dyn Fn(&str) -> String;

/// Static information for one compile.
pub struct Env<'a> {
    registry: &'a metadata::ModelRegistry,
    fetch_mode: FetchMode,
    subquery_support: sql::builder::SubquerySupport,
    attribute_name_transform: Option<AttributeNameTransform<'a>>,
}

/// Mutable state threaded through one compile.
#[derive(Debug, Default)]
pub struct State {
    placeholder_index: u64,
}

impl<'a> Env<'a> {
    /// Create a new Env by supplying the registry and the shape of the host statement.
    pub fn new(
        registry: &'a metadata::ModelRegistry,
        fetch_mode: FetchMode,
        subquery_support: sql::builder::SubquerySupport,
    ) -> Env<'a> {
        Env {
            registry,
            fetch_mode,
            subquery_support,
            attribute_name_transform: None,
        }
    }

    #[must_use]
    pub fn with_attribute_name_transform(mut self, transform: AttributeNameTransform<'a>) -> Self {
        self.attribute_name_transform = Some(transform);
        self
    }

    /// Lookup an entity's storage information in the registry.
    pub fn lookup_entity(&self, entity_name: &str) -> Result<&'a metadata::EntityInfo, Error> {
        self.registry
            .lookup_entity(entity_name)
            .ok_or_else(|| Error::MissingModelRegistry(entity_name.to_string()))
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    pub fn subquery_support(&self) -> sql::builder::SubquerySupport {
        self.subquery_support
    }

    /// The reference to a column of the entity being filtered, after the attribute
    /// name transform.
    pub fn column_reference(&self, column_name: &str) -> sql::ast::ColumnReference {
        let name = match self.attribute_name_transform {
            Some(transform) => transform(column_name),
            None => column_name.to_string(),
        };
        sql::ast::ColumnReference::Column(sql::ast::ColumnName(name))
    }

    /// A column of the entity being filtered, referenced from inside a subquery.
    /// Without a transform the column is qualified by the storage table.
    pub fn outer_column_reference(
        &self,
        storage_table_name: &str,
        column_name: &str,
    ) -> sql::ast::ColumnReference {
        match self.attribute_name_transform {
            Some(_) => self.column_reference(column_name),
            None => sql::ast::ColumnReference::TableColumn {
                table: sql::ast::TableReference::DBTable(sql::ast::TableName(
                    storage_table_name.to_string(),
                )),
                name: sql::ast::ColumnName(column_name.to_string()),
            },
        }
    }
}

impl State {
    /// Build a new state, numbering placeholders from 1.
    pub fn new() -> State {
        State::default()
    }

    /// Create a placeholder name for a condition on a column. Characters that cannot
    /// appear in a placeholder become `_`. Names are unique across everything compiled
    /// with this state.
    pub fn make_placeholder_name(&mut self, column_name: &str) -> sql::ast::ParameterName {
        sql::ast::ParameterName(self.next_name(column_name))
    }

    /// Create an alias for the table a subquery reads from, so that it never
    /// shadows the table of the outer statement.
    pub fn make_subquery_alias(&mut self, storage_table_name: &str) -> sql::ast::TableAlias {
        sql::helpers::make_table_alias(self.next_name(storage_table_name))
    }

    fn next_name(&mut self, base: &str) -> String {
        self.placeholder_index += 1;
        let base: String = base
            .replace('.', "__")
            .chars()
            .map(|character| {
                if character.is_ascii_alphanumeric() || character == '_' {
                    character
                } else {
                    '_'
                }
            })
            .collect();
        format!("{base}__{}", self.placeholder_index)
    }
}
