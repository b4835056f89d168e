//! Translate a filter tree into the WHERE clause of a statement.

pub mod filtering;
pub mod operators;
pub mod purify;
pub mod relationships;
pub mod values;

use query_engine_metadata::metadata;
use query_engine_sql::sql::builder::{Fragment, QueryBuilder};

use crate::translation::error::Error;
use crate::translation::helpers::{AttributeNameTransform, Env, FetchMode, State};
use values::Filter;

/// Translate `filter` on `entity_name` and attach it to the statement with a single AND.
/// A filter without any constraint leaves the statement untouched.
pub fn build_where_query(
    query_builder: &mut QueryBuilder,
    filter: &Filter,
    entity_name: &str,
    registry: &metadata::ModelRegistry,
    fetch_mode: FetchMode,
    attribute_name_transform: Option<AttributeNameTransform>,
) -> Result<(), Error> {
    let mut env = Env::new(registry, fetch_mode, query_builder.subquery_support());
    if let Some(transform) = attribute_name_transform {
        env = env.with_attribute_name_transform(transform);
    }

    if let Some(fragment) = compile_filter(&env, filter, entity_name)? {
        query_builder.and_where(fragment);
    }
    Ok(())
}

/// Translate `filter` on `entity_name` into a predicate and the parameters it binds.
pub fn compile_filter(
    env: &Env,
    filter: &Filter,
    entity_name: &str,
) -> Result<Option<Fragment>, Error> {
    env.lookup_entity(entity_name)?;

    let Some(filter) = purify::purify_filter(filter) else {
        tracing::debug!(entity = entity_name, "filter imposes no constraint");
        return Ok(None);
    };

    let mut state = State::new();
    let fragment = filtering::translate_filter(env, &mut state, &filter, entity_name)?;
    match &fragment {
        Some(fragment) => tracing::debug!(
            entity = entity_name,
            parameters = fragment.parameters.len(),
            "translated filter"
        ),
        None => tracing::debug!(entity = entity_name, "filter imposes no constraint"),
    }
    Ok(fragment)
}
