//! Handle filtering/where clauses translation.

use query_engine_sql::sql;
use query_engine_sql::sql::builder::{Brackets, Fragment};

use super::operators::{translate_operator, Operator};
use super::relationships;
use super::values::Filter;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State};

/// The key of a filter map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key<'a> {
    And,
    Or,
    Not,
    Sub,
    Attribute(&'a str),
}

impl<'a> Key<'a> {
    fn parse(key: &'a str) -> Result<Key<'a>, Error> {
        match key {
            "$and" => Ok(Key::And),
            "$or" => Ok(Key::Or),
            "$not" => Ok(Key::Not),
            "$sub" => Ok(Key::Sub),
            operator if operator.starts_with('$') => {
                Err(Error::MissingAttributeOperator(operator.to_string()))
            }
            attribute => Ok(Key::Attribute(attribute)),
        }
    }
}

/// Translate a (purified) filter on an entity into a boolean expression.
/// Anything but a non-empty map imposes no constraint and yields `None`.
pub fn translate_filter(
    env: &Env,
    state: &mut State,
    filter: &Filter,
    entity_name: &str,
) -> Result<Option<Fragment>, Error> {
    let Some(entries) = filter.as_map().filter(|entries| !entries.is_empty()) else {
        return Ok(None);
    };
    let entity = env.lookup_entity(entity_name)?;

    let mut brackets = Brackets::new();
    for (key, value) in entries {
        let fragment = match Key::parse(key)? {
            Key::And => translate_logical(env, state, key, value, entity_name, Brackets::and_where)?,
            Key::Or => translate_logical(env, state, key, value, entity_name, Brackets::or_where)?,
            Key::Not => {
                if value.as_map().is_none() {
                    return Err(Error::InvalidNegationOperand);
                }
                translate_filter(env, state, value, entity_name)?.map(|fragment| {
                    fragment.map_expression(|expression| sql::ast::Expression::Not(Box::new(expression)))
                })
            }
            Key::Sub => Some(relationships::translate_sub_condition(
                env,
                state,
                value,
                entity_name,
            )?),
            Key::Attribute(attribute) => {
                translate_attribute_condition(env, state, entity.column_name(attribute), value)?
            }
        };
        if let Some(fragment) = fragment {
            brackets.and_where(fragment);
        }
    }
    Ok(brackets.into_fragment())
}

/// Translate the entries of `$and` or `$or` into their own bracket.
/// Entries that impose no constraint are dropped.
fn translate_logical(
    env: &Env,
    state: &mut State,
    key: &str,
    value: &Filter,
    entity_name: &str,
    connect: fn(&mut Brackets, Fragment),
) -> Result<Option<Fragment>, Error> {
    let items = value
        .as_sequence()
        .ok_or_else(|| Error::InvalidLogicalOperand(key.to_string()))?;

    let mut brackets = Brackets::new();
    for item in items {
        if let Some(fragment) = translate_filter(env, state, item, entity_name)? {
            connect(&mut brackets, fragment);
        }
    }
    Ok(brackets.into_fragment())
}

/// Translate the condition on one attribute. A map applies each of its operators,
/// AND-ed together; any other value is compared with `$eq`.
pub fn translate_attribute_condition(
    env: &Env,
    state: &mut State,
    column_name: &str,
    value: &Filter,
) -> Result<Option<Fragment>, Error> {
    let column = env.column_reference(column_name);
    match value {
        Filter::Map(operators) => {
            let mut brackets = Brackets::new();
            for (key, operand) in operators {
                let operator: Operator = key.parse()?;
                brackets.and_where(translate_operator(
                    state,
                    column_name,
                    &column,
                    operator,
                    operand,
                )?);
            }
            Ok(brackets.into_fragment())
        }
        other => translate_operator(state, column_name, &column, Operator::Equals, other).map(Some),
    }
}
