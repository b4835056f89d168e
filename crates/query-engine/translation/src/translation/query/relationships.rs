//! Translate `$sub`, a condition on related records of another entity, into a subquery.

use nonempty::NonEmpty;
use query_engine_sql::sql;
use query_engine_sql::sql::builder::{Fragment, SubQueryBuilder};

use super::operators::{translate_operator, Operator};
use super::values::Filter;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, FetchMode, State};

/// A parsed `$sub` operand.
#[derive(Debug, Clone, PartialEq)]
pub struct SubFilter {
    pub entity: String,
    pub conditions: NonEmpty<SubCondition>,
}

/// One entry of the `condition` list of a `$sub`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCondition {
    /// Attribute of the related entity.
    pub target_attribute: String,
    pub source: ConditionSource,
}

/// What the target attribute is compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionSource {
    /// An attribute of the entity being filtered, compared for equality.
    Attribute(String),
    /// A value, compared with an operator.
    Value { operator: Operator, value: Filter },
}

impl SubFilter {
    pub fn parse(filter: &Filter) -> Result<SubFilter, Error> {
        let entries = filter.as_map();
        let entity = entries
            .and_then(|entries| entries.get("entity"))
            .and_then(Filter::as_str)
            .ok_or(Error::MissingSubEntity { entity: None })?;

        let conditions = entries
            .and_then(|entries| entries.get("condition"))
            .and_then(Filter::as_sequence)
            .ok_or_else(|| {
                Error::InvalidSubCondition("expected a list of conditions".to_string())
            })?
            .iter()
            .map(SubCondition::parse)
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(SubFilter {
            entity: entity.to_string(),
            conditions: NonEmpty::from_vec(conditions).ok_or_else(|| {
                Error::InvalidSubCondition("expected at least one condition".to_string())
            })?,
        })
    }
}

impl SubCondition {
    /// The attribute of the filtered entity this condition links to, if any.
    pub fn source_attribute(&self) -> Option<&str> {
        match &self.source {
            ConditionSource::Attribute(attribute) => Some(attribute),
            ConditionSource::Value { .. } => None,
        }
    }

    fn parse(condition: &Filter) -> Result<SubCondition, Error> {
        let entries = condition
            .as_map()
            .ok_or_else(|| Error::InvalidSubCondition("a condition must be a map".to_string()))?;

        let target_attribute = entries
            .get("targetAttribute")
            .and_then(Filter::as_str)
            .filter(|attribute| !attribute.is_empty())
            .ok_or_else(|| {
                Error::InvalidSubCondition("every condition needs a targetAttribute".to_string())
            })?;

        let source_attribute = entries
            .get("sourceAttribute")
            .and_then(Filter::as_str)
            .filter(|attribute| !attribute.is_empty());

        let source = match (source_attribute, entries.get("value")) {
            (Some(attribute), _) => ConditionSource::Attribute(attribute.to_string()),
            (None, Some(value)) => ConditionSource::Value {
                operator: match entries.get("operator") {
                    None => Operator::Equals,
                    Some(operator) => operator
                        .as_str()
                        .ok_or_else(|| {
                            Error::InvalidSubCondition(format!(
                                "the operator on '{target_attribute}' must be a string"
                            ))
                        })?
                        .parse()?,
                },
                value: value.clone(),
            },
            (None, None) => {
                return Err(Error::InvalidSubCondition(format!(
                    "the condition on '{target_attribute}' needs a sourceAttribute or a value"
                )))
            }
        };

        Ok(SubCondition {
            target_attribute: target_attribute.to_string(),
            source,
        })
    }
}

/// Translate a `$sub` operand on `entity_name`.
///
/// When many records are fetched and the related records are linked through exactly
/// one source attribute, the link becomes `source IN (SELECT target ...)`. A lookup on
/// the entity itself without any link is linked through `id`. Otherwise the subquery
/// checks that at least one related record exists.
pub fn translate_sub_condition(
    env: &Env,
    state: &mut State,
    filter: &Filter,
    entity_name: &str,
) -> Result<Fragment, Error> {
    let SubFilter { entity, conditions } = SubFilter::parse(filter)?;
    let source_entity = env.lookup_entity(entity_name)?;
    let target_entity = env
        .lookup_entity(&entity)
        .map_err(|_| Error::MissingSubEntity {
            entity: Some(entity.clone()),
        })?;

    let mut conditions: Vec<SubCondition> = conditions.into();
    let link = match env.fetch_mode() {
        FetchMode::Many => take_membership_link(&mut conditions, entity == entity_name),
        FetchMode::Single => None,
    };
    tracing::trace!(
        source = %entity_name,
        target = %entity,
        membership = link.is_some(),
        "translating sub condition"
    );

    let alias = state.make_subquery_alias(&target_entity.storage_table_name);
    let outer_column = |attribute: &str| {
        env.outer_column_reference(
            &source_entity.storage_table_name,
            source_entity.column_name(attribute),
        )
    };

    let select_list = match &link {
        Some((target_attribute, _)) => {
            let target_column = target_entity.column_name(target_attribute);
            sql::ast::SelectList::SelectList(vec![(
                sql::helpers::make_column_alias(target_column.to_string()),
                sql::ast::Expression::ColumnReference(aliased_column(&alias, target_column)),
            )])
        }
        None => sql::ast::SelectList::SelectList(vec![(
            sql::helpers::make_column_alias("found".to_string()),
            sql::helpers::count_star_is_positive(),
        )]),
    };
    let mut sub_query = SubQueryBuilder::new(
        select_list,
        sql::ast::From::Table {
            reference: sql::ast::TableReference::DBTable(sql::ast::TableName(
                target_entity.storage_table_name.clone(),
            )),
            alias: Some(alias.clone()),
        },
    );

    for SubCondition {
        target_attribute,
        source,
    } in &conditions
    {
        let target_column = target_entity.column_name(target_attribute);
        let target = aliased_column(&alias, target_column);
        let fragment = match source {
            ConditionSource::Attribute(source_attribute) => {
                Fragment::new(sql::ast::Expression::BinaryOperation {
                    left: Box::new(sql::ast::Expression::ColumnReference(target)),
                    operator: sql::ast::BinaryOperator::Equals,
                    right: Box::new(sql::ast::Expression::ColumnReference(outer_column(
                        source_attribute,
                    ))),
                })
            }
            ConditionSource::Value { operator, value } => {
                translate_operator(state, target_column, &target, *operator, value)?
            }
        };
        sub_query.and_where(fragment);
    }

    let (sub_select, parameters) = sub_query.into_parts(env.subquery_support());
    let expression = match link {
        Some((_, source_attribute)) => sql::ast::Expression::BinaryArrayOperation {
            left: Box::new(sql::ast::Expression::ColumnReference(outer_column(
                &source_attribute,
            ))),
            operator: sql::ast::BinaryArrayOperator::In,
            right: Box::new(sub_select),
        },
        None => sub_select,
    };

    Ok(Fragment {
        expression,
        parameters,
    })
}

/// Remove the condition linking the related records to the filtered ones, returning
/// its `(target, source)` attributes.
fn take_membership_link(
    conditions: &mut Vec<SubCondition>,
    is_self_lookup: bool,
) -> Option<(String, String)> {
    let linked: Vec<usize> = conditions
        .iter()
        .enumerate()
        .filter_map(|(index, condition)| condition.source_attribute().map(|_| index))
        .collect();

    match linked.as_slice() {
        [index] => {
            let condition = conditions.remove(*index);
            condition
                .source_attribute()
                .map(|source| (condition.target_attribute.clone(), source.to_string()))
        }
        [] if is_self_lookup => Some(("id".to_string(), "id".to_string())),
        _ => None,
    }
}

fn aliased_column(alias: &sql::ast::TableAlias, column_name: &str) -> sql::ast::ColumnReference {
    sql::ast::ColumnReference::TableColumn {
        table: sql::ast::TableReference::AliasedTable(alias.clone()),
        name: sql::ast::ColumnName(column_name.to_string()),
    }
}
