//! Compile a single operator condition on a column.

use std::str::FromStr;

use enum_iterator::Sequence;
use query_engine_sql::sql;
use query_engine_sql::sql::builder::Fragment;

use super::values::Filter;
use crate::translation::error::Error;
use crate::translation::helpers::State;

/// The complete list of comparison operators a filter can apply to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    NoResult,
}

impl Operator {
    /// The key of the operator in a filter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "$eq",
            Self::NotEquals => "$ne",
            Self::In => "$in",
            Self::NotIn => "$notIn",
            Self::LessThan => "$lt",
            Self::LessThanOrEqualTo => "$lte",
            Self::GreaterThan => "$gt",
            Self::GreaterThanOrEqualTo => "$gte",
            Self::Contains => "$contains",
            Self::NotContains => "$notContains",
            Self::StartsWith => "$startsWith",
            Self::NotStartsWith => "$notStartsWith",
            Self::EndsWith => "$endsWith",
            Self::NotEndsWith => "$notEndsWith",
            Self::NoResult => "$noResult",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<Operator>()
            .find(|operator| operator.name() == name)
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }
}

/// Where the wildcards go around a pattern operand.
#[derive(Debug, Clone, Copy)]
enum Wildcards {
    Both,
    Trailing,
    Leading,
}

/// The SQL an operator compiles to.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Comparison(sql::ast::BinaryOperator),
    Membership(sql::ast::BinaryArrayOperator),
    Pattern(sql::ast::BinaryOperator, Wildcards),
    NoResult,
}

impl Operator {
    fn shape(self) -> Shape {
        use sql::ast::{BinaryArrayOperator, BinaryOperator};
        match self {
            Self::Equals => Shape::Comparison(BinaryOperator::Equals),
            Self::NotEquals => Shape::Comparison(BinaryOperator::NotEquals),
            Self::LessThan => Shape::Comparison(BinaryOperator::LessThan),
            Self::LessThanOrEqualTo => Shape::Comparison(BinaryOperator::LessThanOrEqualTo),
            Self::GreaterThan => Shape::Comparison(BinaryOperator::GreaterThan),
            Self::GreaterThanOrEqualTo => Shape::Comparison(BinaryOperator::GreaterThanOrEqualTo),
            Self::In => Shape::Membership(BinaryArrayOperator::In),
            Self::NotIn => Shape::Membership(BinaryArrayOperator::NotIn),
            Self::Contains => Shape::Pattern(BinaryOperator::CaseInsensitiveLike, Wildcards::Both),
            Self::NotContains => {
                Shape::Pattern(BinaryOperator::NotCaseInsensitiveLike, Wildcards::Both)
            }
            Self::StartsWith => {
                Shape::Pattern(BinaryOperator::CaseInsensitiveLike, Wildcards::Trailing)
            }
            Self::NotStartsWith => {
                Shape::Pattern(BinaryOperator::NotCaseInsensitiveLike, Wildcards::Trailing)
            }
            Self::EndsWith => Shape::Pattern(BinaryOperator::CaseInsensitiveLike, Wildcards::Leading),
            Self::NotEndsWith => {
                Shape::Pattern(BinaryOperator::NotCaseInsensitiveLike, Wildcards::Leading)
            }
            Self::NoResult => Shape::NoResult,
        }
    }
}

/// Compile `column <operator> value`, binding the value to a fresh placeholder.
pub fn translate_operator(
    state: &mut State,
    column_name: &str,
    column: &sql::ast::ColumnReference,
    operator: Operator,
    value: &Filter,
) -> Result<Fragment, Error> {
    let placeholder = state.make_placeholder_name(column_name);
    let left = Box::new(sql::ast::Expression::ColumnReference(column.clone()));

    match operator.shape() {
        Shape::Comparison(sql::ast::BinaryOperator::Equals) if value.is_null() => {
            Ok(Fragment::new(sql::ast::Expression::UnaryOperation {
                expression: left,
                operator: sql::ast::UnaryOperator::IsNull,
            }))
        }
        Shape::Comparison(sql::ast::BinaryOperator::NotEquals) if value.is_null() => {
            Ok(Fragment::new(sql::ast::Expression::UnaryOperation {
                expression: left,
                operator: sql::ast::UnaryOperator::IsNotNull,
            }))
        }
        Shape::Comparison(binary_operator) => Ok(compare(
            left,
            binary_operator,
            &placeholder,
            value.to_json(),
        )),
        Shape::Membership(array_operator) => {
            let values = match value {
                Filter::Null => vec![],
                Filter::Sequence(items) => items.iter().map(Filter::to_json).collect(),
                other => vec![other.to_json()],
            };
            // nothing is a member of an empty list, whichever way it is asked
            if values.is_empty() {
                return Ok(Fragment::new(sql::helpers::false_expr()));
            }
            Ok(Fragment::new(sql::ast::Expression::BinaryArrayOperation {
                left,
                operator: array_operator,
                right: Box::new(sql::ast::Expression::Value(sql::ast::Value::ParameterList(
                    placeholder.clone(),
                ))),
            })
            .with_parameter(&placeholder, serde_json::Value::Array(values)))
        }
        Shape::Pattern(binary_operator, wildcards) => {
            let Filter::Scalar(scalar) = value else {
                return Err(Error::InvalidPatternOperand {
                    operator: operator.name().to_string(),
                    attribute: column_name.to_string(),
                });
            };
            let escaped = escape_pattern(&scalar.to_text());
            let pattern = match wildcards {
                Wildcards::Both => format!("%{escaped}%"),
                Wildcards::Trailing => format!("{escaped}%"),
                Wildcards::Leading => format!("%{escaped}"),
            };
            Ok(compare(
                left,
                binary_operator,
                &placeholder,
                serde_json::Value::String(pattern),
            ))
        }
        Shape::NoResult => Ok(Fragment::new(sql::helpers::false_expr())),
    }
}

fn compare(
    left: Box<sql::ast::Expression>,
    operator: sql::ast::BinaryOperator,
    placeholder: &sql::ast::ParameterName,
    value: serde_json::Value,
) -> Fragment {
    Fragment::new(sql::ast::Expression::BinaryOperation {
        left,
        operator,
        right: Box::new(sql::ast::Expression::Value(sql::ast::Value::Parameter(
            placeholder.clone(),
        ))),
    })
    .with_parameter(placeholder, value)
}

/// Backslash-escape the characters `ILIKE` treats specially.
pub fn escape_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
