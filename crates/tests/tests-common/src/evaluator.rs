//! Run statements against in-memory tables.
//!
//! Only the part of SQL the filter compiler emits is supported. Expressions follow
//! SQL's three-valued logic, with JSON `null` standing for `NULL`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{anyhow, bail};
use indexmap::IndexMap;
use query_engine_sql::sql::ast;
use query_engine_sql::sql::string::Parameters;
use serde_json::Value;

/// A row, by column name.
pub type Row = IndexMap<String, Value>;

/// In-memory tables, by table name.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: BTreeMap<String, Vec<Row>>,
}

/// A row in scope while an expression is evaluated.
#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    /// The alias of the table if it has one, the table name otherwise.
    name: &'a str,
    row: &'a Row,
}

struct Context<'a> {
    database: &'a Database,
    parameters: &'a Parameters,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    #[must_use]
    pub fn with_table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    /// The rows a statement returns. For `DELETE`, the rows it would delete.
    pub fn run(&self, statement: &ast::Statement, parameters: &Parameters) -> anyhow::Result<Vec<Row>> {
        let context = Context {
            database: self,
            parameters,
        };
        match statement {
            ast::Statement::Select(select) => context.select(select, &[]),
            ast::Statement::Delete(delete) => {
                let table = self.table(&delete.table.0)?;
                let mut deleted = vec![];
                for row in table {
                    let frame = Frame {
                        name: &delete.table.0,
                        row,
                    };
                    if context.condition(&delete.where_.0, &[frame])? {
                        deleted.push(row.clone());
                    }
                }
                Ok(deleted)
            }
        }
    }

    fn table(&self, name: &str) -> anyhow::Result<&Vec<Row>> {
        self.tables
            .get(name)
            .ok_or_else(|| anyhow!("unknown table {name}"))
    }
}

impl<'a> Context<'a> {
    fn select(&self, select: &ast::Select, outer: &[Frame]) -> anyhow::Result<Vec<Row>> {
        let Some(ast::From::Table { reference, alias }) = &select.from else {
            bail!("a select without FROM is not supported");
        };
        let ast::TableReference::DBTable(ast::TableName(table_name)) = reference else {
            bail!("selecting from an alias is not supported");
        };
        let name = alias.as_ref().map_or(table_name.as_str(), |alias| alias.name.as_str());

        let mut matching = vec![];
        for row in self.database.table(table_name)? {
            let mut frames = outer.to_vec();
            frames.push(Frame { name, row });
            if self.condition(&select.where_.0, &frames)? {
                matching.push(frames);
            }
        }

        match &select.select_list {
            ast::SelectList::SelectStar => Ok(matching
                .iter()
                .filter_map(|frames| frames.last().map(|frame| frame.row.clone()))
                .collect()),
            ast::SelectList::SelectList(columns)
                if columns.iter().any(|(_, expression)| is_aggregate(expression)) =>
            {
                let mut row = Row::new();
                for (alias, expression) in columns {
                    row.insert(
                        alias.name.clone(),
                        self.evaluate(expression, outer, Some(matching.len()))?,
                    );
                }
                Ok(vec![row])
            }
            ast::SelectList::SelectList(columns) => matching
                .iter()
                .map(|frames| -> anyhow::Result<Row> {
                    let mut row = Row::new();
                    for (alias, expression) in columns {
                        row.insert(alias.name.clone(), self.evaluate(expression, frames, None)?);
                    }
                    Ok(row)
                })
                .collect(),
        }
    }

    /// Whether a WHERE condition holds. `NULL` does not.
    fn condition(&self, expression: &ast::Expression, frames: &[Frame]) -> anyhow::Result<bool> {
        match self.evaluate(expression, frames, None)? {
            Value::Bool(holds) => Ok(holds),
            Value::Null => Ok(false),
            other => bail!("expected a boolean condition, got {other}"),
        }
    }

    fn evaluate(
        &self,
        expression: &ast::Expression,
        frames: &[Frame],
        count: Option<usize>,
    ) -> anyhow::Result<Value> {
        match expression {
            ast::Expression::And { left, right } => {
                let left = truth(&self.evaluate(left, frames, count)?)?;
                let right = truth(&self.evaluate(right, frames, count)?)?;
                Ok(match (left, right) {
                    (Some(false), _) | (_, Some(false)) => Value::Bool(false),
                    (Some(true), Some(true)) => Value::Bool(true),
                    _ => Value::Null,
                })
            }
            ast::Expression::Or { left, right } => {
                let left = truth(&self.evaluate(left, frames, count)?)?;
                let right = truth(&self.evaluate(right, frames, count)?)?;
                Ok(match (left, right) {
                    (Some(true), _) | (_, Some(true)) => Value::Bool(true),
                    (Some(false), Some(false)) => Value::Bool(false),
                    _ => Value::Null,
                })
            }
            ast::Expression::Not(expression) => {
                Ok(truth(&self.evaluate(expression, frames, count)?)?
                    .map_or(Value::Null, |holds| Value::Bool(!holds)))
            }
            ast::Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, frames, count)?;
                let right = self.evaluate(right, frames, count)?;
                binary_operation(&left, *operator, &right)
            }
            ast::Expression::BinaryArrayOperation {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, frames, count)?;
                let values = self.list(right, frames)?;
                let is_member = membership(&left, &values)?;
                Ok(match (operator, is_member) {
                    (_, None) => Value::Null,
                    (ast::BinaryArrayOperator::In, Some(is_member)) => Value::Bool(is_member),
                    (ast::BinaryArrayOperator::NotIn, Some(is_member)) => Value::Bool(!is_member),
                })
            }
            ast::Expression::UnaryOperation {
                expression,
                operator,
            } => {
                let is_null = self.evaluate(expression, frames, count)?.is_null();
                Ok(Value::Bool(match operator {
                    ast::UnaryOperator::IsNull => is_null,
                    ast::UnaryOperator::IsNotNull => !is_null,
                }))
            }
            ast::Expression::ColumnReference(reference) => resolve(frames, reference),
            ast::Expression::Value(value) => match value {
                ast::Value::Int4(int) => Ok(Value::from(*int)),
                ast::Value::Bool(boolean) => Ok(Value::Bool(*boolean)),
                ast::Value::Parameter(name) => self.parameter(name).cloned(),
                ast::Value::ParameterList(name) => {
                    bail!("the list parameter {} is used as a scalar", name.0)
                }
            },
            ast::Expression::Count(ast::CountType::Star) => count
                .map(Value::from)
                .ok_or_else(|| anyhow!("COUNT(*) outside of an aggregating select")),
            ast::Expression::SubSelect(select) => {
                let rows = self.select(select, frames)?;
                match rows.as_slice() {
                    [] => Ok(Value::Null),
                    [row] => row
                        .values()
                        .next()
                        .cloned()
                        .ok_or_else(|| anyhow!("a scalar subquery selects no column")),
                    _ => bail!("a scalar subquery returned {} rows", rows.len()),
                }
            }
            ast::Expression::RawSql(sql) => bail!("cannot evaluate raw SQL: {sql}"),
        }
    }

    /// The right side of `IN`.
    fn list(&self, expression: &ast::Expression, frames: &[Frame]) -> anyhow::Result<Vec<Value>> {
        match expression {
            ast::Expression::Value(ast::Value::ParameterList(name)) => match self.parameter(name)? {
                Value::Array(values) => Ok(values.clone()),
                other => bail!("the list parameter {} is bound to {other}", name.0),
            },
            ast::Expression::SubSelect(select) => self
                .select(select, frames)?
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .next()
                        .map(|(_, value)| value)
                        .ok_or_else(|| anyhow!("an IN subquery selects no column"))
                })
                .collect(),
            other => bail!("unsupported right side of IN: {other:?}"),
        }
    }

    fn parameter(&self, name: &ast::ParameterName) -> anyhow::Result<&'a Value> {
        self.parameters
            .get(&name.0)
            .ok_or_else(|| anyhow!("unbound parameter {}", name.0))
    }
}

fn is_aggregate(expression: &ast::Expression) -> bool {
    match expression {
        ast::Expression::Count(_) => true,
        ast::Expression::BinaryOperation { left, right, .. } => {
            is_aggregate(left) || is_aggregate(right)
        }
        _ => false,
    }
}

fn resolve(frames: &[Frame], reference: &ast::ColumnReference) -> anyhow::Result<Value> {
    let (table, column) = match reference {
        ast::ColumnReference::Column(ast::ColumnName(name)) => match name.rsplit_once('.') {
            Some((table, column)) => (Some(table), column),
            None => (None, name.as_str()),
        },
        ast::ColumnReference::TableColumn {
            table,
            name: ast::ColumnName(column),
        } => {
            let table = match table {
                ast::TableReference::DBTable(ast::TableName(name)) => name.as_str(),
                ast::TableReference::AliasedTable(alias) => alias.name.as_str(),
            };
            (Some(table), column.as_str())
        }
    };

    // the innermost table in scope wins
    frames
        .iter()
        .rev()
        .filter(|frame| table.map_or(true, |table| table == frame.name))
        .find_map(|frame| frame.row.get(column))
        .cloned()
        .ok_or_else(|| anyhow!("unknown column {reference:?}"))
}

fn truth(value: &Value) -> anyhow::Result<Option<bool>> {
    match value {
        Value::Bool(boolean) => Ok(Some(*boolean)),
        Value::Null => Ok(None),
        other => bail!("expected a boolean, got {other}"),
    }
}

fn compare(left: &Value, right: &Value) -> anyhow::Result<Option<Ordering>> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(None),
        (Value::Number(left), Value::Number(right)) => Ok(left
            .as_f64()
            .zip(right.as_f64())
            .and_then(|(left, right)| left.partial_cmp(&right))),
        (Value::String(left), Value::String(right)) => Ok(Some(left.cmp(right))),
        (Value::Bool(left), Value::Bool(right)) => Ok(Some(left.cmp(right))),
        _ => bail!("cannot compare {left} with {right}"),
    }
}

fn binary_operation(
    left: &Value,
    operator: ast::BinaryOperator,
    right: &Value,
) -> anyhow::Result<Value> {
    let holds = match operator {
        ast::BinaryOperator::CaseInsensitiveLike | ast::BinaryOperator::NotCaseInsensitiveLike => {
            match (left, right) {
                (Value::Null, _) | (_, Value::Null) => None,
                (Value::String(value), Value::String(pattern)) => {
                    let matches = like_match(&value.to_lowercase(), &pattern.to_lowercase());
                    Some(matches == (operator == ast::BinaryOperator::CaseInsensitiveLike))
                }
                _ => bail!("ILIKE needs strings, got {left} and {right}"),
            }
        }
        _ => compare(left, right)?.map(|ordering| match operator {
            ast::BinaryOperator::Equals => ordering == Ordering::Equal,
            ast::BinaryOperator::NotEquals => ordering != Ordering::Equal,
            ast::BinaryOperator::LessThan => ordering == Ordering::Less,
            ast::BinaryOperator::LessThanOrEqualTo => ordering != Ordering::Greater,
            ast::BinaryOperator::GreaterThan => ordering == Ordering::Greater,
            ast::BinaryOperator::GreaterThanOrEqualTo => ordering != Ordering::Less,
            ast::BinaryOperator::CaseInsensitiveLike
            | ast::BinaryOperator::NotCaseInsensitiveLike => false,
        }),
    };
    Ok(holds.map_or(Value::Null, Value::Bool))
}

/// `left IN values`, or `None` when SQL would answer `NULL`.
fn membership(left: &Value, values: &[Value]) -> anyhow::Result<Option<bool>> {
    if left.is_null() {
        return Ok(None);
    }
    let mut saw_null = false;
    for value in values {
        match compare(left, value)? {
            Some(Ordering::Equal) => return Ok(Some(true)),
            Some(_) => {}
            None => saw_null = true,
        }
    }
    Ok(if saw_null { None } else { Some(false) })
}

/// Match a `LIKE` pattern: `%` matches any run of characters, `_` exactly one, and a
/// backslash makes the next character literal.
pub fn like_match(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_match_from(&value, &pattern)
}

fn like_match_from(value: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => value.is_empty(),
        Some(('%', rest)) => (0..=value.len()).any(|skip| like_match_from(&value[skip..], rest)),
        Some(('_', rest)) => !value.is_empty() && like_match_from(&value[1..], rest),
        Some(('\\', rest)) => match (rest.split_first(), value.split_first()) {
            (Some((literal, rest)), Some((character, value))) => {
                literal == character && like_match_from(value, rest)
            }
            _ => false,
        },
        Some((literal, rest)) => match value.split_first() {
            Some((character, value)) => literal == character && like_match_from(value, rest),
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns() {
        assert!(like_match("ella377", "e%"));
        assert!(like_match("eve123", "%3"));
        assert!(!like_match("edward969", "%3"));
        assert!(like_match("50%_off deals", "%50\\%\\_off%"));
        assert!(!like_match("50 off deals", "%50\\%\\_off%"));
        assert!(like_match("a\\b", "a\\\\b"));
        assert!(like_match("clark218", "cl_rk%"));
        assert!(!like_match("clark", "cl_rk_"));
    }

    #[test]
    fn membership_follows_sql_nulls() {
        let values = [Value::from(1), Value::Null];
        assert_eq!(membership(&Value::from(1), &values).unwrap(), Some(true));
        assert_eq!(membership(&Value::from(2), &values).unwrap(), None);
        assert_eq!(membership(&Value::from(2), &[Value::from(1)]).unwrap(), Some(false));
        assert_eq!(membership(&Value::Null, &[Value::from(1)]).unwrap(), None);
    }
}
