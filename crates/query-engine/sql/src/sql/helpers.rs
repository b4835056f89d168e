//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

// Aliasing //

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

// Boolean expressions //

/// `COUNT(*) > 0`
pub fn count_star_is_positive() -> Expression {
    Expression::BinaryOperation {
        left: Box::new(Expression::Count(CountType::Star)),
        operator: BinaryOperator::GreaterThan,
        right: Box::new(Expression::Value(Value::Int4(0))),
    }
}

// SELECTs //

/// Build a select with a select list and a FROM clause, filtered by an optional expression.
pub fn simple_select(select_list: SelectList, from: From, where_: Option<Expression>) -> Select {
    Select {
        select_list,
        from: Some(from),
        where_: Where(where_.unwrap_or_else(empty_where)),
    }
}

/// Build a `SELECT *` from a table, without an alias.
pub fn star_select(table: TableName) -> Select {
    simple_select(
        SelectList::SelectStar,
        From::Table {
            reference: TableReference::DBTable(table),
            alias: None,
        },
        None,
    )
}
