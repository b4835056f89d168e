//! The query-builder capability filter translation attaches conditions to.
//!
//! A [`QueryBuilder`] stands for the statement the host is assembling. Conditions
//! arrive as [`Fragment`]s, an expression together with the parameters it binds,
//! and are grouped with [`Brackets`]. Subqueries are assembled on a separate
//! [`SubQueryBuilder`] and then embedded according to the [`SubquerySupport`]
//! of the outer statement.

use super::ast::{self, Expression};
use super::convert;
use super::helpers;
use super::string::{Parameters, SQL};

/// A boolean condition and the values bound to the placeholders it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub expression: Expression,
    pub parameters: Parameters,
}

impl Fragment {
    /// A fragment binding no parameters.
    pub fn new(expression: Expression) -> Fragment {
        Fragment {
            expression,
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, name: &ast::ParameterName, value: serde_json::Value) -> Self {
        self.parameters.insert(name.0.clone(), value);
        self
    }

    /// Rewrite the expression, keeping the bound parameters.
    pub fn map_expression(self, f: impl FnOnce(Expression) -> Expression) -> Self {
        Fragment {
            expression: f(self.expression),
            parameters: self.parameters,
        }
    }
}

/// How a statement can host subqueries in its WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubquerySupport {
    /// The subquery is embedded in the statement's AST.
    Nested,
    /// The subquery is rendered on its own and spliced in as SQL text. Its
    /// parameters must be carried into the outer statement explicitly.
    Standalone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// A bracketed group of conditions.
///
/// Conditions are folded left to right, each joined to what came before it by
/// the connective it was added with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Brackets {
    conditions: Vec<(Connective, Expression)>,
    parameters: Parameters,
}

impl Brackets {
    pub fn new() -> Brackets {
        Brackets::default()
    }

    pub fn and_where(&mut self, fragment: Fragment) {
        self.push(Connective::And, fragment);
    }

    pub fn or_where(&mut self, fragment: Fragment) {
        self.push(Connective::Or, fragment);
    }

    fn push(&mut self, connective: Connective, fragment: Fragment) {
        let Fragment {
            expression,
            parameters,
        } = fragment;
        self.conditions.push((connective, expression));
        self.set_parameters(parameters);
    }

    /// Merge parameters bound elsewhere into this group.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters.extend(parameters);
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The combined condition, if any condition was added.
    pub fn expression(&self) -> Option<Expression> {
        fold_conditions(self.conditions.iter().cloned())
    }

    pub fn into_parts(self) -> (Option<Expression>, Parameters) {
        (fold_conditions(self.conditions), self.parameters)
    }

    pub fn into_fragment(self) -> Option<Fragment> {
        let (expression, parameters) = self.into_parts();
        expression.map(|expression| Fragment {
            expression,
            parameters,
        })
    }
}

fn fold_conditions(
    conditions: impl IntoIterator<Item = (Connective, Expression)>,
) -> Option<Expression> {
    conditions
        .into_iter()
        .reduce(|(_, left), (connective, right)| {
            let combined = match connective {
                Connective::And => Expression::And {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Connective::Or => Expression::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
            (connective, combined)
        })
        .map(|(_, expression)| expression)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Select,
    Count,
    Delete,
}

/// A statement under construction whose WHERE clause receives compiled filters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    kind: StatementKind,
    table: ast::TableName,
    wheres: Brackets,
}

impl QueryBuilder {
    /// `SELECT * FROM table`
    pub fn select(table: ast::TableName) -> QueryBuilder {
        QueryBuilder::new(StatementKind::Select, table)
    }

    /// `SELECT COUNT(*) AS "count" FROM table`
    pub fn count(table: ast::TableName) -> QueryBuilder {
        QueryBuilder::new(StatementKind::Count, table)
    }

    /// `DELETE FROM table`
    pub fn delete(table: ast::TableName) -> QueryBuilder {
        QueryBuilder::new(StatementKind::Delete, table)
    }

    fn new(kind: StatementKind, table: ast::TableName) -> QueryBuilder {
        QueryBuilder {
            kind,
            table,
            wheres: Brackets::new(),
        }
    }

    pub fn subquery_support(&self) -> SubquerySupport {
        match self.kind {
            StatementKind::Select | StatementKind::Count => SubquerySupport::Nested,
            StatementKind::Delete => SubquerySupport::Standalone,
        }
    }

    pub fn and_where(&mut self, fragment: Fragment) {
        self.wheres.and_where(fragment);
    }

    pub fn parameters(&self) -> &Parameters {
        self.wheres.parameters()
    }

    /// The statement as assembled so far.
    pub fn build(&self) -> ast::Statement {
        let where_ = ast::Where(self.wheres.expression().unwrap_or_else(helpers::empty_where));
        match self.kind {
            StatementKind::Select => ast::Statement::Select(ast::Select {
                where_,
                ..helpers::star_select(self.table.clone())
            }),
            StatementKind::Count => ast::Statement::Select(ast::Select {
                select_list: ast::SelectList::SelectList(vec![(
                    helpers::make_column_alias("count".to_string()),
                    Expression::Count(ast::CountType::Star),
                )]),
                where_,
                ..helpers::star_select(self.table.clone())
            }),
            StatementKind::Delete => ast::Statement::Delete(ast::Delete {
                table: self.table.clone(),
                where_,
            }),
        }
    }

    /// Render the statement together with its bound parameters.
    pub fn to_sql(&self) -> SQL {
        let mut sql = convert::statement_to_sql(&self.build());
        sql.params = self.parameters().clone();
        sql
    }
}

/// A SELECT assembled independently of the statement it ends up in.
#[derive(Debug, Clone, PartialEq)]
pub struct SubQueryBuilder {
    select_list: ast::SelectList,
    from: ast::From,
    wheres: Brackets,
}

impl SubQueryBuilder {
    pub fn new(select_list: ast::SelectList, from: ast::From) -> SubQueryBuilder {
        SubQueryBuilder {
            select_list,
            from,
            wheres: Brackets::new(),
        }
    }

    pub fn and_where(&mut self, fragment: Fragment) {
        self.wheres.and_where(fragment);
    }

    /// Finish the subquery, returning the expression to embed in the outer
    /// statement and the parameters it binds.
    pub fn into_parts(self, support: SubquerySupport) -> (Expression, Parameters) {
        let (where_, parameters) = self.wheres.into_parts();
        let select = helpers::simple_select(self.select_list, self.from, where_);
        let expression = match support {
            SubquerySupport::Nested => Expression::SubSelect(Box::new(select)),
            SubquerySupport::Standalone => {
                let rendered = convert::select_to_sql(&select);
                Expression::RawSql(format!("({})", rendered.sql))
            }
        };
        (expression, parameters)
    }
}
