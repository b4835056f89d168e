//! Compile a filter tree into a SQL predicate and attach it to a statement.

pub mod error;
pub mod helpers;
pub mod query;
