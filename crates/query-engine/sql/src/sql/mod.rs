//! SQL AST types, the low-level SQL string representation, and the query builder
//! that filter translation attaches its conditions to.

pub mod ast;
pub mod builder;
pub mod convert;
pub mod helpers;
pub mod string;
