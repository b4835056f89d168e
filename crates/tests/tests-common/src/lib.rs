pub mod deployment;
pub mod evaluator;
