//! Errors for filter translation.

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown filter operator '{0}'.")]
    UnknownOperator(String),
    #[error("'{0}' is used without an attribute to apply it to.")]
    MissingAttributeOperator(String),
    #[error("The operand of '{0}' must be a list of filters.")]
    InvalidLogicalOperand(String),
    #[error("The operand of '$not' must be a filter.")]
    InvalidNegationOperand,
    #[error("'$sub' expects the name of a registered entity{}.", .entity.as_ref().map(|entity| format!(", got '{entity}'")).unwrap_or_default())]
    MissingSubEntity { entity: Option<String> },
    #[error("Invalid '$sub' condition: {0}.")]
    InvalidSubCondition(String),
    #[error("No model registry entry for entity '{0}'.")]
    MissingModelRegistry(String),
    #[error("Operator '{operator}' on '{attribute}' expects a scalar operand.")]
    InvalidPatternOperand { operator: String, attribute: String },
}
