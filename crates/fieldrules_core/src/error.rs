//! Error types for rule construction and validation runs.
//!
//! Ordinary validation failures are never errors: rules report them through
//! their fail callback and they end up in the validator's error map. The
//! types here are faults that abort the operation that raised them.

use thiserror::Error;

/// Result type for fieldrules operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Faults raised while configuring or running validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Malformed rule options or other bad configuration
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Condition operator outside the supported set
    #[error("Invalid operator: {0}. Must be one of: =, !=, >, >=, <, <=, contains, not_contains")]
    InvalidOperator(String),

    /// Condition boolean other than `and` / `or`
    #[error("Invalid boolean: {0}. Must be one of: and, or")]
    InvalidBoolean(String),

    /// Rule id not present in the registry
    #[error("Validation rule with id {0} has not been registered.")]
    UnregisteredRule(String),

    /// Rule id registered twice
    #[error("A validation rule with the id {0} has already been registered.")]
    DuplicateRule(String),

    /// A condition referenced a field missing from the value bag
    #[error("Field {0} not found in test values.")]
    MissingConditionField(String),

    /// A condition compared values that have no ordering
    #[error("Cannot apply operator '{operator}' to {left} and {right}")]
    IncomparableValues {
        /// Operator symbol
        operator: String,
        /// Type of the tested value
        left: String,
        /// Type of the condition operand
        right: String,
    },

    /// A rule received a value it fundamentally cannot evaluate
    #[error("Validation fault: {0}")]
    Domain(String),
}

impl ValidationError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a new domain fault.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Creates a new incomparable values error.
    pub fn incomparable(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::IncomparableValues {
            operator: operator.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Returns true for faults caused by setup rather than by a value.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Domain(_))
    }
}
