//! Error types for criteria compilation.
//!
//! Every error is raised synchronously where it is detected and aborts the
//! whole compilation. There is no partial result: a malformed node anywhere in
//! a criteria chain fails the top-level call.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The error type for all compiler operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    /// An operator received a value of the wrong arity, type or shape.
    #[error("invalid argument for {operator} on field '{field}': {message}")]
    InvalidArgument {
        field: String,
        operator: String,
        message: String,
    },

    /// The operator, geo relation or distance unit is not supported here.
    #[error("unsupported operator '{operator}' ({context})")]
    UnsupportedOperator { operator: String, context: String },

    /// The top-level query variant cannot be compiled.
    #[error("unsupported query type: {query_type}")]
    UnsupportedQueryType { query_type: String },

    /// A criteria node has entries but no field to apply them to.
    #[error("criteria entry {operator} has no field")]
    MissingField { operator: String },

    /// The compiler configuration is invalid.
    #[error("invalid compiler configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for compiler operations.
pub type CriteriaResult<T> = Result<T, CriteriaError>;

impl CriteriaError {
    /// Creates an [`CriteriaError::InvalidArgument`].
    pub fn invalid_argument(
        field: impl Into<String>,
        operator: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        CriteriaError::InvalidArgument {
            field: field.into(),
            operator: operator.to_string(),
            message: message.into(),
        }
    }

    /// Creates an [`CriteriaError::UnsupportedOperator`].
    pub fn unsupported_operator(operator: impl ToString, context: impl Into<String>) -> Self {
        CriteriaError::UnsupportedOperator {
            operator: operator.to_string(),
            context: context.into(),
        }
    }

    /// Returns true if the error describes a malformed user query rather than
    /// a misconfigured compiler.
    ///
    /// Callers surface these as query validation failures.
    pub fn is_query_error(&self) -> bool {
        !matches!(self, CriteriaError::InvalidConfig { .. })
    }

    /// Returns the field name the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CriteriaError::InvalidArgument { field, .. } => Some(field),
            _ => None,
        }
    }
}
