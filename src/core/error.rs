// ============================================================================
// scope-watch - Errors
// Failures raised while compiling or running binding expressions
// ============================================================================

use thiserror::Error;

/// Result alias for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;

/// Failure while lexing, parsing, evaluating or assigning an expression.
///
/// These never cross into `Scope::apply`: the [`Evaluator`](crate::Evaluator)
/// contract swallows them and reports `Value::Undefined` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("cannot read property '{property}' of {target}")]
    NilAccess { property: String, target: &'static str },

    #[error("'{callee}' is not a function")]
    NotCallable { callee: String },

    #[error("invalid assignment target: {target}")]
    InvalidAssignmentTarget { target: String },

    #[error("invalid array length {value}")]
    InvalidArrayLength { value: String },

    #[error("cannot set property '{property}' on {target}")]
    NotAssignable { property: String, target: &'static str },
}
