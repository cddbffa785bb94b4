//! Runtime error types for the miniphp evaluator.

use crate::value::{ArrayKey, Value};
use miniphp_types::ParseError;
use thiserror::Error;

/// Evaluation error. Every variant is fatal to the current run; the first
/// error unwinds to the `run` caller.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// Parser collaborator failure, propagated unmodified.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Assignment to the reserved variable `$this`.
    #[error("cannot re-assign $this")]
    ReservedName,

    /// A bare identifier that is not `true`, `false` or `null`.
    #[error("unknown constant: {name}")]
    UnknownConstant { name: String },

    /// Array lookup with a key that is not present.
    #[error("unknown index: {key} in array")]
    IndexNotFound { key: ArrayKey },

    /// Read of a variable that is not bound in the current scope,
    /// including call parameters left unfilled by the call site.
    #[error("undefined variable: ${name}")]
    UnboundVariable { name: String },

    /// Division or modulo by zero.
    #[error("division by zero in '{operator}'")]
    DivisionByZero { operator: &'static str },

    /// Invalid arithmetic operands: non-numeric strings, arrays in
    /// numeric context, negative shift amounts.
    #[error("arithmetic error: {message}")]
    Arithmetic { message: String },

    /// A value of the wrong type where an array was required.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// `require_once` of a path the loader cannot provide.
    #[error("failed opening required '{path}'")]
    FailedOpeningRequired { path: String },

    /// `return` statement (used internally for control flow; never
    /// escapes a `run`).
    #[error("return")]
    Return(Value),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, RuntimeError>;
