//! Error types of the parser and loader collaborators.

use thiserror::Error;

/// The parser collaborator failed to turn source text into a statement
/// sequence. Propagated unmodified through the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The loader collaborator failed to produce the statements of an included
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The requested path does not exist (or is unreadable).
    #[error("file not found: '{path}'")]
    NotFound { path: String },

    /// The file was found but its contents did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
