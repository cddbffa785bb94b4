//! miniphp tree-walking evaluator.
//!
//! Executes a parsed statement sequence directly from the syntax tree:
//! dynamic values with the source language's coercion rules, a flat
//! per-call-frame scope, a global function table, and recursive node
//! dispatch. Parsing and file loading are external collaborators behind
//! the [`Parse`] and [`Load`] traits.

mod error;
mod evaluator;
mod functions;
mod interpreter;
mod scope;
mod value;

pub mod dump;

pub use error::{EvalResult, RuntimeError};
pub use evaluator::Evaluator;
pub use functions::Functions;
pub use interpreter::{EvalConfig, Interpreter, Load, Parse};
pub use scope::Scope;
pub use value::{ArrayKey, Number, PhpArray, Value};
