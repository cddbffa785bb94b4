//! The `run` entry point and its collaborator seams.

use crate::dump;
use crate::error::RuntimeError;
use crate::evaluator::Evaluator;
use crate::scope::Scope;
use crate::value::Value;
use miniphp_types::ast::Stmt;
use miniphp_types::{LoadError, ParseError};

/// The parser collaborator: source text to a top-level statement sequence.
pub trait Parse {
    fn parse(&mut self, source: &str) -> Result<Vec<Stmt>, ParseError>;
}

/// The loader collaborator: a `require_once` path to the statements of the
/// file behind it. Once-only semantics are enforced by the interpreter,
/// not the loader.
pub trait Load {
    fn load(&mut self, path: &str) -> Result<Vec<Stmt>, LoadError>;
}

/// Evaluation options, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct EvalConfig {
    /// Write a structural dump of the parsed tree to the output sink
    /// before evaluating it.
    pub debug: bool,
    /// Restore the caller's scope when a call exits through `return`.
    /// With `false`, restoration happens only when a body finishes
    /// without returning, so an early return leaves the callee scope
    /// current — historical behavior some programs depend on.
    pub restore_scope_on_return: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            debug: false,
            restore_scope_on_return: true,
        }
    }
}

/// The interpreter: a parser collaborator plus the evaluation engine.
pub struct Interpreter<P> {
    parser: P,
    eval: Evaluator,
}

impl<P: Parse> Interpreter<P> {
    pub fn new(parser: P) -> Self {
        Self::with_config(parser, EvalConfig::default())
    }

    pub fn with_config(parser: P, config: EvalConfig) -> Self {
        Self {
            parser,
            eval: Evaluator::with_config(config),
        }
    }

    /// Attach a loader collaborator for `require_once` statements.
    pub fn with_loader(mut self, loader: impl Load + 'static) -> Self {
        self.eval.set_loader(Box::new(loader));
        self
    }

    /// Parse `source` and evaluate each top-level statement in order
    /// against a fresh global scope and an empty function table. A
    /// top-level `return` ends the run early and normally.
    pub fn run(&mut self, source: &str) -> Result<(), RuntimeError> {
        let stmts = self.parser.parse(source)?;
        self.eval.reset();
        if self.eval.config().debug {
            let rendered = dump::dump(&stmts);
            self.eval.write_output(&rendered);
            self.eval.write_output("\n");
        }
        match self.eval.eval_stmts(&stmts) {
            Ok(()) | Err(RuntimeError::Return(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Everything echoed (and dumped) by the last run.
    pub fn output(&self) -> &str {
        self.eval.output()
    }

    pub fn take_output(&mut self) -> String {
        self.eval.take_output()
    }

    /// The scope left current after the last run.
    pub fn scope(&self) -> &Scope {
        self.eval.scope()
    }

    /// Look up a variable in the current scope.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.eval.scope().get(name).ok()
    }
}
