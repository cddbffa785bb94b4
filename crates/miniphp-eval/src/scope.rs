//! Flat variable scope, one live instance per call frame.

use crate::error::{EvalResult, RuntimeError};
use crate::value::Value;
use std::collections::BTreeMap;

/// Variable name to value bindings for one activation.
///
/// There is no nesting and no parent-chain lookup: a function call never
/// sees the caller's bindings except through explicit call arguments.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable. Reading a name that was never set is an error.
    pub fn get(&self, name: &str) -> EvalResult<&Value> {
        self.bindings
            .get(name)
            .ok_or_else(|| RuntimeError::UnboundVariable {
                name: name.to_string(),
            })
    }

    /// Insert or overwrite a binding. `this` is reserved and rejected.
    pub fn set(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if name == "this" {
            return Err(RuntimeError::ReservedName);
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
