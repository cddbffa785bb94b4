//! Global function table.

use miniphp_types::ast::FunctionDecl;
use std::collections::BTreeMap;

/// Registry of declared functions, addressed by name only — a single
/// global namespace with no overloading. A later declaration under the
/// same name silently replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct Functions {
    defs: BTreeMap<String, FunctionDecl>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, overwriting any existing entry.
    pub fn define(&mut self, decl: FunctionDecl) {
        self.defs.insert(decl.name.clone(), decl);
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionDecl> {
        self.defs.get(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }
}
