//! Structural dump of a parsed statement sequence.
//!
//! A diagnostic rendering of the tree the parser handed over, written to
//! the output sink ahead of program output when the debug flag is set.

use miniphp_types::ast::Stmt;

/// Render the statement sequence as pretty-printed JSON.
pub fn dump(stmts: &[Stmt]) -> String {
    serde_json::to_string_pretty(stmts).unwrap_or_else(|err| format!("<dump failed: {err}>"))
}
