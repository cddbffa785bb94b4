//! Syntax-tree node types for the miniphp language.
//!
//! Nodes are produced by an external parser and consumed read-only by the
//! evaluator. Recursive positions are boxed to keep enum sizes reasonable.
//! Nodes derive [`serde::Serialize`] so the debug dumper can render a
//! structural view of a program.

use serde::Serialize;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A top-level or block-level statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `echo expr, expr, ...;`
    Echo(Vec<Expr>),
    /// An expression evaluated for its side effects: `$x = 1;`
    Expr(Expr),
    /// `function name($a, $b = default) { ... }`
    Function(FunctionDecl),
    /// `return;` / `return expr;`
    Return(Option<Expr>),
    /// `if (...) { ... } elseif (...) { ... } else { ... }`
    If(IfStmt),
    /// `foreach ($arr as $k => $v) { ... }`
    Foreach(ForeachStmt),
    /// `require_once 'path';`
    RequireOnce(Expr),
    /// An empty statement: `;`
    Nop,
}

/// `function name(params) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// A declared parameter: `$name` or `$name = default`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Expr) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// The `if` construct with its `elseif` chain and optional `else` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Vec<Stmt>,
    pub elseifs: Vec<ElseIf>,
    pub else_body: Option<Vec<Stmt>>,
}

/// One `elseif (cond) { body }` branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseIf {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

/// `foreach (expr as $value)` / `foreach (expr as $key => $value)`.
///
/// Loop variables bind into the scope that is current at the loop site;
/// there is no per-iteration scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeachStmt {
    pub expr: Expr,
    pub key_var: Option<String>,
    pub value_var: String,
    pub body: Vec<Stmt>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    StringLit(String),
    IntLit(i64),
    FloatLit(f64),
    /// `[v, k => v, ...]` — insertion order is preserved at runtime.
    ArrayLit(Vec<ArrayItem>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `$var = expr` — the target is always a plain variable.
    Assign {
        var: String,
        value: Box<Expr>,
    },
    /// `$var`
    Variable(String),
    /// A bare identifier: `true`, `false`, `null`.
    ConstFetch(String),
    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `name(args)`
    Call {
        name: String,
        args: Vec<Arg>,
    },
}

/// One element of an array literal, with an optional explicit key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

impl ArrayItem {
    pub fn value(value: Expr) -> Self {
        Self { key: None, value }
    }

    pub fn keyed(key: Expr, value: Expr) -> Self {
        Self {
            key: Some(key),
            value,
        }
    }
}

/// One call-site argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
    pub value: Expr,
}

impl Arg {
    pub fn new(value: Expr) -> Self {
        Self { value }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// The binary operators of the language.
///
/// `And`/`Or` and `LogicalAnd`/`LogicalOr` evaluate identically; the latter
/// pair exists for parser-level precedence parity with the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    /// `.`
    Concat,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<=>`
    Spaceship,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    Identical,
    /// `!==`
    NotIdentical,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `and`
    LogicalAnd,
    /// `or`
    LogicalOr,
    /// `xor`
    LogicalXor,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `??`
    Coalesce,
}

impl BinaryOp {
    /// The operator's source-language spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Concat => ".",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Spaceship => "<=>",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::And => "&&",
            Self::Or => "||",
            Self::LogicalAnd => "and",
            Self::LogicalOr => "or",
            Self::LogicalXor => "xor",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Coalesce => "??",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
