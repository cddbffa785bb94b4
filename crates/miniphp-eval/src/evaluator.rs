//! Core statement and expression evaluator.

use crate::error::{EvalResult, RuntimeError};
use crate::functions::Functions;
use crate::interpreter::{EvalConfig, Load};
use crate::scope::Scope;
use crate::value::{ArrayKey, Number, PhpArray, Value};
use miniphp_types::ast::*;
use miniphp_types::LoadError;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// The core evaluator — walks syntax nodes and produces Values.
///
/// Owns the currently-active [`Scope`], the global function table, the
/// output sink and the set of already-required paths. One instance serves
/// one `run` at a time; [`reset`](Evaluator::reset) returns it to the
/// initial state.
pub struct Evaluator {
    /// The scope of the currently-executing activation.
    scope: Scope,
    /// Declared functions, global namespace.
    functions: Functions,
    /// Append-only output sink fed by `echo` and the debug dump.
    output: String,
    /// Paths already executed by `require_once` this run.
    loaded: BTreeSet<String>,
    /// Loader collaborator for `require_once`, if attached.
    loader: Option<Box<dyn Load>>,
    config: EvalConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            scope: Scope::new(),
            functions: Functions::new(),
            output: String::new(),
            loaded: BTreeSet::new(),
            loader: None,
            config,
        }
    }

    pub fn set_loader(&mut self, loader: Box<dyn Load>) {
        self.loader = Some(loader);
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Discard all per-run state: scope, function table, required-path
    /// set and the output sink.
    pub fn reset(&mut self) {
        self.scope = Scope::new();
        self.functions.clear();
        self.loaded.clear();
        self.output.clear();
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub(crate) fn write_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a statement sequence in order.
    pub fn eval_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    /// Evaluate a single statement. Statements that produce no value yield
    /// [`Value::Null`].
    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        match stmt {
            Stmt::Echo(exprs) => self.eval_echo(exprs),
            Stmt::Expr(expr) => self.eval_expr(expr),
            Stmt::Function(decl) => {
                self.functions.define(decl.clone());
                Ok(Value::Null)
            }
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                // Unwinds to the nearest enclosing call dispatch.
                Err(RuntimeError::Return(value))
            }
            Stmt::If(stmt) => self.eval_if(stmt),
            Stmt::Foreach(stmt) => self.eval_foreach(stmt),
            Stmt::RequireOnce(path) => self.eval_require_once(path),
            Stmt::Nop => Ok(Value::Null),
        }
    }

    fn eval_echo(&mut self, exprs: &[Expr]) -> EvalResult<Value> {
        // All operands evaluate before anything is written.
        let mut parts = Vec::with_capacity(exprs.len());
        for expr in exprs {
            parts.push(self.eval_expr(expr)?.to_string());
        }
        self.output.push_str(&parts.concat());
        Ok(Value::Null)
    }

    fn eval_if(&mut self, stmt: &IfStmt) -> EvalResult<Value> {
        if self.eval_expr(&stmt.cond)?.is_truthy() {
            self.eval_stmts(&stmt.then_body)?;
            return Ok(Value::Null);
        }
        for elseif in &stmt.elseifs {
            if self.eval_expr(&elseif.cond)?.is_truthy() {
                self.eval_stmts(&elseif.body)?;
                return Ok(Value::Null);
            }
        }
        if let Some(body) = &stmt.else_body {
            self.eval_stmts(body)?;
        }
        Ok(Value::Null)
    }

    fn eval_foreach(&mut self, stmt: &ForeachStmt) -> EvalResult<Value> {
        let source = self.eval_expr(&stmt.expr)?;
        let array = match source {
            Value::Array(array) => array,
            other => {
                return Err(RuntimeError::TypeError {
                    message: format!("foreach over a {} value", other.type_name()),
                })
            }
        };
        // Loop variables bind into the surrounding scope; there is no
        // per-iteration isolation.
        for (key, value) in array.entries() {
            self.scope.set(&stmt.value_var, value.clone())?;
            if let Some(key_var) = &stmt.key_var {
                self.scope.set(key_var, key.to_value())?;
            }
            self.eval_stmts(&stmt.body)?;
        }
        Ok(Value::Null)
    }

    fn eval_require_once(&mut self, path_expr: &Expr) -> EvalResult<Value> {
        let path = self.eval_expr(path_expr)?.to_string();
        if self.loaded.contains(&path) {
            return Ok(Value::Null);
        }
        let Some(loader) = self.loader.as_mut() else {
            return Err(RuntimeError::FailedOpeningRequired { path });
        };
        let stmts = match loader.load(&path) {
            Ok(stmts) => stmts,
            Err(LoadError::NotFound { path }) => {
                return Err(RuntimeError::FailedOpeningRequired { path })
            }
            Err(LoadError::Parse(err)) => return Err(RuntimeError::Parse(err)),
        };
        // Marked before evaluation so a file requiring itself is a no-op.
        self.loaded.insert(path);
        self.eval_stmts(&stmts)?;
        Ok(Value::Null)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::StringLit(s) => Ok(Value::String(s.clone())),
            Expr::IntLit(i) => Ok(Value::Int(*i)),
            Expr::FloatLit(f) => Ok(Value::Float(*f)),
            Expr::ArrayLit(items) => self.eval_array_literal(items),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Assign { var, value } => {
                if var == "this" {
                    return Err(RuntimeError::ReservedName);
                }
                let value = self.eval_expr(value)?;
                self.scope.set(var, value.clone())?;
                Ok(value)
            }
            Expr::Variable(name) => self.scope.get(name).cloned(),
            Expr::ConstFetch(name) => match name.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                _ => Err(RuntimeError::UnknownConstant { name: name.clone() }),
            },
            Expr::Index { base, index } => self.eval_index(base, index),
            Expr::Call { name, args } => self.eval_call(name, args),
        }
    }

    fn eval_array_literal(&mut self, items: &[ArrayItem]) -> EvalResult<Value> {
        let mut array = PhpArray::new();
        for item in items {
            let value = self.eval_expr(&item.value)?;
            match &item.key {
                None => array.push(value),
                Some(key_expr) => {
                    let key = ArrayKey::from_value(&self.eval_expr(key_expr)?)?;
                    array.insert(key, value);
                }
            }
        }
        Ok(Value::Array(array))
    }

    fn eval_index(&mut self, base: &Expr, index: &Expr) -> EvalResult<Value> {
        let base = self.eval_expr(base)?;
        let key_value = self.eval_expr(index)?;
        let array = match base {
            Value::Array(array) => array,
            other => {
                return Err(RuntimeError::TypeError {
                    message: format!("cannot index a {} value", other.type_name()),
                })
            }
        };
        let key = ArrayKey::from_value(&key_value)?;
        match array.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::IndexNotFound { key }),
        }
    }

    // ── Function calls ───────────────────────────────────────────────────

    fn eval_call(&mut self, name: &str, args: &[Arg]) -> EvalResult<Value> {
        // Calls to undeclared functions are skipped without evaluating
        // their arguments.
        let Some(def) = self.functions.lookup(name).cloned() else {
            return Ok(Value::Null);
        };

        // Arguments evaluate in order against the caller's scope.
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(&arg.value)?);
        }

        let mut callee = Scope::new();
        for (param, value) in def.params.iter().zip(&arg_values) {
            callee.set(&param.name, value.clone())?;
        }

        let caller = std::mem::replace(&mut self.scope, callee);

        // Parameters the call site left unfilled: defaults evaluate
        // against the callee scope; a parameter without one is unbound.
        for param in def.params.iter().skip(arg_values.len()) {
            match &param.default {
                Some(default) => {
                    let value = self.eval_expr(default)?;
                    self.scope.set(&param.name, value)?;
                }
                None => {
                    return Err(RuntimeError::UnboundVariable {
                        name: param.name.clone(),
                    })
                }
            }
        }

        match self.eval_stmts(&def.body) {
            Ok(()) => {
                self.scope = caller;
                Ok(Value::Null)
            }
            Err(RuntimeError::Return(value)) => {
                if self.config.restore_scope_on_return {
                    self.scope = caller;
                }
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Operators
    // ══════════════════════════════════════════════════════════════════════

    /// Both operands always evaluate, left before right — including for
    /// `&&`, `||` and `??`.
    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinaryOp::Concat => Ok(Value::String(format!("{lv}{rv}"))),

            BinaryOp::Lt => Ok(Value::Bool(lv.compare(&rv) == Ordering::Less)),
            BinaryOp::Le => Ok(Value::Bool(lv.compare(&rv) != Ordering::Greater)),
            BinaryOp::Gt => Ok(Value::Bool(lv.compare(&rv) == Ordering::Greater)),
            BinaryOp::Ge => Ok(Value::Bool(lv.compare(&rv) != Ordering::Less)),
            BinaryOp::Spaceship => Ok(Value::Int(match lv.compare(&rv) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            })),

            BinaryOp::Eq => Ok(Value::Bool(lv.loose_eq(&rv))),
            BinaryOp::NotEq => Ok(Value::Bool(!lv.loose_eq(&rv))),
            BinaryOp::Identical => Ok(Value::Bool(lv.strict_eq(&rv))),
            BinaryOp::NotIdentical => Ok(Value::Bool(!lv.strict_eq(&rv))),

            BinaryOp::Add => self.eval_arith(op, &lv, &rv, i64::checked_add, |x, y| x + y),
            BinaryOp::Sub => self.eval_arith(op, &lv, &rv, i64::checked_sub, |x, y| x - y),
            BinaryOp::Mul => self.eval_arith(op, &lv, &rv, i64::checked_mul, |x, y| x * y),
            BinaryOp::Div => self.eval_div(&lv, &rv),
            BinaryOp::Mod => self.eval_mod(&lv, &rv),
            BinaryOp::Pow => self.eval_pow(&lv, &rv),

            BinaryOp::And | BinaryOp::LogicalAnd => {
                Ok(Value::Bool(lv.is_truthy() && rv.is_truthy()))
            }
            BinaryOp::Or | BinaryOp::LogicalOr => {
                Ok(Value::Bool(lv.is_truthy() || rv.is_truthy()))
            }
            BinaryOp::LogicalXor => Ok(Value::Bool(lv.is_truthy() ^ rv.is_truthy())),

            BinaryOp::BitAnd => Ok(Value::Int(lv.to_int(op)? & rv.to_int(op)?)),
            BinaryOp::BitOr => Ok(Value::Int(lv.to_int(op)? | rv.to_int(op)?)),
            BinaryOp::BitXor => Ok(Value::Int(lv.to_int(op)? ^ rv.to_int(op)?)),
            BinaryOp::Shl => {
                let (x, n) = self.shift_operands(op, &lv, &rv)?;
                Ok(Value::Int(if n >= 64 { 0 } else { x.wrapping_shl(n as u32) }))
            }
            BinaryOp::Shr => {
                let (x, n) = self.shift_operands(op, &lv, &rv)?;
                Ok(Value::Int(if n >= 64 {
                    if x < 0 {
                        -1
                    } else {
                        0
                    }
                } else {
                    x >> n
                }))
            }

            BinaryOp::Coalesce => Ok(if matches!(lv, Value::Null) { rv } else { lv }),
        }
    }

    /// `+`, `-`, `*`: exact integer arithmetic that widens to float on
    /// overflow or when either operand coerces to float.
    fn eval_arith(
        &self,
        op: BinaryOp,
        lv: &Value,
        rv: &Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> EvalResult<Value> {
        let a = lv.to_number(op)?;
        let b = rv.to_number(op)?;
        if let (Number::Int(x), Number::Int(y)) = (a, b) {
            if let Some(result) = int_op(x, y) {
                return Ok(Value::Int(result));
            }
        }
        Ok(Value::Float(float_op(a.as_f64(), b.as_f64())))
    }

    /// `/`: integer result only when evenly divisible.
    fn eval_div(&self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        let op = BinaryOp::Div;
        let a = lv.to_number(op)?;
        let b = rv.to_number(op)?;
        if b.as_f64() == 0.0 {
            return Err(RuntimeError::DivisionByZero { operator: "/" });
        }
        if let (Number::Int(x), Number::Int(y)) = (a, b) {
            if let Some(quotient) = x.checked_div(y) {
                if x % y == 0 {
                    return Ok(Value::Int(quotient));
                }
            }
        }
        Ok(Value::Float(a.as_f64() / b.as_f64()))
    }

    /// `%`: integer modulo, sign follows the dividend.
    fn eval_mod(&self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        let op = BinaryOp::Mod;
        let x = lv.to_int(op)?;
        let y = rv.to_int(op)?;
        if y == 0 {
            return Err(RuntimeError::DivisionByZero { operator: "%" });
        }
        Ok(Value::Int(x.checked_rem(y).unwrap_or(0)))
    }

    /// `**`: integer power for non-negative integer exponents that fit,
    /// float otherwise.
    fn eval_pow(&self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        let op = BinaryOp::Pow;
        let a = lv.to_number(op)?;
        let b = rv.to_number(op)?;
        if let (Number::Int(x), Number::Int(y)) = (a, b) {
            if (0..=u32::MAX as i64).contains(&y) {
                if let Some(result) = x.checked_pow(y as u32) {
                    return Ok(Value::Int(result));
                }
            }
        }
        Ok(Value::Float(a.as_f64().powf(b.as_f64())))
    }

    fn shift_operands(&self, op: BinaryOp, lv: &Value, rv: &Value) -> EvalResult<(i64, i64)> {
        let x = lv.to_int(op)?;
        let n = rv.to_int(op)?;
        if n < 0 {
            return Err(RuntimeError::Arithmetic {
                message: format!("negative shift amount in '{op}'"),
            });
        }
        Ok((x, n))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
