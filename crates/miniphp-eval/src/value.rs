//! Dynamic runtime values and the source language's coercion rules.
//!
//! [`Value`] is pure data: cloned on assignment, no aliasing. The juggling
//! rules (truthiness, numeric coercion, loose vs. strict equality, the
//! ordering used by the relational and spaceship operators) all live here;
//! the evaluator dispatches into them.

use crate::error::{EvalResult, RuntimeError};
use indexmap::IndexMap;
use miniphp_types::ast::BinaryOp;
use std::cmp::Ordering;
use std::fmt;

/// A dynamic runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(PhpArray),
}

/// A numeric operand after coercion — integer arithmetic stays exact until
/// it has to widen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl Value {
    /// The value's type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    /// Boolean context: `null`, `false`, `0`, `0.0`, `""`, `"0"` and the
    /// empty array are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Array(a) => !a.is_empty(),
        }
    }

    /// Numeric context. Fully-numeric strings coerce; any other string and
    /// arrays are invalid operands for `op`.
    pub fn to_number(&self, op: BinaryOp) -> EvalResult<Number> {
        match self {
            Value::Null => Ok(Number::Int(0)),
            Value::Bool(b) => Ok(Number::Int(i64::from(*b))),
            Value::Int(i) => Ok(Number::Int(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            Value::String(s) => numeric_str(s).ok_or_else(|| RuntimeError::Arithmetic {
                message: format!("non-numeric string \"{s}\" as operand of '{op}'"),
            }),
            Value::Array(_) => Err(RuntimeError::Arithmetic {
                message: format!("array as operand of '{op}'"),
            }),
        }
    }

    /// Integer context, used by the bitwise operators. Floats truncate.
    pub fn to_int(&self, op: BinaryOp) -> EvalResult<i64> {
        match self.to_number(op)? {
            Number::Int(i) => Ok(i),
            Number::Float(f) => Ok(f as i64),
        }
    }

    /// Loose equality (`==`): comparison after type juggling.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            // null against a string compares as the empty string.
            (Null, String(s)) | (String(s), Null) => s.is_empty(),
            // A bool or null operand puts the comparison in boolean context.
            (Bool(_), _) | (_, Bool(_)) | (Null, _) | (_, Null) => {
                self.is_truthy() == other.is_truthy()
            }
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Int(_), String(s)) | (Float(_), String(s)) => num_vs_str_eq(self, s),
            (String(s), Int(_)) | (String(s), Float(_)) => num_vs_str_eq(other, s),
            (String(a), String(b)) => match (numeric_str(a), numeric_str(b)) {
                (Some(x), Some(y)) => num_eq(x, y),
                _ => a == b,
            },
            (Array(a), Array(b)) => a.loose_eq(b),
            (Array(_), _) | (_, Array(_)) => false,
        }
    }

    /// Strict equality (`===`): same type and value, no coercion.
    /// `int` and `float` are distinct types; arrays must match in order.
    pub fn strict_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a.strict_eq(b),
            _ => false,
        }
    }

    /// The ordering used by `<`, `<=`, `>`, `>=` and `<=>`, with the same
    /// juggling rules as loose equality.
    pub fn compare(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, String(s)) => "".cmp(s.as_str()),
            (String(s), Null) => s.as_str().cmp(""),
            (Bool(_), _) | (_, Bool(_)) | (Null, _) | (_, Null) => {
                self.is_truthy().cmp(&other.is_truthy())
            }
            (Int(a), Int(b)) => a.cmp(b),
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                num_cmp(number_of(self), number_of(other))
            }
            (Int(_) | Float(_), String(s)) => match numeric_str(s) {
                Some(n) => num_cmp(number_of(self), n),
                None => self.to_string().as_str().cmp(s),
            },
            (String(s), Int(_) | Float(_)) => match numeric_str(s) {
                Some(n) => num_cmp(n, number_of(other)),
                None => s.as_str().cmp(other.to_string().as_str()),
            },
            (String(a), String(b)) => match (numeric_str(a), numeric_str(b)) {
                (Some(x), Some(y)) => num_cmp(x, y),
                _ => a.cmp(b),
            },
            (Array(a), Array(b)) => a.compare(b),
            // Arrays order above every non-array value.
            (Array(_), _) => Ordering::Greater,
            (_, Array(_)) => Ordering::Less,
        }
    }
}

/// String coercion: the representation `echo` and `.` produce.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => f.write_str("1"),
            Value::Bool(false) => Ok(()),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) => f.write_str(s),
            Value::Array(_) => f.write_str("Array"),
        }
    }
}

/// Numeric equality across the int/float split.
fn num_eq(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

/// Numeric ordering across the int/float split.
fn num_cmp(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.cmp(&y),
        _ => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Greater),
    }
}

/// The numeric reading of a value already known to be `Int` or `Float`.
fn number_of(v: &Value) -> Number {
    match v {
        Value::Int(i) => Number::Int(*i),
        Value::Float(f) => Number::Float(*f),
        _ => Number::Int(0),
    }
}

/// Number-against-string loose equality: numeric strings compare
/// numerically, anything else compares against the number's string form.
fn num_vs_str_eq(num: &Value, s: &str) -> bool {
    match numeric_str(s) {
        Some(n) => num_eq(number_of(num), n),
        None => num.to_string() == s,
    }
}

/// Parse a fully-numeric string (leading/trailing whitespace allowed).
/// Hex, `NAN`/`INF` spellings and partial numbers do not qualify.
pub(crate) fn numeric_str(s: &str) -> Option<Number> {
    let t = s.trim_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    if t.is_empty() {
        return None;
    }
    let first = t.as_bytes()[0];
    if !(first.is_ascii_digit() || first == b'+' || first == b'-' || first == b'.') {
        return None;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Some(Number::Int(i));
    }
    if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    t.parse::<f64>().ok().map(Number::Float)
}

/// Float formatting: integral finite floats print without a fractional
/// part, matching the source language's output conversion.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "INF" } else { "-INF" }.to_string()
    } else if f == f.trunc() && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Arrays
// ══════════════════════════════════════════════════════════════════════════════

/// An array index: the subset of values usable as keys.
///
/// Other key types coerce on insertion and lookup: bools to 0/1, floats by
/// truncation, null to `""`, and strings in canonical integer form to the
/// integer they spell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(String),
}

impl ArrayKey {
    /// Coerce a value to a key. Arrays are not usable as keys.
    pub fn from_value(value: &Value) -> EvalResult<ArrayKey> {
        match value {
            Value::Int(i) => Ok(ArrayKey::Int(*i)),
            Value::String(s) => Ok(match canonical_int(s) {
                Some(i) => ArrayKey::Int(i),
                None => ArrayKey::Str(s.clone()),
            }),
            Value::Bool(b) => Ok(ArrayKey::Int(i64::from(*b))),
            Value::Float(f) => Ok(ArrayKey::Int(*f as i64)),
            Value::Null => Ok(ArrayKey::Str(String::new())),
            Value::Array(_) => Err(RuntimeError::TypeError {
                message: "illegal offset type: array".to_string(),
            }),
        }
    }

    /// The key back as a value, for binding foreach key variables.
    pub fn to_value(&self) -> Value {
        match self {
            ArrayKey::Int(i) => Value::Int(*i),
            ArrayKey::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{i}"),
            ArrayKey::Str(s) => f.write_str(s),
        }
    }
}

/// A string key in canonical decimal integer form becomes that integer.
fn canonical_int(s: &str) -> Option<i64> {
    let i = s.parse::<i64>().ok()?;
    (i.to_string() == s).then_some(i)
}

/// The keyed ordered array: an insertion-ordered map plus the counter for
/// appends without an explicit key.
#[derive(Debug, Clone, Default)]
pub struct PhpArray {
    entries: IndexMap<ArrayKey, Value>,
    next_index: i64,
}

impl PhpArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append at the next integer index.
    pub fn push(&mut self, value: Value) {
        let key = ArrayKey::Int(self.next_index);
        self.insert(key, value);
    }

    /// Insert or overwrite under `key`. Integer keys advance the append
    /// counter past themselves.
    pub fn insert(&mut self, key: ArrayKey, value: Value) {
        if let ArrayKey::Int(i) = &key {
            if *i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.entries.contains_key(key)
    }

    /// (key, value) pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.entries.iter()
    }

    /// Loose equality: same key/value pairs, order-insensitive.
    fn loose_eq(&self, other: &PhpArray) -> bool {
        self.len() == other.len()
            && self
                .entries()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v.loose_eq(ov)))
    }

    /// Strict equality: same pairs in the same order.
    fn strict_eq(&self, other: &PhpArray) -> bool {
        self.len() == other.len()
            && self
                .entries()
                .zip(other.entries())
                .all(|((ak, av), (bk, bv))| ak == bk && av.strict_eq(bv))
    }

    /// Ordering: by length first, then pairwise by the left array's keys.
    /// A key missing on the right makes the left side greater.
    fn compare(&self, other: &PhpArray) -> Ordering {
        match self.len().cmp(&other.len()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        for (k, v) in self.entries() {
            match other.get(k) {
                None => return Ordering::Greater,
                Some(ov) => match v.compare(ov) {
                    Ordering::Equal => {}
                    ord => return ord,
                },
            }
        }
        Ordering::Equal
    }
}

/// Order-sensitive structural equality, so tests can assert on whole
/// arrays; loose/strict comparison semantics live in the named methods.
impl PartialEq for PhpArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries()
                .zip(other.entries())
                .all(|((ak, av), (bk, bv))| ak == bk && av == bv)
    }
}

impl FromIterator<(ArrayKey, Value)> for PhpArray {
    fn from_iter<T: IntoIterator<Item = (ArrayKey, Value)>>(iter: T) -> Self {
        let mut array = PhpArray::new();
        for (k, v) in iter {
            array.insert(k, v);
        }
        array
    }
}
