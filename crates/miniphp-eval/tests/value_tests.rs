//! Tests for the dynamic value model: truthiness, string coercion,
//! numeric coercion, equality/ordering juggling and array key rules.

use miniphp_eval::{ArrayKey, Number, PhpArray, RuntimeError, Value};
use miniphp_types::ast::BinaryOp;
use std::cmp::Ordering;

fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

// ══════════════════════════════════════════════════════════════════════════════
// Truthiness
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn falsy_values() {
    for v in [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(0.0),
        s(""),
        s("0"),
        Value::Array(PhpArray::new()),
    ] {
        assert!(!v.is_truthy(), "{v:?} should be falsy");
    }
}

#[test]
fn truthy_values() {
    let mut one_entry = PhpArray::new();
    one_entry.push(Value::Int(0));
    for v in [
        Value::Bool(true),
        Value::Int(-1),
        Value::Float(0.5),
        s("0.0"),
        s("false"),
        Value::Array(one_entry),
    ] {
        assert!(v.is_truthy(), "{v:?} should be truthy");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// String coercion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn display_coercions() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::Bool(true).to_string(), "1");
    assert_eq!(Value::Bool(false).to_string(), "");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::Float(1.0).to_string(), "1");
    assert_eq!(Value::Float(1.5).to_string(), "1.5");
    assert_eq!(s("x").to_string(), "x");
    assert_eq!(Value::Array(PhpArray::new()).to_string(), "Array");
}

// ══════════════════════════════════════════════════════════════════════════════
// Numeric coercion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn numeric_strings_coerce() {
    let op = BinaryOp::Add;
    assert_eq!(s("12").to_number(op).ok(), Some(Number::Int(12)));
    assert_eq!(s(" 3.5 ").to_number(op).ok(), Some(Number::Float(3.5)));
    assert_eq!(s("1e2").to_number(op).ok(), Some(Number::Float(100.0)));
    assert_eq!(Value::Null.to_number(op).ok(), Some(Number::Int(0)));
    assert_eq!(Value::Bool(true).to_number(op).ok(), Some(Number::Int(1)));
}

#[test]
fn non_numeric_strings_do_not_coerce() {
    let op = BinaryOp::Add;
    for bad in ["", "abc", "0x1A", "12abc", "INF", "NAN"] {
        assert!(
            matches!(s(bad).to_number(op), Err(RuntimeError::Arithmetic { .. })),
            "{bad:?} should not be numeric"
        );
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Loose equality
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn loose_equality_bool_and_null_context() {
    assert!(Value::Null.loose_eq(&Value::Bool(false)));
    assert!(Value::Null.loose_eq(&Value::Int(0)));
    assert!(Value::Bool(true).loose_eq(&Value::Int(5)));
    assert!(Value::Bool(false).loose_eq(&s("0")));
    assert!(!Value::Bool(true).loose_eq(&s("")));
}

#[test]
fn loose_equality_null_against_string_is_empty_check() {
    assert!(Value::Null.loose_eq(&s("")));
    assert!(!Value::Null.loose_eq(&s("0")));
}

#[test]
fn loose_equality_arrays_ignore_order() {
    let mut ab = PhpArray::new();
    ab.insert(ArrayKey::Str("a".into()), Value::Int(1));
    ab.insert(ArrayKey::Str("b".into()), Value::Int(2));
    let mut ba = PhpArray::new();
    ba.insert(ArrayKey::Str("b".into()), Value::Int(2));
    ba.insert(ArrayKey::Str("a".into()), Value::Int(1));

    let left = Value::Array(ab);
    let right = Value::Array(ba);
    assert!(left.loose_eq(&right));
    assert!(!left.strict_eq(&right));
}

#[test]
fn strict_equality_arrays_require_order() {
    let mut a = PhpArray::new();
    a.push(Value::Int(1));
    a.push(Value::Int(2));
    let b = a.clone();
    assert!(Value::Array(a).strict_eq(&Value::Array(b)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Ordering
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn ordering_numbers_and_numeric_strings() {
    assert_eq!(Value::Int(1).compare(&Value::Float(1.5)), Ordering::Less);
    assert_eq!(s("2").compare(&s("10")), Ordering::Less);
    assert_eq!(s("b").compare(&s("a")), Ordering::Greater);
}

#[test]
fn ordering_arrays_by_length_first() {
    let mut long = PhpArray::new();
    long.push(Value::Int(1));
    long.push(Value::Int(2));
    let mut short = PhpArray::new();
    short.push(Value::Int(9));
    assert_eq!(
        Value::Array(long).compare(&Value::Array(short)),
        Ordering::Greater
    );
}

#[test]
fn arrays_order_above_scalars() {
    assert_eq!(
        Value::Array(PhpArray::new()).compare(&Value::Int(1000)),
        Ordering::Greater
    );
    assert_eq!(
        Value::Int(1000).compare(&Value::Array(PhpArray::new())),
        Ordering::Less
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Array keys
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn key_coercions() {
    assert_eq!(
        ArrayKey::from_value(&Value::Int(3)).ok(),
        Some(ArrayKey::Int(3))
    );
    assert_eq!(
        ArrayKey::from_value(&s("5")).ok(),
        Some(ArrayKey::Int(5))
    );
    // Non-canonical integer strings stay strings.
    assert_eq!(
        ArrayKey::from_value(&s("05")).ok(),
        Some(ArrayKey::Str("05".into()))
    );
    assert_eq!(
        ArrayKey::from_value(&Value::Bool(true)).ok(),
        Some(ArrayKey::Int(1))
    );
    assert_eq!(
        ArrayKey::from_value(&Value::Float(2.7)).ok(),
        Some(ArrayKey::Int(2))
    );
    assert_eq!(
        ArrayKey::from_value(&Value::Null).ok(),
        Some(ArrayKey::Str(String::new()))
    );
}

#[test]
fn array_key_cannot_be_an_array() {
    let result = ArrayKey::from_value(&Value::Array(PhpArray::new()));
    assert!(matches!(result, Err(RuntimeError::TypeError { .. })));
}

#[test]
fn append_counter_advances_past_explicit_int_keys() {
    let mut array = PhpArray::new();
    array.insert(ArrayKey::Int(5), s("a"));
    array.push(s("b"));
    assert_eq!(array.get(&ArrayKey::Int(6)), Some(&s("b")));
    assert_eq!(array.len(), 2);
}

#[test]
fn entries_iterate_in_insertion_order() {
    let mut array = PhpArray::new();
    array.insert(ArrayKey::Str("z".into()), Value::Int(1));
    array.insert(ArrayKey::Int(0), Value::Int(2));
    array.insert(ArrayKey::Str("a".into()), Value::Int(3));
    let keys: Vec<String> = array.entries().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, ["z", "0", "a"]);
}
