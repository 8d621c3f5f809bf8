//! Tests for the binary and unary operator tables.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::{ObjectValue, PropKey, Value};
use weft_ir::{BinaryOp, UnaryOp};

fn num(text: &str) -> Value {
    Value::Number(text.parse::<Decimal>().unwrap())
}

#[test]
fn test_add_numbers_and_numeric_strings() {
    assert_eq!(
        evaluate_binary(Value::int(2), Value::int(3), BinaryOp::Add),
        Value::int(5)
    );
    // A numeric string adds through its numeric form...
    assert_eq!(
        evaluate_binary(Value::int(2), Value::string("3.5"), BinaryOp::Add),
        num("5.5")
    );
    assert_eq!(
        evaluate_binary(Value::string("10"), Value::int(1), BinaryOp::Add),
        Value::int(11)
    );
    // ...a non-numeric one concatenates both string forms.
    assert_eq!(
        evaluate_binary(Value::int(2), Value::string("x"), BinaryOp::Add),
        Value::string("2x")
    );
}

#[test]
fn test_add_strings_and_loose_operands() {
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::string("b"), BinaryOp::Add),
        Value::string("ab")
    );
    // Two numeric strings still concatenate - the numeric path needs a
    // number on one side.
    assert_eq!(
        evaluate_binary(Value::string("1"), Value::string("2"), BinaryOp::Add),
        Value::string("12")
    );
    assert_eq!(
        evaluate_binary(Value::Bool(true), Value::string("!"), BinaryOp::Add),
        Value::string("true!")
    );
    assert_eq!(
        evaluate_binary(Value::string("n:"), Value::Null, BinaryOp::Add),
        Value::string("n:")
    );
    // Boolean/null with a number has no meaning.
    assert_eq!(
        evaluate_binary(Value::Bool(true), Value::int(1), BinaryOp::Add),
        Value::Undefined
    );
    assert_eq!(
        evaluate_binary(Value::Null, Value::int(1), BinaryOp::Add),
        Value::Undefined
    );
}

#[test]
fn test_add_objects() {
    let left = Value::array(vec![Value::int(1)]);
    let right = Value::array(vec![Value::int(2)]);
    let merged = evaluate_binary(left, right, BinaryOp::Add);
    assert_eq!(merged, Value::array(vec![Value::int(1), Value::int(2)]));

    assert_eq!(
        evaluate_binary(
            Value::array(vec![Value::int(1)]),
            Value::int(2),
            BinaryOp::Add
        ),
        Value::Undefined
    );
    // Object + string falls back to string concatenation.
    assert_eq!(
        evaluate_binary(
            Value::array(vec![Value::int(1), Value::int(2)]),
            Value::string("!"),
            BinaryOp::Add
        ),
        Value::string("1 2!")
    );
}

#[test]
fn test_arithmetic_coercion_and_totality() {
    assert_eq!(
        evaluate_binary(Value::string("10"), Value::int(4), BinaryOp::Sub),
        Value::int(6)
    );
    assert_eq!(
        evaluate_binary(Value::int(3), Value::string("4"), BinaryOp::Mul),
        Value::int(12)
    );
    assert_eq!(
        evaluate_binary(Value::int(7), Value::int(2), BinaryOp::Mod),
        Value::int(1)
    );
    // Non-numeric operands degrade, never fault.
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::int(1), BinaryOp::Sub),
        Value::Undefined
    );
    assert_eq!(
        evaluate_binary(Value::int(1), Value::Bool(true), BinaryOp::Div),
        Value::Undefined
    );
    assert_eq!(
        evaluate_binary(Value::int(1), Value::int(0), BinaryOp::Div),
        Value::Undefined
    );
    assert_eq!(
        evaluate_binary(Value::int(1), Value::int(0), BinaryOp::Mod),
        Value::Undefined
    );
}

#[test]
fn test_division_has_two_digit_scale() {
    assert_eq!(
        evaluate_binary(Value::int(1), Value::int(3), BinaryOp::Div),
        num("0.33")
    );
    // Half-away-from-zero at the second digit.
    assert_eq!(
        evaluate_binary(Value::int(1), Value::int(8), BinaryOp::Div),
        num("0.13")
    );
    assert_eq!(
        evaluate_binary(Value::int(-1), Value::int(8), BinaryOp::Div),
        num("-0.13")
    );
    assert_eq!(
        evaluate_binary(Value::int(10), Value::int(4), BinaryOp::Div),
        num("2.5")
    );
}

#[test]
fn test_equal_and_not_equal() {
    assert_eq!(
        evaluate_binary(Value::int(2), Value::int(2), BinaryOp::Equal),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::string("a"), BinaryOp::Equal),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::int(2), Value::string("2.0"), BinaryOp::Equal),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::string("x"), Value::string("y"), BinaryOp::NotEqual),
        Value::Bool(true)
    );
    // Boolean-coerced equality once a boolean/null/object is involved.
    assert_eq!(
        evaluate_binary(
            Value::Bool(true),
            Value::object(ObjectValue::new()),
            BinaryOp::Equal
        ),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::Null, Value::Bool(false), BinaryOp::Equal),
        Value::Bool(true)
    );
}

#[test]
fn test_equal_number_string_asymmetry() {
    // Number on the left against a non-numeric string: plain false.
    assert_eq!(
        evaluate_binary(Value::int(1), Value::string("x"), BinaryOp::Equal),
        Value::Bool(false)
    );
    // Mirrored order falls back to the boolean comparison: both truthy.
    assert_eq!(
        evaluate_binary(Value::string("x"), Value::int(1), BinaryOp::Equal),
        Value::Bool(true)
    );
}

#[test]
fn test_relational_string_length_rule() {
    assert_eq!(
        evaluate_binary(Value::int(2), Value::int(3), BinaryOp::LessThan),
        Value::Bool(true)
    );
    // Strings compare by length, not content.
    assert_eq!(
        evaluate_binary(Value::string("b"), Value::string("aa"), BinaryOp::LessThan),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::string("bb"), Value::string("a"), BinaryOp::GreaterThan),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_binary(Value::string("ab"), Value::string("ba"), BinaryOp::LessOrEqual),
        Value::Bool(true)
    );
    // Number/string compares numerically when the string coerces...
    assert_eq!(
        evaluate_binary(Value::int(1), Value::string("-5"), BinaryOp::GreaterThan),
        Value::Bool(true)
    );
    // ...and by string-form length when it does not.
    assert_eq!(
        evaluate_binary(Value::string("x"), Value::int(1), BinaryOp::GreaterOrEqual),
        Value::Bool(true)
    );
    // Boolean coercion order: false < true.
    assert_eq!(
        evaluate_binary(Value::Null, Value::Bool(true), BinaryOp::LessThan),
        Value::Bool(true)
    );
}

#[test]
fn test_and_or_return_controlling_operand() {
    assert_eq!(
        evaluate_binary(Value::int(0), Value::string("x"), BinaryOp::And),
        Value::int(0)
    );
    assert_eq!(
        evaluate_binary(Value::int(1), Value::string("x"), BinaryOp::And),
        Value::string("x")
    );
    assert_eq!(
        evaluate_binary(Value::string(""), Value::string("x"), BinaryOp::Or),
        Value::string("x")
    );
    assert_eq!(
        evaluate_binary(Value::string("a"), Value::string("b"), BinaryOp::Or),
        Value::string("a")
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(evaluate_unary(Value::int(5), UnaryOp::Negate), Value::int(-5));
    assert_eq!(
        evaluate_unary(Value::string("2.5"), UnaryOp::Negate),
        num("-2.5")
    );
    assert_eq!(
        evaluate_unary(Value::string("x"), UnaryOp::Negate),
        Value::Undefined
    );
    assert_eq!(evaluate_unary(Value::string(""), UnaryOp::Not), Value::Bool(true));
    assert_eq!(
        evaluate_unary(Value::object(ObjectValue::new()), UnaryOp::Not),
        Value::Bool(false)
    );
}

#[test]
fn test_merge_keeps_named_keys() {
    let mut left = ObjectValue::new();
    left.set(PropKey::Name("a".to_string()), Value::int(1));
    let mut right = ObjectValue::new();
    right.set(PropKey::Name("b".to_string()), Value::int(2));
    let merged = evaluate_binary(Value::object(left), Value::object(right), BinaryOp::Add);
    assert_eq!(
        merged.get_property(&PropKey::Name("b".to_string())),
        Some(Value::int(2))
    );
}
