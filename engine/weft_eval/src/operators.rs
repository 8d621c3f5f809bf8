//! Binary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over the closed value union. The type set is
//! fixed, so pattern matching is preferred over trait objects; every arm is
//! spelled out so a new variant fails to compile until each operator table
//! handles it.
//!
//! Evaluation is total: an operand without a meaning for the operator
//! produces `Undefined` (logged at warning level), never an error. `and` /
//! `or` return the controlling operand itself, not a normalized boolean -
//! the evaluator short-circuits them before reaching this module, but the
//! same rule applies when both sides are already evaluated.

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use weft_ir::BinaryOp;

use crate::value::Value;

/// Quotients carry a fixed two-digit scale, rounded half away from zero.
const DIV_SCALE: u32 = 2;

/// Evaluate a binary operation.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> Value {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            eval_arithmetic(&left, &right, op)
        }
        BinaryOp::Equal => eval_equal(&left, &right),
        BinaryOp::NotEqual => match eval_equal(&left, &right) {
            Value::Bool(equal) => Value::Bool(!equal),
            other => other,
        },
        BinaryOp::LessThan
        | BinaryOp::LessOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterOrEqual => eval_relational(&left, &right, op),
        // Short-circuit form: the controlling operand is the result.
        BinaryOp::And => {
            if left.to_boolean() {
                right
            } else {
                left
            }
        }
        BinaryOp::Or => {
            if left.to_boolean() {
                left
            } else {
                right
            }
        }
    }
}

// Addition

/// `add` is the one operator with per-type-pair behavior of its own:
/// object merge, numeric addition, and string concatenation all live here.
fn eval_add(left: Value, right: Value) -> Value {
    match (&left, &right) {
        // Object + Object merges entries, left keys first.
        (Value::Object(a), Value::Object(b)) => Value::object(a.merge(b)),

        // Object + Number has no meaning.
        (Value::Object(_) | Value::Global(_), Value::Number(_))
        | (Value::Number(_), Value::Object(_) | Value::Global(_)) => {
            warn!(
                left = left.type_name(),
                right = right.type_name(),
                "cannot add object and number"
            );
            Value::Undefined
        }

        // Any other object pairing falls back to string concatenation.
        (Value::Object(_) | Value::Global(_), _) | (_, Value::Object(_) | Value::Global(_)) => {
            concat(&left, &right)
        }

        (Value::Number(a), Value::Number(b)) => checked_number(a.checked_add(*b), "add"),

        // Number + String: numeric when the string has a numeric form,
        // otherwise both sides concatenate as strings.
        (Value::Number(a), Value::Str(text)) => match crate::value::parse_decimal(text) {
            Some(b) => checked_number(a.checked_add(b), "add"),
            None => concat(&left, &right),
        },
        (Value::Str(text), Value::Number(b)) => match crate::value::parse_decimal(text) {
            Some(a) => checked_number(a.checked_add(*b), "add"),
            None => concat(&left, &right),
        },

        // A string absorbs the other operand's string form.
        (Value::Str(_), _) | (_, Value::Str(_)) => concat(&left, &right),

        // Boolean/null/undefined pairings (including with numbers).
        _ => {
            warn!(
                left = left.type_name(),
                right = right.type_name(),
                "operands cannot be added"
            );
            Value::Undefined
        }
    }
}

fn concat(left: &Value, right: &Value) -> Value {
    let mut text = left.to_text();
    text.push_str(&right.to_text());
    Value::string(text)
}

// Arithmetic

/// `sub` / `mul` / `div` / `mod`: both operands must coerce numerically,
/// otherwise the result is `Undefined`. Division and modulo by zero degrade
/// the same way instead of faulting.
fn eval_arithmetic(left: &Value, right: &Value, op: BinaryOp) -> Value {
    let (Some(a), Some(b)) = (left.coerced_decimal(), right.coerced_decimal()) else {
        warn!(
            op = op.as_symbol(),
            left = left.type_name(),
            right = right.type_name(),
            "non-numeric operand"
        );
        return Value::Undefined;
    };
    match op {
        BinaryOp::Sub => checked_number(a.checked_sub(b), "subtract"),
        BinaryOp::Mul => checked_number(a.checked_mul(b), "multiply"),
        BinaryOp::Div => {
            if b.is_zero() {
                warn!("division by zero");
                return Value::Undefined;
            }
            checked_number(
                a.checked_div(b).map(|quotient| {
                    quotient
                        .round_dp_with_strategy(DIV_SCALE, RoundingStrategy::MidpointAwayFromZero)
                        .normalize()
                }),
                "divide",
            )
        }
        BinaryOp::Mod => {
            if b.is_zero() {
                warn!("modulo by zero");
                return Value::Undefined;
            }
            checked_number(a.checked_rem(b), "modulo")
        }
        _ => unreachable!("eval_arithmetic only handles sub/mul/div/mod"),
    }
}

fn checked_number(result: Option<Decimal>, op_name: &'static str) -> Value {
    match result {
        Some(value) => Value::Number(value),
        None => {
            warn!(op_name, "numeric overflow");
            Value::Undefined
        }
    }
}

// Equality

/// `equal`. Numeric for number pairs, textual for string pairs, numeric
/// across number/string when the string coerces; everything else compares
/// boolean coercions (an object is always truthy).
///
/// Deliberate asymmetry, preserved from the original: a number compared to
/// a non-numeric string is plain `false`, while the mirrored order falls
/// back to the boolean comparison.
fn eval_equal(left: &Value, right: &Value) -> Value {
    Value::Bool(match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Number(a), Value::Str(text)) => match crate::value::parse_decimal(text) {
            Some(b) => *a == b,
            None => false,
        },
        (Value::Str(text), Value::Number(b)) => match crate::value::parse_decimal(text) {
            Some(a) => a == *b,
            None => left.to_boolean() == right.to_boolean(),
        },
        _ => left.to_boolean() == right.to_boolean(),
    })
}

// Relational comparison

/// `<` / `<=` / `>` / `>=` over the ordering in [`compare`].
fn eval_relational(left: &Value, right: &Value, op: BinaryOp) -> Value {
    let ordering = compare(left, right);
    Value::Bool(match op {
        BinaryOp::LessThan => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::GreaterThan => ordering == Ordering::Greater,
        BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
        _ => unreachable!("eval_relational only handles comparison operators"),
    })
}

/// Ordering used by the relational operators.
///
/// Numbers compare numerically; a number/string pair compares numerically
/// when the string coerces. String pairs compare by **length**, not
/// lexicographically - surprising but long-established behavior, preserved
/// deliberately. Everything else compares boolean coercions.
fn compare(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.cmp(b),
        (Value::Number(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
            match (left.coerced_decimal(), right.coerced_decimal()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => text_length(left).cmp(&text_length(right)),
            }
        }
        (Value::Str(a), Value::Str(b)) => a.chars().count().cmp(&b.chars().count()),
        _ => left.to_boolean().cmp(&right.to_boolean()),
    }
}

fn text_length(value: &Value) -> usize {
    value.to_text().chars().count()
}
