//! Unary operator implementations for the evaluator.
//!
//! Same dispatch style as the binary module; same totality rule.

use tracing::warn;

use weft_ir::UnaryOp;

use crate::value::Value;

/// Evaluate a unary operation.
pub fn evaluate_unary(operand: Value, op: UnaryOp) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.to_boolean()),
        UnaryOp::Negate => match operand.to_number() {
            Value::Number(value) => Value::Number(-value),
            _ => {
                warn!(operand = operand.type_name(), "cannot negate non-numeric value");
                Value::Undefined
            }
        },
    }
}
