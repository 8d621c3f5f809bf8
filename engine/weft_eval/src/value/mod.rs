//! Runtime values for the Weft evaluator.
//!
//! One canonical value model: a closed tagged union with JavaScript-like
//! loose coercions. Every operator matches exhaustively over the variants,
//! so adding a variant forces every operator table to be revisited.
//!
//! Values are immutable once constructed - operators return new values.
//! Heap payloads (`Str`, `Object`) go through the `Heap<T>` factory; the
//! global-properties object is the one shared handle (`Shared<T>`) because
//! evaluation transiently overrides its base URI.

mod heap;
mod json;
mod number;
mod object;
mod shared;

use std::fmt;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::global::{GlobalObject, GlobalProperty};

pub use heap::Heap;
pub use object::{ObjectValue, PropKey};
pub use shared::Shared;

pub(crate) use number::{format_decimal, parse_decimal};

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The null literal.
    Null,
    /// Absent value: missing properties, unknown names, degraded failures.
    Undefined,
    /// Failed numeric coercion. A distinct "not a number" that propagates
    /// through arithmetic as non-numeric; not equal to `Undefined`.
    UndefinedNumber,
    Bool(bool),
    /// Decimal number.
    Number(Decimal),
    Str(Heap<String>),
    Object(Heap<ObjectValue>),
    /// The engine-wide properties object. Stringifies to empty text.
    Global(Shared<GlobalObject>),
}

// Factory methods

impl Value {
    pub fn string(text: impl Into<String>) -> Value {
        Value::Str(Heap::new(text.into()))
    }

    pub fn int(value: i64) -> Value {
        Value::Number(Decimal::from(value))
    }

    /// Build a number from a binary float literal.
    ///
    /// Non-finite floats have no decimal form and become the undefined
    /// number.
    pub fn float(value: f64) -> Value {
        Decimal::from_f64(value).map_or(Value::UndefinedNumber, Value::Number)
    }

    pub fn object(object: ObjectValue) -> Value {
        Value::Object(Heap::new(object))
    }

    /// Build an object with array semantics from a value sequence.
    pub fn array(values: impl IntoIterator<Item = Value>) -> Value {
        Value::object(values.into_iter().collect())
    }
}

// Classification and coercions

impl Value {
    /// Type name for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::UndefinedNumber => "undefined number",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Global(_) => "global",
        }
    }

    /// Returns `true` for the two undefined kinds.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined | Value::UndefinedNumber)
    }

    /// Boolean coercion. False only for: `false`, zero, the empty string,
    /// null and the undefined kinds. Objects are always truthy.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Bool(value) => *value,
            Value::Number(value) => !value.is_zero(),
            Value::Str(value) => !value.is_empty(),
            Value::Null | Value::Undefined | Value::UndefinedNumber => false,
            Value::Object(_) | Value::Global(_) => true,
        }
    }

    /// Numeric coercion. Strings parse through their numeric form; anything
    /// without one yields the undefined number rather than an error.
    pub fn to_number(&self) -> Value {
        self.coerced_decimal()
            .map_or(Value::UndefinedNumber, Value::Number)
    }

    /// The decimal behind a successful numeric coercion.
    pub fn coerced_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Str(text) => parse_decimal(text),
            _ => None,
        }
    }

    /// String coercion. Undefined kinds and the global object print as
    /// empty text; an object joins its non-undefined children's string
    /// forms with single spaces, in insertion order.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Undefined | Value::UndefinedNumber => String::new(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Number(value) => format_decimal(value),
            Value::Str(text) => (**text).clone(),
            Value::Global(_) => String::new(),
            Value::Object(object) => {
                let parts: Vec<String> = object
                    .entries()
                    .filter(|(_, value)| !value.is_undefined())
                    .map(|(_, value)| value.to_text())
                    .collect();
                parts.join(" ")
            }
        }
    }

    /// Property lookup on objects and the global object.
    ///
    /// Non-container values have no properties; the selector walk treats
    /// `None` as a missing property and aborts to `Undefined`.
    pub fn get_property(&self, key: &PropKey) -> Option<Value> {
        match self {
            Value::Object(object) => object.get(key).cloned(),
            Value::Global(global) => match key {
                PropKey::Name(name) => GlobalProperty::from_name(name).map(|property| {
                    global
                        .borrow()
                        .get(property)
                        .map_or(Value::Undefined, Value::string)
                }),
                PropKey::Index(_) => None,
            },
            _ => None,
        }
    }
}

/// Structural equality, used by tests and the optimizer. This is *not* the
/// template `equal` operator - see `evaluate_binary`.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null)
            | (Value::Undefined, Value::Undefined)
            | (Value::UndefinedNumber, Value::UndefinedNumber) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Global(a), Value::Global(b)) => *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
