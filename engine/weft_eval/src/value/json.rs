//! Conversion between values and `serde_json` trees.
//!
//! Used to wire JSON contexts into evaluation and by `loadJSON`. JSON
//! objects keep their key order (`serde_json` is built with
//! `preserve_order`), which is what gives loaded data stable iteration and
//! string forms.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value as Json};

use super::{parse_decimal, ObjectValue, PropKey, Value};

/// Render a decimal as a JSON number: exact integer where it fits, binary
/// float otherwise, `null` when even that fails.
fn decimal_to_json(value: &Decimal) -> Json {
    let normalized = value.normalize();
    if normalized.fract().is_zero() {
        if let Some(int) = normalized.to_i64() {
            return Json::Number(Number::from(int));
        }
    }
    normalized
        .to_f64()
        .and_then(Number::from_f64)
        .map_or(Json::Null, Json::Number)
}

impl Value {
    /// Build a value from a JSON tree. Arrays become objects with
    /// sequential integer keys; objects keep key order.
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(value) => Value::Bool(*value),
            // serde_json renders numbers canonically; a number that exceeds
            // the decimal range degrades to the undefined number.
            Json::Number(number) => {
                parse_decimal(&number.to_string()).map_or(Value::UndefinedNumber, Value::Number)
            }
            Json::String(text) => Value::string(text.clone()),
            Json::Array(items) => Value::array(items.iter().map(Value::from_json)),
            Json::Object(map) => {
                let mut object = ObjectValue::new();
                for (key, value) in map {
                    object.set(PropKey::normalize(key), Value::from_json(value));
                }
                Value::object(object)
            }
        }
    }

    /// Render a value as a JSON tree. The undefined kinds map to `null`;
    /// array-shaped objects render as JSON arrays.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null | Value::Undefined | Value::UndefinedNumber => Json::Null,
            Value::Bool(value) => Json::Bool(*value),
            Value::Number(value) => decimal_to_json(value),
            Value::Str(text) => Json::String((**text).clone()),
            Value::Global(_) => Json::Object(Map::new()),
            Value::Object(object) => {
                if object.is_array() {
                    Json::Array(object.entries().map(|(_, value)| value.to_json()).collect())
                } else {
                    let mut map = Map::with_capacity(object.len());
                    for (key, value) in object.entries() {
                        map.insert(key.to_text(), value.to_json());
                    }
                    Json::Object(map)
                }
            }
        }
    }
}
