//! Function registries and the default node-function set.
//!
//! Two registries feed call resolution: global functions (called without a
//! target, or on the global object) and node functions (called on a target
//! value). Both are boxed closures registered at build time and frozen
//! before evaluation begins - there is no runtime registration.

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A registered global function.
pub type GlobalFn = Box<dyn Fn(&[Value]) -> Value>;

/// A registered node function: first argument is the call target.
pub type NodeFn = Box<dyn Fn(&Value, &[Value]) -> Value>;

/// Register the default node functions every value responds to.
pub(crate) fn register_default_node_fns(registry: &mut FxHashMap<String, NodeFn>) {
    register(registry, "size", node_size);
    register(registry, "isNumber", node_is_number);
    register(registry, "isString", node_is_string);
    register(registry, "toString", node_to_string);
    register(registry, "toNumber", node_to_number);
    register(registry, "toJSON", node_to_json);
}

fn register(
    registry: &mut FxHashMap<String, NodeFn>,
    name: &str,
    function: fn(&Value, &[Value]) -> Value,
) {
    registry.insert(name.to_string(), Box::new(function));
}

/// `size()`: character count of a string, entry count of an object.
fn node_size(target: &Value, _args: &[Value]) -> Value {
    match target {
        Value::Str(text) => Value::int(text.chars().count() as i64),
        Value::Object(object) => Value::int(object.len() as i64),
        _ => Value::Undefined,
    }
}

fn node_is_number(target: &Value, _args: &[Value]) -> Value {
    Value::Bool(matches!(target, Value::Number(_)))
}

fn node_is_string(target: &Value, _args: &[Value]) -> Value {
    Value::Bool(matches!(target, Value::Str(_)))
}

fn node_to_string(target: &Value, _args: &[Value]) -> Value {
    Value::string(target.to_text())
}

fn node_to_number(target: &Value, _args: &[Value]) -> Value {
    target.to_number()
}

fn node_to_json(target: &Value, _args: &[Value]) -> Value {
    Value::string(target.to_json().to_string())
}
