//! Tests for the safety analyzer.

use serde_json::json;

use super::tpl;
use crate::SafetyAnalyzer;

fn is_safe(tree: &serde_json::Value) -> bool {
    SafetyAnalyzer::new().template_is_safe(&tpl(tree))
}

#[test]
fn test_literals_and_arithmetic_are_safe() {
    assert!(is_safe(&json!(["text", [8, [4, 1], [4, 2]], [7, [[null, [6, "x"]]]]])));
}

#[test]
fn test_context_and_global_are_unsafe() {
    assert!(!is_safe(&json!([[28, "x"]])));
    assert!(!is_safe(&json!([[28, "this", "x"]])));
    assert!(!is_safe(&json!([[28, "global", "userAgent"]])));
}

#[test]
fn test_var_forwards_safety_of_initializer() {
    assert!(is_safe(&json!([[27, "x", [4, 1]], [28, "x"]])));
    // An unsafe initializer taints later reads of the name.
    assert!(!is_safe(&json!([[27, "x", [28, "ctx"]], [28, "x"]])));
    // Order matters: the read precedes the binding.
    assert!(!is_safe(&json!([[28, "x"], [27, "x", [4, 1]]])));
}

#[test]
fn test_if_branch_scopes() {
    // A binding inside a branch is not visible after it.
    assert!(!is_safe(&json!([
        [24, [[[1], [[27, "x", [4, 1]]]]]],
        [28, "x"],
    ])));
    assert!(is_safe(&json!([
        [27, "c", [1]],
        [24, [[[28, "c"], ["yes"]]]],
    ])));
}

#[test]
fn test_for_safety_follows_collection() {
    // Safe collection: loop variables are statically known.
    assert!(is_safe(&json!([
        [25, ["v", "k"], [7, [[null, [4, 1]]]], [[28, "v"], [28, "k"], [28, "self", "index"]]],
    ])));
    // Unsafe collection taints the loop and its variables.
    assert!(!is_safe(&json!([
        [25, ["v"], [28, "items"], [[4, 1]]],
    ])));
}

#[test]
fn test_macro_safety_follows_body() {
    // Safe body: calls with safe arguments are safe.
    assert!(is_safe(&json!([
        [31, "m", [], ["fixed"]],
        [29, null, "m", null],
    ])));
    // A body reading its parameter is not statically known.
    assert!(!is_safe(&json!([
        [31, "m", ["p"], [[28, "p"]]],
        [29, null, "m", [[4, 1]]],
    ])));
    // Unknown callee.
    assert!(!is_safe(&json!([[29, null, "nothing", null]])));
    // Targeted calls are never safe.
    assert!(!is_safe(&json!([
        [27, "s", [6, "abc"]],
        [29, [28, "s"], "size", null],
    ])));
}

#[test]
fn test_import_is_unsafe() {
    assert!(!is_safe(&json!([[30, "lib.tpl"]])));
}
