//! Tests for constant propagation.

use pretty_assertions::assert_eq;
use serde_json::json;

use weft_ir::Node;

use super::{render, tpl};
use crate::ConstantPropagator;

fn propagate(nodes: &[Node]) -> Vec<Node> {
    ConstantPropagator::new().rewrite_template(nodes)
}

#[test]
fn test_single_segment_read_is_replaced() {
    let nodes = tpl(&json!([[27, "x", [4, 1]], [28, "x"], [28, "x", "y"]]));
    let rewritten = propagate(&nodes);
    assert_eq!(rewritten[1], Node::Int(1));
    // Multi-segment selectors are left alone.
    assert_eq!(rewritten[2], nodes[2]);
}

#[test]
fn test_propagation_is_static_not_runtime() {
    // {{var b = false}}{{if a}}AAA{{elseif b}}BBB{{/if}}: the read of b in
    // the elseif condition is rewritten regardless of which branch runs.
    let nodes = tpl(&json!([
        [27, "b", [2]],
        [24, [[[28, "a"], ["AAA"]], [[28, "b"], ["BBB"]]]],
    ]));
    let rewritten = propagate(&nodes);
    let Node::If(branches) = &rewritten[1] else {
        panic!("expected if, got {:?}", rewritten[1]);
    };
    assert_eq!(branches[1].condition, Node::False);
    // Runtime behavior is unchanged.
    assert_eq!(render(&rewritten, &json!({"a": true})), "AAA");
    assert_eq!(render(&rewritten, &json!({"a": false})), "");
}

#[test]
fn test_first_binding_wins() {
    // The second binding in the same scope neither updates nor clears the
    // recorded constant - observed behavior, kept.
    let nodes = tpl(&json!([
        [27, "x", [4, 1]],
        [27, "x", [4, 2]],
        [28, "x"],
    ]));
    let rewritten = propagate(&nodes);
    assert_eq!(rewritten[2], Node::Int(1));
}

#[test]
fn test_non_literal_binding_blocks_propagation() {
    let nodes = tpl(&json!([[27, "x", [28, "y"]], [28, "x"]]));
    let rewritten = propagate(&nodes);
    assert_eq!(rewritten[1], Node::variable("x"));
}

#[test]
fn test_macro_params_shadow_outer_constants() {
    let nodes = tpl(&json!([
        [27, "x", [4, 1]],
        [31, "m", ["x"], [[28, "x"]]],
        [28, "x"],
    ]));
    let rewritten = propagate(&nodes);
    let Node::Macro(decl) = &rewritten[1] else {
        panic!("expected macro, got {:?}", rewritten[1]);
    };
    // Inside the body the parameter shadows; outside the constant applies.
    assert_eq!(decl.body, vec![Node::variable("x")]);
    assert_eq!(rewritten[2], Node::Int(1));
}

#[test]
fn test_loop_variables_shadow_outer_constants() {
    let nodes = tpl(&json!([
        [27, "v", [4, 9]],
        [25, ["v"], [28, "items"], [[28, "v"], [28, "self", "index"]]],
    ]));
    let rewritten = propagate(&nodes);
    let Node::For(for_loop) = &rewritten[1] else {
        panic!("expected for, got {:?}", rewritten[1]);
    };
    assert_eq!(for_loop.body[0], Node::variable("v"));
}

#[test]
fn test_inner_scope_binding_does_not_escape() {
    let nodes = tpl(&json!([
        [24, [[[1], [[27, "x", [4, 5]], [28, "x"]]]]],
        [28, "x"],
    ]));
    let rewritten = propagate(&nodes);
    let Node::If(branches) = &rewritten[0] else {
        panic!("expected if, got {:?}", rewritten[0]);
    };
    // Propagated inside the branch body...
    assert_eq!(branches[0].body[1], Node::Int(5));
    // ...but not past the branch's scope.
    assert_eq!(rewritten[1], Node::variable("x"));
}
