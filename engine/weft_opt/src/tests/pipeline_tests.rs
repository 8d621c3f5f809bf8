//! Tests for the fixpoint driver and safe-subtree pre-evaluation.

use pretty_assertions::assert_eq;
use serde_json::json;

use weft_ir::{BinaryOp, Node};

use super::{render, tpl};
use crate::{optimize, optimize_with, Passes, SafeSubtreeEvaluator};

#[test]
fn test_safe_runs_collapse_around_unsafe_nodes() {
    // "A{{1+2}}{{x+3}}{{3}}" with marking + folding only: the safe prefix
    // merges into "A3", the context-dependent add survives, the trailing
    // literal becomes its own text.
    let nodes = tpl(&json!([
        "A",
        [8, [4, 1], [4, 2]],
        [8, [28, "x"], [4, 3]],
        [4, 3],
    ]));
    let optimized = optimize_with(&nodes, Passes::FOLD | Passes::SAFE_EVAL);
    assert_eq!(
        optimized,
        vec![
            Node::text("A3"),
            Node::binary(BinaryOp::Add, Node::variable("x"), Node::Int(3)),
            Node::text("3"),
        ]
    );
    // Runtime equivalence for the surviving node.
    assert_eq!(render(&optimized, &json!({"x": 1})), "A343");
    assert_eq!(render(&nodes, &json!({"x": 1})), "A343");
}

#[test]
fn test_safe_bindings_feed_pre_evaluation_but_stay() {
    let nodes = tpl(&json!([
        [27, "x", [4, 2]],
        [8, [28, "x"], [4, 1]],
        [8, [28, "ctx"], [28, "x"]],
    ]));
    let optimized = SafeSubtreeEvaluator::new().rewrite_template(&nodes);
    // The safe read of x pre-evaluates to "3"; the binding stays because
    // the unsafe tail still reads it.
    assert_eq!(optimized[0], nodes[0]);
    assert_eq!(optimized[1], Node::text("3"));
    assert_eq!(optimized[2], nodes[2]);
    assert_eq!(render(&optimized, &json!({"ctx": 10})), render(&nodes, &json!({"ctx": 10})));
}

#[test]
fn test_fully_safe_template_becomes_single_text() {
    let nodes = tpl(&json!([
        [27, "a", [4, 1]],
        [27, "b", [8, [28, "a"], [4, 1]]],
        [27, "c", [8, [28, "b"], [4, 1]]],
        [24, [[[17, [28, "c"], [4, 3]], ["X"]]]],
    ]));
    let optimized = optimize(&nodes);
    assert_eq!(optimized, vec![Node::text("X")]);
}

#[test]
fn test_unsafe_template_keeps_tree_shape() {
    let nodes = tpl(&json!(["hello ", [28, "name"]]));
    let optimized = optimize(&nodes);
    assert_eq!(optimized, nodes);
    assert_eq!(render(&optimized, &json!({"name": "w"})), "hello w");
}

#[test]
fn test_fixpoint_terminates_on_nested_chains() {
    // A var/if/arithmetic chain three levels deep: each outer iteration
    // unlocks the next propagation, and the loop still converges.
    let nodes = tpl(&json!([
        [27, "a", [8, [4, 1], [4, 1]]],
        [24, [[[17, [28, "a"], [4, 2]],
            [[27, "b", [8, [28, "a"], [4, 1]]],
             [24, [[[17, [28, "b"], [4, 3]],
                 [[27, "c", [8, [28, "b"], [4, 1]]],
                  [24, [[[17, [28, "c"], [4, 4]], ["deep"]]]]]]]]]]]],
    ]));
    let optimized = optimize(&nodes);
    assert_eq!(optimized, vec![Node::text("deep")]);
}

#[test]
fn test_optimize_is_idempotent() {
    let nodes = tpl(&json!([
        [27, "x", [4, 1]],
        "a",
        [8, [28, "x"], [28, "ctx"]],
        [24, [[[2], ["dead"]]]],
    ]));
    let once = optimize(&nodes);
    let twice = optimize(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_dead_code_pipeline_end_to_end() {
    // Propagation turns the condition literal, dead-branch elimination
    // flattens it, dead-variable elimination clears the binding.
    let nodes = tpl(&json!([
        [27, "debug", [2]],
        [24, [[[28, "debug"], ["dbg: "]]]],
        "out=",
        [28, "value"],
    ]));
    let optimized = optimize(&nodes);
    assert_eq!(
        optimized,
        vec![Node::Null, Node::text("out="), Node::variable("value")]
    );
    assert_eq!(render(&optimized, &json!({"value": 7})), "out=7");
}

#[test]
fn test_optimizer_preserves_macro_semantics() {
    let nodes = tpl(&json!([
        [31, "greet", ["who"], ["hi ", [28, "who"], "! "]],
        [29, null, "greet", [[28, "name"]]],
        [29, null, "greet", [[6, "static"]]],
    ]));
    let optimized = optimize(&nodes);
    assert_eq!(
        render(&optimized, &json!({"name": "w"})),
        render(&nodes, &json!({"name": "w"}))
    );
}
