//! Tests for constant folding.

use pretty_assertions::assert_eq;
use serde_json::json;

use weft_ir::{BinaryOp, Node};

use super::{render, tpl};
use crate::ConstantFolder;

#[test]
fn test_folds_all_literal_operators() {
    let nodes = tpl(&json!([[8, [4, 1], [10, [4, 2], [4, 3]]]]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(folded, vec![Node::Int(7)]);
}

#[test]
fn test_partial_operands_fold_inner_only() {
    // x + (2 * 3): the multiply folds, the add stays.
    let nodes = tpl(&json!([[8, [28, "x"], [10, [4, 2], [4, 3]]]]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(
        folded,
        vec![Node::binary(BinaryOp::Add, Node::variable("x"), Node::Int(6))]
    );
}

#[test]
fn test_fold_string_and_boolean_results() {
    let nodes = tpl(&json!([
        [8, [6, "a"], [6, "b"]],
        [19, [4, 1], [4, 2]],
        [16, [2]],
    ]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(
        folded,
        vec![Node::Str("ab".to_string()), Node::True, Node::True]
    );
}

#[test]
fn test_fold_division_scale() {
    let nodes = tpl(&json!([[11, [4, 1], [4, 3]]]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(folded, vec![Node::Double(0.33)]);
}

#[test]
fn test_unrepresentable_result_stays_unfolded() {
    // true + 1 is undefined: no literal form, node kept as rebuilt.
    let nodes = tpl(&json!([[8, [1], [4, 1]]]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(
        folded,
        vec![Node::binary(BinaryOp::Add, Node::True, Node::Int(1))]
    );
}

#[test]
fn test_fold_ternary_and_short_circuit() {
    let nodes = tpl(&json!([
        [23, [1], [6, "t"], [6, "f"]],
        [14, [6, ""], [6, "rhs"]],
        [15, [4, 0], [4, 9]],
    ]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(
        folded,
        vec![
            Node::Str("t".to_string()),
            Node::Str("rhs".to_string()),
            Node::Int(0),
        ]
    );
}

#[test]
fn test_folding_preserves_semantics() {
    // Same output before and after folding on an empty context.
    let nodes = tpl(&json!([
        "r=",
        [8, [8, [4, 1], [4, 2]], [6, "!"]],
        [24, [[[19, [4, 1], [4, 2]], ["lt"]]]],
        [23, [17, [4, 2], [6, "2"]], [6, " eq"], [6, " ne"]],
    ]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    assert_eq!(render(&folded, &json!({})), render(&nodes, &json!({})));
}

#[test]
fn test_fold_recurses_into_bodies() {
    let nodes = tpl(&json!([
        [24, [[[28, "c"], [[8, [4, 1], [4, 1]]]]]],
        [25, ["v"], [28, "items"], [[8, [4, 2], [4, 2]]]],
        [31, "m", [], [[8, [4, 3], [4, 3]]]],
    ]));
    let folded = ConstantFolder::new().fold_template(&nodes);
    let Node::If(branches) = &folded[0] else {
        panic!("expected if, got {:?}", folded[0]);
    };
    assert_eq!(branches[0].body, vec![Node::Int(2)]);
    let Node::For(for_loop) = &folded[1] else {
        panic!("expected for, got {:?}", folded[1]);
    };
    assert_eq!(for_loop.body, vec![Node::Int(4)]);
    let Node::Macro(decl) = &folded[2] else {
        panic!("expected macro, got {:?}", folded[2]);
    };
    assert_eq!(decl.body, vec![Node::Int(6)]);
}
