use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn test_decode_text_and_literals() {
    let root = json!(["Hello ", [4, 42], [5, 2.5], [6, "w"], [1], [2], [3]]);
    let nodes = decode_template(&root).unwrap();
    assert_eq!(
        nodes,
        vec![
            Node::text("Hello "),
            Node::Int(42),
            Node::Double(2.5),
            Node::Str("w".to_string()),
            Node::True,
            Node::False,
            Node::Null,
        ]
    );
}

#[test]
fn test_decode_nested_arithmetic() {
    // 1 + 2 * 3
    let root = json!([[8, [4, 1], [10, [4, 2], [4, 3]]]]);
    let nodes = decode_template(&root).unwrap();
    assert_eq!(
        nodes,
        vec![Node::binary(
            BinaryOp::Add,
            Node::Int(1),
            Node::binary(BinaryOp::Mul, Node::Int(2), Node::Int(3)),
        )]
    );
}

#[test]
fn test_decode_selector_bases() {
    let root = json!([
        [28, "this", "user", "name"],
        [28, "global", "userAgent"],
        [28, "x"],
        [28, [28, "x"], [4, 0]],
    ]);
    let nodes = decode_template(&root).unwrap();
    assert_eq!(
        nodes[0],
        Node::Selector {
            base: SelectorBase::Context,
            path: vec![
                PathSegment::Prop("user".to_string()),
                PathSegment::Prop("name".to_string()),
            ],
        }
    );
    assert_eq!(
        nodes[1],
        Node::Selector {
            base: SelectorBase::Global,
            path: vec![PathSegment::Prop("userAgent".to_string())],
        }
    );
    assert_eq!(nodes[2], Node::variable("x"));
    assert_eq!(
        nodes[3],
        Node::Selector {
            base: SelectorBase::Expr(Box::new(Node::variable("x"))),
            path: vec![PathSegment::Expr(Node::Int(0))],
        }
    );
}

#[test]
fn test_decode_if_for_var_macro_call() {
    let root = json!([
        [27, "x", [4, 1]],
        [24, [[[28, "x"], ["yes"]], [[1], ["no"]]]],
        [25, ["v", "k"], [28, "items"], ["body"], ["empty"]],
        [31, "greet", ["who"], ["hi ", [28, "who"]]],
        [29, null, "greet", [[6, "a"]]],
        [30, "lib.tpl"],
    ]);
    let nodes = decode_template(&root).unwrap();

    assert_eq!(nodes[0], Node::var("x", Node::Int(1)));
    assert_eq!(
        nodes[1],
        Node::If(vec![
            IfBranch {
                condition: Node::variable("x"),
                body: vec![Node::text("yes")],
            },
            IfBranch {
                condition: Node::True,
                body: vec![Node::text("no")],
            },
        ])
    );
    assert_eq!(
        nodes[2],
        Node::For(Box::new(ForLoop {
            value_var: "v".to_string(),
            key_var: Some("k".to_string()),
            collection: Node::variable("items"),
            body: vec![Node::text("body")],
            else_body: Some(vec![Node::text("empty")]),
        }))
    );
    assert_eq!(
        nodes[3],
        Node::Macro(Box::new(MacroDecl {
            name: "greet".to_string(),
            params: vec!["who".to_string()],
            body: vec![Node::text("hi "), Node::variable("who")],
        }))
    );
    assert_eq!(
        nodes[4],
        Node::Call(Box::new(CallExpr {
            target: None,
            name: CallName::Literal("greet".to_string()),
            args: vec![Node::Str("a".to_string())],
        }))
    );
    assert_eq!(nodes[5], Node::Import("lib.tpl".to_string()));
}

#[test]
fn test_decode_map_keys() {
    let root = json!([[7, [[null, [4, 1]], [0, [4, 2]], ["name", [6, "n"]], [[4, 3]]]]]);
    let nodes = decode_template(&root).unwrap();
    assert_eq!(
        nodes,
        vec![Node::Map(vec![
            MapEntry { key: None, value: Node::Int(1) },
            MapEntry { key: Some(MapKey::Index(0)), value: Node::Int(2) },
            MapEntry { key: Some(MapKey::Name("name".to_string())), value: Node::Str("n".to_string()) },
            MapEntry { key: None, value: Node::Int(3) },
        ])]
    );
}

#[test]
fn test_decode_errors() {
    assert_eq!(
        decode_template(&json!({})).unwrap_err(),
        DecodeError::RootNotArray
    );
    assert_eq!(
        decode_template(&json!([[999]])).unwrap_err(),
        DecodeError::UnknownOpcode { code: 999 }
    );
    // Bare strings are only statements, not operands.
    assert!(matches!(
        decode_template(&json!([[8, "a", "b"]])).unwrap_err(),
        DecodeError::ExpectedNode { .. }
    ));
    assert!(matches!(
        decode_template(&json!([[4, "not-a-number"]])).unwrap_err(),
        DecodeError::Malformed { opcode: "INT", .. }
    ));
}

#[test]
fn test_encode_round_trip() {
    let root = json!([
        "prefix",
        [27, "x", [8, [4, 1], [4, 2]]],
        [24, [[[17, [28, "x"], [4, 3]], ["eq"]]]],
        [25, ["v"], [28, "this", "items"], [[28, "v"]]],
        [23, [1], [6, "t"], [6, "f"]],
        [29, [28, "global"], "size", []],
        [26, ["inner"]],
    ]);
    let nodes = decode_template(&root).unwrap();
    let encoded = encode_template(&nodes);
    assert_eq!(decode_template(&encoded).unwrap(), nodes);
}

#[test]
fn test_json_parser_reports_syntax_line() {
    let err = JsonAstParser.parse("[\n[4, 1],\n oops\n]").unwrap_err();
    assert_eq!(err.line, 3);

    let ok = JsonAstParser.parse("[\"a\", [4, 7]]").unwrap();
    assert_eq!(ok, vec![Node::text("a"), Node::Int(7)]);
}
