//! Test modules for the optimizer passes.

use weft_ir::json::decode_template;
use weft_ir::Node;

mod fold_tests;
mod pipeline_tests;
mod propagate_tests;
mod safety_tests;

/// Decode a wire-form template for tests.
fn tpl(tree: &serde_json::Value) -> Vec<Node> {
    decode_template(tree).unwrap()
}

/// Evaluate a template against an empty context with default wiring.
fn render(nodes: &[Node], context: &serde_json::Value) -> String {
    weft_eval::Engine::new().evaluate_ast(None, nodes, weft_eval::Value::from_json(context))
}
