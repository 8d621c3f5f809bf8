//! Dead-branch elimination.
//!
//! An `if` with exactly one branch whose condition is the literal true is
//! replaced by its (flattened) body; with the literal false it disappears.
//! Multi-branch conditionals are left for later fixpoint iterations - the
//! folder and propagator shrink their conditions first.

use weft_ir::{ForLoop, IfBranch, MacroDecl, Node};

/// Eliminate dead single-branch conditionals across a statement list.
pub fn eliminate_dead_branches(nodes: &[Node]) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        eliminate_into(node, &mut out);
    }
    out
}

fn eliminate_into(node: &Node, out: &mut Vec<Node>) {
    if let Node::If(branches) = node {
        if let [branch] = branches.as_slice() {
            match branch.condition {
                Node::True => {
                    // Splice the body into the surrounding list.
                    for child in &branch.body {
                        eliminate_into(child, out);
                    }
                    return;
                }
                Node::False => return,
                _ => {}
            }
        }
    }
    out.push(rebuild(node));
}

/// Recurse into statement-list carriers; expressions pass through.
fn rebuild(node: &Node) -> Node {
    match node {
        Node::If(branches) => Node::If(
            branches
                .iter()
                .map(|branch| IfBranch {
                    condition: branch.condition.clone(),
                    body: eliminate_dead_branches(&branch.body),
                })
                .collect(),
        ),
        Node::For(for_loop) => Node::For(Box::new(ForLoop {
            value_var: for_loop.value_var.clone(),
            key_var: for_loop.key_var.clone(),
            collection: for_loop.collection.clone(),
            body: eliminate_dead_branches(&for_loop.body),
            else_body: for_loop
                .else_body
                .as_ref()
                .map(|body| eliminate_dead_branches(body)),
        })),
        Node::Statements(body) => Node::Statements(eliminate_dead_branches(body)),
        Node::Macro(decl) => Node::Macro(Box::new(MacroDecl {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: eliminate_dead_branches(&decl.body),
        })),
        other => other.clone(),
    }
}
