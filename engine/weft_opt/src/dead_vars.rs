//! Dead-variable elimination.
//!
//! Two full passes: collect every variable name read by a name-based
//! selector anywhere in the tree, then rewrite each `var` statement whose
//! name was never collected into a null no-op (null output is empty, like
//! the `var` it replaces). Idempotent by construction.
//!
//! Collection is deliberately coarse: any selector rooted at a name keeps
//! that name alive, wherever and however deep it appears.

use rustc_hash::FxHashSet;

use weft_ir::{CallExpr, CallName, ForLoop, IfBranch, MacroDecl, MapEntry, Node, PathSegment, SelectorBase};

/// Drop `var` statements whose names are never read.
pub fn eliminate_dead_variables(nodes: &[Node]) -> Vec<Node> {
    let mut referenced = FxHashSet::default();
    for node in nodes {
        collect(node, &mut referenced);
    }
    nodes.iter().map(|node| rewrite(node, &referenced)).collect()
}

// Pass 1: referenced names

fn collect(node: &Node, referenced: &mut FxHashSet<String>) {
    match node {
        Node::Selector { base, path } => {
            match base {
                SelectorBase::Name(name) => {
                    referenced.insert(name.clone());
                }
                SelectorBase::Expr(expr) => collect(expr, referenced),
                SelectorBase::Context | SelectorBase::Global => {}
            }
            for segment in path {
                if let PathSegment::Expr(expr) = segment {
                    collect(expr, referenced);
                }
            }
        }
        Node::Binary { left, right, .. } => {
            collect(left, referenced);
            collect(right, referenced);
        }
        Node::Unary { operand, .. } => collect(operand, referenced),
        Node::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            collect(condition, referenced);
            collect(then_branch, referenced);
            if let Some(else_branch) = else_branch {
                collect(else_branch, referenced);
            }
        }
        Node::Map(entries) => {
            for entry in entries {
                collect(&entry.value, referenced);
            }
        }
        Node::If(branches) => {
            for branch in branches {
                collect(&branch.condition, referenced);
                collect_all(&branch.body, referenced);
            }
        }
        Node::For(for_loop) => {
            collect(&for_loop.collection, referenced);
            collect_all(&for_loop.body, referenced);
            if let Some(body) = &for_loop.else_body {
                collect_all(body, referenced);
            }
        }
        Node::Statements(body) => collect_all(body, referenced),
        Node::Var { expr, .. } => collect(expr, referenced),
        Node::Macro(decl) => collect_all(&decl.body, referenced),
        Node::Call(call) => {
            if let Some(target) = &call.target {
                collect(target, referenced);
            }
            if let CallName::Computed(expr) = &call.name {
                collect(expr, referenced);
            }
            for arg in &call.args {
                collect(arg, referenced);
            }
        }
        Node::Text(_)
        | Node::True
        | Node::False
        | Node::Null
        | Node::Int(_)
        | Node::Double(_)
        | Node::Str(_)
        | Node::Import(_) => {}
    }
}

fn collect_all(nodes: &[Node], referenced: &mut FxHashSet<String>) {
    for node in nodes {
        collect(node, referenced);
    }
}

// Pass 2: rewrite

fn rewrite(node: &Node, referenced: &FxHashSet<String>) -> Node {
    match node {
        Node::Var { name, expr } => {
            if referenced.contains(name) {
                Node::Var {
                    name: name.clone(),
                    expr: Box::new(rewrite(expr, referenced)),
                }
            } else {
                Node::Null
            }
        }
        Node::If(branches) => Node::If(
            branches
                .iter()
                .map(|branch| IfBranch {
                    condition: rewrite(&branch.condition, referenced),
                    body: rewrite_all(&branch.body, referenced),
                })
                .collect(),
        ),
        Node::For(for_loop) => Node::For(Box::new(ForLoop {
            value_var: for_loop.value_var.clone(),
            key_var: for_loop.key_var.clone(),
            collection: rewrite(&for_loop.collection, referenced),
            body: rewrite_all(&for_loop.body, referenced),
            else_body: for_loop
                .else_body
                .as_ref()
                .map(|body| rewrite_all(body, referenced)),
        })),
        Node::Statements(body) => Node::Statements(rewrite_all(body, referenced)),
        Node::Macro(decl) => Node::Macro(Box::new(MacroDecl {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: rewrite_all(&decl.body, referenced),
        })),
        Node::Binary { op, left, right } => Node::binary(
            *op,
            rewrite(left, referenced),
            rewrite(right, referenced),
        ),
        Node::Unary { op, operand } => Node::unary(*op, rewrite(operand, referenced)),
        Node::Ternary {
            condition,
            then_branch,
            else_branch,
        } => Node::Ternary {
            condition: Box::new(rewrite(condition, referenced)),
            then_branch: Box::new(rewrite(then_branch, referenced)),
            else_branch: else_branch
                .as_ref()
                .map(|branch| Box::new(rewrite(branch, referenced))),
        },
        Node::Map(entries) => Node::Map(
            entries
                .iter()
                .map(|entry| MapEntry {
                    key: entry.key.clone(),
                    value: rewrite(&entry.value, referenced),
                })
                .collect(),
        ),
        Node::Call(call) => Node::Call(Box::new(CallExpr {
            target: call
                .target
                .as_ref()
                .map(|target| rewrite(target, referenced)),
            name: call.name.clone(),
            args: call
                .args
                .iter()
                .map(|arg| rewrite(arg, referenced))
                .collect(),
        })),
        other => other.clone(),
    }
}

fn rewrite_all(nodes: &[Node], referenced: &FxHashSet<String>) -> Vec<Node> {
    nodes.iter().map(|node| rewrite(node, referenced)).collect()
}
