//! Bottom-up constant folding.
//!
//! Operator nodes whose folded operands are all literal constants are
//! evaluated once through the evaluator against an empty context and
//! spliced back in as the literal result. A result with no literal form
//! (an undefined value, an object) keeps the folded-operand node instead -
//! the deferred evaluation produces the same value at run time.

use rust_decimal::prelude::ToPrimitive;

use weft_eval::{Engine, ObjectValue, Value};
use weft_ir::{CallExpr, CallName, ForLoop, IfBranch, MacroDecl, MapEntry, Node, PathSegment, SelectorBase};

/// Constant folder with its own sandboxed engine (no resource loading).
pub struct ConstantFolder {
    engine: Engine,
}

impl ConstantFolder {
    pub fn new() -> Self {
        ConstantFolder {
            engine: Engine::new(),
        }
    }

    /// Fold every node of a statement list.
    pub fn fold_template(&self, nodes: &[Node]) -> Vec<Node> {
        nodes.iter().map(|node| self.fold(node)).collect()
    }

    /// Fold one node bottom-up.
    pub fn fold(&self, node: &Node) -> Node {
        match node {
            Node::Binary { op, left, right } => {
                let folded = Node::binary(*op, self.fold(left), self.fold(right));
                self.splice_if_constant(folded)
            }
            Node::Unary { op, operand } => {
                let folded = Node::unary(*op, self.fold(operand));
                self.splice_if_constant(folded)
            }
            Node::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let folded = Node::Ternary {
                    condition: Box::new(self.fold(condition)),
                    then_branch: Box::new(self.fold(then_branch)),
                    else_branch: else_branch
                        .as_ref()
                        .map(|branch| Box::new(self.fold(branch))),
                };
                self.splice_if_constant(folded)
            }

            // Containers: fold children, nothing to evaluate here.
            Node::Map(entries) => Node::Map(
                entries
                    .iter()
                    .map(|entry| MapEntry {
                        key: entry.key.clone(),
                        value: self.fold(&entry.value),
                    })
                    .collect(),
            ),
            Node::If(branches) => Node::If(
                branches
                    .iter()
                    .map(|branch| IfBranch {
                        condition: self.fold(&branch.condition),
                        body: self.fold_template(&branch.body),
                    })
                    .collect(),
            ),
            Node::For(for_loop) => Node::For(Box::new(ForLoop {
                value_var: for_loop.value_var.clone(),
                key_var: for_loop.key_var.clone(),
                collection: self.fold(&for_loop.collection),
                body: self.fold_template(&for_loop.body),
                else_body: for_loop
                    .else_body
                    .as_ref()
                    .map(|body| self.fold_template(body)),
            })),
            Node::Statements(body) => Node::Statements(self.fold_template(body)),
            Node::Var { name, expr } => Node::var(name.clone(), self.fold(expr)),
            Node::Macro(decl) => Node::Macro(Box::new(MacroDecl {
                name: decl.name.clone(),
                params: decl.params.clone(),
                body: self.fold_template(&decl.body),
            })),
            Node::Selector { base, path } => Node::Selector {
                base: match base {
                    SelectorBase::Expr(expr) => SelectorBase::Expr(Box::new(self.fold(expr))),
                    other => other.clone(),
                },
                path: path
                    .iter()
                    .map(|segment| match segment {
                        PathSegment::Expr(expr) => PathSegment::Expr(self.fold(expr)),
                        literal => literal.clone(),
                    })
                    .collect(),
            },
            Node::Call(call) => Node::Call(Box::new(CallExpr {
                target: call.target.as_ref().map(|target| self.fold(target)),
                name: match &call.name {
                    CallName::Computed(expr) => CallName::Computed(self.fold(expr)),
                    literal => literal.clone(),
                },
                args: call.args.iter().map(|arg| self.fold(arg)).collect(),
            })),

            // Leaves fold to themselves.
            leaf => leaf.clone(),
        }
    }

    /// Evaluate an operator node once when every operand is literal;
    /// otherwise keep it as rebuilt.
    fn splice_if_constant(&self, node: Node) -> Node {
        if !operands_are_literal(&node) {
            return node;
        }
        let value = self
            .engine
            .evaluate_expression(None, &node, Value::object(ObjectValue::new()));
        value_to_literal(&value).unwrap_or(node)
    }
}

impl Default for ConstantFolder {
    fn default() -> Self {
        ConstantFolder::new()
    }
}

/// Whether every operand of an operator node is a literal constant.
fn operands_are_literal(node: &Node) -> bool {
    match node {
        Node::Binary { left, right, .. } => left.is_literal() && right.is_literal(),
        Node::Unary { operand, .. } => operand.is_literal(),
        Node::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            condition.is_literal()
                && then_branch.is_literal()
                && else_branch.as_ref().is_none_or(|branch| branch.is_literal())
        }
        _ => false,
    }
}

/// A literal node for a value, when one exists. Undefined kinds and
/// objects have no literal form and stay unevaluated.
pub(crate) fn value_to_literal(value: &Value) -> Option<Node> {
    match value {
        Value::Null => Some(Node::Null),
        Value::Bool(true) => Some(Node::True),
        Value::Bool(false) => Some(Node::False),
        Value::Number(number) => {
            if number.fract().is_zero() {
                if let Some(int) = number.to_i64() {
                    return Some(Node::Int(int));
                }
            }
            number.to_f64().map(Node::Double)
        }
        Value::Str(text) => Some(Node::Str((**text).clone())),
        _ => None,
    }
}
