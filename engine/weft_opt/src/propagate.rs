//! Constant propagation.
//!
//! A `var` statement with a literal initializer makes its name a known
//! constant for the rest of its scope; single-segment reads of that name
//! are replaced in place by the stored literal. First binding wins within
//! a scope - reassignments are not tracked. A binding with a non-literal
//! initializer (and every macro parameter and loop variable) records a
//! shadow entry instead, so outer constants never leak into scopes that
//! rebind the name.

use rustc_hash::FxHashMap;

use weft_ir::{CallExpr, CallName, ForLoop, IfBranch, MacroDecl, MapEntry, Node, PathSegment, SelectorBase};

/// Per-scope name-to-constant map. `None` entries shadow outer constants.
type ConstFrame = FxHashMap<String, Option<Node>>;

/// Scope-tracking rewriter.
pub struct ConstantPropagator {
    frames: Vec<ConstFrame>,
}

impl ConstantPropagator {
    pub fn new() -> Self {
        ConstantPropagator {
            frames: vec![ConstFrame::default()],
        }
    }

    /// Rewrite a statement list, threading bindings left to right.
    pub fn rewrite_template(&mut self, nodes: &[Node]) -> Vec<Node> {
        nodes.iter().map(|node| self.rewrite(node)).collect()
    }

    fn rewrite(&mut self, node: &Node) -> Node {
        match node {
            Node::Var { name, expr } => {
                let expr = self.rewrite(expr);
                if let Some(frame) = self.frames.last_mut() {
                    // First binding wins; later bindings in the same scope
                    // neither update nor invalidate it.
                    if !frame.contains_key(name) {
                        let constant = expr.is_literal().then(|| expr.clone());
                        frame.insert(name.clone(), constant);
                    }
                }
                Node::Var {
                    name: name.clone(),
                    expr: Box::new(expr),
                }
            }

            // Single-segment reads of a known constant are replaced in
            // place.
            Node::Selector {
                base: SelectorBase::Name(name),
                path,
            } if path.is_empty() => match self.lookup(name) {
                Some(constant) => constant,
                None => node.clone(),
            },

            Node::Selector { base, path } => Node::Selector {
                base: match base {
                    SelectorBase::Expr(expr) => SelectorBase::Expr(Box::new(self.rewrite(expr))),
                    other => other.clone(),
                },
                path: path
                    .iter()
                    .map(|segment| match segment {
                        PathSegment::Expr(expr) => PathSegment::Expr(self.rewrite(expr)),
                        literal => literal.clone(),
                    })
                    .collect(),
            },

            Node::If(branches) => Node::If(
                branches
                    .iter()
                    .map(|branch| {
                        let condition = self.rewrite(&branch.condition);
                        let body = self.scoped(|inner| inner.rewrite_template(&branch.body));
                        IfBranch { condition, body }
                    })
                    .collect(),
            ),

            Node::For(for_loop) => {
                let collection = self.rewrite(&for_loop.collection);
                let body = self.scoped(|inner| {
                    inner.shadow(&for_loop.value_var);
                    if let Some(key_var) = &for_loop.key_var {
                        inner.shadow(key_var);
                    }
                    inner.shadow("self");
                    inner.rewrite_template(&for_loop.body)
                });
                let else_body = for_loop
                    .else_body
                    .as_ref()
                    .map(|body| self.scoped(|inner| inner.rewrite_template(body)));
                Node::For(Box::new(ForLoop {
                    value_var: for_loop.value_var.clone(),
                    key_var: for_loop.key_var.clone(),
                    collection,
                    body,
                    else_body,
                }))
            }

            Node::Macro(decl) => {
                let body = self.scoped(|inner| {
                    for param in &decl.params {
                        inner.shadow(param);
                    }
                    inner.shadow("self");
                    inner.rewrite_template(&decl.body)
                });
                Node::Macro(Box::new(MacroDecl {
                    name: decl.name.clone(),
                    params: decl.params.clone(),
                    body,
                }))
            }

            // Shares the enclosing scope, like in the evaluator.
            Node::Statements(body) => Node::Statements(self.rewrite_template(body)),

            Node::Binary { op, left, right } => {
                Node::binary(*op, self.rewrite(left), self.rewrite(right))
            }
            Node::Unary { op, operand } => Node::unary(*op, self.rewrite(operand)),
            Node::Ternary {
                condition,
                then_branch,
                else_branch,
            } => Node::Ternary {
                condition: Box::new(self.rewrite(condition)),
                then_branch: Box::new(self.rewrite(then_branch)),
                else_branch: else_branch
                    .as_ref()
                    .map(|branch| Box::new(self.rewrite(branch))),
            },
            Node::Map(entries) => Node::Map(
                entries
                    .iter()
                    .map(|entry| MapEntry {
                        key: entry.key.clone(),
                        value: self.rewrite(&entry.value),
                    })
                    .collect(),
            ),
            Node::Call(call) => Node::Call(Box::new(CallExpr {
                target: call.target.as_ref().map(|target| self.rewrite(target)),
                name: match &call.name {
                    CallName::Computed(expr) => CallName::Computed(self.rewrite(expr)),
                    literal => literal.clone(),
                },
                args: call.args.iter().map(|arg| self.rewrite(arg)).collect(),
            })),

            leaf => leaf.clone(),
        }
    }

    fn lookup(&self, name: &str) -> Option<Node> {
        for frame in self.frames.iter().rev() {
            if let Some(entry) = frame.get(name) {
                return entry.clone();
            }
        }
        None
    }

    /// Mark a name as bound-but-unknown in the current scope.
    fn shadow(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), None);
        }
    }

    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.frames.push(ConstFrame::default());
        let result = f(self);
        self.frames.pop();
        result
    }
}

impl Default for ConstantPropagator {
    fn default() -> Self {
        ConstantPropagator::new()
    }
}
