//! Safe-subtree pre-evaluation.
//!
//! Replaces maximal runs of safe statements with the text they would
//! produce, merging adjacent text along the way. Binding statements
//! (`var`, macro definitions, `import`) are never absorbed into a run:
//! later unsafe statements may read what they bind, so they stay in the
//! tree - but safe bindings do participate in the sandbox evaluation so
//! that safe reads of them pre-evaluate correctly.
//!
//! The sandbox engine has no resource loader and runs on an empty context;
//! a safe subtree cannot observe either by definition.

use weft_eval::{Engine, ObjectValue, Value};
use weft_ir::{ForLoop, IfBranch, Node};

use crate::safety::SafetyAnalyzer;

/// Pre-evaluates safe statement runs against an empty context.
pub struct SafeSubtreeEvaluator {
    engine: Engine,
}

impl SafeSubtreeEvaluator {
    pub fn new() -> Self {
        SafeSubtreeEvaluator {
            engine: Engine::new(),
        }
    }

    /// Rewrite a whole template.
    pub fn rewrite_template(&self, nodes: &[Node]) -> Vec<Node> {
        let mut analyzer = SafetyAnalyzer::new();
        let mut bindings = Vec::new();
        self.rewrite_list(nodes, &mut analyzer, &mut bindings)
    }

    /// Rewrite one statement list. `bindings` carries the safe binding
    /// statements visible at this point (this list and enclosing ones);
    /// they prefix every sandbox evaluation.
    fn rewrite_list(
        &self,
        nodes: &[Node],
        analyzer: &mut SafetyAnalyzer,
        bindings: &mut Vec<Node>,
    ) -> Vec<Node> {
        let mut out: Vec<Node> = Vec::new();
        let mut run: Vec<Node> = Vec::new();

        for node in nodes {
            let safe = analyzer.check(node);
            let is_binding = matches!(node, Node::Var { .. } | Node::Macro(_) | Node::Import(_));
            if safe && !is_binding {
                run.push(node.clone());
                continue;
            }
            self.flush_run(&mut run, bindings, &mut out);
            if safe {
                // A safe binding statement stays in place and feeds later
                // sandbox evaluations.
                bindings.push(node.clone());
                out.push(node.clone());
            } else {
                out.push(self.rewrite_unsafe(node, analyzer, bindings));
            }
        }
        self.flush_run(&mut run, bindings, &mut out);
        out
    }

    /// Evaluate a pending safe run and splice its text into the output,
    /// merging with a preceding text statement.
    fn flush_run(&self, run: &mut Vec<Node>, bindings: &[Node], out: &mut Vec<Node>) {
        if run.is_empty() {
            return;
        }
        let mut input = bindings.to_vec();
        input.append(run);
        let text = self
            .engine
            .evaluate_ast(None, &input, Value::object(ObjectValue::new()));
        if let Some(Node::Text(previous)) = out.last_mut() {
            previous.push_str(&text);
        } else if !text.is_empty() {
            out.push(Node::Text(text));
        }
    }

    /// Recurse into an unsafe statement's own statement lists so safe runs
    /// inside them still collapse. Bodies evaluate once per entry but are
    /// context-free, so replacing them with their text is sound.
    fn rewrite_unsafe(
        &self,
        node: &Node,
        analyzer: &mut SafetyAnalyzer,
        bindings: &mut Vec<Node>,
    ) -> Node {
        match node {
            Node::If(branches) => Node::If(
                branches
                    .iter()
                    .map(|branch| {
                        analyzer.push();
                        let depth = bindings.len();
                        let body = self.rewrite_list(&branch.body, analyzer, bindings);
                        bindings.truncate(depth);
                        analyzer.pop();
                        IfBranch {
                            condition: branch.condition.clone(),
                            body,
                        }
                    })
                    .collect(),
            ),
            Node::For(for_loop) => {
                analyzer.push();
                analyzer.record_unknown_var(&for_loop.value_var);
                if let Some(key_var) = &for_loop.key_var {
                    analyzer.record_unknown_var(key_var);
                }
                analyzer.record_unknown_var("self");
                let depth = bindings.len();
                let body = self.rewrite_list(&for_loop.body, analyzer, bindings);
                bindings.truncate(depth);
                analyzer.pop();
                let else_body = for_loop.else_body.as_ref().map(|body| {
                    analyzer.push();
                    let depth = bindings.len();
                    let rewritten = self.rewrite_list(body, analyzer, bindings);
                    bindings.truncate(depth);
                    analyzer.pop();
                    rewritten
                });
                Node::For(Box::new(ForLoop {
                    value_var: for_loop.value_var.clone(),
                    key_var: for_loop.key_var.clone(),
                    collection: for_loop.collection.clone(),
                    body,
                    else_body,
                }))
            }
            // Shares the enclosing frame; its bindings stay visible after.
            Node::Statements(body) => {
                Node::Statements(self.rewrite_list(body, analyzer, bindings))
            }
            other => other.clone(),
        }
    }
}

impl Default for SafeSubtreeEvaluator {
    fn default() -> Self {
        SafeSubtreeEvaluator::new()
    }
}
