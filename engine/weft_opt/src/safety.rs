//! Safe/unsafe classification of subtrees.
//!
//! A node is *safe* when evaluating it cannot observe the data context,
//! the global properties or any resource, and cannot call anything except
//! macros already proven safe - i.e. its output is fully determined at
//! optimization time. Safety is carried as a separate analysis result; the
//! tree itself is never marked, so no later stage has anything to clear.
//!
//! Known-safe names follow the evaluator's scope discipline: `var`
//! bindings forward their name's safety only when the initializer was
//! safe, macro bodies and `if`/`for` bodies analyze under fresh frames,
//! and a macro's name becomes known-safe only when its whole body is.

use rustc_hash::FxHashMap;

use weft_ir::{CallName, MapEntry, Node, PathSegment, SelectorBase};

/// One frame of known-name safety. `false` entries are shadowing markers:
/// the name is bound here but not statically known.
#[derive(Default)]
struct SafeFrame {
    vars: FxHashMap<String, bool>,
    macros: FxHashMap<String, bool>,
}

/// Bottom-up safety classifier.
pub struct SafetyAnalyzer {
    frames: Vec<SafeFrame>,
}

impl SafetyAnalyzer {
    pub fn new() -> Self {
        SafetyAnalyzer {
            frames: vec![SafeFrame::default()],
        }
    }

    /// Whether an entire template is safe to pre-evaluate.
    pub fn template_is_safe(&mut self, nodes: &[Node]) -> bool {
        self.check_all(nodes)
    }

    /// Classify every node of a list, recording bindings along the way.
    /// Deliberately avoids short-circuiting: later statements depend on the
    /// bindings earlier ones record.
    pub fn check_all(&mut self, nodes: &[Node]) -> bool {
        let mut safe = true;
        for node in nodes {
            safe = self.check(node) && safe;
        }
        safe
    }

    /// Classify one node.
    pub fn check(&mut self, node: &Node) -> bool {
        match node {
            Node::Text(_)
            | Node::True
            | Node::False
            | Node::Null
            | Node::Int(_)
            | Node::Double(_)
            | Node::Str(_) => true,

            Node::Map(entries) => self.check_entries(entries),

            Node::Binary { left, right, .. } => {
                let left = self.check(left);
                let right = self.check(right);
                left && right
            }
            Node::Unary { operand, .. } => self.check(operand),
            Node::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut safe = self.check(condition);
                safe = self.check(then_branch) && safe;
                if let Some(else_branch) = else_branch {
                    safe = self.check(else_branch) && safe;
                }
                safe
            }

            Node::If(branches) => {
                let mut safe = true;
                for branch in branches {
                    safe = self.check(&branch.condition) && safe;
                    self.push();
                    safe = self.check_all(&branch.body) && safe;
                    self.pop();
                }
                safe
            }

            Node::For(for_loop) => {
                let collection_safe = self.check(&for_loop.collection);
                self.push();
                if collection_safe {
                    // Iteration values are statically known only when the
                    // collection is.
                    self.record_var(&for_loop.value_var, true);
                    if let Some(key_var) = &for_loop.key_var {
                        self.record_var(key_var, true);
                    }
                    self.record_var("self", true);
                } else {
                    self.record_var(&for_loop.value_var, false);
                    if let Some(key_var) = &for_loop.key_var {
                        self.record_var(key_var, false);
                    }
                    self.record_var("self", false);
                }
                let body_safe = self.check_all(&for_loop.body);
                self.pop();
                let else_safe = match &for_loop.else_body {
                    Some(body) => {
                        self.push();
                        let safe = self.check_all(body);
                        self.pop();
                        safe
                    }
                    None => true,
                };
                collection_safe && body_safe && else_safe
            }

            // A statements group shares the enclosing frame, like in the
            // evaluator.
            Node::Statements(body) => self.check_all(body),

            Node::Var { name, expr } => {
                let safe = self.check(expr);
                self.record_var(name, safe);
                safe
            }

            Node::Macro(decl) => {
                self.push();
                // Parameters are call-site data: unknown inside the body.
                for param in &decl.params {
                    self.record_var(param, false);
                }
                self.record_var("self", false);
                let body_safe = self.check_all(&decl.body);
                self.pop();
                self.record_macro(&decl.name, body_safe);
                // Defining a macro has no output and no context dependence.
                true
            }

            Node::Selector { base, path } => {
                let base_safe = match base {
                    // The context and the global object are exactly what
                    // safe code must not observe.
                    SelectorBase::Context | SelectorBase::Global => false,
                    SelectorBase::Name(name) => self.var_is_safe(name),
                    SelectorBase::Expr(expr) => self.check(expr),
                };
                let mut safe = base_safe;
                for segment in path {
                    if let PathSegment::Expr(expr) = segment {
                        safe = self.check(expr) && safe;
                    }
                }
                safe
            }

            Node::Call(call) => {
                let mut args_safe = true;
                for arg in &call.args {
                    args_safe = self.check(arg) && args_safe;
                }
                if call.target.is_some() {
                    return false;
                }
                match &call.name {
                    CallName::Literal(name) => self.macro_is_safe(name) && args_safe,
                    CallName::Computed(_) => false,
                }
            }

            Node::Import(_) => false,
        }
    }

    fn check_entries(&mut self, entries: &[MapEntry]) -> bool {
        let mut safe = true;
        for entry in entries {
            safe = self.check(&entry.value) && safe;
        }
        safe
    }

    // Known-name scope discipline

    pub(crate) fn push(&mut self) {
        self.frames.push(SafeFrame::default());
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "safety frame underflow");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Mark a name as bound-but-unknown in the current frame. The
    /// pre-evaluator uses this when it recurses into loop bodies itself.
    pub(crate) fn record_unknown_var(&mut self, name: &str) {
        self.record_var(name, false);
    }

    fn record_var(&mut self, name: &str, safe: bool) {
        if let Some(frame) = self.frames.last_mut() {
            frame.vars.insert(name.to_string(), safe);
        }
    }

    fn record_macro(&mut self, name: &str, safe: bool) {
        if let Some(frame) = self.frames.last_mut() {
            frame.macros.insert(name.to_string(), safe);
        }
    }

    fn var_is_safe(&self, name: &str) -> bool {
        for frame in self.frames.iter().rev() {
            if let Some(safe) = frame.vars.get(name) {
                return *safe;
            }
        }
        // Unbound names resolve through the context at run time.
        false
    }

    fn macro_is_safe(&self, name: &str) -> bool {
        for frame in self.frames.iter().rev() {
            if let Some(safe) = frame.macros.get(name) {
                return *safe;
            }
        }
        false
    }
}

impl Default for SafetyAnalyzer {
    fn default() -> Self {
        SafetyAnalyzer::new()
    }
}
