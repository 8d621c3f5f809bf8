//! The engine and its tree-walking evaluator.
//!
//! `Engine` is the assembled, immutable configuration: parser and resource
//! loader collaborators, frozen function registries and default global
//! properties. Each `evaluate*` call builds its own `Evaluator` with a
//! fresh scope environment and a copied global-properties handle, so
//! concurrent evaluations of a shared engine never touch shared mutable
//! state (the loader permitting).
//!
//! Evaluation is total: template- and data-level mistakes degrade to
//! undefined values with a warning log. Only the top-level parse of the
//! entry template may fail.
//!
//! # Module layout
//!
//! - `control` - if / ternary / for / macro definitions
//! - `calls` - call resolution, macro invocation, resource operations
//! - `selector` - property path walking
//! - `scope_guard` - RAII frame push/pop
//! - `builder` - `EngineBuilder` wiring

mod builder;
mod calls;
mod control;
mod scope_guard;
mod selector;

pub use builder::EngineBuilder;

use rustc_hash::FxHashMap;

use weft_ir::{BinaryOp, Node, ParseError, TemplateParser};

use crate::builtins::{GlobalFn, NodeFn};
use crate::environment::ScopeEnvironment;
use crate::global::{GlobalObject, GlobalProperty};
use crate::operators::evaluate_binary;
use crate::resource::ResourceLoader;
use crate::stack::ensure_sufficient_stack;
use crate::unary_operators::evaluate_unary;
use crate::value::{ObjectValue, PropKey, Shared, Value};

/// The assembled template engine. Build one with [`Engine::builder`].
pub struct Engine {
    pub(crate) parser: Box<dyn TemplateParser>,
    pub(crate) loader: Box<dyn ResourceLoader>,
    pub(crate) global_fns: FxHashMap<String, GlobalFn>,
    pub(crate) node_fns: FxHashMap<String, NodeFn>,
    pub(crate) globals: GlobalObject,
}

impl Engine {
    /// Default wiring: the JSON wire-form parser, no resource loading, the
    /// default node functions.
    pub fn new() -> Engine {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Parse template source text through the configured parser.
    pub fn parse_to_ast(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        self.parser.parse(source)
    }

    /// Parse and evaluate a template against a context.
    ///
    /// The only failure surfaced to the caller is the entry template's
    /// parse; everything below degrades to undefined values.
    pub fn evaluate(
        &self,
        base_uri: Option<&str>,
        source: &str,
        context: Value,
    ) -> Result<String, ParseError> {
        let nodes = self.parser.parse(source)?;
        Ok(self.evaluate_ast(base_uri, &nodes, context))
    }

    /// Evaluate an already-parsed template against a context.
    pub fn evaluate_ast(&self, base_uri: Option<&str>, nodes: &[Node], context: Value) -> String {
        let mut evaluator = self.evaluator(base_uri, context);
        evaluator.eval_statements(nodes)
    }

    /// Evaluate a single expression node to its value. Used by the
    /// optimizer's constant folding and by callers embedding expressions.
    pub fn evaluate_expression(
        &self,
        base_uri: Option<&str>,
        node: &Node,
        context: Value,
    ) -> Value {
        let mut evaluator = self.evaluator(base_uri, context);
        evaluator.eval(node)
    }

    /// Set a default global property, visible to subsequent evaluations.
    pub fn set_global_property(&mut self, property: GlobalProperty, value: Option<String>) {
        self.globals.set(property, value);
    }

    fn evaluator(&self, base_uri: Option<&str>, context: Value) -> Evaluator<'_> {
        let global = Shared::new(self.globals.clone());
        if let Some(uri) = base_uri {
            global
                .borrow_mut()
                .set(GlobalProperty::BaseUri, Some(uri.to_string()));
        }
        Evaluator {
            engine: self,
            env: ScopeEnvironment::new(context, global),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// One evaluation in progress: the engine's read-only configuration plus
/// this call's scope environment.
pub(crate) struct Evaluator<'e> {
    pub(crate) engine: &'e Engine,
    pub(crate) env: ScopeEnvironment,
}

impl<'e> Evaluator<'e> {
    /// Evaluate a statement list to output text: each child's string form
    /// concatenated, with plain text passing through unchanged.
    pub(crate) fn eval_statements(&mut self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                other => out.push_str(&self.eval(other).to_text()),
            }
        }
        out
    }

    /// Evaluate one node to a value.
    pub(crate) fn eval(&mut self, node: &Node) -> Value {
        ensure_sufficient_stack(|| self.eval_inner(node))
    }

    fn eval_inner(&mut self, node: &Node) -> Value {
        match node {
            Node::Text(text) | Node::Str(text) => Value::string(text.clone()),
            Node::True => Value::Bool(true),
            Node::False => Value::Bool(false),
            Node::Null => Value::Null,
            Node::Int(value) => Value::int(*value),
            Node::Double(value) => Value::float(*value),
            Node::Map(entries) => self.eval_map(entries),

            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Unary { op, operand } => {
                let operand = self.eval(operand);
                evaluate_unary(operand, *op)
            }
            Node::Ternary {
                condition,
                then_branch,
                else_branch,
            } => self.eval_ternary(condition, then_branch, else_branch.as_deref()),

            Node::If(branches) => self.eval_if(branches),
            Node::For(for_loop) => self.eval_for(for_loop),
            Node::Statements(body) => {
                let out = self.eval_statements(body);
                Value::string(out)
            }

            // Variable definitions produce no template output.
            Node::Var { name, expr } => {
                let value = self.eval(expr);
                self.env.put_var(name.clone(), value);
                Value::Undefined
            }
            Node::Macro(decl) => self.eval_macro_def(decl),

            Node::Selector { base, path } => self.eval_selector(base, path),
            Node::Call(call) => self.eval_call(call),
            Node::Import(href) => self.eval_import(href),
        }
    }

    /// Binary dispatch; `and` / `or` short-circuit and return the
    /// controlling operand itself.
    fn eval_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> Value {
        match op {
            BinaryOp::And => {
                let left = self.eval(left);
                if left.to_boolean() {
                    self.eval(right)
                } else {
                    left
                }
            }
            BinaryOp::Or => {
                let left = self.eval(left);
                if left.to_boolean() {
                    left
                } else {
                    self.eval(right)
                }
            }
            _ => {
                let left = self.eval(left);
                let right = self.eval(right);
                evaluate_binary(left, right, op)
            }
        }
    }

    fn eval_map(&mut self, entries: &[weft_ir::MapEntry]) -> Value {
        let mut object = ObjectValue::new();
        for entry in entries {
            let value = self.eval(&entry.value);
            match &entry.key {
                None => object.push(value),
                Some(weft_ir::MapKey::Index(index)) => object.set(PropKey::Index(*index), value),
                Some(weft_ir::MapKey::Name(name)) => object.set(PropKey::normalize(name), value),
            }
        }
        Value::object(object)
    }
}
