//! Control constructs: `if`, ternary, `for`, macro definitions.

use weft_ir::{ForLoop, IfBranch, MacroDecl, Node};

use super::Evaluator;
use crate::environment::MacroDef;
use crate::global::GlobalProperty;
use crate::value::{ObjectValue, PropKey, Value};

impl Evaluator<'_> {
    /// Ordered `(condition, body)` pairs inside one frame; the first truthy
    /// condition's body runs and short-circuits. No match is empty output.
    pub(super) fn eval_if(&mut self, branches: &[IfBranch]) -> Value {
        self.with_scope(|scoped| {
            for branch in branches {
                if scoped.eval(&branch.condition).to_boolean() {
                    let out = scoped.eval_statements(&branch.body);
                    return Value::string(out);
                }
            }
            Value::string(String::new())
        })
    }

    pub(super) fn eval_ternary(
        &mut self,
        condition: &Node,
        then_branch: &Node,
        else_branch: Option<&Node>,
    ) -> Value {
        if self.eval(condition).to_boolean() {
            self.eval(then_branch)
        } else {
            match else_branch {
                Some(node) => self.eval(node),
                None => Value::Undefined,
            }
        }
    }

    /// Iterate an object's entries in insertion order inside one frame,
    /// binding the value (and stringified key, if requested) plus a `self`
    /// object carrying `index` and `last`. Non-object collections run the
    /// else-body instead.
    pub(super) fn eval_for(&mut self, for_loop: &ForLoop) -> Value {
        let collection = self.eval(&for_loop.collection);
        let Value::Object(object) = collection else {
            return match &for_loop.else_body {
                Some(body) => self.with_scope(|scoped| Value::string(scoped.eval_statements(body))),
                None => Value::string(String::new()),
            };
        };

        let last = object.len() as i64 - 1;
        self.with_scope(|scoped| {
            let mut out = String::new();
            for (index, (key, value)) in object.entries().enumerate() {
                let mut self_object = ObjectValue::new();
                self_object.set(PropKey::Name("index".to_string()), Value::int(index as i64));
                self_object.set(PropKey::Name("last".to_string()), Value::int(last));
                scoped.env.put_var("self", Value::object(self_object));
                scoped
                    .env
                    .put_var(for_loop.value_var.clone(), value.clone());
                if let Some(key_var) = &for_loop.key_var {
                    scoped
                        .env
                        .put_var(key_var.clone(), Value::string(key.to_text()));
                }
                out.push_str(&scoped.eval_statements(&for_loop.body));
            }
            Value::string(out)
        })
    }

    /// Register a macro closure in the innermost frame. The definition
    /// captures the active base URI; invocation restores it transiently.
    pub(super) fn eval_macro_def(&mut self, decl: &MacroDecl) -> Value {
        let base_uri = self
            .env
            .global()
            .borrow()
            .get(GlobalProperty::BaseUri)
            .map(str::to_string);
        let def = MacroDef {
            params: decl.params.clone(),
            body: std::rc::Rc::new(decl.body.clone()),
            base_uri,
        };
        self.env.put_macro(decl.name.clone(), def);
        Value::Undefined
    }
}
