//! Call resolution, macro invocation and resource operations.
//!
//! Resolution order for a call without a target: macro in scope, then
//! registered global function, then the reserved names `include` /
//! `loadJSON` / `loadText` (checked last so user registrations can shadow
//! them), else undefined. With a target: the global object prefers a node
//! function then a global function; any other target requires a node
//! function. Argument evaluation always happens inside its own frame.
//!
//! Every resource or parse failure in this module is caught, logged and
//! degraded to `Undefined` - it never aborts the enclosing evaluation.

use tracing::warn;

use weft_ir::{CallExpr, CallName, Node};

use super::Evaluator;
use crate::environment::{MacroDef, ScopeEnvironment};
use crate::global::GlobalProperty;
use crate::resource::Resource;
use crate::value::{ObjectValue, PropKey, Shared, Value};

impl Evaluator<'_> {
    pub(super) fn eval_call(&mut self, call: &CallExpr) -> Value {
        let name = match &call.name {
            CallName::Literal(name) => name.clone(),
            CallName::Computed(expr) => self.eval(expr).to_text(),
        };

        // 1. Explicit target expression.
        if let Some(target) = &call.target {
            let target = self.eval(target);
            let args = self.eval_args(&call.args);
            return self.call_with_target(&target, &name, &args);
        }

        // 2. Macro in scope.
        if let Some(def) = self.env.get_macro(&name) {
            return self.invoke_macro(&def, &call.args);
        }

        // 3. Registered global function.
        if let Some(function) = self.engine.global_fns.get(&name) {
            let args = self.eval_args(&call.args);
            return function(&args);
        }

        // 4. Reserved built-ins, shadowable via (2) and (3).
        match name.as_str() {
            "include" => return self.eval_include(&call.args),
            "loadJSON" => return self.eval_load_json(&call.args),
            "loadText" => return self.eval_load_text(&call.args),
            _ => {}
        }

        // 5. Nothing matched.
        warn!(%name, "unknown function or macro");
        Value::Undefined
    }

    /// Evaluate call arguments inside their own frame.
    fn eval_args(&mut self, args: &[Node]) -> Vec<Value> {
        self.with_scope(|scoped| args.iter().map(|arg| scoped.eval(arg)).collect())
    }

    fn call_with_target(&mut self, target: &Value, name: &str, args: &[Value]) -> Value {
        if matches!(target, Value::Global(_)) {
            if let Some(function) = self.engine.node_fns.get(name) {
                return function(target, args);
            }
            if let Some(function) = self.engine.global_fns.get(name) {
                return function(args);
            }
            warn!(name, "unknown function on global");
            return Value::Undefined;
        }
        match self.engine.node_fns.get(name) {
            Some(function) => function(target, args),
            None => {
                warn!(
                    name,
                    target = target.type_name(),
                    "no node function for target"
                );
                Value::Undefined
            }
        }
    }

    /// Invoke a macro: bind parameters positionally (missing arguments are
    /// undefined), expose the actual argument list as `self.arguments`, and
    /// swap in the macro's captured base URI for the call's duration.
    fn invoke_macro(&mut self, def: &MacroDef, args: &[Node]) -> Value {
        let args = self.eval_args(args);
        self.with_scope(|scoped| {
            for (position, param) in def.params.iter().enumerate() {
                scoped.env.put_var(
                    param.clone(),
                    args.get(position).cloned().unwrap_or(Value::Undefined),
                );
            }

            let mut arguments = ObjectValue::new();
            for value in &args {
                arguments.push(value.clone());
            }
            let mut self_object = ObjectValue::new();
            self_object.set(
                PropKey::Name("arguments".to_string()),
                Value::object(arguments),
            );
            scoped.env.put_var("self", Value::object(self_object));

            let caller_base = scoped.current_base();
            scoped
                .env
                .set_global_value(GlobalProperty::BaseUri, def.base_uri.clone());
            let out = scoped.eval_statements(&def.body);
            scoped
                .env
                .set_global_value(GlobalProperty::BaseUri, caller_base);
            Value::string(out)
        })
    }

    // Resource operations

    fn current_base(&self) -> Option<String> {
        self.env
            .global()
            .borrow()
            .get(GlobalProperty::BaseUri)
            .map(str::to_string)
    }

    /// `import`: resolve, dedup per evaluation, then replay only the
    /// imported template's macro and import statements into the current
    /// scope. Re-importing a resolved path is a no-op.
    pub(super) fn eval_import(&mut self, href: &str) -> Value {
        let base = self.current_base();
        let resolved = match self.engine.loader.resolve_full_path(href, base.as_deref()) {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, href, "import failed to resolve");
                return Value::Undefined;
            }
        };
        if self.env.has_imported_resource(&resolved) {
            return Value::Undefined;
        }
        self.env.add_imported_resource(resolved);

        let Some(resource) = self.load_resource(href, "import") else {
            return Value::Undefined;
        };
        let source = String::from_utf8_lossy(&resource.bytes).into_owned();
        let nodes = match self.engine.parser.parse(&source) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(%err, href, "imported template failed to parse");
                return Value::Undefined;
            }
        };

        // Definitions replay under the imported resource's base URI so the
        // macros capture it; the caller's base comes back afterwards.
        let caller_base = self.current_base();
        self.env
            .set_global_value(GlobalProperty::BaseUri, Some(resource.base_href));
        for node in &nodes {
            if matches!(node, Node::Macro(_) | Node::Import(_)) {
                self.eval(node);
            }
        }
        self.env
            .set_global_value(GlobalProperty::BaseUri, caller_base);
        Value::Undefined
    }

    /// `include(path, context?)`: evaluate a resource in a new, independent
    /// environment sharing only a copy of the global object (base URI
    /// overridden from the resource). The included template sees its
    /// explicit context argument, never the caller's locals.
    pub(super) fn eval_include(&mut self, args: &[Node]) -> Value {
        let evaluated = self.eval_args(args);
        let Some(href) = evaluated.first().map(Value::to_text) else {
            warn!("include without a resource path");
            return Value::Undefined;
        };
        let context = evaluated.get(1).cloned().unwrap_or(Value::Undefined);

        let Some(resource) = self.load_resource(&href, "include") else {
            return Value::Undefined;
        };
        let source = String::from_utf8_lossy(&resource.bytes).into_owned();
        let nodes = match self.engine.parser.parse(&source) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(%err, %href, "included template failed to parse");
                return Value::Undefined;
            }
        };

        let global = Shared::new(self.env.global().borrow().clone());
        global
            .borrow_mut()
            .set(GlobalProperty::BaseUri, Some(resource.base_href));
        let mut sub = Evaluator {
            engine: self.engine,
            env: ScopeEnvironment::new(context, global),
        };
        Value::string(sub.eval_statements(&nodes))
    }

    pub(super) fn eval_load_text(&mut self, args: &[Node]) -> Value {
        match self.load_first_arg(args, "loadText") {
            Some(resource) => Value::string(String::from_utf8_lossy(&resource.bytes).into_owned()),
            None => Value::Undefined,
        }
    }

    pub(super) fn eval_load_json(&mut self, args: &[Node]) -> Value {
        let Some(resource) = self.load_first_arg(args, "loadJSON") else {
            return Value::Undefined;
        };
        match serde_json::from_slice::<serde_json::Value>(&resource.bytes) {
            Ok(json) => Value::from_json(&json),
            Err(err) => {
                warn!(%err, "loadJSON resource is not valid JSON");
                Value::Undefined
            }
        }
    }

    fn load_first_arg(&mut self, args: &[Node], op: &'static str) -> Option<Resource> {
        let evaluated = self.eval_args(args);
        let Some(href) = evaluated.first().map(Value::to_text) else {
            warn!(op, "missing resource path");
            return None;
        };
        self.load_resource(&href, op)
    }

    fn load_resource(&self, href: &str, op: &'static str) -> Option<Resource> {
        let base = self.current_base();
        match self.engine.loader.load(href, base.as_deref()) {
            Ok(resource) => Some(resource),
            Err(err) => {
                warn!(%err, href, op, "resource load failed");
                None
            }
        }
    }
}
