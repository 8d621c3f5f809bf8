//! Scope environment for one evaluation.
//!
//! A stack of frames, each holding variable and macro bindings that push
//! and pop in lock-step. Reads fall through inner frames to outer ones and
//! finally to the initial context value's own properties; writes always go
//! to the innermost frame. The environment also owns the evaluation's
//! shared global-properties handle and the import-dedup set.
//!
//! An unbalanced restore is a programming error, not a template error, and
//! asserts. Evaluator code never calls save/restore directly - the RAII
//! scope guard does (see `engine::scope_guard`).

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use weft_ir::Node;

use crate::global::{GlobalObject, GlobalProperty};
use crate::value::{PropKey, Shared, Value};

/// A user-defined macro closure: positional parameter names, shared body,
/// and the base URI captured at definition time (restored as the active
/// base URI for the duration of each invocation).
#[derive(Clone, Debug)]
pub struct MacroDef {
    pub params: Vec<String>,
    pub body: Rc<Vec<Node>>,
    pub base_uri: Option<String>,
}

/// One stack level of bindings.
#[derive(Default, Debug)]
struct Frame {
    vars: FxHashMap<String, Value>,
    macros: FxHashMap<String, MacroDef>,
}

/// Per-evaluation scope state. Created by `evaluate` and dies with it.
pub struct ScopeEnvironment {
    frames: Vec<Frame>,
    context: Value,
    global: Shared<GlobalObject>,
    imported: FxHashSet<String>,
}

impl ScopeEnvironment {
    pub fn new(context: Value, global: Shared<GlobalObject>) -> Self {
        ScopeEnvironment {
            frames: vec![Frame::default()],
            context,
            global,
            imported: FxHashSet::default(),
        }
    }

    /// The immutable initial context value.
    pub fn context(&self) -> &Value {
        &self.context
    }

    /// The evaluation's shared global-properties handle.
    pub fn global(&self) -> &Shared<GlobalObject> {
        &self.global
    }

    // State save/restore

    /// Push a fresh frame pair.
    pub fn save_state(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pop the innermost frame pair.
    ///
    /// Restoring past the base frame means save/restore calls are
    /// unbalanced - a contract violation, fatal by design.
    pub fn restore_state(&mut self) {
        assert!(
            self.frames.len() > 1,
            "scope restore without a matching save"
        );
        self.frames.pop();
    }

    // Variables

    pub fn has_var(&self, name: &str) -> bool {
        self.get_var(name).is_some()
    }

    /// Innermost-to-outermost lookup, falling through to the context
    /// value's own properties.
    pub fn get_var(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.vars.get(name) {
                return Some(value.clone());
            }
        }
        self.context.get_property(&PropKey::normalize(name))
    }

    /// Bind in the innermost frame only - no walk-up.
    pub fn put_var(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.vars.insert(name.into(), value);
        }
    }

    // Macros (separate namespace, same discipline, no context fallthrough)

    pub fn has_macro(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.macros.contains_key(name))
    }

    pub fn get_macro(&self, name: &str) -> Option<MacroDef> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.macros.get(name).cloned())
    }

    pub fn put_macro(&mut self, name: impl Into<String>, def: MacroDef) {
        if let Some(frame) = self.frames.last_mut() {
            frame.macros.insert(name.into(), def);
        }
    }

    // Import dedup (scoped to this evaluation)

    pub fn has_imported_resource(&self, resolved_path: &str) -> bool {
        self.imported.contains(resolved_path)
    }

    pub fn add_imported_resource(&mut self, resolved_path: String) {
        self.imported.insert(resolved_path);
    }

    // Global properties

    pub fn get_global_value(&self, property: GlobalProperty) -> Value {
        self.global
            .borrow()
            .get(property)
            .map_or(Value::Undefined, Value::string)
    }

    pub fn set_global_value(&self, property: GlobalProperty, value: Option<String>) {
        self.global.borrow_mut().set(property, value);
    }
}
