//! `EngineBuilder` for assembling engines with explicit wiring.
//!
//! Registries are populated here and frozen when `build` hands them to the
//! engine - there is no registration after that point, which is what makes
//! sharing one engine across concurrent evaluations sound.

use rustc_hash::FxHashMap;

use weft_ir::json::JsonAstParser;
use weft_ir::TemplateParser;

use super::Engine;
use crate::builtins::{register_default_node_fns, GlobalFn, NodeFn};
use crate::global::{GlobalObject, GlobalProperty};
use crate::resource::{NullResourceLoader, ResourceLoader};
use crate::value::Value;

/// Builder for [`Engine`] instances.
///
/// Defaults: the JSON wire-form parser, the refusing resource loader, the
/// default node-function set (re-registering a name shadows it), and no
/// global properties.
pub struct EngineBuilder {
    parser: Option<Box<dyn TemplateParser>>,
    loader: Option<Box<dyn ResourceLoader>>,
    global_fns: FxHashMap<String, GlobalFn>,
    node_fns: FxHashMap<String, NodeFn>,
    globals: GlobalObject,
}

impl EngineBuilder {
    pub fn new() -> Self {
        let mut node_fns = FxHashMap::default();
        register_default_node_fns(&mut node_fns);
        EngineBuilder {
            parser: None,
            loader: None,
            global_fns: FxHashMap::default(),
            node_fns,
            globals: GlobalObject::new(),
        }
    }

    /// Use a specific source parser collaborator.
    pub fn parser(mut self, parser: impl TemplateParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Use a specific resource loader collaborator.
    pub fn loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Register a global function.
    pub fn global_fn(
        mut self,
        name: impl Into<String>,
        function: impl Fn(&[Value]) -> Value + 'static,
    ) -> Self {
        self.global_fns.insert(name.into(), Box::new(function));
        self
    }

    /// Register a node function (shadows a default of the same name).
    pub fn node_fn(
        mut self,
        name: impl Into<String>,
        function: impl Fn(&Value, &[Value]) -> Value + 'static,
    ) -> Self {
        self.node_fns.insert(name.into(), Box::new(function));
        self
    }

    /// Set a default global property.
    pub fn global_property(mut self, property: GlobalProperty, value: impl Into<String>) -> Self {
        self.globals.set(property, Some(value.into()));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            parser: self.parser.unwrap_or_else(|| Box::new(JsonAstParser)),
            loader: self.loader.unwrap_or_else(|| Box::new(NullResourceLoader)),
            global_fns: self.global_fns,
            node_fns: self.node_fns,
            globals: self.globals,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder::new()
    }
}
