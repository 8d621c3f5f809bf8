//! Weft Eval - value model and tree-walking evaluator for the Weft
//! template engine.
//!
//! # Architecture
//!
//! - `Value`: the closed dynamically-typed value union with loose coercions
//! - `evaluate_binary` / `evaluate_unary`: total enum-based operator dispatch
//! - `ScopeEnvironment`: frame-stack scoping for variables and macros
//! - `Engine` / `EngineBuilder`: assembled configuration and entry points
//! - `ResourceLoader` / `TemplateParser`: boundary collaborator contracts
//!
//! Evaluation never aborts for template- or data-level mistakes: anomalies
//! log a `tracing` warning and continue as undefined values. Only the entry
//! template's parse can fail, and only contract violations (unbalanced
//! scope restore) are fatal.

mod builtins;
mod environment;
mod global;
mod operators;
mod resource;
mod stack;
mod unary_operators;
mod value;

pub mod engine;
pub mod errors;

pub use builtins::{GlobalFn, NodeFn};
pub use engine::{Engine, EngineBuilder};
pub use environment::{MacroDef, ScopeEnvironment};
pub use global::{GlobalObject, GlobalProperty};
pub use operators::evaluate_binary;
pub use resource::{NullResourceLoader, Resource, ResourceError, ResourceLoader};
pub use stack::ensure_sufficient_stack;
pub use unary_operators::evaluate_unary;
pub use value::{Heap, ObjectValue, PropKey, Shared, Value};

// Re-export the IR types evaluation consumes.
pub use weft_ir::{BinaryOp, Node, ParseError, TemplateParser, UnaryOp};

#[cfg(test)]
mod tests;
