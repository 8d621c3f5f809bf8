//! Weft Opt - AST optimizer pipeline for the Weft template engine.
//!
//! A family of tree-rewriting passes over immutable AST snapshots:
//!
//! - [`SafetyAnalyzer`]: safe/unsafe classification (separate annotations,
//!   never encoded into the tree)
//! - [`ConstantFolder`]: bottom-up evaluation of all-literal operator nodes
//! - [`ConstantPropagator`]: first-binding-wins substitution of constant
//!   `var` reads
//! - [`eliminate_dead_branches`]: literal-condition `if` removal
//! - [`eliminate_dead_variables`]: unreferenced `var` removal
//! - [`SafeSubtreeEvaluator`]: pre-evaluation of safe statement runs
//! - [`optimize`] / [`optimize_with`]: the fixpoint driver
//!
//! Passes rebuild trees rather than mutate them, and the driver detects
//! convergence with structural equality. Pre-evaluation runs against an
//! empty context with resource loading disabled, so it cannot perform I/O.
//! Optimization is intended to run once per template at load time.

mod dead_if;
mod dead_vars;
mod fold;
mod pipeline;
mod pre_eval;
mod propagate;
mod safety;

pub use dead_if::eliminate_dead_branches;
pub use dead_vars::eliminate_dead_variables;
pub use fold::ConstantFolder;
pub use pipeline::{optimize, optimize_with, Passes};
pub use pre_eval::SafeSubtreeEvaluator;
pub use propagate::ConstantPropagator;
pub use safety::SafetyAnalyzer;

#[cfg(test)]
mod tests;
