//! The fixpoint driver.
//!
//! Runs constant folding, constant propagation, dead-branch elimination
//! and dead-variable elimination in that fixed order inside an outer loop
//! until the tree snapshot stops changing. Convergence is detected with
//! structural equality over immutable snapshots - exact, and affordable at
//! template sizes - with a defensive iteration cap in case a future pass
//! pair oscillates.
//!
//! After convergence a final safety analysis decides whether the whole
//! template can be replaced by a single pre-evaluated text statement.

use bitflags::bitflags;
use tracing::{debug, warn};

use weft_eval::{Engine, ObjectValue, Value};
use weft_ir::Node;

use crate::dead_if::eliminate_dead_branches;
use crate::dead_vars::eliminate_dead_variables;
use crate::fold::ConstantFolder;
use crate::pre_eval::SafeSubtreeEvaluator;
use crate::safety::SafetyAnalyzer;

bitflags! {
    /// Pass selection for [`optimize_with`].
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Passes: u8 {
        /// Bottom-up constant folding.
        const FOLD = 1 << 0;
        /// Constant propagation into selector reads.
        const PROPAGATE = 1 << 1;
        /// Dead single-branch `if` elimination.
        const DEAD_BRANCHES = 1 << 2;
        /// Unreferenced `var` elimination.
        const DEAD_VARS = 1 << 3;
        /// Partial pre-evaluation of safe statement runs.
        const SAFE_EVAL = 1 << 4;
        /// Whole-template pre-evaluation after convergence.
        const PRE_EVALUATE = 1 << 5;
    }
}

impl Passes {
    /// The standard pipeline: every rewriting pass to a fixpoint, then the
    /// whole-template pre-evaluation.
    pub const fn standard() -> Passes {
        Passes::FOLD
            .union(Passes::PROPAGATE)
            .union(Passes::DEAD_BRANCHES)
            .union(Passes::DEAD_VARS)
            .union(Passes::PRE_EVALUATE)
    }
}

/// Outer-loop cap. Real templates converge in a handful of iterations;
/// hitting this means a pass pair is oscillating.
const MAX_ITERATIONS: usize = 32;

/// Optimize a template with the standard pass set.
pub fn optimize(nodes: &[Node]) -> Vec<Node> {
    optimize_with(nodes, Passes::standard())
}

/// Optimize a template with an explicit pass selection.
pub fn optimize_with(nodes: &[Node], passes: Passes) -> Vec<Node> {
    let folder = ConstantFolder::new();
    let mut current = nodes.to_vec();
    let mut converged = false;

    for iteration in 1..=MAX_ITERATIONS {
        let mut next = current.clone();
        if passes.contains(Passes::FOLD) {
            next = folder.fold_template(&next);
        }
        if passes.contains(Passes::PROPAGATE) {
            next = crate::propagate::ConstantPropagator::new().rewrite_template(&next);
        }
        if passes.contains(Passes::DEAD_BRANCHES) {
            next = eliminate_dead_branches(&next);
        }
        if passes.contains(Passes::DEAD_VARS) {
            next = eliminate_dead_variables(&next);
        }
        if next == current {
            debug!(iteration, "optimizer reached fixpoint");
            converged = true;
            break;
        }
        current = next;
    }
    if !converged {
        warn!(
            iterations = MAX_ITERATIONS,
            "optimizer stopped before reaching a fixpoint"
        );
    }

    if passes.contains(Passes::SAFE_EVAL) {
        current = SafeSubtreeEvaluator::new().rewrite_template(&current);
    }

    if passes.contains(Passes::PRE_EVALUATE) {
        let mut analyzer = SafetyAnalyzer::new();
        if analyzer.template_is_safe(&current) {
            let text =
                Engine::new().evaluate_ast(None, &current, Value::object(ObjectValue::new()));
            debug!("whole template pre-evaluated");
            return vec![Node::Text(text)];
        }
    }
    current
}
