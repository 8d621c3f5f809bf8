//! Selector chains: base resolution plus property path walking.

use tracing::warn;

use weft_ir::{PathSegment, SelectorBase};

use super::Evaluator;
use crate::value::{PropKey, Value};

impl Evaluator<'_> {
    /// Resolve the base, then walk each segment. A missing property at any
    /// step aborts the chain to `Undefined` with a warning; it never
    /// raises.
    pub(super) fn eval_selector(&mut self, base: &SelectorBase, path: &[PathSegment]) -> Value {
        let mut current = match base {
            SelectorBase::Context => self.env.context().clone(),
            SelectorBase::Global => Value::Global(self.env.global().clone()),
            SelectorBase::Name(name) => match self.env.get_var(name) {
                Some(value) => value,
                None => {
                    warn!(%name, "undefined name");
                    return Value::Undefined;
                }
            },
            SelectorBase::Expr(expr) => self.eval(expr),
        };

        for segment in path {
            // Integer-valued keys (literal or computed) normalize to
            // numeric indices.
            let key = match segment {
                PathSegment::Prop(name) => PropKey::normalize(name),
                PathSegment::Expr(expr) => {
                    let value = self.eval(expr);
                    PropKey::normalize(&value.to_text())
                }
            };
            current = match current.get_property(&key) {
                Some(value) => value,
                None => {
                    warn!(
                        key = %key.to_text(),
                        target = current.type_name(),
                        "missing property"
                    );
                    return Value::Undefined;
                }
            };
        }
        current
    }
}
