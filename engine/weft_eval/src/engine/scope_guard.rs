//! RAII scope guards for evaluator frame management.
//!
//! Frame save/restore must stay balanced - an unbalanced restore is a
//! fatal contract violation - so evaluator code never calls
//! `save_state`/`restore_state` in pairs by hand. [`ScopedEvaluator`]
//! pushes a frame on creation and pops it on drop, including during
//! unwinding, and derefs to the evaluator so call sites read the same as
//! unscoped code.

use std::ops::{Deref, DerefMut};

use super::Evaluator;

/// Guard that pops the environment frame when dropped.
pub(crate) struct ScopedEvaluator<'guard, 'e> {
    evaluator: &'guard mut Evaluator<'e>,
}

impl Drop for ScopedEvaluator<'_, '_> {
    fn drop(&mut self) {
        self.evaluator.env.restore_state();
    }
}

impl<'e> Deref for ScopedEvaluator<'_, 'e> {
    type Target = Evaluator<'e>;

    fn deref(&self) -> &Self::Target {
        self.evaluator
    }
}

impl DerefMut for ScopedEvaluator<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.evaluator
    }
}

impl<'e> Evaluator<'e> {
    /// Push a frame and return the guard that pops it.
    pub(crate) fn scoped(&mut self) -> ScopedEvaluator<'_, 'e> {
        self.env.save_state();
        ScopedEvaluator { evaluator: self }
    }

    /// Run `f` inside a fresh frame.
    pub(crate) fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedEvaluator<'_, 'e>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}
