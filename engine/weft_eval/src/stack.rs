//! Stack safety for deep recursion.
//!
//! Template evaluation is recursive descent; deeply nested expressions or
//! macro chains would otherwise overflow the thread stack. Native targets
//! grow the stack on demand via `stacker`; WASM passes through (it manages
//! its own stack).

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_family = "wasm"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_family = "wasm"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[cfg(not(target_family = "wasm"))]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM passthrough: no stack growth available or needed.
#[cfg(target_family = "wasm")]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
