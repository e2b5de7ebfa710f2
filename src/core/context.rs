// ============================================================================
// scope-watch - Scope Context
// Thread-local state: the root scope singleton and the active evaluator
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::expression::{Evaluator, Interpreter};
use crate::primitives::scope::Scope;

// =============================================================================
// SCOPE CONTEXT
// =============================================================================

/// Thread-local context holding the process-wide (per thread) state.
///
/// Everything here is single-threaded by construction: scopes are `Rc`
/// based and never cross threads, so each thread gets its own root tree.
pub struct ScopeContext {
    /// Lazily created root scope; cleared when the root is destroyed
    pub root: RefCell<Option<Scope>>,

    /// Evaluator used for string expressions
    pub evaluator: RefCell<Rc<dyn Evaluator>>,

    /// Next scope id (for logs and debugging)
    pub next_scope_id: Cell<u64>,

    /// Nesting depth of `apply` calls currently on the stack
    pub apply_depth: Cell<u32>,
}

impl ScopeContext {
    /// Create a new context with the default interpreter and no root yet
    pub fn new() -> Self {
        Self {
            root: RefCell::new(None),
            evaluator: RefCell::new(Rc::new(Interpreter::new())),
            next_scope_id: Cell::new(1),
            apply_depth: Cell::new(0),
        }
    }

    /// Allocate a scope id
    pub fn allocate_scope_id(&self) -> u64 {
        let id = self.next_scope_id.get();
        self.next_scope_id.set(id + 1);
        id
    }

    /// Get the active evaluator
    pub fn evaluator(&self) -> Rc<dyn Evaluator> {
        self.evaluator.borrow().clone()
    }
}

impl Default for ScopeContext {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONTEXT: ScopeContext = ScopeContext::new();
}

/// Run `f` with the thread-local context.
pub fn with_context<R>(f: impl FnOnce(&ScopeContext) -> R) -> R {
    CONTEXT.with(f)
}

// =============================================================================
// ROOT SCOPE
// =============================================================================

/// The root scope for this thread.
///
/// Created on first access, and created again after the previous root was
/// destroyed.
pub fn root_scope() -> Scope {
    if let Some(root) = with_context(|ctx| ctx.root.borrow().clone()) {
        return root;
    }
    let root = Scope::new();
    with_context(|ctx| *ctx.root.borrow_mut() = Some(root.clone()));
    tracing::debug!(scope = root.id(), "root scope created");
    root
}

/// Whether `scope` is the current root singleton.
pub fn is_root_singleton(scope: &Scope) -> bool {
    with_context(|ctx| {
        ctx.root
            .borrow()
            .as_ref()
            .is_some_and(|root| root.ptr_eq(scope))
    })
}

/// Forget the root singleton if it is `scope`.
pub(crate) fn release_root(scope: &Scope) {
    let released = with_context(|ctx| {
        let mut root = ctx.root.borrow_mut();
        if root.as_ref().is_some_and(|r| r.ptr_eq(scope)) {
            root.take()
        } else {
            None
        }
    });
    if released.is_some() {
        tracing::debug!(scope = scope.id(), "root scope released");
    }
}

/// Create a child of the root scope.
pub fn generate() -> Scope {
    root_scope().generate()
}

/// Run one dirty-check pass over the whole root tree.
pub fn apply() {
    root_scope().apply();
}

// =============================================================================
// EVALUATOR
// =============================================================================

/// Install the evaluator used for string expressions on this thread.
pub fn set_evaluator(evaluator: Rc<dyn Evaluator>) {
    with_context(|ctx| *ctx.evaluator.borrow_mut() = evaluator);
}

/// Restore the built-in [`Interpreter`].
pub fn reset_evaluator() {
    set_evaluator(Rc::new(Interpreter::new()));
}

/// The evaluator currently installed on this thread.
pub fn current_evaluator() -> Rc<dyn Evaluator> {
    with_context(ScopeContext::evaluator)
}

/// Current `apply` nesting depth (0 when no pass is running).
pub fn apply_depth() -> u32 {
    with_context(|ctx| ctx.apply_depth.get())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use crate::primitives::scope::Scope;

    #[test]
    fn root_is_lazy_and_stable() {
        let a = root_scope();
        let b = root_scope();
        assert!(a.ptr_eq(&b));
        assert!(is_root_singleton(&a));
    }

    #[test]
    fn destroyed_root_is_recreated() {
        let first = root_scope();
        first.destroy();

        let second = root_scope();
        assert!(!first.ptr_eq(&second));
        assert!(!second.is_destroyed());
    }

    #[test]
    fn generate_attaches_to_root() {
        let child = generate();
        let root = root_scope();
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&root)));
    }

    struct Constant;

    impl Evaluator for Constant {
        fn evaluate(&self, _expression: &str, _scope: &Scope) -> Value {
            Value::from(7)
        }

        fn assign(&self, _expression: &str, _scope: &Scope, _value: Value) {}
    }

    #[test]
    fn evaluator_can_be_swapped() {
        let scope = Scope::new();
        set_evaluator(Rc::new(Constant));
        assert_eq!(scope.evaluate("anything"), Value::from(7));

        reset_evaluator();
        assert_eq!(scope.evaluate("anything"), Value::Undefined);
    }

    #[test]
    fn scope_ids_are_unique() {
        let a = Scope::new();
        let b = Scope::new();
        assert_ne!(a.id(), b.id());
    }
}
