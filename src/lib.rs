// ============================================================================
// scope-watch - Hierarchical Scopes with Dirty-Checking Watchers
// ============================================================================
//
// A scope tree owns properties, watchers, listeners and child scopes. An
// explicit apply() walks the tree once, depth-first, re-reading every
// watcher and firing callbacks whose value changed. DOM bindings and the
// keyed list reconciler are thin consumers of that contract.
// ============================================================================

pub mod bindings;
pub mod core;
pub mod dom;
pub mod expression;
pub mod primitives;
pub mod reactivity;

mod macros;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::context::{
    ScopeContext, apply, apply_depth, current_evaluator, generate, is_root_singleton,
    reset_evaluator, root_scope, set_evaluator, with_context,
};
pub use crate::core::error::{ExprError, ExprResult};
pub use crate::core::types::{AnyWatcher, ChangeFn, Deregister, GetterFn, ListenerFn};
pub use crate::core::value::{Array, Function, Object, Properties, Value};

// Re-export primitives at crate root
pub use crate::primitives::collection::CollectionWatcher;
pub use crate::primitives::repeater::{ListReconciler, RowKey};
pub use crate::primitives::scope::{Scope, Watchable, WeakScope};
pub use crate::primitives::watcher::ValueWatcher;

pub use crate::reactivity::equality::{
    collection_changed, loose_equals, shallow_copy, strict_equals, strict_not_equal,
};

pub use crate::dom::{Event, ListenerId, Node, NodeKind};
pub use crate::expression::{Evaluator, Interpreter};

// =============================================================================
// TESTS
// =============================================================================
