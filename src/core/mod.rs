// ============================================================================
// scope-watch - Core Module
// Value model, shared types, errors, and the thread-local context
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;
pub mod types;
pub mod value;

// Re-export commonly used items
pub use constants::*;
pub use context::{ScopeContext, apply_depth, current_evaluator, root_scope, with_context};
pub use error::{ExprError, ExprResult};
pub use types::{AnyWatcher, ChangeFn, Deregister, GetterFn, ListenerFn};
pub use value::{Array, Function, Object, Properties, Value};
