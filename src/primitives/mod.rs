// ============================================================================
// scope-watch - Primitives Module
// Scope tree, the two watcher kinds, and the list reconciler
// ============================================================================

pub mod collection;
pub mod repeater;
pub mod scope;
pub mod watcher;

// Re-export for convenience
pub use collection::CollectionWatcher;
pub use repeater::{ListReconciler, RowKey};
pub use scope::{Scope, Watchable, WeakScope};
pub use watcher::ValueWatcher;
