// ============================================================================
// scope-watch - Type Definitions
// Type-erased watcher trait and the callback shapes shared across the crate
// ============================================================================

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::constants::*;
use super::value::Value;

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// Produces the current value of a watched expression.
pub type GetterFn = Rc<dyn Fn() -> Value>;

/// Change callback, invoked as `(new_value, old_value)`.
pub type ChangeFn = Rc<dyn Fn(&Value, &Value)>;

/// Event listener for `broadcast` / `emit`.
pub type ListenerFn = Rc<dyn Fn(&[Value])>;

// =============================================================================
// TYPE-ERASED WATCHER
// =============================================================================
//
// A scope stores every watcher as `Rc<dyn AnyWatcher>` so value and
// collection watchers can share one ordered list. The apply pass only needs
// `call()` and the DESTROYED flag.
// =============================================================================

/// Type-erased watcher interface used by `Scope::apply`.
pub trait AnyWatcher: Any {
    /// Get the flags bitmask
    fn flags(&self) -> u32;

    /// Set the flags bitmask
    fn set_flags(&self, flags: u32);

    /// Re-read the getter and fire the change callback if the comparison
    /// rule reports a change.
    fn call(&self);

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Check if this watcher was deregistered or its scope destroyed
    fn is_destroyed(&self) -> bool {
        self.flags() & DESTROYED != 0
    }

    /// Mark as deregistered; `apply` skips it from now on
    fn mark_destroyed(&self) {
        self.set_flags(self.flags() | DESTROYED);
    }

    /// Check if this is a shallow collection watcher
    fn is_collection(&self) -> bool {
        self.flags() & COLLECTION_WATCHER != 0
    }
}

// =============================================================================
// DEREGISTRATION HANDLE
// =============================================================================

/// Removes one registration (watcher or listener) from its scope.
///
/// The first `call()` removes it; every later call is a no-op. Clones share
/// the same underlying registration.
#[derive(Clone)]
pub struct Deregister {
    remove: Option<Rc<dyn Fn()>>,
}

impl Deregister {
    pub(crate) fn new(remove: impl Fn() + 'static) -> Self {
        Self {
            remove: Some(Rc::new(remove)),
        }
    }

    /// A handle that does nothing (registration on a destroyed scope).
    pub fn noop() -> Self {
        Self { remove: None }
    }

    /// Remove the registration.
    pub fn call(&self) {
        if let Some(remove) = &self.remove {
            remove();
        }
    }

    /// Whether this handle is attached to a real registration.
    pub fn is_noop(&self) -> bool {
        self.remove.is_none()
    }
}

impl fmt::Debug for Deregister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deregister")
            .field("noop", &self.is_noop())
            .finish()
    }
}
