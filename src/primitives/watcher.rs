// ============================================================================
// scope-watch - Value Watcher
//
// Tracks one getter's last-seen value and fires a change callback when the
// next reading differs by identity.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::constants::*;
use crate::core::types::{AnyWatcher, ChangeFn, GetterFn};
use crate::core::value::Value;
use crate::reactivity::equality::strict_not_equal;

/// Cached readings of a watcher.
#[derive(Default)]
pub(crate) struct WatchState {
    pub(crate) old_value: Value,
    pub(crate) new_value: Value,
}

impl WatchState {
    /// Shift `new_value` into `old_value` and store `next`.
    /// Returns `(new, old)` clones so callbacks run without a borrow held.
    pub(crate) fn shift(&mut self, next: Value) -> (Value, Value) {
        self.old_value = std::mem::replace(&mut self.new_value, next);
        (self.new_value.clone(), self.old_value.clone())
    }
}

// =============================================================================
// VALUE WATCHER
// =============================================================================

/// Identity-comparing watcher.
///
/// Each `call()` re-reads the getter. The baseline before the first call is
/// `Undefined`, so the first call fires unless the getter returns
/// `Undefined`. Comparison is strict inequality: a getter stuck on `NaN`
/// fires on every call.
pub struct ValueWatcher {
    flags: Cell<u32>,
    getter: GetterFn,
    on_change: Option<ChangeFn>,
    state: RefCell<WatchState>,
}

impl ValueWatcher {
    /// Create a watcher. Without a callback it only keeps the readings.
    pub fn new(getter: GetterFn, on_change: Option<ChangeFn>) -> Rc<Self> {
        let kind = if on_change.is_some() {
            VALUE_WATCHER
        } else {
            VALUE_WATCHER | TRACK_ONLY
        };
        Rc::new(Self {
            flags: Cell::new(kind),
            getter,
            on_change,
            state: RefCell::new(WatchState::default()),
        })
    }

    /// Value seen by the most recent `call()`
    pub fn new_value(&self) -> Value {
        self.state.borrow().new_value.clone()
    }

    /// Value seen by the call before that
    pub fn old_value(&self) -> Value {
        self.state.borrow().old_value.clone()
    }
}

impl AnyWatcher for ValueWatcher {
    fn flags(&self) -> u32 {
        self.flags.get()
    }

    fn set_flags(&self, flags: u32) {
        self.flags.set(flags);
    }

    fn call(&self) {
        let next = (self.getter)();
        let (new_value, old_value) = self.state.borrow_mut().shift(next);

        let Some(on_change) = &self.on_change else {
            return;
        };
        if strict_not_equal(&new_value, &old_value) {
            on_change(&new_value, &old_value);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
