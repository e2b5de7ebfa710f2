// ============================================================================
// scope-watch - Collection Watcher
//
// Like the value watcher, but keeps a private shallow copy of the last
// reading and diffs it key-by-key, so in-place pushes, removals and
// top-level replacements on an array or object are detected.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::constants::*;
use crate::core::types::{AnyWatcher, ChangeFn, GetterFn};
use crate::core::value::Value;
use crate::primitives::watcher::WatchState;
use crate::reactivity::equality::{collection_changed, shallow_copy};

/// Shallow-comparing watcher.
///
/// The callback receives the live (uncopied) current value as `new_value`
/// and the previous shallow copy as `old_value`.
pub struct CollectionWatcher {
    flags: Cell<u32>,
    getter: GetterFn,
    on_change: ChangeFn,
    state: RefCell<WatchState>,
}

impl CollectionWatcher {
    pub fn new(getter: GetterFn, on_change: ChangeFn) -> Rc<Self> {
        Rc::new(Self {
            flags: Cell::new(COLLECTION_WATCHER),
            getter,
            on_change,
            state: RefCell::new(WatchState::default()),
        })
    }

    /// The shallow copy taken by the most recent `call()`
    pub fn snapshot(&self) -> Value {
        self.state.borrow().new_value.clone()
    }
}

impl AnyWatcher for CollectionWatcher {
    fn flags(&self) -> u32 {
        self.flags.get()
    }

    fn set_flags(&self, flags: u32) {
        self.flags.set(flags);
    }

    fn call(&self) {
        let live = (self.getter)();
        let (copy, previous) = self.state.borrow_mut().shift(shallow_copy(&live));

        if collection_changed(&copy, &previous) {
            (self.on_change)(&live, &previous);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counting() -> (ChangeFn, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (Rc::new(move |_: &Value, _: &Value| c.set(c.get() + 1)), count)
    }

    #[test]
    fn fires_only_when_shape_changes() {
        let readings = [
            json!({"a": 1}),
            json!({"a": 1, "b": 2}),
            json!({"a": 1, "b": 2}),
        ];
        let cursor = Rc::new(Cell::new(0usize));
        let getter: GetterFn = {
            let cursor = cursor.clone();
            Rc::new(move || {
                let i = cursor.get();
                cursor.set(i + 1);
                Value::from(readings[i].clone())
            })
        };
        let (on_change, count) = counting();
        let watcher = CollectionWatcher::new(getter, on_change);

        watcher.call();
        let after_first = count.get();
        watcher.call();
        assert_eq!(count.get(), after_first + 1, "new key b must fire");
        watcher.call();
        assert_eq!(count.get(), after_first + 1, "same shape must not fire");
    }

    #[test]
    fn detects_in_place_push() {
        let list = Value::from(json!([1, 2]));
        let source = list.clone();
        let (on_change, count) = counting();
        let watcher = CollectionWatcher::new(Rc::new(move || source.clone()), on_change);

        watcher.call();
        assert_eq!(count.get(), 1);

        list.as_array().unwrap().push(Value::from(3));
        watcher.call();
        assert_eq!(count.get(), 2);

        watcher.call();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn callback_gets_live_value_and_previous_copy() {
        let list = Value::from(json!([1]));
        let source = list.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let watcher = CollectionWatcher::new(
            Rc::new(move || source.clone()),
            Rc::new(move |n: &Value, o: &Value| sink.borrow_mut().push((n.clone(), o.clone()))),
        );

        watcher.call();
        list.as_array().unwrap().push(Value::from(2));
        watcher.call();

        let seen = seen.borrow();
        let (live, previous) = &seen[1];
        assert_eq!(*live, list);
        assert_ne!(*previous, list);
        assert_eq!(previous.member("length"), Value::from(1));
    }

    #[test]
    fn undefined_to_null_is_not_a_change() {
        let flip = Rc::new(Cell::new(false));
        let f = flip.clone();
        let (on_change, count) = counting();
        let watcher = CollectionWatcher::new(
            Rc::new(move || {
                f.set(!f.get());
                if f.get() { Value::Null } else { Value::Undefined }
            }),
            on_change,
        );

        watcher.call();
        watcher.call();
        watcher.call();

        assert_eq!(count.get(), 0);
    }
}
