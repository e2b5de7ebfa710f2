// ============================================================================
// scope-watch - Scope
//
// Hierarchical context node: owns properties, watchers, event listeners and
// child scopes, and drives the dirty-check pass.
// ============================================================================
//
// A scope tree is walked in two directions:
// - apply() / broadcast() go down, depth-first pre-order
// - emit() goes up to the root
//
// Children see their ancestors' properties through an explicit lookup
// chain: `get` checks the scope's own bag, then walks parent links. A write
// always lands in the scope's own bag and shadows the inherited value.
//
// Parents hold their children strongly; children hold a weak parent link.
// Closures registered on a scope may capture the scope itself, so a tree is
// released by destroy(), which drops every watcher and listener.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::*;
use crate::core::context::{current_evaluator, release_root, with_context};
use crate::core::types::{AnyWatcher, ChangeFn, Deregister, GetterFn, ListenerFn};
use crate::core::value::{Properties, Value};
use crate::dom::Node;
use crate::primitives::collection::CollectionWatcher;
use crate::primitives::repeater::ListReconciler;
use crate::primitives::watcher::ValueWatcher;

// =============================================================================
// WATCHABLE
// =============================================================================

/// What a watcher reads on every apply pass.
#[derive(Clone)]
pub enum Watchable {
    /// Expression string evaluated against the scope
    Expression(Rc<str>),
    /// Zero-argument getter invoked directly
    Getter(GetterFn),
    /// Static value; never changes after the first check
    Constant(Value),
}

impl Watchable {
    /// Wrap a closure as a getter.
    pub fn getter(f: impl Fn() -> Value + 'static) -> Self {
        Watchable::Getter(Rc::new(f))
    }
}

impl From<&str> for Watchable {
    fn from(expression: &str) -> Self {
        Watchable::Expression(Rc::from(expression))
    }
}

impl From<String> for Watchable {
    fn from(expression: String) -> Self {
        Watchable::Expression(Rc::from(expression))
    }
}

impl From<Value> for Watchable {
    fn from(value: Value) -> Self {
        Watchable::Constant(value)
    }
}

impl From<GetterFn> for Watchable {
    fn from(getter: GetterFn) -> Self {
        Watchable::Getter(getter)
    }
}

// =============================================================================
// SCOPE INNER
// =============================================================================

struct Listener {
    callback: ListenerFn,
    removed: Cell<bool>,
}

/// Internal scope state
pub(crate) struct ScopeInner {
    id: u64,
    flags: Cell<u32>,
    properties: RefCell<Properties>,
    parent: RefCell<Option<Weak<ScopeInner>>>,
    children: RefCell<Vec<Scope>>,
    watchers: RefCell<Vec<Rc<dyn AnyWatcher>>>,
    listeners: RefCell<Vec<(Rc<str>, Vec<Rc<Listener>>)>>,
}

fn same_watcher(a: &Rc<dyn AnyWatcher>, b: &Rc<dyn AnyWatcher>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Restores the apply depth counter even if a callback panics.
struct ApplyDepthGuard;

impl ApplyDepthGuard {
    fn enter() -> (Self, u32) {
        let depth = with_context(|ctx| {
            let depth = ctx.apply_depth.get() + 1;
            ctx.apply_depth.set(depth);
            depth
        });
        (Self, depth)
    }
}

impl Drop for ApplyDepthGuard {
    fn drop(&mut self) {
        with_context(|ctx| ctx.apply_depth.set(ctx.apply_depth.get().saturating_sub(1)));
    }
}

// =============================================================================
// SCOPE (Public handle)
// =============================================================================

/// A node in the scope tree.
///
/// `Scope` is a cheap handle; clones refer to the same node.
///
/// # Example
///
/// ```
/// use scope_watch::{Scope, Value};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let root = Scope::new();
/// root.set("title", "Users");
///
/// let child = root.generate();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// child.watch("title", move |new, _old| sink.borrow_mut().push(new.clone()));
///
/// root.apply();
/// root.set("title", "Admins");
/// root.apply();
///
/// assert_eq!(*seen.borrow(), vec![Value::from("Users"), Value::from("Admins")]);
/// ```
///
/// The node state behind the handle is not part of the public API:
///
/// ```compile_fail
/// use scope_watch::primitives::scope::ScopeInner;
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

/// Weak handle to a scope, for closures that must not keep it alive.
#[derive(Clone)]
pub struct WeakScope(Weak<ScopeInner>);

impl WeakScope {
    pub fn upgrade(&self) -> Option<Scope> {
        self.0.upgrade().map(|inner| Scope { inner })
    }
}

impl Scope {
    /// Create a standalone root scope.
    ///
    /// Use [`root_scope`](crate::root_scope) for the thread's shared root.
    pub fn new() -> Self {
        Self::with_parent(None, ROOT)
    }

    fn with_parent(parent: Option<Weak<ScopeInner>>, flags: u32) -> Self {
        let id = with_context(|ctx| ctx.allocate_scope_id());
        Self {
            inner: Rc::new(ScopeInner {
                id,
                flags: Cell::new(flags),
                properties: RefCell::new(Properties::new()),
                parent: RefCell::new(parent),
                children: RefCell::new(Vec::new()),
                watchers: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // IDENTITY & TREE
    // =========================================================================

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakScope {
        WeakScope(Rc::downgrade(&self.inner))
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.flags.get() & DESTROYED != 0
    }

    /// Created as the top of a tree (not via `generate`).
    pub fn is_root(&self) -> bool {
        self.inner.flags.get() & ROOT != 0
    }

    pub fn parent(&self) -> Option<Scope> {
        self.inner
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Scope { inner })
    }

    /// The topmost ancestor, or this scope if it has no parent.
    pub fn tree_root(&self) -> Scope {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Children in creation order.
    pub fn children(&self) -> Vec<Scope> {
        self.inner.children.borrow().clone()
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .find(|(n, _)| &**n == name)
            .map_or(0, |(_, list)| list.len())
    }

    /// Create a child scope that inherits this scope's properties.
    ///
    /// On a destroyed scope this returns a fresh scope that is already
    /// destroyed and belongs to no tree.
    pub fn generate(&self) -> Scope {
        if self.is_destroyed() {
            return Self::with_parent(None, DESTROYED);
        }
        let child = Self::with_parent(Some(Rc::downgrade(&self.inner)), 0);
        self.inner.children.borrow_mut().push(child.clone());
        tracing::debug!(scope = child.id(), parent = self.id(), "scope generated");
        child
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    /// Read a property through the scope chain; `Undefined` when missing.
    pub fn get(&self, name: &str) -> Value {
        let mut current = Some(self.inner.clone());
        while let Some(scope) = current {
            if let Some(value) = scope.properties.borrow().get(name) {
                return value.clone();
            }
            current = scope.parent.borrow().as_ref().and_then(Weak::upgrade);
        }
        Value::Undefined
    }

    /// Whether the property is defined here or on an ancestor.
    pub fn has(&self, name: &str) -> bool {
        let mut current = Some(self.inner.clone());
        while let Some(scope) = current {
            if scope.properties.borrow().contains_key(name) {
                return true;
            }
            current = scope.parent.borrow().as_ref().and_then(Weak::upgrade);
        }
        false
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.inner.properties.borrow().contains_key(name)
    }

    /// Write an own property, shadowing any inherited one.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        if self.is_destroyed() {
            return;
        }
        let previous = self.inner.properties.borrow_mut().insert(name, value.into());
        drop(previous);
    }

    /// Remove an own property so the inherited one (if any) shows again.
    pub fn unset(&self, name: &str) -> Value {
        let removed = self.inner.properties.borrow_mut().remove(name);
        removed.unwrap_or_default()
    }

    pub fn own_keys(&self) -> Vec<Rc<str>> {
        self.inner.properties.borrow().keys().cloned().collect()
    }

    /// Evaluate an expression against this scope with the active evaluator.
    pub fn evaluate(&self, expression: &str) -> Value {
        current_evaluator().evaluate(expression, self)
    }

    /// Assign through an expression (`a`, `a.b`, `a[0]`).
    pub fn assign(&self, expression: &str, value: impl Into<Value>) {
        current_evaluator().assign(expression, self, value.into());
    }

    // =========================================================================
    // WATCHERS
    // =========================================================================

    /// Register an identity-comparing watcher.
    ///
    /// `on_change` receives `(new_value, old_value)`. Returns the handle
    /// that removes exactly this watcher.
    pub fn watch(
        &self,
        expression: impl Into<Watchable>,
        on_change: impl Fn(&Value, &Value) + 'static,
    ) -> Deregister {
        if self.is_destroyed() {
            return Deregister::noop();
        }
        let on_change: ChangeFn = Rc::new(on_change);
        let getter = self.value_getter(expression.into());
        self.add_watcher(ValueWatcher::new(getter, Some(on_change)))
    }

    /// Register a shallow collection watcher.
    pub fn watch_collection(
        &self,
        expression: impl Into<Watchable>,
        on_change: impl Fn(&Value, &Value) + 'static,
    ) -> Deregister {
        if self.is_destroyed() {
            return Deregister::noop();
        }
        let getter = self.value_getter(expression.into());
        self.add_watcher(CollectionWatcher::new(getter, Rc::new(on_change)))
    }

    /// Register a callback-less watcher: the getter runs on every apply
    /// for its side effects.
    pub fn track(&self, expression: impl Into<Watchable>) -> Deregister {
        if self.is_destroyed() {
            return Deregister::noop();
        }
        let getter = self.value_getter(expression.into());
        self.add_watcher(ValueWatcher::new(getter, None))
    }

    /// Append an already built watcher to this scope's list.
    pub fn add_watcher(&self, watcher: Rc<dyn AnyWatcher>) -> Deregister {
        if self.is_destroyed() {
            return Deregister::noop();
        }
        self.inner.watchers.borrow_mut().push(watcher.clone());

        let scope = Rc::downgrade(&self.inner);
        let target = Rc::downgrade(&watcher);
        Deregister::new(move || {
            let Some(watcher) = target.upgrade() else {
                return;
            };
            watcher.mark_destroyed();
            if let Some(scope) = scope.upgrade() {
                let removed: Vec<_> = {
                    let mut watchers = scope.watchers.borrow_mut();
                    let (gone, kept) = watchers
                        .drain(..)
                        .partition(|w: &Rc<dyn AnyWatcher>| same_watcher(w, &watcher));
                    *watchers = kept;
                    gone
                };
                drop(removed);
            }
        })
    }

    fn value_getter(&self, watchable: Watchable) -> GetterFn {
        match watchable {
            Watchable::Expression(expression) => {
                let scope = self.downgrade();
                Rc::new(move || match scope.upgrade() {
                    Some(scope) => scope.evaluate(&expression),
                    None => Value::Undefined,
                })
            }
            Watchable::Getter(getter) => getter,
            Watchable::Constant(value) => Rc::new(move || value.clone()),
        }
    }

    /// Run one dirty-check pass over this subtree.
    ///
    /// Every watcher of this scope runs in registration order, then every
    /// child applies in creation order. A single pass: watchers that change
    /// state read earlier in the pass are not re-run. Re-entrant calls are
    /// allowed; watcher and child lists are snapshotted before iterating.
    pub fn apply(&self) {
        if self.is_destroyed() {
            return;
        }
        let (_guard, depth) = ApplyDepthGuard::enter();
        tracing::trace!(scope = self.id(), depth, "apply");

        let watchers: Vec<_> = self.inner.watchers.borrow().clone();
        for watcher in watchers {
            if self.is_destroyed() {
                return;
            }
            if !watcher.is_destroyed() {
                watcher.call();
            }
        }

        let children = self.children();
        for child in children {
            child.apply();
        }
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Listen for `name` events delivered by `broadcast` or `emit`.
    pub fn on(&self, name: &str, listener: impl Fn(&[Value]) + 'static) -> Deregister {
        if self.is_destroyed() {
            return Deregister::noop();
        }
        let entry = Rc::new(Listener {
            callback: Rc::new(listener),
            removed: Cell::new(false),
        });
        {
            let mut listeners = self.inner.listeners.borrow_mut();
            match listeners.iter_mut().find(|(n, _)| &**n == name) {
                Some((_, list)) => list.push(entry.clone()),
                None => listeners.push((Rc::from(name), vec![entry.clone()])),
            }
        }

        let scope = Rc::downgrade(&self.inner);
        let name: Rc<str> = Rc::from(name);
        let target = Rc::downgrade(&entry);
        Deregister::new(move || {
            let Some(entry) = target.upgrade() else {
                return;
            };
            entry.removed.set(true);
            if let Some(scope) = scope.upgrade() {
                let mut listeners = scope.listeners.borrow_mut();
                if let Some((_, list)) = listeners.iter_mut().find(|(n, _)| *n == name) {
                    list.retain(|l| !Rc::ptr_eq(l, &entry));
                }
            }
        })
    }

    fn notify(&self, name: &str, args: &[Value]) {
        let listeners: Vec<Rc<Listener>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, list)| list.clone())
            .unwrap_or_default();
        for listener in listeners {
            if !listener.removed.get() {
                (listener.callback)(args);
            }
        }
    }

    /// Deliver an event to this scope, then to every descendant (pre-order).
    pub fn broadcast(&self, name: &str, args: &[Value]) {
        if self.is_destroyed() {
            return;
        }
        self.notify(name, args);
        for child in self.children() {
            child.broadcast(name, args);
        }
    }

    /// Deliver an event to this scope, then to each ancestor up to the root.
    /// The walk ends at the first scope without a parent.
    pub fn emit(&self, name: &str, args: &[Value]) {
        if self.is_destroyed() {
            return;
        }
        self.notify(name, args);
        if let Some(parent) = self.parent() {
            parent.emit(name, args);
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Destroy this scope and its subtree. Idempotent.
    ///
    /// Broadcasts [`DESTROY_EVENT`] to the still-intact subtree first, then
    /// tears down children depth-first, detaches from the parent and drops
    /// all watchers, listeners and properties. Destroying the thread's root
    /// singleton makes the next `root_scope()` build a new tree.
    pub fn destroy(&self) {
        let flags = self.inner.flags.get();
        if flags & (DESTROYED | DESTROYING) != 0 {
            return;
        }
        self.inner.flags.set(flags | DESTROYING);
        tracing::debug!(scope = self.id(), "destroying scope");

        self.broadcast(DESTROY_EVENT, &[]);
        self.teardown();
        release_root(self);
    }

    fn teardown(&self) {
        for child in self.children() {
            child.teardown();
        }

        let flags = self.inner.flags.get();
        self.inner.flags.set((flags | DESTROYED) & !DESTROYING);

        if let Some(parent) = self.parent() {
            parent
                .inner
                .children
                .borrow_mut()
                .retain(|c| !c.ptr_eq(self));
        }
        *self.inner.parent.borrow_mut() = None;

        // Take everything out first so drops run without a borrow held.
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        let watchers = std::mem::take(&mut *self.inner.watchers.borrow_mut());
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        let properties = std::mem::take(&mut *self.inner.properties.borrow_mut());

        for watcher in &watchers {
            watcher.mark_destroyed();
        }
        for (_, list) in &listeners {
            for listener in list {
                listener.removed.set(true);
            }
        }
        drop((children, watchers, listeners, properties));
    }

    // =========================================================================
    // REPEAT
    // =========================================================================

    /// Keep one row per element of the collection `expression` in sync.
    ///
    /// Each row gets a child scope with the element under `value_key` and a
    /// DOM node from `row_factory`. Rows are keyed by `primary_key` when
    /// given, otherwise by array index / object key.
    pub fn repeat(
        &self,
        expression: impl Into<Watchable>,
        value_key: &str,
        row_factory: impl Fn(&Scope) -> Node + 'static,
        primary_key: Option<&str>,
    ) -> Rc<ListReconciler> {
        ListReconciler::new(self, expression, value_key, row_factory, primary_key)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id())
            .field("destroyed", &self.is_destroyed())
            .field("children", &self.inner.children.borrow().len())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> Rc<Cell<usize>> {
        Rc::new(Cell::new(0))
    }

    #[test]
    fn generate_links_parent_and_child() {
        let parent = Scope::new();
        let child = parent.generate();

        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
        assert_eq!(parent.children().len(), 1);
        assert!(parent.children()[0].ptr_eq(&child));
        assert!(!child.is_root());
        assert!(parent.is_root());
    }

    #[test]
    fn child_sees_parent_properties_until_shadowed() {
        let parent = Scope::new();
        parent.set("name", "parent");
        let child = parent.generate();

        assert_eq!(child.get("name"), Value::from("parent"));

        parent.set("late", 1);
        assert_eq!(child.get("late"), Value::from(1));

        child.set("name", "child");
        assert_eq!(child.get("name"), Value::from("child"));
        assert_eq!(parent.get("name"), Value::from("parent"));

        child.unset("name");
        assert_eq!(child.get("name"), Value::from("parent"));
        assert!(child.has("name"));
        assert!(!child.has_own("name"));
    }

    #[test]
    fn watch_deregister_is_idempotent() {
        let scope = Scope::new();
        let runs = counter();
        let r = runs.clone();
        let value = Rc::new(Cell::new(0));
        let v = value.clone();

        let stop = scope.watch(
            Watchable::getter(move || Value::from(v.get())),
            move |_, _| r.set(r.get() + 1),
        );
        let other = scope.watch(Value::from(1), |_, _| {});

        scope.apply();
        assert_eq!(runs.get(), 1);
        assert_eq!(scope.watcher_count(), 2);

        stop.call();
        stop.call();
        assert_eq!(scope.watcher_count(), 1);

        value.set(5);
        scope.apply();
        assert_eq!(runs.get(), 1);

        other.call();
        assert_eq!(scope.watcher_count(), 0);
    }

    #[test]
    fn constant_watch_fires_once() {
        let scope = Scope::new();
        let runs = counter();
        let r = runs.clone();
        scope.watch(Value::from("static"), move |_, _| r.set(r.get() + 1));

        scope.apply();
        scope.apply();
        scope.apply();

        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn apply_order_is_parent_first_then_registration_order() {
        let root = Scope::new();
        let mid = root.generate();
        let leaf = mid.generate();
        let sibling = root.generate();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (scope, label) in [
            (&leaf, "leaf"),
            (&sibling, "sibling"),
            (&mid, "mid"),
            (&root, "root-1"),
            (&root, "root-2"),
        ] {
            let order = order.clone();
            scope.watch(Value::from(1), move |_, _| order.borrow_mut().push(label));
        }

        root.apply();

        assert_eq!(
            *order.borrow(),
            vec!["root-1", "root-2", "mid", "leaf", "sibling"]
        );
    }

    #[test]
    fn deregister_during_apply_skips_watcher() {
        let scope = Scope::new();
        let later_runs = counter();
        let slot: Rc<RefCell<Option<Deregister>>> = Rc::new(RefCell::new(None));

        let s = slot.clone();
        scope.watch(Value::from(1), move |_, _| {
            if let Some(stop) = s.borrow().as_ref() {
                stop.call();
            }
        });
        let l = later_runs.clone();
        let stop = scope.watch(Value::from(1), move |_, _| l.set(l.get() + 1));
        *slot.borrow_mut() = Some(stop);

        scope.apply();

        assert_eq!(later_runs.get(), 0);
        assert_eq!(scope.watcher_count(), 1);
    }

    #[test]
    fn reentrant_apply_completes() {
        let scope = Scope::new();
        let runs = counter();
        let weak = scope.downgrade();
        let r = runs.clone();
        let source = Rc::new(Cell::new(0));
        let s = source.clone();

        scope.watch(
            Watchable::getter(move || Value::from(s.get())),
            move |new, _| {
                r.set(r.get() + 1);
                if new.to_number() < 3.0 {
                    source.set(source.get() + 1);
                    if let Some(scope) = weak.upgrade() {
                        scope.apply();
                    }
                }
            },
        );

        scope.apply();

        assert_eq!(runs.get(), 4);
        assert_eq!(crate::core::context::apply_depth(), 0);
    }

    #[test]
    fn broadcast_reaches_subtree_in_pre_order() {
        let root = Scope::new();
        let a = root.generate();
        let a1 = a.generate();
        let b = root.generate();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (scope, label) in [(&root, "root"), (&a, "a"), (&a1, "a1"), (&b, "b")] {
            let order = order.clone();
            scope.on("ping", move |args| {
                order.borrow_mut().push((label, args.to_vec()));
            });
        }

        a.broadcast("ping", &[Value::from(1), Value::from("x")]);

        let order = order.borrow();
        let labels: Vec<_> = order.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["a", "a1"]);
        assert_eq!(order[1].1, vec![Value::from(1), Value::from("x")]);
    }

    #[test]
    fn emit_walks_up_and_stops_at_root() {
        let root = Scope::new();
        let mid = root.generate();
        let leaf = mid.generate();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (scope, label) in [(&root, "root"), (&mid, "mid"), (&leaf, "leaf")] {
            let order = order.clone();
            scope.on("up", move |_| order.borrow_mut().push(label));
        }

        leaf.emit("up", &[]);
        root.emit("up", &[]);

        assert_eq!(*order.borrow(), vec!["leaf", "mid", "root", "root"]);
    }

    #[test]
    fn listener_deregister() {
        let scope = Scope::new();
        let runs = counter();
        let r = runs.clone();
        let stop = scope.on("evt", move |_| r.set(r.get() + 1));

        scope.broadcast("evt", &[]);
        stop.call();
        stop.call();
        scope.broadcast("evt", &[]);

        assert_eq!(runs.get(), 1);
        assert_eq!(scope.listener_count("evt"), 0);
    }

    #[test]
    fn destroy_is_idempotent_and_releases_everything() {
        let root = Scope::new();
        let scope = root.generate();
        let child = scope.generate();
        scope.set("x", 1);
        scope.watch("x", |_, _| {});
        scope.on("evt", |_| {});

        scope.destroy();
        scope.destroy();

        assert!(scope.is_destroyed());
        assert!(child.is_destroyed());
        assert!(scope.parent().is_none());
        assert!(scope.children().is_empty());
        assert_eq!(scope.watcher_count(), 0);
        assert_eq!(scope.listener_count("evt"), 0);
        assert!(root.children().is_empty());
        assert_eq!(scope.get("x"), Value::Undefined);
    }

    #[test]
    fn destroy_broadcast_sees_intact_subtree() {
        let root = Scope::new();
        let child = root.generate();
        let grandchild = child.generate();
        grandchild.watch("anything", |_, _| {});
        let observed = Rc::new(RefCell::new(Vec::new()));

        for scope in [&root, &child, &grandchild] {
            let observed = observed.clone();
            let weak = scope.downgrade();
            scope.on(DESTROY_EVENT, move |_| {
                let scope = weak.upgrade().expect("scope alive during destroy");
                observed
                    .borrow_mut()
                    .push((scope.children().len(), scope.watcher_count(), scope.is_destroyed()));
            });
        }

        root.destroy();

        assert_eq!(
            *observed.borrow(),
            vec![(1, 0, false), (1, 0, false), (0, 1, false)]
        );
    }

    #[test]
    fn destroyed_scope_ignores_operations() {
        let scope = Scope::new();
        scope.destroy();

        let runs = counter();
        let r = runs.clone();
        let stop = scope.watch(Value::from(1), move |_, _| r.set(r.get() + 1));
        assert!(stop.is_noop());
        assert!(scope.on("evt", |_| {}).is_noop());

        scope.apply();
        scope.broadcast("evt", &[]);
        scope.emit("evt", &[]);
        scope.set("x", 1);

        assert_eq!(runs.get(), 0);
        assert_eq!(scope.get("x"), Value::Undefined);

        let orphan = scope.generate();
        assert!(orphan.is_destroyed());
        assert!(orphan.parent().is_none());
    }

    #[test]
    fn destroy_from_destroy_listener_is_ignored() {
        let scope = Scope::new();
        let runs = counter();
        let r = runs.clone();
        let weak = scope.downgrade();
        scope.on(DESTROY_EVENT, move |_| {
            r.set(r.get() + 1);
            if let Some(scope) = weak.upgrade() {
                scope.destroy();
            }
        });

        scope.destroy();

        assert_eq!(runs.get(), 1);
        assert!(scope.is_destroyed());
    }

    #[test]
    fn destroying_child_during_apply_skips_it() {
        let root = Scope::new();
        let doomed = root.generate();
        let runs = counter();
        let r = runs.clone();
        doomed.watch(Value::from(1), move |_, _| r.set(r.get() + 1));

        let d = doomed.clone();
        root.watch(Value::from(1), move |_, _| d.destroy());

        root.apply();

        assert_eq!(runs.get(), 0);
        assert!(root.children().is_empty());
    }
}
