// ============================================================================
// scope-watch - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// This reduces the boilerplate of manually cloning `Rc`, `Scope` or
/// `Node` handles before moving them into a watcher callback.
///
/// # Usage
///
/// ```rust
/// use scope_watch::{cloned, Node, Scope};
///
/// let scope = Scope::new();
/// let label = Node::element("span");
///
/// scope.watch("title", cloned!(label => move |new, _| {
///     label.set_text(&new.to_display_string());
/// }));
///
/// scope.set("title", "Hello");
/// scope.apply();
/// assert_eq!(label.text_content(), "Hello");
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Register a watcher with automatic variable capturing.
///
/// Wraps `scope.watch(expression, cloned!(... => move |new, old| ...))`.
///
/// # Usage
///
/// ```rust
/// use scope_watch::{watch, Scope, Value};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let scope = Scope::new();
/// let fired = Rc::new(Cell::new(0));
///
/// watch!(scope, "count", fired => |_new, _old| fired.set(fired.get() + 1));
///
/// scope.set("count", 1);
/// scope.apply();
/// assert_eq!(fired.get(), 1);
/// ```
#[macro_export]
macro_rules! watch {
    // Case 1: With captures
    ($scope:expr, $expression:expr, $($deps:ident),+ => |$($arg:pat_param),*| $body:expr) => {
        $scope.watch($expression, $crate::cloned!($($deps),+ => move |$($arg),*| $body))
    };
    // Case 2: No captures
    ($scope:expr, $expression:expr, $callback:expr) => {
        $scope.watch($expression, $callback)
    };
}
