// ============================================================================
// scope-watch - Display Bindings
// One-way adapters: text, attribute, visibility, class
// ============================================================================

use crate::core::types::Deregister;
use crate::dom::Node;
use crate::primitives::scope::{Scope, Watchable};

/// Keep `node`'s text equal to the expression's display string.
/// `null` and `undefined` render as empty text.
pub fn bind_text(scope: &Scope, expression: impl Into<Watchable>, node: &Node) -> Deregister {
    let node = node.clone();
    scope.watch(expression, move |value, _| {
        if value.is_nullish() {
            node.set_text("");
        } else {
            node.set_text(&value.to_display_string());
        }
    })
}

/// Set attribute `name` from the expression; falsy values remove it.
pub fn bind_attr(
    scope: &Scope,
    expression: impl Into<Watchable>,
    node: &Node,
    name: &str,
) -> Deregister {
    let node = node.clone();
    let name = name.to_owned();
    scope.watch(expression, move |value, _| {
        if value.truthy() {
            node.set_attr(&name, &value.to_display_string());
        } else {
            node.remove_attr(&name);
        }
    })
}

/// Show `node` while the expression is truthy.
pub fn show(scope: &Scope, expression: impl Into<Watchable>, node: &Node) -> Deregister {
    let node = node.clone();
    scope.watch(expression, move |value, _| {
        if value.truthy() { node.show() } else { node.hide() }
    })
}

/// Hide `node` while the expression is truthy.
pub fn hide(scope: &Scope, expression: impl Into<Watchable>, node: &Node) -> Deregister {
    let node = node.clone();
    scope.watch(expression, move |value, _| {
        if value.truthy() { node.hide() } else { node.show() }
    })
}

/// Add `class` while the expression is truthy, remove it otherwise.
pub fn toggle_class(
    scope: &Scope,
    expression: impl Into<Watchable>,
    node: &Node,
    class: &str,
) -> Deregister {
    let node = node.clone();
    let class = class.to_owned();
    scope.watch(expression, move |value, _| {
        if value.truthy() {
            node.add_class(&class);
        } else {
            node.remove_class(&class);
        }
    })
}
