// ============================================================================
// scope-watch - Form Bindings
// Two-way input and select adapters
// ============================================================================
//
// Both directions share a last-seen value:
// - scope -> DOM: a watch writes the control only when the value differs
//   from the last one seen
// - DOM -> scope: an input/change event assigns through the expression only
//   when the control's value differs, then applies the tree
// The guard keeps a DOM write from echoing back as a scope write.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::constants::{DESTROY_EVENT, INPUT_EVENTS};
use crate::core::value::Value;
use crate::dom::{Event, Node};
use crate::primitives::repeater::ListReconciler;
use crate::primitives::scope::{Scope, Watchable};
use crate::reactivity::equality::strict_not_equal;

use super::display::{bind_attr, bind_text};
use super::events::Handler;

const OPTION_KEY: &str = "option";

/// Handle returned by [`bind_input`] / [`bind_select`].
pub struct InputBinding {
    expression: Rc<str>,
    last: RefCell<Value>,
    callbacks: RefCell<Vec<Handler>>,
    options: RefCell<Option<Rc<ListReconciler>>>,
}

impl InputBinding {
    fn new(expression: &str) -> Rc<Self> {
        Rc::new(Self {
            expression: Rc::from(expression),
            // NaN never equals anything, so the first reading always counts.
            last: RefCell::new(Value::Number(f64::NAN)),
            callbacks: RefCell::new(Vec::new()),
            options: RefCell::new(None),
        })
    }

    /// Run `handler` after each DOM-originated change, before the apply.
    pub fn change(&self, handler: impl Into<Handler>) -> &Self {
        self.callbacks.borrow_mut().push(handler.into());
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Last value seen in either direction.
    pub fn value(&self) -> Value {
        self.last.borrow().clone()
    }

    /// The option rows of a select binding.
    pub fn options(&self) -> Option<Rc<ListReconciler>> {
        self.options.borrow().clone()
    }

    /// Record `value` if it differs from the last one. Returns whether it did.
    fn is_changed(&self, value: &Value) -> bool {
        let changed = strict_not_equal(&self.last.borrow(), value);
        if changed {
            *self.last.borrow_mut() = value.clone();
        }
        changed
    }

    /// DOM -> scope half, shared by input and select.
    fn attach_listeners(self: &Rc<Self>, scope: &Scope, node: &Node, read: fn(&Node) -> Value) {
        let mut ids = Vec::with_capacity(INPUT_EVENTS.len());
        for event in INPUT_EVENTS {
            let binding = self.clone();
            let weak = scope.downgrade();
            ids.push(node.on(event, move |dispatched: &Event| {
                let Some(scope) = weak.upgrade() else {
                    return;
                };
                if scope.is_destroyed() {
                    return;
                }
                let value = read(dispatched.target());
                if !binding.is_changed(&value) {
                    return;
                }
                scope.assign(&binding.expression, value);
                let callbacks = binding.callbacks.borrow().clone();
                for callback in &callbacks {
                    callback.invoke(&scope, dispatched);
                }
                scope.tree_root().apply();
            }));
        }

        let target = node.clone();
        scope.on(DESTROY_EVENT, move |_| {
            for id in &ids {
                target.off(*id);
            }
        });
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// Two-way bind a text control's value to `expression`.
///
/// The control holds display strings: scope values are written as text
/// (`null`/`undefined` as empty) and typed text is assigned back as a string.
pub fn bind_input(scope: &Scope, expression: &str, node: &Node) -> Rc<InputBinding> {
    let binding = InputBinding::new(expression);

    let state = binding.clone();
    let control = node.clone();
    scope.watch(expression, move |value, _| {
        if state.is_changed(value) {
            let text = if value.is_nullish() {
                String::new()
            } else {
                value.to_display_string()
            };
            control.set_value(text);
        }
    });

    binding.attach_listeners(scope, node, |control| control.value());
    binding
}

// =============================================================================
// SELECT
// =============================================================================

/// Value of the first `<option>` child marked `selected`, else `Undefined`.
pub fn selected_value(select: &Node) -> Value {
    select
        .elements()
        .into_iter()
        .find(|option| option.tag() == Some("option") && option.attr("selected").is_some())
        .map_or(Value::Undefined, |option| option.value())
}

/// Mark the `<option>` children whose value strictly equals `value` as
/// selected and clear the rest. Returns whether any option matched.
pub fn select_option(select: &Node, value: &Value) -> bool {
    let mut matched = false;
    for option in select.elements() {
        if option.tag() != Some("option") {
            continue;
        }
        if !matched && !strict_not_equal(&option.value(), value) {
            option.set_attr("selected", "selected");
            matched = true;
        } else {
            option.remove_attr("selected");
        }
    }
    matched
}

/// Two-way bind a `<select>` to `expression`, rendering one `<option>` per
/// element of `options`.
///
/// With `value_key`, each option's value is `element[value_key]` and rows
/// are keyed by it; otherwise the element itself is the value. `label_key`
/// picks the option text the same way.
pub fn bind_select(
    scope: &Scope,
    expression: &str,
    select: &Node,
    options: impl Into<Watchable>,
    value_key: Option<&str>,
    label_key: Option<&str>,
) -> Rc<InputBinding> {
    let binding = InputBinding::new(expression);

    let value_path = member_path(value_key);
    let label_path = member_path(label_key);
    let reconciler = scope.repeat(
        options,
        OPTION_KEY,
        move |row| {
            let option = Node::element("option");
            // Seed the value now so a selection made in this pass can match.
            let value = row.evaluate(&value_path);
            option.set_value(value.clone());
            bind_attr(row, value_path.as_str(), &option, "value");
            bind_text(row, label_path.as_str(), &option);

            let control = option.clone();
            row.watch(value_path.as_str(), move |value, _| control.set_value(value.clone()));
            option
        },
        value_key,
    );
    reconciler.mount(select);
    *binding.options.borrow_mut() = Some(reconciler);

    // Options render after the value is known: restore the selection
    // whenever the rendered choice drifts from the bound one.
    let state = binding.clone();
    let control = select.clone();
    scope.track(Watchable::getter(move || {
        let wanted = state.value();
        if strict_not_equal(&wanted, &selected_value(&control)) {
            select_option(&control, &wanted);
        }
        Value::Undefined
    }));

    let state = binding.clone();
    let control = select.clone();
    scope.watch(expression, move |value, _| {
        if state.is_changed(value) {
            select_option(&control, value);
        }
    });

    binding.attach_listeners(scope, select, selected_value);
    binding
}

fn member_path(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{OPTION_KEY}.{key}"),
        None => OPTION_KEY.to_owned(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
