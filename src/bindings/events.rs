// ============================================================================
// scope-watch - Event Bindings
// Click / submit handlers that run and then apply the scope tree
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::constants::{CLICK_EVENT, DESTROY_EVENT, SUBMIT_EVENT};
use crate::dom::{Event, ListenerId, Node};
use crate::primitives::scope::Scope;

/// What runs when a bound DOM event fires.
#[derive(Clone)]
pub enum Handler {
    /// Evaluated against the scope, e.g. `"count = count + 1"` or `"save()"`.
    Expression(Rc<str>),
    Callback(Rc<dyn Fn(&Scope, &Event)>),
}

impl Handler {
    pub fn callback(f: impl Fn(&Scope, &Event) + 'static) -> Self {
        Handler::Callback(Rc::new(f))
    }

    pub(crate) fn invoke(&self, scope: &Scope, event: &Event) {
        match self {
            Handler::Expression(expression) => {
                scope.evaluate(expression);
            }
            Handler::Callback(f) => f(scope, event),
        }
    }
}

impl From<&str> for Handler {
    fn from(expression: &str) -> Self {
        Handler::Expression(Rc::from(expression))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Expression(expression) => f.debug_tuple("Expression").field(expression).finish(),
            Handler::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Run `handler` on click, then apply the scope's tree.
pub fn on_click(scope: &Scope, node: &Node, handler: impl Into<Handler>) -> ListenerId {
    listen(scope, node, CLICK_EVENT, handler.into(), false)
}

/// Run `handler` on submit with the default action prevented, then apply
/// the scope's tree.
pub fn on_submit(scope: &Scope, node: &Node, handler: impl Into<Handler>) -> ListenerId {
    listen(scope, node, SUBMIT_EVENT, handler.into(), true)
}

fn listen(scope: &Scope, node: &Node, event: &str, handler: Handler, prevent: bool) -> ListenerId {
    let weak = scope.downgrade();
    let id = node.on(event, move |dispatched| {
        if prevent {
            dispatched.prevent_default();
        }
        let Some(scope) = weak.upgrade() else {
            return;
        };
        if scope.is_destroyed() {
            return;
        }
        handler.invoke(&scope, dispatched);
        scope.tree_root().apply();
    });

    let target = node.clone();
    scope.on(DESTROY_EVENT, move |_| {
        target.off(id);
    });
    id
}
