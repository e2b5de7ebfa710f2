// ============================================================================
// scope-watch - DOM Events
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use super::node::Node;

/// Identifies one listener registered with [`Node::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// An event being dispatched to a node's listeners.
pub struct Event {
    name: Rc<str>,
    target: Node,
    default_prevented: Cell<bool>,
}

impl Event {
    pub(crate) fn new(name: &str, target: Node) -> Self {
        Self {
            name: Rc::from(name),
            target,
            default_prevented: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> &Node {
        &self.target
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
