// ============================================================================
// scope-watch - DOM
// Minimal in-memory document tree that bindings and the repeater mutate
// ============================================================================
//
// Only what the binding layer touches is modelled: element / text / comment
// nodes, sibling insertion, attributes, classes, visibility, a form value and
// event listeners. There is no layout, no selector engine and no bubbling.
// ============================================================================

mod event;
mod node;

pub use event::{Event, ListenerId};
pub use node::{Node, NodeKind};
