// ============================================================================
// scope-watch - Bindings
// DOM adapters built on the scope contract
// ============================================================================
//
// Every adapter is a thin consumer of `Scope::watch` (scope -> DOM) and, for
// DOM listeners, `Scope::on(DESTROY_EVENT)` so the listener is detached when
// the scope goes away. Adapters that write back into a scope apply the
// scope's whole tree afterwards.
// ============================================================================

mod display;
mod events;
mod form;

pub use display::{bind_attr, bind_text, hide, show, toggle_class};
pub use events::{Handler, on_click, on_submit};
pub use form::{InputBinding, bind_input, bind_select, select_option, selected_value};
