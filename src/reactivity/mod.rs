// ============================================================================
// scope-watch - Reactivity Module
// Change-detection rules used by the dirty-check pass
// ============================================================================

pub mod equality;

pub use equality::{collection_changed, loose_equals, shallow_copy, strict_equals, strict_not_equal};
