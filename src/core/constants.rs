// ============================================================================
// scope-watch - Constants
// Flag constants for scope and watcher states, plus well-known event names
// ============================================================================

// =============================================================================
// WATCHER TYPE FLAGS
// =============================================================================

/// Watcher compares values by identity (strict inequality)
pub const VALUE_WATCHER: u32 = 1 << 0;

/// Watcher compares a shallow copy of a collection key-by-key
pub const COLLECTION_WATCHER: u32 = 1 << 1;

/// Watcher has no change callback; its getter runs for side effects only
pub const TRACK_ONLY: u32 = 1 << 2;

// =============================================================================
// SCOPE FLAGS
// =============================================================================

/// Scope was created without a parent (top of a tree)
pub const ROOT: u32 = 1 << 8;

/// Scope is running its destroy sequence (destroy broadcast in flight)
pub const DESTROYING: u32 = 1 << 9;

// =============================================================================
// SHARED STATE FLAGS
// =============================================================================

/// Scope or watcher has been destroyed / deregistered
pub const DESTROYED: u32 = 1 << 14;

// =============================================================================
// EVENT NAMES
// =============================================================================

/// Broadcast to a whole subtree right before it is torn down
pub const DESTROY_EVENT: &str = "destroy";

/// DOM event handled by click bindings
pub const CLICK_EVENT: &str = "click";

/// DOM event handled by submit bindings
pub const SUBMIT_EVENT: &str = "submit";

/// DOM events handled by two-way form bindings
pub const INPUT_EVENTS: [&str; 2] = ["change", "input"];

// =============================================================================
// LIMITS
// =============================================================================

/// Largest array length an assignment may set (2^32 - 1)
pub const MAX_ARRAY_LENGTH: u32 = u32::MAX;

/// How far past the end an index or `length` write may grow an array
pub const MAX_ARRAY_GAP: usize = 1024;

/// Deepest expression tree (and parser recursion) the interpreter accepts
pub const MAX_EXPRESSION_DEPTH: usize = 64;
