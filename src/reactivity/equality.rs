// ============================================================================
// scope-watch - Equality Functions
// Change rules used by value and collection watchers
// ============================================================================

use crate::core::value::Value;

// =============================================================================
// STRICT EQUALITY (value watchers)
// =============================================================================

/// Strict equality (`===`).
///
/// Primitives compare by value, strings by content, arrays / objects /
/// functions by identity. `NaN` is never equal to itself.
///
/// # Example
/// ```
/// use scope_watch::{strict_equals, Value};
///
/// assert!(strict_equals(&Value::from(1), &Value::from(1)));
/// assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
/// ```
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Strict inequality (`!==`). This is the value watcher's change rule, so
/// two consecutive `NaN` readings count as a change every time.
pub fn strict_not_equal(a: &Value, b: &Value) -> bool {
    !strict_equals(a, b)
}

// =============================================================================
// LOOSE EQUALITY
// =============================================================================

/// Loose equality (`==`).
///
/// `null` and `undefined` equal each other and nothing else. Mixed
/// primitive types compare numerically; reference types by identity.
///
/// # Example
/// ```
/// use scope_watch::{loose_equals, Value};
///
/// assert!(loose_equals(&Value::Null, &Value::Undefined));
/// assert!(loose_equals(&Value::from("1"), &Value::from(1)));
/// assert!(!loose_equals(&Value::Null, &Value::from(0)));
/// ```
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    if a.is_nullish() || b.is_nullish() {
        return a.is_nullish() && b.is_nullish();
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(_) | Value::Object(_) | Value::Function(_), _)
        | (_, Value::Array(_) | Value::Object(_) | Value::Function(_)) => strict_equals(a, b),
        _ => a.to_number() == b.to_number(),
    }
}

// =============================================================================
// SHALLOW COLLECTION COMPARISON
// =============================================================================

/// The collection watcher's change rule.
///
/// - either side nullish: changed unless both are nullish
/// - either side not a collection: strict inequality
/// - otherwise: changed if any key in the union of both key sets maps to
///   strictly different members. Nested mutation is not seen.
///
/// # Example
/// ```
/// use scope_watch::{collection_changed, Value};
/// use serde_json::json;
///
/// let a = Value::from(json!({"a": 1}));
/// let b = Value::from(json!({"a": 1, "b": 2}));
/// assert!(collection_changed(&b, &a));
/// assert!(!collection_changed(&a, &Value::from(json!({"a": 1}))));
/// ```
pub fn collection_changed(new_value: &Value, old_value: &Value) -> bool {
    if new_value.is_nullish() || old_value.is_nullish() {
        return !loose_equals(new_value, old_value);
    }
    if !new_value.is_collection() || !old_value.is_collection() {
        return strict_not_equal(new_value, old_value);
    }
    new_value
        .own_keys()
        .iter()
        .chain(old_value.own_keys().iter())
        .any(|key| strict_not_equal(&new_value.member(key), &old_value.member(key)))
}

/// Shallow copy for collection watching.
///
/// Arrays and objects are copied one level deep into fresh containers
/// (members are shared handles); everything else passes through.
pub fn shallow_copy(value: &Value) -> Value {
    match value {
        Value::Array(a) => Value::from(a.to_vec()),
        Value::Object(o) => {
            let copy = crate::core::value::Object::new();
            for (k, v) in o.entries() {
                copy.set(&k, v);
            }
            Value::Object(copy)
        }
        other => other.clone(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
