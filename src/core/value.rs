// ============================================================================
// scope-watch - Values
// Dynamic values stored on scopes and produced by expressions
// ============================================================================
//
// Scope properties are an untyped bag, so everything flowing through the
// watch machinery is a `Value`. Arrays, objects and functions are shared
// handles: cloning a `Value` clones the handle, and identity (pointer
// equality) is what strict comparison sees. That is what makes a
// `ValueWatcher` blind to in-place mutation and a `CollectionWatcher`
// necessary.
// ============================================================================

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::core::constants::{MAX_ARRAY_GAP, MAX_ARRAY_LENGTH};
use crate::core::error::{ExprError, ExprResult};
use crate::reactivity::equality::strict_equals;

// =============================================================================
// PROPERTY BAG
// =============================================================================

/// Ordered string-keyed property bag.
///
/// Keys keep their insertion order; overwriting a key keeps its slot.
/// Used for object values and for a scope's own properties.
#[derive(Clone, Default)]
pub struct Properties {
    entries: Vec<(Rc<str>, Value)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| &**k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        match self.position(key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((Rc::from(key), value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

// =============================================================================
// REFERENCE TYPES
// =============================================================================

/// Shared, mutable array handle.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(values)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Element at `index`, or `Undefined` past the end.
    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Write element `index`, padding any gap with `Undefined`.
    ///
    /// Returns false (and writes nothing) when `index` lies more than
    /// [`MAX_ARRAY_GAP`] past the end or at or beyond [`MAX_ARRAY_LENGTH`].
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut items = self.0.borrow_mut();
        if !can_grow_to(items.len(), index) {
            return false;
        }
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value;
        true
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Insert at `index`, clamped to the current length.
    pub fn insert(&self, index: usize, value: Value) {
        let mut items = self.0.borrow_mut();
        let index = index.min(items.len());
        items.insert(index, value);
    }

    /// Remove element `index`; `Undefined` when out of range.
    pub fn remove(&self, index: usize) -> Value {
        let mut items = self.0.borrow_mut();
        if index < items.len() {
            items.remove(index)
        } else {
            Value::Undefined
        }
    }

    pub fn swap(&self, a: usize, b: usize) {
        self.0.borrow_mut().swap(a, b);
    }

    pub fn truncate(&self, len: usize) {
        self.0.borrow_mut().truncate(len);
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Copy of the current elements (element handles are shared).
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Borrow the elements in place.
    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Shared, mutable object handle with insertion-ordered keys.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Properties>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_properties(properties: Properties) -> Self {
        Self(Rc::new(RefCell::new(properties)))
    }

    /// Build an object from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut properties = Properties::new();
        for (k, v) in pairs {
            properties.insert(k.as_ref(), v.into());
        }
        Self::from_properties(properties)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Property `key`, or `Undefined` when absent.
    pub fn get(&self, key: &str) -> Value {
        self.0.borrow().get(key).cloned().unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.0.borrow_mut().insert(key, value.into());
    }

    pub fn remove(&self, key: &str) -> Value {
        self.0.borrow_mut().remove(key).unwrap_or_default()
    }

    pub fn keys(&self) -> Vec<Rc<str>> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(Rc<str>, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Native callable stored in a scope (event handlers, controller methods).
#[derive(Clone)]
pub struct Function(Rc<dyn Fn(&[Value]) -> Value>);

impl Function {
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A dynamically typed value.
///
/// `PartialEq` is strict equality: `NaN != NaN`, strings by content,
/// arrays / objects / functions by identity.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Array),
    Object(Object),
    Function(Function),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Arrays and objects: the values a collection watcher copies and diffs.
    pub fn is_collection(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Numeric coercion (`Number(value)`).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(a) => match a.len() {
                0 => 0.0,
                1 => a.get(0).to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// String coercion (`String(value)`).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Array(a) => a
                .borrow()
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        v.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(_) => "function".to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Read a member without failing: `Undefined` for anything missing.
    ///
    /// Arrays answer numeric indices and `length`; strings answer `length`.
    pub fn member(&self, key: &str) -> Value {
        match self {
            Value::Object(o) => o.get(key),
            Value::Array(a) => {
                if key == "length" {
                    Value::Number(a.len() as f64)
                } else {
                    parse_index(key).map(|i| a.get(i)).unwrap_or_default()
                }
            }
            Value::String(s) if key == "length" => Value::Number(s.encode_utf16().count() as f64),
            _ => Value::Undefined,
        }
    }

    /// Write a member.
    ///
    /// Arrays accept numeric indices and `length`. A `length` must be a
    /// whole number below 2^32; neither write may grow the array more than
    /// [`MAX_ARRAY_GAP`] slots past its end.
    pub fn set_member(&self, key: &str, value: Value) -> ExprResult<()> {
        let refused = || ExprError::NotAssignable {
            property: key.to_owned(),
            target: self.type_of(),
        };
        match self {
            Value::Object(o) => {
                o.set(key, value);
                Ok(())
            }
            Value::Array(a) if key == "length" => {
                let requested = value.to_number();
                if requested.fract() != 0.0
                    || !(0.0..=f64::from(MAX_ARRAY_LENGTH)).contains(&requested)
                {
                    return Err(ExprError::InvalidArrayLength {
                        value: value.to_display_string(),
                    });
                }
                let len = requested as usize;
                let current = a.len();
                if len <= current {
                    a.truncate(len);
                    Ok(())
                } else if a.set(len - 1, Value::Undefined) {
                    Ok(())
                } else {
                    Err(refused())
                }
            }
            Value::Array(a) => match parse_index(key) {
                Some(i) => {
                    if a.set(i, value) {
                        Ok(())
                    } else {
                        Err(refused())
                    }
                }
                None => Err(refused()),
            },
            _ => Err(refused()),
        }
    }

    /// Own enumerable keys: indices for arrays, keys for objects.
    pub fn own_keys(&self) -> Vec<Rc<str>> {
        match self {
            Value::Array(a) => (0..a.len()).map(|i| Rc::from(i.to_string())).collect(),
            Value::Object(o) => o.keys(),
            _ => Vec::new(),
        }
    }

    /// Address of the shared allocation for reference types.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.addr()),
            Value::Object(o) => Some(o.addr()),
            Value::Function(f) => Some(f.addr()),
            _ => None,
        }
    }

    /// Convert to JSON. `undefined`, functions and non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Array(a) => {
                serde_json::Value::Array(a.borrow().iter().map(Value::to_json).collect())
            }
            Value::Object(o) => serde_json::Value::Object(
                o.entries()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn can_grow_to(len: usize, index: usize) -> bool {
    index < MAX_ARRAY_LENGTH as usize && index <= len.saturating_add(MAX_ARRAY_GAP)
}

pub(crate) fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        strict_equals(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", &**s),
            Value::Array(a) => f.debug_list().entries(a.borrow().iter()).finish(),
            Value::Object(o) => {
                let entries = o.entries();
                f.debug_map()
                    .entries(entries.iter().map(|(k, v)| (&**k, v)))
                    .finish()
            }
            Value::Function(_) => write!(f, "[function]"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(values))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::Array(Array::from_vec(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => {
                let mut properties = Properties::new();
                for (k, v) in map {
                    properties.insert(&k, Value::from(v));
                }
                Value::Object(Object::from_properties(properties))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clone_shares_reference_types() {
        let list = Value::from(json!([1, 2]));
        let alias = list.clone();

        list.as_array().unwrap().push(Value::from(3));

        assert_eq!(alias.member("length"), Value::from(3));
        assert_eq!(list, alias);
    }

    #[test]
    fn strict_equality_semantics() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::from("a"), Value::from(String::from("a")));
        assert_ne!(Value::from(json!({"a": 1})), Value::from(json!({"a": 1})));
        assert_ne!(Value::Null, Value::Undefined);
    }

    #[test]
    fn truthiness() {
        for falsy in [
            Value::Undefined,
            Value::Null,
            Value::from(false),
            Value::from(0),
            Value::Number(f64::NAN),
            Value::from(""),
        ] {
            assert!(!falsy.truthy(), "{falsy:?} should be falsy");
        }
        assert!(Value::from(json!([])).truthy());
        assert!(Value::from("0").truthy());
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::from(3).to_display_string(), "3");
        assert_eq!(Value::from(2.5).to_display_string(), "2.5");
        assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(Value::from(json!([1, null, "x"])).to_display_string(), "1,,x");
        assert_eq!(Value::from(json!({})).to_display_string(), "[object Object]");
    }

    #[test]
    fn number_coercion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert_eq!(Value::from(true).to_number(), 1.0);
        assert_eq!(Value::Null.to_number(), 0.0);
    }

    #[test]
    fn member_access() {
        let user = Value::from(json!({"name": "Ann", "tags": ["a", "b"]}));
        assert_eq!(user.member("name"), Value::from("Ann"));
        assert_eq!(user.member("missing"), Value::Undefined);
        assert_eq!(user.member("tags").member("length"), Value::from(2));
        assert_eq!(user.member("tags").member("1"), Value::from("b"));
        assert_eq!(Value::from("héllo").member("length"), Value::from(5));
        assert_eq!(Value::Null.member("x"), Value::Undefined);
    }

    #[test]
    fn set_member_pads_and_truncates_arrays() {
        let list = Value::from(json!([1]));
        assert_eq!(list.set_member("3", Value::from(4)), Ok(()));
        assert_eq!(list.member("length"), Value::from(4));
        assert_eq!(list.member("2"), Value::Undefined);
        assert_eq!(list.set_member("length", Value::from(1)), Ok(()));
        assert_eq!(list.member("length"), Value::from(1));
        assert!(matches!(
            Value::from(1).set_member("x", Value::Null),
            Err(ExprError::NotAssignable { target: "number", .. })
        ));
    }

    #[test]
    fn array_length_must_be_a_valid_size() {
        let list = Value::from(json!([1, 2]));
        for bad in [
            Value::Number(f64::INFINITY),
            Value::Number(f64::NAN),
            Value::from(-1),
            Value::from(1.5),
            Value::Number(4_294_967_296.0),
        ] {
            assert!(
                matches!(
                    list.set_member("length", bad.clone()),
                    Err(ExprError::InvalidArrayLength { .. })
                ),
                "{bad:?}"
            );
        }
        assert_eq!(list.member("length"), Value::from(2));

        // Valid but far beyond the end: refused instead of allocating.
        assert!(matches!(
            list.set_member("length", Value::Number(4_294_967_295.0)),
            Err(ExprError::NotAssignable { .. })
        ));
        assert_eq!(list.member("length"), Value::from(2));
    }

    #[test]
    fn index_writes_stay_near_the_end() {
        let list = Value::from(json!([1, 2]));
        let far = (1u64 << 34).to_string();
        assert!(matches!(
            list.set_member(&far, Value::from("x")),
            Err(ExprError::NotAssignable { .. })
        ));
        let gap = (2 + MAX_ARRAY_GAP + 1).to_string();
        assert!(list.set_member(&gap, Value::from("x")).is_err());
        assert_eq!(list.member("length"), Value::from(2));

        let edge = (2 + MAX_ARRAY_GAP).to_string();
        assert_eq!(list.set_member(&edge, Value::from("x")), Ok(()));
        assert_eq!(list.member("length"), Value::from(3 + MAX_ARRAY_GAP));

        let array = Array::new();
        assert!(!array.set(usize::MAX, Value::Null));
        assert!(array.is_empty());
    }

    #[test]
    fn object_keys_keep_insertion_order() {
        let obj = Object::new();
        obj.set("b", 1);
        obj.set("a", 2);
        obj.set("b", 3);
        let keys: Vec<String> = obj.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(obj.get("b"), Value::from(3));
    }

    #[test]
    fn json_round_trip_keeps_integers() {
        let json = json!({"id": 1, "ratio": 0.5, "tags": ["x"], "none": null});
        assert_eq!(Value::from(json.clone()).to_json(), json);
        assert_eq!(Value::Undefined.to_json(), serde_json::Value::Null);
    }
}
