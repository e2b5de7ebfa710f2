// ============================================================================
// scope-watch - Repeater
//
// Keyed list reconciliation. Keeps one {child scope, DOM node} row per key of
// a watched collection, bracketed by two comment markers, and moves only the
// rows whose position changed.
// ============================================================================
//
// Render pass over the derived [(key, value)] list:
//
//   for each (key, value) at index:
//     reuse or create the row, write value into its scope
//     if keys[index] == key: continue
//     move the node after the previous row (or the start marker)
//     splice key into keys at index
//   tear down every key past the new length
//
// After a pass keys[..len] is exactly the snapshot's key order.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::DESTROY_EVENT;
use crate::core::value::{Value, format_number};
use crate::dom::Node;
use crate::primitives::scope::{Scope, Watchable, WeakScope};

// =============================================================================
// ROW KEY
// =============================================================================

/// Hashable projection of strict identity, used to key rows.
///
/// Numbers hash by bit pattern with `-0` folded into `0`. Reference values
/// key by allocation, so two equal-looking objects are different rows. A
/// row keeps its reference key alive, so the address cannot be handed to a
/// new object while the row exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    String(Rc<str>),
    Reference(usize),
}

impl RowKey {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Undefined => RowKey::Undefined,
            Value::Null => RowKey::Null,
            Value::Bool(b) => RowKey::Bool(*b),
            Value::Number(n) => RowKey::number(*n),
            Value::String(s) => RowKey::String(s.clone()),
            other => RowKey::Reference(other.identity().unwrap_or_default()),
        }
    }

    fn number(n: f64) -> Self {
        if n == 0.0 {
            RowKey::Number(0f64.to_bits())
        } else if n.is_nan() {
            RowKey::Number(f64::NAN.to_bits())
        } else {
            RowKey::Number(n.to_bits())
        }
    }
}

impl From<&Value> for RowKey {
    fn from(value: &Value) -> Self {
        RowKey::from_value(value)
    }
}

impl From<usize> for RowKey {
    fn from(index: usize) -> Self {
        RowKey::number(index as f64)
    }
}

impl From<i32> for RowKey {
    fn from(n: i32) -> Self {
        RowKey::number(f64::from(n))
    }
}

impl From<f64> for RowKey {
    fn from(n: f64) -> Self {
        RowKey::number(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::String(Rc::from(s))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Undefined => f.write_str("undefined"),
            RowKey::Null => f.write_str("null"),
            RowKey::Bool(b) => write!(f, "{b}"),
            RowKey::Number(bits) => f.write_str(&format_number(f64::from_bits(*bits))),
            RowKey::String(s) => f.write_str(s),
            RowKey::Reference(addr) => write!(f, "ref@{addr:#x}"),
        }
    }
}

// =============================================================================
// LIST RECONCILER
// =============================================================================

struct Row {
    scope: Scope,
    node: Node,
    /// Primary key value; pins the allocation behind a `RowKey::Reference`
    _key_value: Value,
}

/// The repeat engine behind [`Scope::repeat`].
///
/// Holds its owning scope weakly. The collection watcher it registers
/// holds the reconciler, so it lives as long as the owning scope does.
pub struct ListReconciler {
    scope: WeakScope,
    value_key: Rc<str>,
    primary_key: Option<Rc<str>>,
    row_factory: Box<dyn Fn(&Scope) -> Node>,
    start: Node,
    end: Node,
    keys: RefCell<Vec<RowKey>>,
    rows: RefCell<HashMap<RowKey, Row>>,
    moves: Cell<usize>,
}

impl ListReconciler {
    /// Bind a reconciler to `scope`, watching `expression` as a collection.
    pub fn new(
        scope: &Scope,
        expression: impl Into<Watchable>,
        value_key: &str,
        row_factory: impl Fn(&Scope) -> Node + 'static,
        primary_key: Option<&str>,
    ) -> Rc<Self> {
        let reconciler = Rc::new(Self {
            scope: scope.downgrade(),
            value_key: Rc::from(value_key),
            primary_key: primary_key.map(Rc::from),
            row_factory: Box::new(row_factory),
            start: Node::comment("repeat start"),
            end: Node::comment("repeat end"),
            keys: RefCell::new(Vec::new()),
            rows: RefCell::new(HashMap::new()),
            moves: Cell::new(0),
        });

        let weak: Weak<Self> = Rc::downgrade(&reconciler);
        scope.on(DESTROY_EVENT, move |_| {
            if let Some(reconciler) = weak.upgrade() {
                reconciler.clear();
            }
        });

        let owner = reconciler.clone();
        scope.watch_collection(expression, move |snapshot, _| owner.render(snapshot));

        reconciler
    }

    /// The start and end comment nodes that bracket the rows.
    pub fn markers(&self) -> (Node, Node) {
        (self.start.clone(), self.end.clone())
    }

    /// Append both markers to `parent`; rows render between them.
    pub fn mount(&self, parent: &Node) {
        parent.append_child(&self.start);
        parent.append_child(&self.end);
    }

    /// Tracked key order.
    pub fn keys(&self) -> Vec<RowKey> {
        self.keys.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.keys.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.borrow().is_empty()
    }

    pub fn row_scope(&self, key: impl Into<RowKey>) -> Option<Scope> {
        self.rows.borrow().get(&key.into()).map(|row| row.scope.clone())
    }

    pub fn row_node(&self, key: impl Into<RowKey>) -> Option<Node> {
        self.rows.borrow().get(&key.into()).map(|row| row.node.clone())
    }

    /// How many times an existing row node was relocated. Placing a new
    /// row does not count.
    pub fn move_count(&self) -> usize {
        self.moves.get()
    }

    /// Row nodes in tracked order.
    pub fn nodes(&self) -> Vec<Node> {
        let rows = self.rows.borrow();
        self.keys
            .borrow()
            .iter()
            .filter_map(|key| rows.get(key).map(|row| row.node.clone()))
            .collect()
    }

    /// Sync rows with `snapshot` (an array, an object, or anything else
    /// for an empty list).
    pub fn render(&self, snapshot: &Value) {
        let Some(owner) = self.scope.upgrade() else {
            return;
        };
        if owner.is_destroyed() {
            return;
        }

        let entries = self.entries(snapshot);
        for (index, (key, value)) in entries.iter().enumerate() {
            let existing = self.rows.borrow().get(key).map(|row| row.scope.clone());
            let created = match existing {
                Some(row_scope) => {
                    row_scope.set(&self.value_key, value.clone());
                    false
                }
                None => {
                    self.create_row(&owner, key, value);
                    true
                }
            };

            if self.keys.borrow().get(index) == Some(key) {
                continue;
            }
            self.move_row(index, key, created);
        }

        let stale = {
            let mut keys = self.keys.borrow_mut();
            if keys.len() > entries.len() {
                keys.split_off(entries.len())
            } else {
                Vec::new()
            }
        };
        for key in stale {
            self.destroy_row(&key);
        }
    }

    /// Derive the ordered (key, value) list. Later duplicates of a key are
    /// dropped.
    fn entries(&self, snapshot: &Value) -> Vec<(RowKey, Value)> {
        let positional: Vec<(RowKey, Value)> = match snapshot {
            Value::Array(array) => array
                .to_vec()
                .into_iter()
                .enumerate()
                .map(|(index, value)| (RowKey::from(index), value))
                .collect(),
            Value::Object(object) => object
                .entries()
                .into_iter()
                .map(|(key, value)| (RowKey::String(key), value))
                .collect(),
            _ => return Vec::new(),
        };

        let mut seen = HashSet::with_capacity(positional.len());
        let mut entries = Vec::with_capacity(positional.len());
        for (position, value) in positional {
            let key = match &self.primary_key {
                Some(field) => RowKey::from_value(&value.member(field)),
                None => position,
            };
            if !seen.insert(key.clone()) {
                tracing::warn!(key = %key, "duplicate repeat key skipped");
                continue;
            }
            entries.push((key, value));
        }
        entries
    }

    fn create_row(&self, owner: &Scope, key: &RowKey, value: &Value) {
        let scope = owner.generate();
        scope.set(&self.value_key, value.clone());
        let node = (self.row_factory)(&scope);
        let key_value = match &self.primary_key {
            Some(field) => value.member(field),
            None => Value::Undefined,
        };
        tracing::debug!(key = %key, scope = scope.id(), "repeat row created");
        self.rows.borrow_mut().insert(
            key.clone(),
            Row {
                scope,
                node,
                _key_value: key_value,
            },
        );
    }

    fn move_row(&self, index: usize, key: &RowKey, created: bool) {
        let anchor = match index {
            0 => Some(self.start.clone()),
            _ => {
                let previous = self.keys.borrow().get(index - 1).cloned();
                previous.and_then(|k| self.row_node(k))
            }
        };
        if let (Some(anchor), Some(node)) = (anchor, self.row_node(key.clone())) {
            tracing::trace!(key = %key, index, created, "repeat row placed");
            anchor.insert_after(&node);
            if !created {
                self.moves.set(self.moves.get() + 1);
            }
        }

        let mut keys = self.keys.borrow_mut();
        if let Some(old) = keys.iter().position(|k| k == key) {
            keys.remove(old);
        }
        let at = index.min(keys.len());
        keys.insert(at, key.clone());
    }

    fn destroy_row(&self, key: &RowKey) {
        let row = self.rows.borrow_mut().remove(key);
        if let Some(row) = row {
            tracing::debug!(key = %key, scope = row.scope.id(), "repeat row removed");
            row.scope.destroy();
            row.node.remove();
        }
    }

    /// Owner teardown: detach every row node and forget all rows.
    fn clear(&self) {
        let rows: Vec<Row> = self.rows.borrow_mut().drain().map(|(_, row)| row).collect();
        self.keys.borrow_mut().clear();
        for row in &rows {
            row.node.remove();
        }
    }
}

impl fmt::Debug for ListReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListReconciler")
            .field("value_key", &self.value_key)
            .field("primary_key", &self.primary_key)
            .field("keys", &self.keys.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
