// ============================================================================
// scope-watch - DOM Node
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::event::{Event, ListenerId};
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Rc<str>),
    Text,
    Comment,
}

struct EventListener {
    id: ListenerId,
    event: Rc<str>,
    handler: Rc<dyn Fn(&Event)>,
}

struct NodeInner {
    kind: NodeKind,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
    data: RefCell<String>,
    attributes: RefCell<Vec<(String, String)>>,
    classes: RefCell<Vec<String>>,
    hidden: Cell<bool>,
    value: RefCell<Value>,
    listeners: RefCell<Vec<EventListener>>,
    next_listener: Cell<u64>,
}

/// Handle to a node in an in-memory document tree.
///
/// Clones refer to the same node. Children are held strongly, the parent
/// link is weak.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

impl Node {
    fn build(kind: NodeKind, data: String) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                kind,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                data: RefCell::new(data),
                attributes: RefCell::new(Vec::new()),
                classes: RefCell::new(Vec::new()),
                hidden: Cell::new(false),
                value: RefCell::new(Value::Undefined),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::build(NodeKind::Element(Rc::from(tag)), String::new())
    }

    pub fn text(data: &str) -> Self {
        Self::build(NodeKind::Text, data.to_owned())
    }

    pub fn comment(data: &str) -> Self {
        Self::build(NodeKind::Comment, data.to_owned())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.inner.kind
    }

    /// Tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.inner.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // TREE
    // =========================================================================

    pub fn parent(&self) -> Option<Node> {
        self.inner.parent.borrow().upgrade().map(|inner| Node { inner })
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    /// Element children only.
    pub fn elements(&self) -> Vec<Node> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter(|c| c.tag().is_some())
            .cloned()
            .collect()
    }

    pub fn next_sibling(&self) -> Option<Node> {
        let parent = self.parent()?;
        let siblings = parent.inner.children.borrow();
        let index = siblings.iter().position(|c| c.ptr_eq(self))?;
        siblings.get(index + 1).cloned()
    }

    /// Move `child` to the end of this node's children.
    pub fn append_child(&self, child: &Node) {
        if child.ptr_eq(self) {
            return;
        }
        child.remove();
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
    }

    /// Move `node` so it directly follows this node under the same parent.
    ///
    /// Does nothing when this node is detached.
    pub fn insert_after(&self, node: &Node) {
        if node.ptr_eq(self) {
            return;
        }
        let Some(parent) = self.parent() else {
            return;
        };
        node.remove();
        let mut siblings = parent.inner.children.borrow_mut();
        let Some(index) = siblings.iter().position(|c| c.ptr_eq(self)) else {
            return;
        };
        *node.inner.parent.borrow_mut() = Rc::downgrade(&parent.inner);
        siblings.insert(index + 1, node.clone());
    }

    /// Detach from the parent. No-op for detached nodes.
    pub fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .inner
            .children
            .borrow_mut()
            .retain(|c| !c.ptr_eq(self));
        *self.inner.parent.borrow_mut() = Weak::new();
    }

    // =========================================================================
    // CONTENT
    // =========================================================================

    /// Concatenated text of this node and its descendants, comments excluded.
    pub fn text_content(&self) -> String {
        match &self.inner.kind {
            NodeKind::Element(_) => {
                let mut out = String::new();
                for child in self.inner.children.borrow().iter() {
                    if child.inner.kind != NodeKind::Comment {
                        out.push_str(&child.text_content());
                    }
                }
                out
            }
            NodeKind::Text | NodeKind::Comment => self.inner.data.borrow().clone(),
        }
    }

    /// Replace the content with a single text node (none when `text` is empty).
    pub fn set_text(&self, text: &str) {
        match &self.inner.kind {
            NodeKind::Element(_) => {
                let old = std::mem::take(&mut *self.inner.children.borrow_mut());
                for child in &old {
                    *child.inner.parent.borrow_mut() = Weak::new();
                }
                if !text.is_empty() {
                    self.append_child(&Node::text(text));
                }
            }
            NodeKind::Text | NodeKind::Comment => *self.inner.data.borrow_mut() = text.to_owned(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        let mut attributes = self.inner.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_owned(),
            None => attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_attr(&self, name: &str) {
        self.inner.attributes.borrow_mut().retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.classes.borrow().iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.inner.classes.borrow_mut().push(class.to_owned());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.inner.classes.borrow_mut().retain(|c| c != class);
    }

    pub fn show(&self) {
        self.inner.hidden.set(false);
    }

    pub fn hide(&self) {
        self.inner.hidden.set(true);
    }

    pub fn is_visible(&self) -> bool {
        !self.inner.hidden.get()
    }

    /// Form control value.
    pub fn value(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<Value>) {
        let previous = self.inner.value.replace(value.into());
        drop(previous);
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    pub fn on(&self, event: &str, handler: impl Fn(&Event) + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(EventListener {
            id,
            event: Rc::from(event),
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a listener. Returns whether it was still registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let removed: Vec<EventListener> = {
            let mut listeners = self.inner.listeners.borrow_mut();
            let (gone, kept) = listeners.drain(..).partition(|l| l.id == id);
            *listeners = kept;
            gone
        };
        !removed.is_empty()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| &*l.event == event)
            .count()
    }

    /// Run every listener for `event` on this node, in registration order.
    pub fn dispatch(&self, event: &str) -> Event {
        let handlers: Vec<_> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| &*l.event == event)
            .map(|l| l.handler.clone())
            .collect();
        let dispatched = Event::new(event, self.clone());
        for handler in handlers {
            handler(&dispatched);
        }
        dispatched
    }

    // =========================================================================
    // SERIALIZATION
    // =========================================================================

    /// Serialize the subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.inner.kind {
            NodeKind::Text => out.push_str(&escape(&self.inner.data.borrow())),
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(&self.inner.data.borrow());
                out.push_str("-->");
            }
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                let classes = self.inner.classes.borrow();
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape(&classes.join(" "))));
                }
                for (name, value) in self.inner.attributes.borrow().iter() {
                    out.push_str(&format!(" {name}=\"{}\"", escape(value)));
                }
                if self.inner.hidden.get() {
                    out.push_str(" style=\"display: none\"");
                }
                out.push('>');
                for child in self.inner.children.borrow().iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_after_places_node_behind_reference() {
        let list = Node::element("ul");
        let a = Node::element("li");
        let c = Node::element("li");
        a.set_text("a");
        c.set_text("c");
        list.append_child(&a);
        list.append_child(&c);

        let b = Node::element("li");
        b.set_text("b");
        a.insert_after(&b);

        assert_eq!(list.to_html(), "<ul><li>a</li><li>b</li><li>c</li></ul>");
        assert!(a.next_sibling().is_some_and(|n| n.ptr_eq(&b)));
    }

    #[test]
    fn insert_after_moves_existing_sibling() {
        let list = Node::element("ul");
        let nodes: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| {
                let li = Node::element("li");
                li.set_text(t);
                list.append_child(&li);
                li
            })
            .collect();

        nodes[2].insert_after(&nodes[0]);

        assert_eq!(list.text_content(), "bca");
        assert_eq!(list.children().len(), 3);
    }

    #[test]
    fn insert_after_detached_reference_is_noop() {
        let loose = Node::comment("start");
        let row = Node::element("li");
        loose.insert_after(&row);
        assert!(row.parent().is_none());
    }

    #[test]
    fn text_content_skips_comments() {
        let div = Node::element("div");
        div.append_child(&Node::comment("marker"));
        div.append_child(&Node::text("hello"));
        assert_eq!(div.text_content(), "hello");
        assert_eq!(div.to_html(), "<div><!--marker-->hello</div>");
    }

    #[test]
    fn set_text_replaces_children() {
        let p = Node::element("p");
        let old = Node::element("b");
        p.append_child(&old);
        p.set_text("plain");
        assert_eq!(p.to_html(), "<p>plain</p>");
        assert!(old.parent().is_none());
        p.set_text("");
        assert!(p.children().is_empty());
    }

    #[test]
    fn attributes_classes_and_visibility() {
        let a = Node::element("a");
        a.set_attr("href", "/x");
        a.set_attr("href", "/y");
        a.add_class("active");
        a.add_class("active");
        a.hide();
        assert_eq!(a.attr("href").as_deref(), Some("/y"));
        assert_eq!(
            a.to_html(),
            "<a class=\"active\" href=\"/y\" style=\"display: none\"></a>"
        );

        a.remove_attr("href");
        a.remove_class("active");
        a.show();
        assert_eq!(a.to_html(), "<a></a>");
        assert!(a.is_visible());
    }

    #[test]
    fn listeners_dispatch_and_detach() {
        let button = Node::element("button");
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = button.on("click", move |event| {
            h.set(h.get() + 1);
            event.prevent_default();
        });

        let event = button.dispatch("click");
        assert!(event.default_prevented());
        assert!(event.target().ptr_eq(&button));
        button.dispatch("submit");
        assert_eq!(hits.get(), 1);

        assert!(button.off(id));
        assert!(!button.off(id));
        button.dispatch("click");
        assert_eq!(hits.get(), 1);
        assert_eq!(button.listener_count("click"), 0);
    }

    #[test]
    fn text_is_escaped() {
        let p = Node::element("p");
        p.set_text("<a & b>");
        assert_eq!(p.to_html(), "<p>&lt;a &amp; b&gt;</p>");
    }
}
