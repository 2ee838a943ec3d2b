//! The live output tree.
//!
//! An arena of nodes addressed by generational [`NodeId`]s. Removing a node
//! frees its slot for reuse and bumps the slot's generation, so ids of
//! removed nodes go stale instead of aliasing new nodes. [`Document`] is a
//! shared handle: clones see the same tree, and every operation borrows the
//! arena only for its own duration, so event handlers may mutate the tree.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Generational index of a node in a [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

/// An event delivered to a listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub target: NodeId,
}

pub type EventHandler = Rc<dyn Fn(&Event)>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element(String),
    Text(String),
    /// A transparent container: serializes as its children only.
    Fragment,
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    listeners: FxHashMap<String, EventHandler>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            listeners: FxHashMap::default(),
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl Arena {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.node = Some(NodeData::new(kind));
                return NodeId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(NodeData::new(kind)),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Detach `root` and free it with its whole subtree.
    fn free(&mut self, root: NodeId) {
        self.detach(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index())
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(id.index);
            self.live -= 1;
            stack.extend(node.children);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.get(child).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }
}

/// Shared handle to an output tree.
#[derive(Clone, Default)]
pub struct Document {
    arena: Rc<RefCell<Arena>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.arena
            .borrow_mut()
            .push(NodeKind::Element(tag.to_string()))
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.arena
            .borrow_mut()
            .push(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&self) -> NodeId {
        self.arena.borrow_mut().push(NodeKind::Fragment)
    }

    /// Number of live nodes. Detached nodes count until they are removed.
    pub fn len(&self) -> usize {
        self.arena.borrow().live
    }

    /// Whether `node` still refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.borrow().get(node).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.arena.borrow().get(node).map(|n| n.kind.clone())
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text(_) | NodeKind::Fragment => None,
        }
    }

    /// Text content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match self.kind(node)? {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) | NodeKind::Fragment => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .borrow()
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.arena
            .borrow()
            .get(parent)
            .and_then(|n| n.children.get(index).copied())
    }

    /// Append `child`, moving it out of its current parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut arena = self.arena.borrow_mut();
        arena.detach(child);
        if let Some(node) = arena.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = arena.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Put `new` where `old` is. Returns `false` if `old` is not a child of
    /// `parent`.
    pub fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId) -> bool {
        let mut arena = self.arena.borrow_mut();
        arena.detach(new);
        let Some(slot) = arena
            .get_mut(parent)
            .and_then(|p| p.children.iter_mut().find(|c| **c == old))
        else {
            return false;
        };
        *slot = new;
        if let Some(node) = arena.get_mut(old) {
            node.parent = None;
        }
        if let Some(node) = arena.get_mut(new) {
            node.parent = Some(parent);
        }
        true
    }

    /// Detach `child` from `parent`. The child stays alive.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.arena.borrow_mut().detach(child);
        true
    }

    /// Detach `node` and free it with its subtree. Every id inside goes
    /// stale, and their listeners are dropped.
    pub fn remove(&self, node: NodeId) {
        self.arena.borrow_mut().free(node);
    }

    /// Remove and free every child of `parent`.
    pub fn clear_children(&self, parent: NodeId) {
        let mut arena = self.arena.borrow_mut();
        let children = arena
            .get_mut(parent)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            if let Some(node) = arena.get_mut(child) {
                node.parent = None;
            }
            arena.free(child);
        }
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.attributes.remove(name);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.arena
            .borrow()
            .get(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.style.insert(property.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&self, node: NodeId, property: &str) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.style.remove(property);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.arena
            .borrow()
            .get(node)
            .and_then(|n| n.style.get(property).cloned())
    }

    /// Bind `handler` to `event`, replacing any earlier listener.
    pub fn set_listener(&self, node: NodeId, event: &str, handler: EventHandler) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.listeners.insert(event.to_string(), handler);
        }
    }

    pub fn remove_listener(&self, node: NodeId, event: &str) {
        if let Some(node) = self.arena.borrow_mut().get_mut(node) {
            node.listeners.remove(event);
        }
    }

    pub fn has_listener(&self, node: NodeId, event: &str) -> bool {
        self.arena
            .borrow()
            .get(node)
            .is_some_and(|n| n.listeners.contains_key(event))
    }

    /// Call the listener for `event` on `target`. Events do not bubble.
    /// Returns `false` if nothing was listening.
    pub fn dispatch_event(&self, target: NodeId, event: &str) -> bool {
        let handler = self
            .arena
            .borrow()
            .get(target)
            .and_then(|n| n.listeners.get(event).cloned());
        let Some(handler) = handler else {
            return false;
        };
        tracing::trace!(%target, event, "dispatch");
        handler(&Event {
            name: event.to_string(),
            target,
        });
        true
    }

    /// Serialize `node` and its subtree.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.arena.borrow().write_html(node, &mut out);
        out
    }

    /// Serialize only the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        if let Some(data) = arena.get(node) {
            for child in &data.children {
                arena.write_html(*child, &mut out);
            }
        }
        out
    }
}

impl Arena {
    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => escape_into(text, out),
            NodeKind::Fragment => {
                for child in &node.children {
                    self.write_html(*child, out);
                }
            }
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &node.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                if !node.style.is_empty() {
                    let style = node
                        .style
                        .iter()
                        .map(|(k, v)| format!("{k}: {v}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    out.push_str(" style=\"");
                    escape_into(&style, out);
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.len())
            .finish_non_exhaustive()
    }
}
