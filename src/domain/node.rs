//! Tree vertex with tags, an optional payload and owned children.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, instrument};

use crate::domain::error::{NodeError, NodeResult};
use crate::domain::value::Value;

/// Tag of the conventional top layer. A topmost ancestor carrying it does
/// not count towards [`Node::depth`].
pub const ROOT_TAG: &str = "root";

pub(crate) type NodeRef = Rc<RefCell<NodeInner>>;

#[derive(Default)]
pub(crate) struct NodeInner {
    pub(crate) tags: Vec<String>,
    pub(crate) data: Option<Value>,
    pub(crate) parent: Weak<RefCell<NodeInner>>,
    pub(crate) children: Vec<Node>,
}

/// Handle to a tree vertex.
///
/// Cloning the handle is cheap and never copies the subtree; two handles
/// compare equal only when they point at the same vertex. Children are
/// owned by their parent, the parent link is weak.
#[derive(Clone)]
pub struct Node(pub(crate) NodeRef);

// Dropping a deep chain must not recurse once per level: children whose
// last strong handle lives here are unpacked onto a work list instead.
impl Drop for NodeInner {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(child.0) {
                let mut inner = cell.into_inner();
                pending.append(&mut inner.children);
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Bare node: no tags, no data, no parent.
    pub fn empty() -> Self {
        Node(Rc::new(RefCell::new(NodeInner::default())))
    }

    /// Top-level node, pre-seeded with the `"root"` tag.
    pub fn new() -> Self {
        let node = Self::empty();
        node.add_tag(&[ROOT_TAG]);
        node
    }

    /// `None` if `data` is or contains a node.
    pub fn with_data(data: impl Into<Value>) -> Option<Self> {
        let node = Self::new();
        node.set_data(data).ok()?;
        Some(node)
    }

    pub fn with_tags(tags: &[&str]) -> Self {
        let node = Self::new();
        node.add_tag(tags);
        node
    }

    pub fn with_data_and_tags(data: impl Into<Value>, tags: &[&str]) -> Option<Self> {
        let node = Self::with_data(data)?;
        node.add_tag(tags);
        Some(node)
    }

    /// Parentless node with the given tags and payload, or `None` if the
    /// payload is rejected.
    pub(crate) fn seeded(data: Option<Value>, tags: &[&str]) -> Option<Self> {
        let node = Self::empty();
        if let Some(data) = data {
            node.set_data(data).ok()?;
        }
        node.add_tag(tags);
        Some(node)
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ------------------------------------------------------------
    // Data slot
    // ------------------------------------------------------------

    pub fn data(&self) -> Option<Value> {
        self.0.borrow().data.clone()
    }

    pub fn has_data(&self) -> bool {
        self.0.borrow().data.is_some()
    }

    /// Stores `data` as this node's payload.
    ///
    /// Fails with [`NodeError::NodeAsData`] if the value is a node or wraps
    /// one, leaving the current payload untouched. `Value::Null` clears the
    /// slot.
    #[instrument(level = "trace", skip(self, data))]
    pub fn set_data(&self, data: impl Into<Value>) -> NodeResult<()> {
        let data = data.into();
        if data.contains_node() {
            debug!(kind = data.type_name(), "rejecting node payload");
            return Err(NodeError::NodeAsData(data.type_name()));
        }
        self.0.borrow_mut().data = match data {
            Value::Null => None,
            other => Some(other),
        };
        Ok(())
    }

    /// Removes and returns the payload.
    pub fn clear_data(&self) -> Option<Value> {
        self.0.borrow_mut().data.take()
    }

    // ------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    pub(crate) fn set_parent(&self, parent: Option<&Node>) {
        self.0.borrow_mut().parent = parent.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
    }

    fn position_of(&self, child: &Node) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.ptr_eq(child))
    }

    /// Appends `child` as the last child.
    ///
    /// A child that already has a parent is detached from it first. Cycles
    /// are not checked: attaching an ancestor leaves a loop that `depth`
    /// and `Debug` will not terminate on, and that is never freed.
    #[instrument(level = "trace", skip_all)]
    pub fn add_child(&self, child: Node) {
        child.detach();
        child.set_parent(Some(self));
        self.0.borrow_mut().children.push(child);
    }

    pub fn new_child(&self) -> Node {
        let child = Node::empty();
        self.add_child(child.clone());
        child
    }

    pub fn new_child_with_tags(&self, tags: &[&str]) -> Node {
        let child = Node::empty();
        child.add_tag(tags);
        self.add_child(child.clone());
        child
    }

    /// `None` (and nothing attached) if `data` is rejected.
    pub fn new_child_with_data(&self, data: impl Into<Value>) -> Option<Node> {
        self.new_child_with_data_and_tags(data, &[])
    }

    pub fn new_child_with_data_and_tags(
        &self,
        data: impl Into<Value>,
        tags: &[&str],
    ) -> Option<Node> {
        let child = Node::seeded(Some(data.into()), tags)?;
        self.add_child(child.clone());
        Some(child)
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.borrow().children.get(index).cloned()
    }

    /// First immediate child carrying all `tags`.
    pub fn child_by_tag(&self, tags: &[&str]) -> Option<Node> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|child| child.has_tag(tags))
            .cloned()
    }

    /// First node below this one carrying all `tags`, in pre-order: every
    /// child is tested before its subtree, and its subtree is searched
    /// before the next sibling.
    pub fn child_by_tag_deep(&self, tags: &[&str]) -> Option<Node> {
        self.descendants().find(|node| node.has_tag(tags))
    }

    pub fn child_index_by_tag(&self, tags: &[&str]) -> Option<usize> {
        self.0
            .borrow()
            .children
            .iter()
            .position(|child| child.has_tag(tags))
    }

    /// Puts `node` in the slot at `index` and returns the child it
    /// displaced, now parentless. Out of range is a no-op returning `None`.
    #[instrument(level = "trace", skip(self, node))]
    pub fn replace_child(&self, index: usize, node: Node) -> Option<Node> {
        let old = self.child(index)?;
        if old.ptr_eq(&node) {
            return None;
        }
        // `node` may be one of our own children; locate `old` again afterwards.
        node.detach();
        {
            let mut inner = self.0.borrow_mut();
            let slot = inner.children.iter().position(|c| c.ptr_eq(&old))?;
            inner.children[slot] = node.clone();
        }
        old.set_parent(None);
        node.set_parent(Some(self));
        Some(old)
    }

    /// Removes the children at `indices`, treated as a set. Out-of-range
    /// indices are ignored; survivors keep their order.
    #[instrument(level = "trace", skip(self))]
    pub fn rm_child(&self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let doomed: HashSet<usize> = indices.iter().copied().collect();
        let removed: Vec<Node> = {
            let mut inner = self.0.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.children)
                .into_iter()
                .enumerate()
                .partition(|(i, _)| doomed.contains(i));
            inner.children = kept.into_iter().map(|(_, child)| child).collect();
            removed.into_iter().map(|(_, child)| child).collect()
        };
        for child in &removed {
            child.set_parent(None);
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn rm_all_children(&self) {
        let removed = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &removed {
            child.set_parent(None);
        }
    }

    /// Removes this node from its parent. `false` if there is no parent.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        match parent.position_of(self) {
            Some(idx) => {
                parent.rm_child(&[idx]);
                true
            }
            None => false,
        }
    }

    /// Position within the parent's children, `None` without a parent.
    pub fn index(&self) -> Option<usize> {
        self.parent()?.position_of(self)
    }

    /// Child positions leading from the topmost ancestor down to this node.
    pub fn index_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            if let Some(idx) = parent.position_of(&current) {
                path.push(idx);
            }
            current = parent;
        }
        path.reverse();
        path
    }

    /// Parent hops up to the topmost ancestor, not counting that ancestor
    /// when it carries the `"root"` tag.
    pub fn depth(&self) -> usize {
        let mut hops = 0;
        let mut top = self.clone();
        while let Some(parent) = top.parent() {
            top = parent;
            hops += 1;
        }
        if hops > 0 && top.has_tag(&[ROOT_TAG]) {
            hops - 1
        } else {
            hops
        }
    }

    /// Clears tags and payload, destroys every child recursively and
    /// detaches this node from its parent.
    #[instrument(level = "trace", skip(self))]
    pub fn destroy(&self) {
        self.detach();
        let mut pending = vec![self.clone()];
        while let Some(node) = pending.pop() {
            let children = {
                let mut inner = node.0.borrow_mut();
                inner.tags.clear();
                inner.data = None;
                std::mem::take(&mut inner.children)
            };
            for child in children {
                child.set_parent(None);
                pending.push(child);
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f
                .debug_struct("Node")
                .field("tags", &inner.tags)
                .field("data", &inner.data)
                .field("children", &inner.children)
                .finish(),
            Err(_) => f.write_str("Node { <borrowed> }"),
        }
    }
}
